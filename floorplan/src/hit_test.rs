use super::*;
use crate::scene::Drawable;

fn square(left: f64, top: f64, label: &str) -> SceneObject {
    let mut o = SceneObject::new(Drawable::Rect { width: 50.0, height: 50.0 }, left, top);
    o.label = label.into();
    o
}

#[test]
fn empty_scene_has_no_hit() {
    assert_eq!(hit_test(Point::new(0.0, 0.0), &Scene::default(), HitFilter::Evented), None);
}

#[test]
fn topmost_overlapping_object_wins() {
    let scene = Scene::new(vec![square(0.0, 0.0, "back"), square(25.0, 25.0, "front")]);
    assert_eq!(hit_test(Point::new(30.0, 30.0), &scene, HitFilter::Selectable), Some(1));
    assert_eq!(hit_test(Point::new(10.0, 10.0), &scene, HitFilter::Selectable), Some(0));
    assert_eq!(hit_test(Point::new(100.0, 100.0), &scene, HitFilter::Selectable), None);
}

#[test]
fn locked_object_is_skipped_for_selection_only() {
    let mut locked = square(25.0, 25.0, "locked");
    locked.locked = true;
    locked.selectable = false;
    let scene = Scene::new(vec![square(0.0, 0.0, "below"), locked]);
    let p = Point::new(30.0, 30.0);
    assert_eq!(hit_test(p, &scene, HitFilter::Selectable), Some(0));
    assert_eq!(hit_test(p, &scene, HitFilter::Evented), Some(1));
}

#[test]
fn labeled_filter_skips_unnamed_objects() {
    let scene = Scene::new(vec![square(0.0, 0.0, "shop"), square(0.0, 0.0, "")]);
    assert_eq!(hit_test(Point::new(5.0, 5.0), &scene, HitFilter::Labeled), Some(0));
}

#[test]
fn non_evented_objects_are_transparent() {
    let mut overlay = square(0.0, 0.0, "overlay");
    overlay.evented = false;
    let scene = Scene::new(vec![square(0.0, 0.0, "base"), overlay]);
    assert_eq!(hit_test(Point::new(5.0, 5.0), &scene, HitFilter::Evented), Some(0));
}
