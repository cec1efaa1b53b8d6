use std::time::Duration;

use tokio::sync::mpsc;

use super::*;
use crate::demo::demo_building;
use crate::doc::{Floor, MapObject, Shape};
use crate::notice::NoticeLevel;

fn demo_viewer() -> ViewerSession {
    let mut v = ViewerSession::default();
    v.load(demo_building().unwrap());
    v.open_floor("floor_1");
    v
}

fn screen_of(v: &ViewerSession, x: f64, y: f64) -> Point {
    v.camera().world_to_screen(Point::new(x, y))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn rect(label: &str, left: f64, top: f64) -> MapObject {
    let mut m = MapObject::new(Shape::Rect { width: 100.0, height: 60.0 }, left, top);
    m.object_label = label.into();
    m
}

fn icon(id: &str, label: &str, left: f64, top: f64) -> MapObject {
    let mut m = MapObject::new(Shape::Icon { object_icon: id.into(), width: 24.0, height: 24.0 }, left, top);
    m.object_label = label.into();
    m
}

/// Ground floor with one icon, first floor with two; the icons sit at the same
/// floor index on both.
fn two_floor_building() -> Building {
    let mut b = Building::new_empty();
    b.name = "Two Floors".into();
    b.floors["floor_1"].objects = vec![rect("Hall", 0.0, 0.0), icon("restaurant", "Food", 200.0, 0.0)];
    b.floors.insert(
        "floor_2".into(),
        Floor {
            name: "First Floor".into(),
            objects: vec![rect("Lounge", 0.0, 0.0), icon("exit", "Exit", 200.0, 0.0), icon("atm", "ATM", 300.0, 0.0)],
        },
    );
    b
}

// =============================================================================
// LOADING
// =============================================================================

#[test]
fn scene_waits_for_every_glyph() {
    let mut v = ViewerSession::default();
    let jobs = v.load(demo_building().unwrap());
    assert_eq!(jobs.len(), 4);
    assert!(v.is_loading());
    assert!(v.scene().is_empty());

    let mut progress = Vec::new();
    for job in jobs.into_iter().rev() {
        let result = job.request.resolve();
        progress.push(v.complete_glyph(job.ticket, result));
    }
    assert_eq!(progress[0], LoadProgress::Pending { completed: 1, scheduled: 4 });
    assert_eq!(progress[3], LoadProgress::Ready);
    assert!(!v.is_loading());
    assert_eq!(v.scene().len(), 12);
}

#[test]
fn text_is_brought_to_front_and_camera_fitted() {
    let v = demo_viewer();
    let objects = v.scene().objects();
    assert!(objects[objects.len() - 1].is_text());
    assert!(objects[objects.len() - 2].is_text());
    assert!(!objects[0].is_text());
    assert_ne!(v.camera(), Camera::default());
}

#[test]
fn failed_glyph_still_drains_the_barrier() {
    let mut v = ViewerSession::default();
    let mut jobs = v.load(demo_building().unwrap());
    let broken = jobs.remove(0);
    v.complete_glyph(
        broken.ticket,
        Err(DecodeError::Glyph { icon: broken.request.icon().to_owned(), reason: "timeout".into() }),
    );
    for job in jobs {
        let result = job.request.resolve();
        v.complete_glyph(job.ticket, result);
    }
    assert!(!v.is_loading());
    assert_eq!(v.scene().len(), 11);
    assert!(v.notices().iter().any(|n| n.level == NoticeLevel::Warning));
}

#[test]
fn late_glyph_from_previous_floor_is_ignored() {
    let mut v = ViewerSession::default();
    let old_jobs = v.load(two_floor_building());
    assert_eq!(old_jobs.len(), 1);
    let new_jobs = v.begin_floor("floor_2");
    assert_eq!(new_jobs.len(), 2);

    let stale = &old_jobs[0];
    let progress = v.complete_glyph(stale.ticket, stale.request.resolve());
    assert_eq!(progress, LoadProgress::Pending { completed: 0, scheduled: 2 });

    let atm = &new_jobs[1];
    let progress = v.complete_glyph(atm.ticket, atm.request.resolve());
    assert_eq!(progress, LoadProgress::Pending { completed: 1, scheduled: 2 });
    assert!(v.is_loading());
    assert!(v.scene().is_empty());

    let exit = &new_jobs[0];
    assert_eq!(v.complete_glyph(exit.ticket, exit.request.resolve()), LoadProgress::Ready);
    let expected = exit.request.clone().finish(exit.request.resolve().unwrap());
    let placed = v.scene().objects().iter().find(|o| o.label == "Exit").unwrap();
    assert_eq!(placed.drawable, expected.drawable);
    assert_eq!(v.scene().len(), 3);
}

/// Two plain objects and three icons whose glyphs arrive after staggered
/// delays. Nothing is placed and the camera stays put until the last glyph
/// lands; then the fit covers every object, the far icon included.
#[tokio::test(start_paused = true)]
async fn camera_fits_only_after_last_delayed_glyph() {
    let mut b = Building::new_empty();
    b.name = "Gate".into();
    b.floors["floor_1"].objects = vec![
        rect("Hall", 0.0, 0.0),
        icon("restaurant", "Food", 120.0, 20.0),
        rect("Shop", 150.0, 200.0),
        icon("restroom", "WC", 260.0, 40.0),
        icon("exit", "Exit", 900.0, 700.0),
    ];

    let mut v = ViewerSession::default();
    let jobs = v.load(b);
    assert_eq!(jobs.len(), 3);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let count = jobs.len();
    for (i, job) in jobs.into_iter().enumerate() {
        let tx = tx.clone();
        let delay = Duration::from_millis(150 * (count - i) as u64);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = job.request.resolve();
            tx.send((job.ticket, result)).unwrap();
        });
    }
    drop(tx);

    let mut seen = 0;
    while let Some((ticket, result)) = rx.recv().await {
        seen += 1;
        let progress = v.complete_glyph(ticket, result);
        if seen < count {
            assert_eq!(progress, LoadProgress::Pending { completed: seen, scheduled: count });
            assert!(v.scene().content_bounds().is_none());
            assert_eq!(v.camera(), Camera::default());
        } else {
            assert_eq!(progress, LoadProgress::Ready);
        }
    }

    assert_eq!(v.scene().len(), 5);
    let bounds = v.scene().content_bounds().unwrap();
    assert!(close(bounds.min_x, 0.0) && bounds.max_x > 900.0);
    let mut expected = Camera::default();
    expected.fit_to_bounds(bounds, Viewport::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT), FIT_PADDING_PX);
    assert_eq!(v.camera(), expected);
}

#[test]
fn objects_are_never_selectable_in_viewer() {
    let v = demo_viewer();
    assert!(v.scene().objects().iter().all(|o| !o.selectable && o.evented));
}

#[test]
fn unknown_floor_falls_back_to_first() {
    let mut v = demo_viewer();
    v.open_floor("floor_2");
    assert_eq!(v.active_floor(), "floor_2");
    assert_eq!(v.scene().len(), 7);
    v.open_floor("basement");
    assert_eq!(v.active_floor(), "floor_1");
}

// =============================================================================
// SEARCH AND DETAILS
// =============================================================================

#[test]
fn select_hit_switches_floor_and_highlights() {
    let mut v = demo_viewer();
    let hits = v.search("kolachi");
    assert_eq!(hits.len(), 1);

    let details = v.select_hit(&hits[0]).unwrap();
    assert_eq!(v.active_floor(), "floor_2");
    assert_eq!(details.name, "Kolachi Grill");
    assert_eq!(details.tags, ["food", "bbq", "restaurant"]);
    assert_eq!(details.floor_name, "First Floor");
    assert!(v.highlight().is_some());
}

#[test]
fn tap_opens_labelled_object_under_text() {
    let mut v = demo_viewer();
    let at = screen_of(&v, 180.0, 150.0);
    let details = v.tap(at).unwrap();
    assert_eq!(details.name, "Food Court");
    assert_eq!(details.tags, ["food", "dining", "restaurant"]);

    let hl = v.highlight().unwrap();
    assert!(close(hl.min_x, 70.0) && close(hl.max_x, 290.0));
}

#[test]
fn tap_on_unlabelled_area_shows_nothing() {
    let mut v = demo_viewer();
    let at = screen_of(&v, 60.0, 60.0);
    assert_eq!(v.tap(at), None);
    assert_eq!(v.selection(), None);
}

#[test]
fn details_fall_back_to_unnamed() {
    let v = demo_viewer();
    assert_eq!(v.details(0).unwrap().name, "Unnamed");
    assert!(v.details(0).unwrap().tags.is_empty());
    assert_eq!(v.details(99), None);
}

// =============================================================================
// MARKER AND DIRECTIONS
// =============================================================================

#[test]
fn directions_without_marker_arm_marker_mode() {
    let mut v = demo_viewer();
    v.tap(screen_of(&v, 180.0, 150.0));
    assert_eq!(v.request_directions(), None);
    assert!(v.is_marker_mode());
    assert!(v.notices().iter().any(|n| n.message.starts_with("Please set your location first")));
}

#[test]
fn directions_without_selection_ask_for_a_destination() {
    let mut v = demo_viewer();
    v.toggle_marker_mode();
    v.tap(screen_of(&v, 400.0, 520.0));
    v.take_notices();

    assert_eq!(v.request_directions(), None);
    assert_eq!(v.directions(), None);
    assert!(!v.is_marker_mode());
    assert!(
        v.notices()
            .iter()
            .any(|n| n.level == NoticeLevel::Info && n.message == "Please select a destination first")
    );
}

#[test]
fn marker_then_directions_draws_dashed_line() {
    let mut v = demo_viewer();
    v.toggle_marker_mode();
    assert_eq!(v.tap(screen_of(&v, 400.0, 520.0)), None);
    assert!(!v.is_marker_mode());
    let marker = v.marker().unwrap();
    assert!(close(marker.x, 400.0) && close(marker.y, 520.0));

    v.tap(screen_of(&v, 180.0, 150.0));
    let route = v.request_directions().unwrap();
    assert!(close(route.from.x, 400.0));
    assert!(close(route.to.x, 180.0) && close(route.to.y, 150.0));
    assert_eq!(route.dash, [10.0, 5.0]);
    assert_eq!(route.stroke_width, 4.0);
    assert_eq!(v.directions(), Some(route));
}

#[test]
fn overlays_do_not_receive_taps() {
    let mut v = demo_viewer();
    v.toggle_marker_mode();
    v.tap(screen_of(&v, 400.0, 520.0));
    v.tap(screen_of(&v, 180.0, 150.0));

    let overlays = v.overlay_objects();
    assert_eq!(overlays.len(), 2);
    assert!(overlays.iter().all(|o| !o.evented && !o.selectable));
    let pin = &overlays[1];
    assert_eq!(pin.drawable, Drawable::Circle { radius: 15.0 });
    assert!(close(pin.left, 385.0));
    assert_eq!(pin.fill.as_deref(), Some("#EF4444"));
}

#[test]
fn marker_survives_floor_switch() {
    let mut v = demo_viewer();
    v.toggle_marker_mode();
    v.tap(screen_of(&v, 400.0, 520.0));
    v.open_floor("floor_2");
    assert!(v.marker().is_some());
    assert!(v.highlight().is_none());
}

#[test]
fn zoom_steps_by_twenty_percent() {
    let mut v = ViewerSession::default();
    v.zoom_in();
    assert!(close(v.camera().zoom, 1.2));
    v.zoom_out();
    assert!(close(v.camera().zoom, 1.0));
}
