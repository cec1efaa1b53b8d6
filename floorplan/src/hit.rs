//! Hit testing against the live scene.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::scene::{Scene, SceneObject};

/// Which objects a hit test may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitFilter {
    /// Only objects that can be picked for editing (locked ones are skipped).
    Selectable,
    /// Any object that receives pointer events.
    Evented,
    /// Evented objects that carry a non-empty label.
    Labeled,
}

impl HitFilter {
    fn admits(self, object: &SceneObject) -> bool {
        match self {
            Self::Selectable => object.selectable && object.evented,
            Self::Evented => object.evented,
            Self::Labeled => object.evented && !object.label.is_empty(),
        }
    }
}

/// Index of the topmost object under `point` (floor coordinates) that passes `filter`.
#[must_use]
pub fn hit_test(point: Point, scene: &Scene, filter: HitFilter) -> Option<usize> {
    scene
        .objects()
        .iter()
        .enumerate()
        .rev()
        .find(|(_, object)| filter.admits(object) && object.contains_point(point))
        .map(|(index, _)| index)
}
