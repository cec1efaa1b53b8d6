//! Scene model: the live drawables of the floor currently on screen.
//!
//! A `SceneObject` is what the rendering surface owns while a floor is open. It
//! carries the same transform, style and metadata as a `MapObject` plus the
//! interaction flags the surface needs (`selectable`, `evented`, hover cursor)
//! and, for icons, the parsed glyph parts. The codec converts between the two.
//!
//! `Scene` keeps objects in z-order (index 0 = back-most) and provides the
//! layering operations the editor exposes.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use crate::camera::Point;
use crate::glyph::GlyphPart;

/// Approximate advance width of one text character, as a fraction of font size.
const TEXT_ADVANCE_EM: f64 = 0.6;

/// Line box height as a multiple of font size.
const TEXT_LINE_HEIGHT_EM: f64 = 1.16;

/// Kind-specific geometry of a placed object.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Rect { width: f64, height: f64 },
    Circle { radius: f64 },
    /// Endpoints in floor coordinates.
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Text { text: String, font_size: f64, font_family: String },
    Icon { icon: String, width: f64, height: f64, parts: Vec<GlyphPart> },
}

/// Cursor shown while hovering an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Move,
    Pointer,
}

/// A placed, drawable object on the active floor.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub drawable: Drawable,
    pub left: f64,
    pub top: f64,
    pub angle: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub label: String,
    pub tags: String,
    pub locked: bool,
    /// Can be picked and transformed interactively.
    pub selectable: bool,
    /// Receives pointer events (taps, hovers).
    pub evented: bool,
    pub hover_cursor: Cursor,
}

impl SceneObject {
    /// A new unlocked, selectable object at `(left, top)` with default style.
    #[must_use]
    pub fn new(drawable: Drawable, left: f64, top: f64) -> Self {
        Self {
            drawable,
            left,
            top,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            label: String::new(),
            tags: String::new(),
            locked: false,
            selectable: true,
            evented: true,
            hover_cursor: Cursor::Move,
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.drawable, Drawable::Text { .. })
    }

    /// Unscaled, unrotated box as `(x, y, width, height)`.
    fn local_box(&self) -> (f64, f64, f64, f64) {
        match &self.drawable {
            Drawable::Rect { width, height } | Drawable::Icon { width, height, .. } => {
                (self.left, self.top, *width, *height)
            }
            Drawable::Circle { radius } => (self.left, self.top, radius * 2.0, radius * 2.0),
            Drawable::Line { x1, y1, x2, y2 } => (x1.min(*x2), y1.min(*y2), (x2 - x1).abs(), (y2 - y1).abs()),
            Drawable::Text { text, font_size, .. } => {
                let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                let line_count = text.lines().count().max(1);
                #[allow(clippy::cast_precision_loss)]
                let size = (
                    longest as f64 * font_size * TEXT_ADVANCE_EM,
                    line_count as f64 * font_size * TEXT_LINE_HEIGHT_EM,
                );
                (self.left, self.top, size.0, size.1)
            }
        }
    }

    /// Scaled box and rotation centre, before rotation.
    fn scaled_box(&self) -> (Bounds, Point) {
        let (x, y, w, h) = self.local_box();
        let sw = w * self.scale_x.abs();
        let sh = h * self.scale_y.abs();
        let b = Bounds { min_x: x, min_y: y, max_x: x + sw, max_y: y + sh };
        (b, b.center())
    }

    /// Axis-aligned bounds in floor coordinates, including scale and rotation.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let (b, c) = self.scaled_box();
        if self.angle % 360.0 == 0.0 {
            return b;
        }
        let corners = [
            Point::new(b.min_x, b.min_y),
            Point::new(b.max_x, b.min_y),
            Point::new(b.max_x, b.max_y),
            Point::new(b.min_x, b.max_y),
        ];
        let rotated = corners.map(|p| rotate_about(p, c, self.angle));
        Bounds::enclosing(&rotated).unwrap_or(b)
    }

    /// Center of the object's bounds.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Whether `p` falls inside the object's rotated box. Thin lines get a
    /// tolerance of half their stroke width.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        let (b, c) = self.scaled_box();
        let local = if self.angle % 360.0 == 0.0 { p } else { rotate_about(p, c, -self.angle) };
        let slack = match self.drawable {
            Drawable::Line { .. } => (self.stroke_width / 2.0).max(1.0),
            _ => 0.0,
        };
        b.inflate(slack).contains(local)
    }

    /// Translate by `(dx, dy)`. Line endpoints move with the origin.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.left += dx;
        self.top += dy;
        if let Drawable::Line { x1, y1, x2, y2 } = &mut self.drawable {
            *x1 += dx;
            *y1 += dy;
            *x2 += dx;
            *y2 += dy;
        }
    }
}

fn rotate_about(p: Point, c: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = p.x - c.x;
    let dy = p.y - c.y;
    Point::new(c.x + dx * cos - dy * sin, c.y + dx * sin + dy * cos)
}

// =============================================================================
// BOUNDS
// =============================================================================

/// Axis-aligned rectangle in floor coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Smallest bounds containing every point, or `None` for no points.
    #[must_use]
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Self { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y };
        Some(points.iter().fold(init, |b, p| Self {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Grow every side by `margin`.
    #[must_use]
    pub fn inflate(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Bounds of all objects, or `None` for an empty scene.
#[must_use]
pub fn content_bounds(objects: &[SceneObject]) -> Option<Bounds> {
    objects.iter().map(SceneObject::bounds).reduce(|a, b| a.union(&b))
}

// =============================================================================
// SCENE
// =============================================================================

/// Objects of the active floor in z-order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    #[must_use]
    pub fn new(objects: Vec<SceneObject>) -> Self {
        Self { objects }
    }

    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SceneObject> {
        self.objects.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SceneObject> {
        self.objects.get_mut(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Add on top and return the new index.
    pub fn push(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Option<SceneObject> {
        (index < self.objects.len()).then(|| self.objects.remove(index))
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Move to the top of the stack; returns the new index.
    pub fn bring_to_front(&mut self, index: usize) -> Option<usize> {
        let object = self.remove(index)?;
        Some(self.push(object))
    }

    /// Move to the bottom of the stack; returns the new index.
    pub fn send_to_back(&mut self, index: usize) -> Option<usize> {
        let object = self.remove(index)?;
        self.objects.insert(0, object);
        Some(0)
    }

    /// Stable reorder placing every text object above every non-text object.
    pub fn bring_text_to_front(&mut self) {
        self.objects.sort_by_key(SceneObject::is_text);
    }

    #[must_use]
    pub fn content_bounds(&self) -> Option<Bounds> {
        content_bounds(&self.objects)
    }
}
