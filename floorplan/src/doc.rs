//! Document model: buildings, floors, map objects, and load-time validation.
//!
//! This module defines the persisted `buildingData` schema (`Building`,
//! `Floor`, `MapObject`), the tagged shape payload (`Shape`), and the floor-id
//! allocator that keeps generated ids unique across a whole editing session.
//!
//! Data flows into this layer from the persistence adapter (remote documents,
//! drafts, the bundled demo) and from the codec (`codec::encode`) when the live
//! scene is synchronized back into the document. Everything else in the crate
//! reads from it.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::warn;

use crate::consts::{DEFAULT_FLOOR_ID, DEFAULT_FLOOR_NAME, FLOOR_ID_PREFIX, SCHEMA_VERSION, UNNAMED_LABEL};
use crate::error::DocumentError;

/// Key of a floor within `Building::floors` (e.g. `floor_3`).
pub type FloorId = String;

/// Current UTC time as ISO-8601 with millisecond precision (`2026-01-02T03:04:05.678Z`).
#[must_use]
pub fn now_iso() -> String {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
    match OffsetDateTime::now_utc().format(&format) {
        Ok(stamp) => stamp,
        Err(e) => {
            warn!(error = %e, "timestamp formatting failed");
            String::new()
        }
    }
}

// =============================================================================
// MAP OBJECT
// =============================================================================

/// Discriminant of a map object, independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Rectangle,
    Circle,
    Line,
    Text,
    Icon,
}

/// Circle geometry. Held as a radius in memory, written as a `width`/`height`
/// pair (both `2 × radius`) so every sized object exposes the same fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "CircleWire", into = "CircleWire")]
pub struct CircleShape {
    pub radius: f64,
}

#[derive(Serialize, Deserialize)]
struct CircleWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    radius: Option<f64>,
}

impl From<CircleWire> for CircleShape {
    fn from(wire: CircleWire) -> Self {
        let radius = match (wire.width, wire.radius) {
            (Some(width), _) => width / 2.0,
            (None, Some(radius)) => radius,
            (None, None) => wire.height.map_or(0.0, |h| h / 2.0),
        };
        Self { radius }
    }
}

impl From<CircleShape> for CircleWire {
    fn from(shape: CircleShape) -> Self {
        let diameter = shape.radius * 2.0;
        Self { width: Some(diameter), height: Some(diameter), radius: None }
    }
}

/// Kind-specific payload of a map object, tagged by the JSON `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    /// Axis-aligned rectangle before rotation and scaling.
    #[serde(rename = "rect", alias = "rectangle")]
    Rect { width: f64, height: f64 },
    /// Circle whose bounding box origin is `left`/`top`.
    #[serde(rename = "circle")]
    Circle(CircleShape),
    /// Straight segment between two floor-local points.
    #[serde(rename = "line")]
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Editable text label.
    #[serde(rename = "i-text", alias = "text", rename_all = "camelCase")]
    Text { text: String, font_size: f64, font_family: String },
    /// Catalog glyph. Only the identifier is stored; the glyph is resolved at render time.
    #[serde(rename = "icon", alias = "group", alias = "path", rename_all = "camelCase")]
    Icon { object_icon: String, width: f64, height: f64 },
}

impl Shape {
    /// Discriminant of this payload.
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Rect { .. } => ObjectKind::Rectangle,
            Self::Circle(_) => ObjectKind::Circle,
            Self::Line { .. } => ObjectKind::Line,
            Self::Text { .. } => ObjectKind::Text,
            Self::Icon { .. } => ObjectKind::Icon,
        }
    }
}

fn unit() -> f64 {
    1.0
}

/// One drawable feature on a floor, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapObject {
    /// Kind discriminant plus kind-specific geometry.
    #[serde(flatten)]
    pub shape: Shape,
    /// Left edge of the bounding-box origin in floor-local pixels.
    #[serde(default)]
    pub left: f64,
    /// Top edge of the bounding-box origin in floor-local pixels.
    #[serde(default)]
    pub top: f64,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub angle: f64,
    #[serde(default = "unit")]
    pub scale_x: f64,
    #[serde(default = "unit")]
    pub scale_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default = "unit")]
    pub stroke_width: f64,
    /// Free-text display name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub object_label: String,
    /// Comma-separated free-text tags.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub object_tags: String,
    /// Excluded from interactive selection and moves in the editor.
    #[serde(default, deserialize_with = "null_as_false")]
    pub object_locked: bool,
}

impl MapObject {
    /// Create an object with default transform and style at `(left, top)`.
    #[must_use]
    pub fn new(shape: Shape, left: f64, top: f64) -> Self {
        Self {
            shape,
            left,
            top,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            object_label: String::new(),
            object_tags: String::new(),
            object_locked: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        self.shape.kind()
    }

    /// Icon identifier, present only for icon objects.
    #[must_use]
    pub fn object_icon(&self) -> Option<&str> {
        match &self.shape {
            Shape::Icon { object_icon, .. } => Some(object_icon),
            _ => None,
        }
    }

    /// Label for display, falling back to `"Unnamed"`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.object_label.is_empty() { UNNAMED_LABEL } else { &self.object_label }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

// =============================================================================
// FLOOR
// =============================================================================

/// One level of a building. Object order is z-order, first = back-most.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_objects")]
    pub objects: Vec<MapObject>,
}

impl Floor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), objects: Vec::new() }
    }
}

/// Decode each object independently; a malformed entry is logged and dropped
/// instead of failing the whole floor.
fn lenient_objects<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<MapObject>, D::Error> {
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut objects = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<MapObject>(value) {
            Ok(object) => objects.push(object),
            Err(e) => warn!(index, error = %e, "skipping malformed map object"),
        }
    }
    Ok(objects)
}

// =============================================================================
// FLOOR ID ALLOCATOR
// =============================================================================

/// Hands out `floor_<n>` ids that never repeat within a session.
///
/// Seeded from the largest numeric suffix present in a document so that
/// reloading a document never collides with its own ids. The counter only moves
/// forward, so ids of deleted (or undone) floors are not handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorIdAllocator {
    next: u64,
}

impl FloorIdAllocator {
    #[must_use]
    pub fn seeded_from(building: &Building) -> Self {
        Self { next: max_floor_suffix(building) + 1 }
    }

    /// Advance past every id in `building` without ever moving backwards.
    pub fn reseed(&mut self, building: &Building) {
        self.next = self.next.max(max_floor_suffix(building) + 1);
    }

    /// The number the next id will carry.
    #[must_use]
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn next_id(&mut self) -> FloorId {
        let id = format!("{FLOOR_ID_PREFIX}{}", self.next);
        self.next += 1;
        id
    }
}

fn max_floor_suffix(building: &Building) -> u64 {
    building
        .floors
        .keys()
        .filter_map(|key| floor_suffix(key))
        .max()
        .unwrap_or(0)
}

fn floor_suffix(key: &str) -> Option<u64> {
    let rest = key.strip_prefix(FLOOR_ID_PREFIX)?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    match digits.parse() {
        Ok(n) => Some(n),
        Err(_) => None,
    }
}

// =============================================================================
// BUILDING
// =============================================================================

/// Root persisted document for one indoor venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub version: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub building_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub updated_at: String,
    /// Floors keyed by id; insertion order is display order.
    pub floors: IndexMap<FloorId, Floor>,
}

impl Building {
    /// A fresh document with one empty default floor and no name.
    #[must_use]
    pub fn new_empty() -> Self {
        let now = now_iso();
        let mut floors = IndexMap::new();
        floors.insert(DEFAULT_FLOOR_ID.to_owned(), Floor::new(DEFAULT_FLOOR_NAME));
        Self {
            version: SCHEMA_VERSION.to_owned(),
            building_id: String::new(),
            name: String::new(),
            created_at: now.clone(),
            updated_at: now,
            floors,
        }
    }

    /// Parse a remote or demo document, rejecting it when `version`, `name` or
    /// `floors` is missing or empty.
    ///
    /// # Errors
    ///
    /// Returns `Json` for malformed input and `Validation` for a missing field.
    pub fn from_json(raw: &str) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        check_required_fields(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Parse an in-progress draft. Drafts may not be named yet, but must still
    /// carry at least one floor.
    ///
    /// # Errors
    ///
    /// Returns `Json` for malformed input and `Validation` when there are no floors.
    pub fn from_draft_json(raw: &str) -> Result<Self, DocumentError> {
        let building: Self = serde_json::from_str(raw)?;
        if building.floors.is_empty() {
            return Err(DocumentError::Validation("document has no floors".into()));
        }
        Ok(building)
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns `Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Stamp `updatedAt` with the current time.
    pub fn touch(&mut self) {
        self.updated_at = now_iso();
    }

    #[must_use]
    pub fn floor(&self, id: &str) -> Option<&Floor> {
        self.floors.get(id)
    }

    pub fn floor_mut(&mut self, id: &str) -> Option<&mut Floor> {
        self.floors.get_mut(id)
    }

    /// The first floor in display order.
    #[must_use]
    pub fn first_floor_id(&self) -> Option<&FloorId> {
        self.floors.keys().next()
    }

    /// Total number of objects across every floor.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.floors.values().map(|f| f.objects.len()).sum()
    }

    /// Insert an empty floor with an id from `ids` and return that id.
    pub fn add_floor(&mut self, ids: &mut FloorIdAllocator, name: impl Into<String>) -> FloorId {
        ids.reseed(self);
        let id = ids.next_id();
        self.floors.insert(id.clone(), Floor::new(name));
        self.touch();
        id
    }

    /// Insert an empty floor using an allocator seeded from this document.
    pub fn add_floor_auto(&mut self, name: impl Into<String>) -> FloorId {
        let mut ids = FloorIdAllocator::seeded_from(self);
        self.add_floor(&mut ids, name)
    }

    /// Delete a floor together with all of its objects.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` when it is the only floor and `UnknownFloor`
    /// when the id is absent. The document is unchanged on error.
    pub fn remove_floor(&mut self, id: &str) -> Result<Floor, DocumentError> {
        self.check_removable(id)?;
        let removed = self
            .floors
            .shift_remove(id)
            .ok_or_else(|| DocumentError::UnknownFloor(id.to_owned()))?;
        self.touch();
        Ok(removed)
    }

    /// Whether `remove_floor(id)` would succeed, without changing anything.
    ///
    /// # Errors
    ///
    /// Same as `remove_floor`.
    pub fn check_removable(&self, id: &str) -> Result<(), DocumentError> {
        if !self.floors.contains_key(id) {
            return Err(DocumentError::UnknownFloor(id.to_owned()));
        }
        if self.floors.len() == 1 {
            return Err(DocumentError::InvariantViolation("Cannot delete the last floor".into()));
        }
        Ok(())
    }

    /// Change a floor's display name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFloor` when the id is absent.
    pub fn rename_floor(&mut self, id: &str, name: impl Into<String>) -> Result<(), DocumentError> {
        let floor = self
            .floors
            .get_mut(id)
            .ok_or_else(|| DocumentError::UnknownFloor(id.to_owned()))?;
        floor.name = name.into();
        self.touch();
        Ok(())
    }

    pub fn rename_building(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }
}

/// Check the fields every stored document must carry: non-empty `version` and
/// `name` strings and a non-empty `floors` object.
///
/// # Errors
///
/// Returns `Validation` naming the first offending field.
pub fn check_required_fields(value: &serde_json::Value) -> Result<(), DocumentError> {
    let Some(doc) = value.as_object() else {
        return Err(DocumentError::Validation("document must be a JSON object".into()));
    };
    for field in ["version", "name"] {
        let present = doc
            .get(field)
            .and_then(serde_json::Value::as_str)
            .is_some_and(|s| !s.is_empty());
        if !present {
            return Err(DocumentError::Validation(format!("missing required field `{field}`")));
        }
    }
    let has_floors = doc
        .get("floors")
        .and_then(serde_json::Value::as_object)
        .is_some_and(|floors| !floors.is_empty());
    if !has_floors {
        return Err(DocumentError::Validation("missing required field `floors`".into()));
    }
    Ok(())
}
