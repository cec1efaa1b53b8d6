//! Shared constants for the floorplan crate.

// ── Document ────────────────────────────────────────────────────

/// Schema tag written into new documents.
pub const SCHEMA_VERSION: &str = "1.0";

/// Id of the floor every empty building starts with.
pub const DEFAULT_FLOOR_ID: &str = "floor_1";

/// Display name of the default floor.
pub const DEFAULT_FLOOR_NAME: &str = "Ground Floor";

/// Prefix of generated floor ids (`floor_<n>`).
pub const FLOOR_ID_PREFIX: &str = "floor_";

// ── History ─────────────────────────────────────────────────────

/// Maximum number of undo snapshots retained.
pub const UNDO_CAPACITY: usize = 50;

// ── Autosave ────────────────────────────────────────────────────

/// Quiescence required before a debounced draft write.
pub const AUTOSAVE_DEBOUNCE_MS: u64 = 1_000;

/// Unconditional draft flush period.
pub const AUTOSAVE_FLUSH_MS: u64 = 10_000;

// ── Camera ──────────────────────────────────────────────────────

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.1;

/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 5.0;

/// Multiplicative step for keyboard zoom in/out.
pub const ZOOM_STEP: f64 = 1.1;

/// Keyboard pan distance in screen pixels.
pub const PAN_STEP_PX: f64 = 30.0;

/// Screen padding kept around content when fitting the view.
pub const FIT_PADDING_PX: f64 = 20.0;

// ── Editor defaults ─────────────────────────────────────────────

/// Initial drawing color.
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Fill of newly placed text labels.
pub const TEXT_FILL: &str = "#1F2937";

/// Font family of newly placed text labels.
pub const TEXT_FONT_FAMILY: &str = "Inter, sans-serif";

/// Font size of newly placed text labels.
pub const TEXT_FONT_SIZE: f64 = 16.0;

/// Placeholder text of newly placed text labels.
pub const TEXT_PLACEHOLDER: &str = "Label";

/// Default rectangle size.
pub const RECT_WIDTH: f64 = 100.0;
pub const RECT_HEIGHT: f64 = 60.0;

/// Default circle radius.
pub const CIRCLE_RADIUS: f64 = 40.0;

/// Outline width for rectangles and circles.
pub const SHAPE_STROKE_WIDTH: f64 = 2.0;

/// Stroke width for lines.
pub const LINE_STROKE_WIDTH: f64 = 3.0;

/// Percentage by which shape outlines are darkened relative to their fill.
pub const OUTLINE_DARKEN_PERCENT: f64 = 20.0;

/// Where new icons are dropped, and at what scale.
pub const ICON_DROP_X: f64 = 400.0;
pub const ICON_DROP_Y: f64 = 300.0;
pub const ICON_DROP_SCALE: f64 = 2.0;

/// Native glyph box of catalog icons.
pub const ICON_SIZE: f64 = 24.0;

/// Offset applied to pasted objects.
pub const PASTE_OFFSET: f64 = 20.0;

/// Viewport assumed until the host reports its real size.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 800.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;

// ── Viewer ──────────────────────────────────────────────────────

/// Multiplicative step for the viewer's zoom buttons.
pub const VIEWER_ZOOM_STEP: f64 = 1.2;

/// "You are here" marker radius and colors.
pub const MARKER_RADIUS: f64 = 15.0;
pub const MARKER_FILL: &str = "#EF4444";
pub const MARKER_STROKE: &str = "#FFFFFF";
pub const MARKER_STROKE_WIDTH: f64 = 3.0;

/// Dash pattern and stroke width of the directions overlay.
pub const DIRECTIONS_DASH: [f64; 2] = [10.0, 5.0];
pub const DIRECTIONS_STROKE_WIDTH: f64 = 4.0;

/// Highlight overlay inflation and color.
pub const HIGHLIGHT_MARGIN: f64 = 10.0;
pub const HIGHLIGHT_STROKE: &str = "#3B82F6";
pub const HIGHLIGHT_STROKE_WIDTH: f64 = 4.0;

/// Display name used when an object has no label.
pub const UNNAMED_LABEL: &str = "Unnamed";

// ── Persistence ─────────────────────────────────────────────────

/// Storage key holding the in-progress editor draft.
pub const DRAFT_KEY: &str = "intramap_draft";

/// Prefix of the per-building offline cache key.
pub const CACHE_KEY_PREFIX: &str = "intramap_building_";

/// Storage key recording that the welcome overlay was dismissed.
pub const WELCOME_KEY: &str = "intramap_welcome_dismissed";

/// Reserved building id that selects the bundled demo document.
pub const DEMO_BUILDING_ID: &str = "sample";
