//! Viewer session: read-only map browsing, search and wayfinding overlays.
//!
//! DESIGN
//! ======
//! The viewer decodes floors with `DecodeContext::Viewer`, so nothing is
//! selectable and every object receives taps. Icon glyphs are resolved by the
//! host: `begin_floor` hands out `GlyphJob`s and `complete_glyph` feeds results
//! back. Only when the floor's barrier drains is the scene placed, text brought
//! to the front and the camera fitted to the content. `open_floor` does the
//! whole cycle synchronously.
//!
//! Overlays (the "you are here" marker, the highlight around the selected
//! object and the dashed directions line) live outside the scene. The marker
//! survives floor switches; highlight and directions do not. Directions are a
//! straight line between two centres, not a route through the floor plan.

#[cfg(test)]
#[path = "viewer_test.rs"]
mod viewer_test;

use tracing::{debug, info, warn};

use crate::camera::{Camera, Point, Viewport};
use crate::codec::{DecodeContext, encode};
use crate::consts::{
    DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, DIRECTIONS_DASH, DIRECTIONS_STROKE_WIDTH, FIT_PADDING_PX,
    HIGHLIGHT_MARGIN, HIGHLIGHT_STROKE, HIGHLIGHT_STROKE_WIDTH, MARKER_FILL, MARKER_RADIUS, MARKER_STROKE,
    MARKER_STROKE_WIDTH, UNNAMED_LABEL, VIEWER_ZOOM_STEP,
};
use crate::doc::{Building, FloorId};
use crate::error::DecodeError;
use crate::glyph::GlyphPart;
use crate::hit::{HitFilter, hit_test};
use crate::icons::IconCatalog;
use crate::load::{FloorLoad, GlyphJob, LoadProgress, Ticket};
use crate::notice::Notice;
use crate::scene::{Bounds, Cursor, Drawable, Scene, SceneObject};
use crate::search::{SearchHit, search, split_tags};

/// What the details popup shows for one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDetails {
    pub name: String,
    pub tags: Vec<String>,
    pub floor_name: String,
}

/// Straight dashed line from the marker to the selected object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Directions {
    pub from: Point,
    pub to: Point,
    pub dash: [f64; 2],
    pub stroke_width: f64,
}

pub struct ViewerSession {
    building: Building,
    active_floor: FloorId,
    catalog: IconCatalog,
    scene: Scene,
    loading: Option<FloorLoad>,
    camera: Camera,
    viewport: Viewport,
    selected: Option<usize>,
    marker: Option<Point>,
    marker_mode: bool,
    highlight: Option<Bounds>,
    directions: Option<Directions>,
    notices: Vec<Notice>,
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new(IconCatalog::builtin())
    }
}

impl ViewerSession {
    #[must_use]
    pub fn new(catalog: IconCatalog) -> Self {
        let building = Building::new_empty();
        Self {
            active_floor: building.first_floor_id().cloned().unwrap_or_default(),
            building,
            catalog,
            scene: Scene::default(),
            loading: None,
            camera: Camera::default(),
            viewport: Viewport::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT),
            selected: None,
            marker: None,
            marker_mode: false,
            highlight: None,
            directions: None,
            notices: Vec::new(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn building(&self) -> &Building {
        &self.building
    }

    #[must_use]
    pub fn active_floor(&self) -> &str {
        &self.active_floor
    }

    /// The placed scene. Empty while a floor is still loading.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn marker(&self) -> Option<Point> {
        self.marker
    }

    #[must_use]
    pub fn is_marker_mode(&self) -> bool {
        self.marker_mode
    }

    #[must_use]
    pub fn highlight(&self) -> Option<Bounds> {
        self.highlight
    }

    #[must_use]
    pub fn directions(&self) -> Option<Directions> {
        self.directions
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // --- Loading ---

    /// Show a new building, starting with its first floor. Returns the glyph
    /// jobs of that floor.
    pub fn load(&mut self, building: Building) -> Vec<GlyphJob> {
        info!(
            building_id = %building.building_id,
            floors = building.floors.len(),
            "building loaded into viewer"
        );
        self.building = building;
        self.marker = None;
        self.marker_mode = false;
        let first = self.building.first_floor_id().cloned().unwrap_or_default();
        self.begin_floor(&first)
    }

    /// Start loading a floor. An unknown id falls back to the first floor.
    pub fn begin_floor(&mut self, floor_id: &str) -> Vec<GlyphJob> {
        let floor_id = if self.building.floors.contains_key(floor_id) {
            floor_id.to_owned()
        } else {
            warn!(floor_id, "floor not found, showing first floor");
            self.building.first_floor_id().cloned().unwrap_or_default()
        };
        self.active_floor = floor_id;
        self.scene.clear();
        self.selected = None;
        self.highlight = None;
        self.directions = None;

        let Some(floor) = self.building.floor(&self.active_floor) else {
            self.loading = None;
            return Vec::new();
        };
        let (load, jobs) = FloorLoad::begin(floor, &self.catalog, DecodeContext::Viewer);
        for e in load.skipped() {
            self.notices.push(Notice::warning(e.to_string()));
        }
        self.loading = Some(load);
        if jobs.is_empty() {
            self.finish_floor();
        }
        jobs
    }

    /// Feed back one resolved glyph. Once the last one arrives the scene is
    /// placed and the camera fitted.
    pub fn complete_glyph(&mut self, ticket: Ticket, result: Result<Vec<GlyphPart>, DecodeError>) -> LoadProgress {
        let Some(load) = self.loading.as_mut() else {
            debug!("glyph completed with no floor loading");
            return LoadProgress::Ready;
        };
        let skipped_before = load.skipped().len();
        let progress = load.complete(ticket, result);
        let failures: Vec<Notice> = load.skipped()[skipped_before..]
            .iter()
            .map(|e| Notice::warning(e.to_string()))
            .collect();
        self.notices.extend(failures);
        if progress == LoadProgress::Ready {
            self.finish_floor();
        }
        progress
    }

    /// Load a floor and resolve its glyphs immediately.
    pub fn open_floor(&mut self, floor_id: &str) {
        for job in self.begin_floor(floor_id) {
            let result = job.request.resolve();
            self.complete_glyph(job.ticket, result);
        }
    }

    fn finish_floor(&mut self) {
        let Some(mut load) = self.loading.take() else {
            return;
        };
        let Some(mut scene) = load.finish() else {
            warn!("floor finished before its glyphs completed");
            self.loading = Some(load);
            return;
        };
        scene.bring_text_to_front();
        self.scene = scene;
        self.fit_to_content();
        debug!(floor = %self.active_floor, objects = self.scene.len(), "floor placed");
    }

    // --- Search and details ---

    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        search(&self.building, query)
    }

    /// Jump to a search hit: switch floors when needed (resolving glyphs
    /// immediately), then select and highlight the object.
    pub fn select_hit(&mut self, hit: &SearchHit) -> Option<ObjectDetails> {
        if hit.floor_id != self.active_floor || self.is_loading() {
            self.open_floor(&hit.floor_id);
        }
        let target = self.building.floor(&hit.floor_id)?.objects.get(hit.object_index)?;
        let index = self.scene.objects().iter().position(|o| encode(o) == *target)?;
        self.select(index)
    }

    /// Details of the scene object at `index`.
    #[must_use]
    pub fn details(&self, index: usize) -> Option<ObjectDetails> {
        let object = self.scene.get(index)?;
        let name = if object.label.is_empty() { UNNAMED_LABEL } else { &object.label };
        Some(ObjectDetails {
            name: name.to_owned(),
            tags: split_tags(&object.tags),
            floor_name: self
                .building
                .floor(&self.active_floor)
                .map(|f| f.name.clone())
                .unwrap_or_default(),
        })
    }

    /// Select and highlight a scene object.
    pub fn select(&mut self, index: usize) -> Option<ObjectDetails> {
        let details = self.details(index)?;
        self.selected = Some(index);
        self.highlight = self.scene.get(index).map(|o| o.bounds().inflate(HIGHLIGHT_MARGIN));
        Some(details)
    }

    /// Close the details popup.
    pub fn close_details(&mut self) {
        self.selected = None;
        self.highlight = None;
    }

    // --- Marker and directions ---

    /// Arm (or disarm) marker placement for the next tap.
    pub fn toggle_marker_mode(&mut self) {
        self.marker_mode = !self.marker_mode;
        if self.marker_mode {
            self.notices.push(Notice::info("Tap on the map to place your location"));
        }
    }

    /// Handle a tap at a screen position. In marker mode this places the
    /// marker; otherwise it opens the details of the topmost labelled object.
    pub fn tap(&mut self, screen: Point) -> Option<ObjectDetails> {
        let at = self.camera.screen_to_world(screen);
        if self.marker_mode {
            self.marker = Some(at);
            self.marker_mode = false;
            self.notices.push(Notice::success("Location marked!"));
            return None;
        }
        let index = hit_test(at, &self.scene, HitFilter::Labeled)?;
        self.select(index)
    }

    /// Show directions from the marker to the selection. Without a marker this
    /// arms marker mode instead; without a selection it only asks for one.
    pub fn request_directions(&mut self) -> Option<Directions> {
        let Some(from) = self.marker else {
            self.notices.push(Notice::info("Please set your location first using \"You Are Here\""));
            if !self.marker_mode {
                self.toggle_marker_mode();
            }
            return None;
        };
        let Some(object) = self.selected.and_then(|index| self.scene.get(index)) else {
            self.notices.push(Notice::info("Please select a destination first"));
            return None;
        };
        let directions = Directions {
            from,
            to: object.center(),
            dash: DIRECTIONS_DASH,
            stroke_width: DIRECTIONS_STROKE_WIDTH,
        };
        self.highlight = Some(object.bounds().inflate(HIGHLIGHT_MARGIN));
        self.directions = Some(directions);
        self.notices.push(Notice::success("Route highlighted on map"));
        Some(directions)
    }

    pub fn clear_directions(&mut self) {
        self.directions = None;
    }

    /// Marker and highlight as drawables, above the scene. Neither receives taps.
    #[must_use]
    pub fn overlay_objects(&self) -> Vec<SceneObject> {
        let mut overlays = Vec::new();
        if let Some(bounds) = self.highlight {
            let mut frame = overlay(
                Drawable::Rect { width: bounds.width(), height: bounds.height() },
                bounds.min_x,
                bounds.min_y,
            );
            frame.stroke = Some(HIGHLIGHT_STROKE.to_owned());
            frame.stroke_width = HIGHLIGHT_STROKE_WIDTH;
            overlays.push(frame);
        }
        if let Some(at) = self.marker {
            let mut pin = overlay(Drawable::Circle { radius: MARKER_RADIUS }, at.x - MARKER_RADIUS, at.y - MARKER_RADIUS);
            pin.fill = Some(MARKER_FILL.to_owned());
            pin.stroke = Some(MARKER_STROKE.to_owned());
            pin.stroke_width = MARKER_STROKE_WIDTH;
            overlays.push(pin);
        }
        overlays
    }

    // --- View ---

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn zoom_in(&mut self) {
        self.camera.set_zoom(self.camera.zoom * VIEWER_ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.camera.set_zoom(self.camera.zoom / VIEWER_ZOOM_STEP);
    }

    /// Fit the camera to the placed content (the viewer's "reset view").
    pub fn fit_to_content(&mut self) {
        match self.scene.content_bounds() {
            Some(bounds) => self.camera.fit_to_bounds(bounds, self.viewport, FIT_PADDING_PX),
            None => self.camera.reset(),
        }
    }
}

fn overlay(drawable: Drawable, left: f64, top: f64) -> SceneObject {
    let mut object = SceneObject::new(drawable, left, top);
    object.selectable = false;
    object.evented = false;
    object.hover_cursor = Cursor::Default;
    object
}
