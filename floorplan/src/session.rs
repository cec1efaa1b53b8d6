//! Editor session: the complete state of one editing surface.
//!
//! DESIGN
//! ======
//! `EditorSession` owns the document, the live scene of the active floor and
//! everything the editor tracks around them (tool, selection, clipboard,
//! history, camera, autosave). Hosts forward pointer and key events and read
//! back the scene, the selection and the queued notices.
//!
//! The scene is the source of truth for the active floor while it is open. It
//! is synced back into the document before every snapshot, floor switch,
//! undo/redo and save, so the document never lags behind what is on screen.
//! Stored records the editor cannot render (unknown icons, failed glyphs) are
//! held aside while their floor is open and written back after the scene's
//! objects on every sync; only clearing the floor drops them.
//!
//! Every mutating operation takes exactly one snapshot before it mutates.
//! Transform gestures (drag, scale, rotate) are latched so a whole gesture
//! costs one snapshot. After undo/redo the active floor is re-rendered from the
//! restored document.
//!
//! ERROR HANDLING
//! ==============
//! Document-level failures return `DocumentError` and leave the document and
//! the history untouched. Recoverable problems (unknown icons, empty
//! clipboard, nothing to undo) become notices. Draft writes surface
//! `PersistError`; autosave failures are logged and turned into notices.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::autosave::{AutoSave, FlushReason};
use crate::camera::{Camera, Point, Viewport};
use crate::codec::{DecodeContext, decode_now, encode, encode_all};
use crate::color::darken;
use crate::consts::{
    CIRCLE_RADIUS, DEFAULT_COLOR, DEFAULT_FLOOR_ID, DEFAULT_FLOOR_NAME, DEFAULT_VIEWPORT_HEIGHT,
    DEFAULT_VIEWPORT_WIDTH, FIT_PADDING_PX, ICON_DROP_SCALE, ICON_DROP_X, ICON_DROP_Y, ICON_SIZE,
    LINE_STROKE_WIDTH, OUTLINE_DARKEN_PERCENT, PASTE_OFFSET, RECT_HEIGHT, RECT_WIDTH, SHAPE_STROKE_WIDTH,
    TEXT_FILL, TEXT_FONT_FAMILY, TEXT_FONT_SIZE, TEXT_PLACEHOLDER, ZOOM_STEP,
};
use crate::doc::{Building, Floor, FloorId, FloorIdAllocator, MapObject, Shape};
use crate::error::DocumentError;
use crate::history::{GestureLatch, History};
use crate::hit::{HitFilter, hit_test};
use crate::icons::IconCatalog;
use crate::input::{Command, Key, LineGesture, Modifiers, Tool, shortcut};
use crate::load::FloorLoad;
use crate::notice::Notice;
use crate::persist::{self, LocalStorage, PersistError};
use crate::scene::{Cursor, Drawable, Scene, SceneObject};
use crate::slug::{is_valid_building_id, sanitize_building_id};

/// Offset from the click point to the top-left of a new text label.
const TEXT_ANCHOR_DX: f64 = 25.0;
const TEXT_ANCHOR_DY: f64 = 10.0;

pub struct EditorSession {
    building: Building,
    active_floor: FloorId,
    tool: Tool,
    color: String,
    selected: Option<usize>,
    clipboard: Option<MapObject>,
    history: History,
    latch: GestureLatch,
    floor_ids: FloorIdAllocator,
    scene: Scene,
    unrendered: Vec<MapObject>,
    camera: Camera,
    viewport: Viewport,
    line: LineGesture,
    catalog: IconCatalog,
    autosave: AutoSave,
    notices: Vec<Notice>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(IconCatalog::builtin())
    }
}

impl EditorSession {
    /// A session editing a fresh empty building.
    #[must_use]
    pub fn new(catalog: IconCatalog) -> Self {
        let building = Building::new_empty();
        Self {
            floor_ids: FloorIdAllocator::seeded_from(&building),
            active_floor: DEFAULT_FLOOR_ID.to_owned(),
            building,
            tool: Tool::Select,
            color: DEFAULT_COLOR.to_owned(),
            selected: None,
            clipboard: None,
            history: History::default(),
            latch: GestureLatch::default(),
            scene: Scene::default(),
            unrendered: Vec::new(),
            camera: Camera::default(),
            viewport: Viewport::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT),
            line: LineGesture::default(),
            catalog,
            autosave: AutoSave::new(),
            notices: Vec::new(),
        }
    }

    // --- Queries ---

    /// The document, as of the last sync with the scene.
    #[must_use]
    pub fn building(&self) -> &Building {
        &self.building
    }

    #[must_use]
    pub fn active_floor(&self) -> &str {
        &self.active_floor
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.scene.get(self.selected?)
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain queued notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// The document with the live scene folded in.
    pub fn synced_building(&mut self) -> &Building {
        self.sync_scene();
        &self.building
    }

    // --- Document ---

    /// Replace the document (remote load, demo, draft restore). History is
    /// cleared and the first floor becomes active.
    pub fn load_document(&mut self, mut building: Building) {
        if building.floors.is_empty() {
            building.floors.insert(DEFAULT_FLOOR_ID.to_owned(), Floor::new(DEFAULT_FLOOR_NAME));
        }
        self.floor_ids = FloorIdAllocator::seeded_from(&building);
        self.active_floor = first_floor_of(&building);
        self.building = building;
        self.history.clear();
        self.camera.reset();
        self.render_active_floor();
        info!(
            building_id = %self.building.building_id,
            floors = self.building.floors.len(),
            objects = self.building.object_count(),
            "document loaded into editor"
        );
    }

    /// Make another floor active.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFloor` when the id is absent.
    pub fn switch_floor(&mut self, id: &str) -> Result<(), DocumentError> {
        if !self.building.floors.contains_key(id) {
            return Err(DocumentError::UnknownFloor(id.to_owned()));
        }
        if self.active_floor == id {
            return Ok(());
        }
        self.sync_scene();
        id.clone_into(&mut self.active_floor);
        self.render_active_floor();
        Ok(())
    }

    /// Add an empty floor and switch to it. A blank name becomes `Floor <n>`.
    pub fn add_floor(&mut self, name: Option<&str>) -> FloorId {
        self.checkpoint();
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| format!("Floor {}", self.building.floors.len() + 1), str::to_owned);
        let message = format!("Added {name}");
        let id = self.building.add_floor(&mut self.floor_ids, name);
        id.clone_into(&mut self.active_floor);
        self.render_active_floor();
        self.autosave.touch();
        self.notify(Notice::success(message));
        id
    }

    /// Rename a floor. Returns `Ok(false)` (no snapshot) when the trimmed name is
    /// blank or unchanged.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFloor` when the id is absent.
    pub fn rename_floor(&mut self, id: &str, name: &str) -> Result<bool, DocumentError> {
        let floor = self
            .building
            .floor(id)
            .ok_or_else(|| DocumentError::UnknownFloor(id.to_owned()))?;
        let name = name.trim();
        if name.is_empty() || floor.name == name {
            return Ok(false);
        }
        self.checkpoint();
        self.building.rename_floor(id, name)?;
        self.autosave.touch();
        Ok(true)
    }

    /// Delete a floor and switch to the first remaining one.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` for the last floor and `UnknownFloor` for a
    /// missing id. Neither the document nor the history changes on error.
    pub fn remove_floor(&mut self, id: &str) -> Result<(), DocumentError> {
        if let Err(e) = self.building.check_removable(id) {
            self.notify(Notice::error(e.to_string()));
            return Err(e);
        }
        self.checkpoint();
        let removed = self.building.remove_floor(id)?;
        self.active_floor = first_floor_of(&self.building);
        self.render_active_floor();
        self.autosave.touch();
        self.notify(Notice::success(format!("Deleted {}", removed.name)));
        Ok(())
    }

    /// Rename the building. Returns `false` (no snapshot) when unchanged.
    pub fn rename_building(&mut self, name: &str) -> bool {
        if self.building.name == name {
            return false;
        }
        self.checkpoint();
        self.building.rename_building(name);
        self.autosave.touch();
        true
    }

    // --- Tools and pointer ---

    /// Switch tools. Leaving the select tool clears the selection.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.line.cancel();
        if tool != Tool::Select {
            self.selected = None;
        }
    }

    /// Color used for new shapes and lines.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
    }

    /// Handle a primary-button press at a screen position. Returns the index of
    /// the object created or selected, if any.
    pub fn pointer_down(&mut self, screen: Point) -> Option<usize> {
        let at = self.camera.screen_to_world(screen);
        match self.tool {
            Tool::Select => {
                self.selected = hit_test(at, &self.scene, HitFilter::Selectable);
                self.selected
            }
            Tool::Line => {
                let Some((start, end)) = self.line.click(at) else {
                    self.notify(Notice::info("Click to set end point"));
                    return None;
                };
                let mut line = SceneObject::new(
                    Drawable::Line { x1: start.x, y1: start.y, x2: end.x, y2: end.y },
                    start.x.min(end.x),
                    start.y.min(end.y),
                );
                line.stroke = Some(self.color.clone());
                line.stroke_width = LINE_STROKE_WIDTH;
                Some(self.add_object(line))
            }
            tool => {
                if let Some(hit) = hit_test(at, &self.scene, HitFilter::Selectable) {
                    self.selected = Some(hit);
                    return Some(hit);
                }
                let object = self.shape_at(tool, at)?;
                let index = self.add_object(object);
                self.tool = Tool::Select;
                Some(index)
            }
        }
    }

    fn shape_at(&self, tool: Tool, at: Point) -> Option<SceneObject> {
        let mut object = match tool {
            Tool::Rect => SceneObject::new(
                Drawable::Rect { width: RECT_WIDTH, height: RECT_HEIGHT },
                at.x - RECT_WIDTH / 2.0,
                at.y - RECT_HEIGHT / 2.0,
            ),
            Tool::Circle => {
                SceneObject::new(Drawable::Circle { radius: CIRCLE_RADIUS }, at.x - CIRCLE_RADIUS, at.y - CIRCLE_RADIUS)
            }
            Tool::Text => {
                let mut text = SceneObject::new(
                    Drawable::Text {
                        text: TEXT_PLACEHOLDER.to_owned(),
                        font_size: TEXT_FONT_SIZE,
                        font_family: TEXT_FONT_FAMILY.to_owned(),
                    },
                    at.x - TEXT_ANCHOR_DX,
                    at.y - TEXT_ANCHOR_DY,
                );
                text.fill = Some(TEXT_FILL.to_owned());
                return Some(text);
            }
            Tool::Select | Tool::Line => return None,
        };
        object.fill = Some(self.color.clone());
        object.stroke = Some(darken(&self.color, OUTLINE_DARKEN_PERCENT));
        object.stroke_width = SHAPE_STROKE_WIDTH;
        Some(object)
    }

    /// Drop a catalog icon onto the active floor.
    pub fn place_icon(&mut self, icon_id: &str) -> Option<usize> {
        let Some(spec) = self.catalog.get(icon_id).copied() else {
            warn!(icon = icon_id, "icon not found");
            self.notify(Notice::error(format!("Icon \"{icon_id}\" not found")));
            return None;
        };
        let mut object = MapObject::new(
            Shape::Icon { object_icon: spec.id.to_owned(), width: ICON_SIZE, height: ICON_SIZE },
            ICON_DROP_X,
            ICON_DROP_Y,
        );
        object.scale_x = ICON_DROP_SCALE;
        object.scale_y = ICON_DROP_SCALE;
        object.fill = Some(spec.color.to_owned());
        spec.label.clone_into(&mut object.object_label);
        spec.category.clone_into(&mut object.object_tags);

        match decode_now(&object, &self.catalog, DecodeContext::Editor) {
            Ok(placed) => Some(self.add_object(placed)),
            Err(e) => {
                warn!(icon = icon_id, error = %e, "icon failed to load");
                self.notify(Notice::error("Failed to load icon SVG"));
                None
            }
        }
    }

    fn add_object(&mut self, object: SceneObject) -> usize {
        self.checkpoint();
        let index = self.scene.push(object);
        self.selected = Some(index);
        self.changed();
        index
    }

    // --- Selection edits ---

    pub fn set_label(&mut self, label: &str) -> bool {
        let label = label.to_owned();
        self.edit_selected(|o| o.label = label)
    }

    pub fn set_tags(&mut self, tags: &str) -> bool {
        let tags = tags.to_owned();
        self.edit_selected(|o| o.tags = tags)
    }

    pub fn set_fill(&mut self, fill: &str) -> bool {
        let fill = fill.to_owned();
        self.edit_selected(|o| o.fill = Some(fill))
    }

    pub fn set_stroke_width(&mut self, width: f64) -> bool {
        self.edit_selected(|o| o.stroke_width = width)
    }

    /// Lock or unlock the selection. Locked objects stay visible but can no
    /// longer be picked on the canvas.
    pub fn set_locked(&mut self, locked: bool) -> bool {
        self.edit_selected(|o| {
            o.locked = locked;
            o.selectable = !locked;
            o.hover_cursor = if locked { Cursor::Default } else { Cursor::Move };
        })
    }

    fn edit_selected(&mut self, edit: impl FnOnce(&mut SceneObject)) -> bool {
        let Some(index) = self.live_selection() else {
            return false;
        };
        self.checkpoint();
        if let Some(object) = self.scene.get_mut(index) {
            edit(object);
        }
        self.changed();
        true
    }

    pub fn bring_to_front(&mut self) -> bool {
        let Some(index) = self.live_selection() else {
            return false;
        };
        self.checkpoint();
        self.selected = self.scene.bring_to_front(index);
        self.changed();
        true
    }

    pub fn send_to_back(&mut self) -> bool {
        let Some(index) = self.live_selection() else {
            return false;
        };
        self.checkpoint();
        self.selected = self.scene.send_to_back(index);
        self.changed();
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(index) = self.live_selection() else {
            return false;
        };
        self.checkpoint();
        self.scene.remove(index);
        self.selected = None;
        self.changed();
        true
    }

    /// Remove every object from the active floor.
    pub fn clear_floor(&mut self) -> bool {
        if self.scene.is_empty() && self.unrendered.is_empty() {
            return false;
        }
        self.checkpoint();
        self.scene.clear();
        self.unrendered.clear();
        self.selected = None;
        self.changed();
        self.notify(Notice::success("Floor cleared"));
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        self.line.cancel();
    }

    fn live_selection(&mut self) -> Option<usize> {
        let index = self.selected?;
        if self.scene.get(index).is_none() {
            self.selected = None;
            return None;
        }
        Some(index)
    }

    // --- Clipboard ---

    pub fn copy(&mut self) -> bool {
        let Some(copied) = self.selected_object().map(encode) else {
            return false;
        };
        self.clipboard = Some(copied);
        self.notify(Notice::info("Copied to clipboard"));
        true
    }

    /// Paste the clipboard offset from where it was copied. Repeated pastes
    /// keep stepping by the same offset.
    pub fn paste(&mut self) -> Option<usize> {
        let Some(object) = self.clipboard.as_ref() else {
            self.notify(Notice::info("Nothing to paste"));
            return None;
        };
        match decode_now(object, &self.catalog, DecodeContext::Editor) {
            Ok(mut placed) => {
                placed.move_by(PASTE_OFFSET, PASTE_OFFSET);
                self.clipboard = Some(encode(&placed));
                Some(self.add_object(placed))
            }
            Err(e) => {
                warn!(error = %e, "paste failed");
                self.notify(Notice::error(e.to_string()));
                None
            }
        }
    }

    // --- Transform gestures ---

    fn begin_transform(&mut self) -> Option<usize> {
        let index = self.live_selection()?;
        if !self.scene.get(index).is_some_and(|o| o.selectable) {
            return None;
        }
        if self.latch.arm() {
            self.checkpoint();
        }
        Some(index)
    }

    /// Drag the selection by a floor-space delta.
    pub fn object_moving(&mut self, dx: f64, dy: f64) -> bool {
        let Some(index) = self.begin_transform() else {
            return false;
        };
        if let Some(object) = self.scene.get_mut(index) {
            object.move_by(dx, dy);
        }
        true
    }

    pub fn object_scaling(&mut self, scale_x: f64, scale_y: f64) -> bool {
        let Some(index) = self.begin_transform() else {
            return false;
        };
        if let Some(object) = self.scene.get_mut(index) {
            object.scale_x = scale_x;
            object.scale_y = scale_y;
        }
        true
    }

    pub fn object_rotating(&mut self, angle: f64) -> bool {
        let Some(index) = self.begin_transform() else {
            return false;
        };
        if let Some(object) = self.scene.get_mut(index) {
            object.angle = angle;
        }
        true
    }

    /// End of a transform gesture.
    pub fn object_modified(&mut self) {
        self.latch.disarm();
        self.changed();
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        self.sync_scene();
        self.latch.disarm();
        if !self.history.undo(&mut self.building) {
            self.notify(Notice::info("Nothing to undo"));
            return false;
        }
        self.after_history_step();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.sync_scene();
        self.latch.disarm();
        if !self.history.redo(&mut self.building) {
            self.notify(Notice::info("Nothing to redo"));
            return false;
        }
        self.after_history_step();
        true
    }

    fn after_history_step(&mut self) {
        self.floor_ids.reseed(&self.building);
        if self.building.floor(&self.active_floor).is_none() {
            self.active_floor = first_floor_of(&self.building);
        }
        self.render_active_floor();
        self.autosave.touch();
    }

    // --- Keyboard and view ---

    /// Run the command bound to a key press. Returns the command, if any.
    pub fn handle_key(&mut self, key: &Key, mods: Modifiers, storage: &mut dyn LocalStorage) -> Option<Command> {
        let command = shortcut(key, mods)?;
        debug!(?command, "shortcut");
        match command {
            Command::Copy => {
                self.copy();
            }
            Command::Paste => {
                self.paste();
            }
            Command::Undo => {
                self.undo();
            }
            Command::Redo => {
                self.redo();
            }
            Command::SaveDraft => {
                if let Err(e) = self.save_draft(storage) {
                    warn!(error = %e, "draft save failed");
                    self.notify(Notice::error(format!("Failed to save draft: {e}")));
                }
            }
            Command::ResetView => self.camera.reset(),
            Command::DeleteSelected => {
                self.delete_selected();
            }
            Command::Deselect => self.deselect(),
            Command::Pan { dx, dy } => self.camera.pan_by(dx, dy),
            Command::ZoomIn => self.zoom_by(ZOOM_STEP),
            Command::ZoomOut => self.zoom_by(1.0 / ZOOM_STEP),
        }
        Some(command)
    }

    /// Zoom about the viewport centre.
    pub fn zoom_by(&mut self, factor: f64) {
        let anchor = Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0);
        self.camera.zoom_at(anchor, factor);
    }

    /// Fit the camera to the active floor's content.
    pub fn fit_to_content(&mut self) {
        match self.scene.content_bounds() {
            Some(bounds) => self.camera.fit_to_bounds(bounds, self.viewport, FIT_PADDING_PX),
            None => self.camera.reset(),
        }
    }

    // --- Persistence ---

    /// Restore the draft from local storage. Returns `Ok(false)` when there is none.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the stored draft does not parse.
    pub fn restore_draft(&mut self, storage: &dyn LocalStorage) -> Result<bool, PersistError> {
        let Some(building) = persist::load_draft(storage)? else {
            return Ok(false);
        };
        self.load_document(building);
        self.notify(Notice::info("Draft restored"));
        Ok(true)
    }

    /// Write the draft now.
    ///
    /// # Errors
    ///
    /// Returns any error from the storage write.
    pub fn save_draft(&mut self, storage: &mut dyn LocalStorage) -> Result<(), PersistError> {
        self.write_draft(storage, Instant::now())?;
        self.notify(Notice::success("Draft saved"));
        Ok(())
    }

    /// Let the autosave scheduler flush the draft if one is due.
    pub fn autosave_tick(&mut self, now: Instant, storage: &mut dyn LocalStorage) -> Option<FlushReason> {
        let reason = self.autosave.poll_at(now)?;
        if let Err(e) = self.write_draft(storage, now) {
            warn!(error = %e, ?reason, "autosave failed");
            self.notify(Notice::error(format!("Auto-save failed: {e}")));
        }
        Some(reason)
    }

    fn write_draft(&mut self, storage: &mut dyn LocalStorage, now: Instant) -> Result<(), PersistError> {
        self.sync_scene();
        persist::save_draft(storage, &self.building)?;
        self.autosave.flushed_at(now);
        debug!(objects = self.building.object_count(), "draft written");
        Ok(())
    }

    /// Prepare the document for a remote save: the building must be named, and
    /// its id is derived from the name. Returns the id and the document to send.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name and `InvalidId` when the name
    /// yields no usable id.
    pub fn prepare_cloud_save(&mut self) -> Result<(String, Building), PersistError> {
        if self.building.name.trim().is_empty() {
            return Err(PersistError::Validation("Please enter a building name".into()));
        }
        let id = sanitize_building_id(&self.building.name);
        if !is_valid_building_id(&id) {
            return Err(PersistError::InvalidId(self.building.name.clone()));
        }
        self.sync_scene();
        self.building.building_id.clone_from(&id);
        Ok((id, self.building.clone()))
    }

    // --- Internals ---

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn sync_scene(&mut self) {
        let mut objects = encode_all(self.scene.objects());
        objects.extend(self.unrendered.iter().cloned());
        if let Some(floor) = self.building.floor_mut(&self.active_floor) {
            floor.objects = objects;
        }
    }

    fn checkpoint(&mut self) {
        self.sync_scene();
        self.history.snapshot(&self.building);
    }

    fn changed(&mut self) {
        self.sync_scene();
        self.building.touch();
        self.autosave.touch();
    }

    fn render_active_floor(&mut self) {
        self.selected = None;
        self.line.cancel();
        self.latch.disarm();
        let Some(floor) = self.building.floor(&self.active_floor) else {
            self.scene = Scene::default();
            self.unrendered.clear();
            return;
        };
        let loaded = FloorLoad::load_now(floor, &self.catalog, DecodeContext::Editor);
        self.unrendered = loaded.dropped.iter().filter_map(|&i| floor.objects.get(i).cloned()).collect();
        if !self.unrendered.is_empty() {
            debug!(floor = %self.active_floor, held = self.unrendered.len(), "holding unrenderable objects");
        }
        self.scene = loaded.scene;
        for e in loaded.skipped {
            self.notify(Notice::warning(e.to_string()));
        }
    }
}

fn first_floor_of(building: &Building) -> FloorId {
    building
        .first_floor_id()
        .cloned()
        .unwrap_or_else(|| DEFAULT_FLOOR_ID.to_owned())
}
