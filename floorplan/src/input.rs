//! Input model: tools, modifier keys, keyboard shortcuts, and the line gesture.
//!
//! This module defines the types consumed by the editor session. `Tool` and
//! `Modifiers` capture the user's intent at the time of a pointer or key event.
//! `shortcut` maps a key press to the `Command` it triggers, and `LineGesture`
//! tracks the two-click line tool between its first and second click.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::PAN_STEP_PX;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Place a rectangle.
    Rect,
    /// Place a circle.
    Circle,
    /// Draw a straight line with two clicks.
    Line,
    /// Place a text label.
    Text,
}

impl Tool {
    /// Whether a single click with this tool places a new object.
    #[must_use]
    pub fn is_shape(self) -> bool {
        matches!(self, Self::Rect | Self::Circle | Self::Text)
    }

    /// Parse a tool name as used by toolbars (`select`, `rect`, `circle`, `line`, `text`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "select" => Some(Self::Select),
            "rect" | "rectangle" => Some(Self::Rect),
            "circle" => Some(Self::Circle),
            "line" => Some(Self::Line),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Only Ctrl held.
    #[must_use]
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// Ctrl and Shift held.
    #[must_use]
    pub fn ctrl_shift() -> Self {
        Self { ctrl: true, shift: true, ..Self::default() }
    }

    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Editor command triggered by a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Copy,
    Paste,
    Undo,
    Redo,
    SaveDraft,
    ResetView,
    DeleteSelected,
    Deselect,
    /// Shift the view by a screen-space delta.
    Pan { dx: f64, dy: f64 },
    ZoomIn,
    ZoomOut,
}

/// Map a key press to its editor command, if any.
#[must_use]
pub fn shortcut(key: &Key, mods: Modifiers) -> Option<Command> {
    if mods.command() {
        let command = if key.is("c") && !mods.shift {
            Command::Copy
        } else if key.is("v") {
            Command::Paste
        } else if key.is("z") && !mods.shift {
            Command::Undo
        } else if key.is("y") || key.is("z") {
            Command::Redo
        } else if key.is("s") {
            Command::SaveDraft
        } else if key.is("0") {
            Command::ResetView
        } else {
            return None;
        };
        return Some(command);
    }
    match key.0.as_str() {
        "Delete" => Some(Command::DeleteSelected),
        "Escape" => Some(Command::Deselect),
        "ArrowUp" => Some(Command::Pan { dx: 0.0, dy: PAN_STEP_PX }),
        "ArrowDown" => Some(Command::Pan { dx: 0.0, dy: -PAN_STEP_PX }),
        "ArrowLeft" => Some(Command::Pan { dx: PAN_STEP_PX, dy: 0.0 }),
        "ArrowRight" => Some(Command::Pan { dx: -PAN_STEP_PX, dy: 0.0 }),
        "+" | "=" => Some(Command::ZoomIn),
        "-" | "_" => Some(Command::ZoomOut),
        _ => None,
    }
}

/// Progress of the two-click line tool.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LineGesture {
    /// Waiting for the first click.
    #[default]
    Idle,
    /// First endpoint placed; the next click completes the line.
    Started(Point),
}

impl LineGesture {
    /// Feed a click. Returns the finished segment on the second click.
    pub fn click(&mut self, at: Point) -> Option<(Point, Point)> {
        match *self {
            Self::Idle => {
                *self = Self::Started(at);
                None
            }
            Self::Started(start) => {
                *self = Self::Idle;
                Some((start, at))
            }
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }
}
