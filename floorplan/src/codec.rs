//! Object codec: converts between persisted `MapObject`s and live `SceneObject`s.
//!
//! DESIGN
//! ======
//! Encoding is a pure field copy from the drawable back to the document. Decoding
//! is also a field copy for every kind except icons, whose glyph has to be
//! resolved from the catalog and parsed before the drawable exists. Decoding an
//! icon therefore returns `Decoded::Pending` with a `GlyphRequest`; the caller
//! resolves it (possibly later, possibly out of order) and calls
//! `GlyphRequest::finish`. `load::FloorLoad` is the barrier that waits for all
//! of a floor's requests.
//!
//! The fill of an icon is resolved once: the stored `fill` when present,
//! otherwise the catalog default. That single color replaces the
//! `currentColor` marker in the markup and is applied to every glyph part. The
//! object's own `fill` field is carried through untouched so that encoding a
//! decoded object reproduces the stored document exactly.
//!
//! ERROR HANDLING
//! ==============
//! An unknown icon identifier is `DecodeError::UnknownIcon`; unparseable glyph
//! markup is `DecodeError::Glyph`. Callers skip the object and log a warning.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use crate::doc::{CircleShape, MapObject, Shape};
use crate::error::DecodeError;
use crate::glyph::{GlyphPart, parse_glyph};
use crate::icons::{CURRENT_COLOR, IconCatalog};
use crate::scene::{Cursor, Drawable, SceneObject};

/// Which surface a decoded object is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeContext {
    /// Editable canvas: unlocked objects are selectable.
    Editor,
    /// Read-only map: nothing is selectable, everything receives taps.
    Viewer,
}

/// Outcome of decoding one object.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The drawable is complete.
    Ready(SceneObject),
    /// An icon whose glyph still needs resolving.
    Pending(GlyphRequest),
}

/// Deferred glyph resolution for one icon object.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRequest {
    icon: String,
    fill: String,
    markup: String,
    template: SceneObject,
}

impl GlyphRequest {
    /// Icon identifier being resolved.
    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// The single fill every glyph part is painted with.
    #[must_use]
    pub fn fill(&self) -> &str {
        &self.fill
    }

    /// Glyph markup with the color marker already substituted.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Parse the markup into drawable parts.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Glyph` when the markup cannot be parsed.
    pub fn resolve(&self) -> Result<Vec<GlyphPart>, DecodeError> {
        parse_glyph(&self.markup).map_err(|reason| DecodeError::Glyph { icon: self.icon.clone(), reason })
    }

    /// Build the icon drawable from resolved parts, painting every part with
    /// the resolved fill.
    #[must_use]
    pub fn finish(self, mut parts: Vec<GlyphPart>) -> SceneObject {
        for part in &mut parts {
            part.set_fill(&self.fill);
        }
        let mut object = self.template;
        if let Drawable::Icon { parts: slot, .. } = &mut object.drawable {
            *slot = parts;
        }
        object
    }
}

/// Read a drawable back into its persisted form.
#[must_use]
pub fn encode(object: &SceneObject) -> MapObject {
    let shape = match &object.drawable {
        Drawable::Rect { width, height } => Shape::Rect { width: *width, height: *height },
        Drawable::Circle { radius } => Shape::Circle(CircleShape { radius: *radius }),
        Drawable::Line { x1, y1, x2, y2 } => Shape::Line { x1: *x1, y1: *y1, x2: *x2, y2: *y2 },
        Drawable::Text { text, font_size, font_family } => Shape::Text {
            text: text.clone(),
            font_size: *font_size,
            font_family: font_family.clone(),
        },
        Drawable::Icon { icon, width, height, .. } => Shape::Icon {
            object_icon: icon.clone(),
            width: *width,
            height: *height,
        },
    };
    MapObject {
        shape,
        left: object.left,
        top: object.top,
        angle: object.angle,
        scale_x: object.scale_x,
        scale_y: object.scale_y,
        fill: object.fill.clone(),
        stroke: object.stroke.clone(),
        stroke_width: object.stroke_width,
        object_label: object.label.clone(),
        object_tags: object.tags.clone(),
        object_locked: object.locked,
    }
}

/// Encode a whole scene in z-order.
#[must_use]
pub fn encode_all(objects: &[SceneObject]) -> Vec<MapObject> {
    objects.iter().map(encode).collect()
}

/// Reconstruct a drawable from its persisted form.
///
/// # Errors
///
/// Returns `DecodeError::UnknownIcon` for an icon missing from `catalog`.
pub fn decode(object: &MapObject, catalog: &IconCatalog, ctx: DecodeContext) -> Result<Decoded, DecodeError> {
    let drawable = match &object.shape {
        Shape::Rect { width, height } => Drawable::Rect { width: *width, height: *height },
        Shape::Circle(circle) => Drawable::Circle { radius: circle.radius },
        Shape::Line { x1, y1, x2, y2 } => Drawable::Line { x1: *x1, y1: *y1, x2: *x2, y2: *y2 },
        Shape::Text { text, font_size, font_family } => Drawable::Text {
            text: text.clone(),
            font_size: *font_size,
            font_family: font_family.clone(),
        },
        Shape::Icon { object_icon, width, height } => {
            let spec = catalog
                .get(object_icon)
                .ok_or_else(|| DecodeError::UnknownIcon(object_icon.clone()))?;
            let fill = object.fill.clone().unwrap_or_else(|| spec.color.to_owned());
            let template = place(
                object,
                Drawable::Icon { icon: object_icon.clone(), width: *width, height: *height, parts: Vec::new() },
                ctx,
            );
            return Ok(Decoded::Pending(GlyphRequest {
                icon: object_icon.clone(),
                markup: spec.svg.replace(CURRENT_COLOR, &fill),
                fill,
                template,
            }));
        }
    };
    Ok(Decoded::Ready(place(object, drawable, ctx)))
}

/// Decode and, for icons, resolve the glyph immediately.
///
/// # Errors
///
/// Returns any error from `decode` or `GlyphRequest::resolve`.
pub fn decode_now(object: &MapObject, catalog: &IconCatalog, ctx: DecodeContext) -> Result<SceneObject, DecodeError> {
    match decode(object, catalog, ctx)? {
        Decoded::Ready(scene_object) => Ok(scene_object),
        Decoded::Pending(request) => {
            let parts = request.resolve()?;
            Ok(request.finish(parts))
        }
    }
}

fn place(object: &MapObject, drawable: Drawable, ctx: DecodeContext) -> SceneObject {
    let (selectable, hover_cursor) = match ctx {
        DecodeContext::Editor if object.object_locked => (false, Cursor::Default),
        DecodeContext::Editor => (true, Cursor::Move),
        DecodeContext::Viewer if object.object_label.is_empty() => (false, Cursor::Default),
        DecodeContext::Viewer => (false, Cursor::Pointer),
    };
    SceneObject {
        drawable,
        left: object.left,
        top: object.top,
        angle: object.angle,
        scale_x: object.scale_x,
        scale_y: object.scale_y,
        fill: object.fill.clone(),
        stroke: object.stroke.clone(),
        stroke_width: object.stroke_width,
        label: object.object_label.clone(),
        tags: object.object_tags.clone(),
        locked: object.object_locked,
        selectable,
        evented: true,
        hover_cursor,
    }
}
