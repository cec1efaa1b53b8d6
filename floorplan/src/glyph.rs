//! Glyph parsing: turns icon SVG markup into drawable parts.
//!
//! Only the subset the catalog uses is understood: `<path d>` and
//! `<circle cx cy r>` elements, with a `fill` inherited from the nearest
//! ancestor that sets one. Anything else inside the glyph is ignored.

#[cfg(test)]
#[path = "glyph_test.rs"]
mod glyph_test;

use roxmltree::Node;

/// One drawable element of a glyph, in glyph-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum GlyphPart {
    Path { d: String, fill: Option<String> },
    Circle { cx: f64, cy: f64, r: f64, fill: Option<String> },
}

impl GlyphPart {
    #[must_use]
    pub fn fill(&self) -> Option<&str> {
        match self {
            Self::Path { fill, .. } | Self::Circle { fill, .. } => fill.as_deref(),
        }
    }

    /// Replace the part's fill.
    pub fn set_fill(&mut self, color: &str) {
        match self {
            Self::Path { fill, .. } | Self::Circle { fill, .. } => *fill = Some(color.to_owned()),
        }
    }
}

/// Parse glyph markup into its drawable parts, in document order.
///
/// # Errors
///
/// Returns a human-readable reason when the markup is not well-formed XML, the
/// root is not `<svg>`, a supported element has a missing or non-numeric
/// attribute, or the glyph has no drawable parts at all.
pub fn parse_glyph(markup: &str) -> Result<Vec<GlyphPart>, String> {
    let doc = roxmltree::Document::parse(markup).map_err(|e| format!("failed to parse svg xml: {e}"))?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(format!("expected <svg> root, found <{}>", root.tag_name().name()));
    }

    let mut parts = Vec::new();
    for node in root.descendants().filter(Node::is_element) {
        match node.tag_name().name() {
            "path" => {
                let d = node.attribute("d").ok_or("path without `d` attribute")?;
                parts.push(GlyphPart::Path { d: d.to_owned(), fill: inherited_fill(node) });
            }
            "circle" => parts.push(GlyphPart::Circle {
                cx: number_attr(node, "cx")?,
                cy: number_attr(node, "cy")?,
                r: number_attr(node, "r")?,
                fill: inherited_fill(node),
            }),
            _ => {}
        }
    }

    if parts.is_empty() {
        return Err("glyph has no drawable parts".into());
    }
    Ok(parts)
}

fn inherited_fill(node: Node<'_, '_>) -> Option<String> {
    node.ancestors()
        .filter(Node::is_element)
        .find_map(|n| n.attribute("fill"))
        .map(str::to_owned)
}

fn number_attr(node: Node<'_, '_>, name: &str) -> Result<f64, String> {
    let raw = node
        .attribute(name)
        .ok_or_else(|| format!("<{}> without `{name}` attribute", node.tag_name().name()))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|e| format!("`{name}`=\"{raw}\" is not a number: {e}"))
}
