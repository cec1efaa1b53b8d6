//! Hex color helpers.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// Parse `#rrggbb` (or `#rgb`) into its channels.
#[must_use]
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        6 => hex.to_owned(),
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16);
    match (channel(0), channel(2), channel(4)) {
        (Ok(r), Ok(g), Ok(b)) => Some((r, g, b)),
        _ => None,
    }
}

/// Darken every channel by `percent` of full scale, saturating at black.
///
/// Colors that do not parse are returned unchanged. Output is lowercase `#rrggbb`.
#[must_use]
pub fn darken(color: &str, percent: f64) -> String {
    let Some((r, g, b)) = parse_hex(color) else {
        return color.to_owned();
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let amount = (2.55 * percent).round().clamp(0.0, 255.0) as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        r.saturating_sub(amount),
        g.saturating_sub(amount),
        b.saturating_sub(amount)
    )
}
