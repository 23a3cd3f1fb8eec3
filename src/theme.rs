//! Light/dark theme and highlight color resolution.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use serde::{Deserialize, Serialize};

/// Highlight stroke for the suggested-binding outline on a light canvas.
pub const LIGHT_HIGHLIGHT_COLOR: &str = "#1e90ff";

/// Highlight stroke for the suggested-binding outline on a dark canvas.
pub const DARK_HIGHLIGHT_COLOR: &str = "#5b9bd5";

/// Canvas color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Theme for a stored "dark mode enabled" preference.
    #[must_use]
    pub fn from_preference(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    /// The theme's built-in highlight color as lowercase `#rrggbb`.
    #[must_use]
    pub fn highlight_color(self) -> &'static str {
        match self {
            Self::Light => LIGHT_HIGHLIGHT_COLOR,
            Self::Dark => DARK_HIGHLIGHT_COLOR,
        }
    }
}

/// Stroke color for the highlight outline: `override_color` when it parses as
/// a hex color, otherwise the theme's own color.
#[must_use]
pub fn resolve_highlight_color(theme: Theme, override_color: Option<&str>) -> String {
    let fallback = theme.highlight_color();
    override_color.map_or_else(|| fallback.to_owned(), |c| normalize_hex_color(c, fallback))
}

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    let full: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_owned(),
        _ => return None,
    };
    // from_str_radix alone would accept a leading sign.
    if !full.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&full[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Normalize a color to canonical lowercase `#rrggbb`, falling back to
/// `fallback` (and then to the light highlight) when it does not parse.
#[must_use]
pub fn normalize_hex_color(value: &str, fallback: &str) -> String {
    let (r, g, b) = parse_hex_rgb(value)
        .or_else(|| parse_hex_rgb(fallback))
        .unwrap_or((0x1e, 0x90, 0xff));
    format!("#{r:02x}{g:02x}{b:02x}")
}
