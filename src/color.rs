//! Colour normalisation utilities
//!
//! Cell backgrounds arrive from the board editor in several notations. Both
//! renderers want plain `#rrggbb`, so everything goes through here.

use crate::types::DEFAULT_BACKGROUND;

/// Colour used for captions on light backgrounds
pub const TEXT_DARK: &str = "#000000";
/// Colour used for captions on dark backgrounds
pub const TEXT_LIGHT: &str = "#ffffff";

/// Parse a colour into its RGB components.
///
/// Accepts `#rgb`, `#rrggbb`, `#aarrggbb` (alpha is dropped, as in ARGB
/// exports) with or without the leading `#`, plus `white`, `black` and
/// `transparent` (treated as white, the paper colour).
#[must_use]
pub fn parse_colour(input: &str) -> Option<(u8, u8, u8)> {
    let trimmed = input.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "white" | "transparent" => return Some((255, 255, 255)),
        "black" => return Some((0, 0, 0)),
        _ => {}
    }

    let hex = trimmed.trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };

    match hex.len() {
        3 => {
            // #rgb expands each nibble: #f80 -> #ff8800
            let r = channel(0..1)?;
            let g = channel(1..2)?;
            let b = channel(2..3)?;
            Some((r * 17, g * 17, b * 17))
        }
        6 => Some((channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Some((channel(2..4)?, channel(4..6)?, channel(6..8)?)),
        _ => None,
    }
}

/// Normalise a colour to lower-case `#rrggbb`, falling back to white.
#[must_use]
pub fn normalize_colour(input: &str) -> String {
    match parse_colour(input) {
        Some((r, g, b)) => format!("#{r:02x}{g:02x}{b:02x}"),
        None => {
            log::debug!("unrecognised colour {input:?}, using {DEFAULT_BACKGROUND}");
            DEFAULT_BACKGROUND.to_string()
        }
    }
}

/// Relative luminance (WCAG) in `[0, 1]`
#[allow(clippy::many_single_char_names)]
fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    let lin = |c: u8| {
        let c = f64::from(c) / 255.0;
        if c <= 0.039_28 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * lin(r) + 0.7152 * lin(g) + 0.0722 * lin(b)
}

/// Caption colour that stays readable on `background`.
#[must_use]
pub fn caption_colour(background: &str) -> &'static str {
    let (r, g, b) = parse_colour(background).unwrap_or((255, 255, 255));
    if relative_luminance(r, g, b) < 0.179 {
        TEXT_LIGHT
    } else {
        TEXT_DARK
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_notations() {
        let test_cases = [
            ("#FF0000", "#ff0000"),
            ("00ff00", "#00ff00"),
            ("#f80", "#ff8800"),
            ("FF0000FF", "#0000ff"),
            ("#80C0C0C0", "#c0c0c0"),
            ("White", "#ffffff"),
            ("black", "#000000"),
            ("transparent", "#ffffff"),
        ];

        for (input, expected) in test_cases {
            assert_eq!(normalize_colour(input), expected, "input {input}");
        }
    }

    #[test]
    fn test_garbage_falls_back_to_white() {
        assert_eq!(normalize_colour(""), "#ffffff");
        assert_eq!(normalize_colour("#12"), "#ffffff");
        assert_eq!(normalize_colour("rebeccapurple"), "#ffffff");
        assert_eq!(normalize_colour("#gg0000"), "#ffffff");
    }

    #[test]
    fn test_caption_contrast() {
        assert_eq!(caption_colour("#ffffff"), TEXT_DARK);
        assert_eq!(caption_colour("#ffff00"), TEXT_DARK);
        assert_eq!(caption_colour("#000080"), TEXT_LIGHT);
        assert_eq!(caption_colour("not a colour"), TEXT_DARK);
    }
}
