//! SVG preview of a board.
//!
//! Emits a self-contained SVG document whose `viewBox` matches the page in
//! millimetres. The page outline is drawn first; the grid lives in an inner
//! group translated by the page padding, so every cell is positioned in
//! padded-origin coordinates straight from the [`LayoutDescription`].

use serde::{Deserialize, Serialize};

use crate::color::{caption_colour, normalize_colour};
use crate::error::Result;
use crate::layout::{compute_layout, compute_layout_default, LayoutDescription, LayoutOptions, Rect};
use crate::types::{Board, LabelPosition, PageSize};

/// Outline colour of an unselected page
pub const PAGE_OUTLINE_COLOUR: &str = "#6b6b6b";

/// Outline colour of a selected page
pub const SELECTED_OUTLINE_COLOUR: &str = "#1e88e5";

/// Preview styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SvgOptions {
    pub layout: LayoutOptions,
    /// Whether the board is currently selected (changes the outline colour)
    pub selected: bool,
    pub outline_colour: String,
    pub selected_outline_colour: String,
    /// Share of the cell height reserved for the caption band
    pub caption_band_fraction: f64,
    /// Draw the thin border around each cell
    pub cell_borders: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            selected: false,
            outline_colour: PAGE_OUTLINE_COLOUR.to_string(),
            selected_outline_colour: SELECTED_OUTLINE_COLOUR.to_string(),
            caption_band_fraction: 0.2,
            cell_borders: true,
        }
    }
}

/// One preview cell: its rectangle plus what to draw inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgThumbnail<'a> {
    pub rect: Rect,
    pub cell_id: &'a str,
    /// `None` when the cell has no image; never an empty reference
    pub image: Option<&'a str>,
    pub caption: Option<&'a str>,
    /// Normalised `#rrggbb` fill
    pub background: String,
}

/// Cell rectangles for `board` on `page` with the default fractions.
///
/// # Errors
/// See [`compute_layout`].
pub fn build_svg_thumbnails(board: &Board, page: &PageSize) -> Result<Vec<Rect>> {
    Ok(compute_layout_default(board, page)?.rects)
}

/// Zip the layout's rectangles with the board's cells.
#[must_use]
pub fn svg_thumbnails<'a>(board: &'a Board, layout: &LayoutDescription) -> Vec<SvgThumbnail<'a>> {
    layout
        .rects
        .iter()
        .zip(board.cells.iter())
        .map(|(rect, cell)| SvgThumbnail {
            rect: *rect,
            cell_id: &cell.id,
            image: cell.image_url(),
            caption: cell.caption_text(),
            background: normalize_colour(&cell.background_colour),
        })
        .collect()
}

/// Lay out and render `board` as an SVG document.
///
/// # Errors
/// See [`compute_layout`].
pub fn render_board_svg(board: &Board, page: &PageSize, options: &SvgOptions) -> Result<String> {
    let layout = compute_layout(board, page, &options.layout)?;
    Ok(render_layout_svg(board, &layout, options))
}

/// Render a board with an already computed layout.
#[must_use]
pub fn render_layout_svg(board: &Board, layout: &LayoutDescription, options: &SvgOptions) -> String {
    let mut out = String::with_capacity(1024 + board.cells.len() * 256);
    let outline_colour = if options.selected {
        &options.selected_outline_colour
    } else {
        &options.outline_colour
    };

    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{}" width="{}mm" height="{}mm">"#,
        layout.view_box(),
        fmt_num(layout.width),
        fmt_num(layout.height)
    ));
    out.push('\n');

    // Page outline, inset by half the stroke so it is not clipped
    let stroke = layout.outline_width();
    out.push_str(&format!(
        r##"<rect class="page" x="{}" y="{}" width="{}" height="{}" fill="#ffffff" stroke="{}" stroke-width="{}"/>"##,
        fmt_num(stroke / 2.0),
        fmt_num(stroke / 2.0),
        fmt_num(layout.width - stroke),
        fmt_num(layout.height - stroke),
        xml_escape(outline_colour),
        fmt_num(stroke)
    ));
    out.push('\n');

    out.push_str(&format!(
        r#"<g class="inner-page" transform="translate({} {})">"#,
        fmt_num(layout.page_padding),
        fmt_num(layout.page_padding)
    ));
    out.push('\n');

    let label_position = board.label_position();
    for thumb in svg_thumbnails(board, layout) {
        write_cell(&mut out, &thumb, label_position, options);
    }

    out.push_str("</g>\n</svg>\n");
    out
}

fn write_cell(out: &mut String, thumb: &SvgThumbnail<'_>, label: LabelPosition, options: &SvgOptions) {
    let r = thumb.rect;
    out.push_str(&format!(
        r#"<g class="cell" data-cell-id="{}">"#,
        xml_escape(thumb.cell_id)
    ));

    let border = if options.cell_borders {
        format!(
            r#" stroke="{}" stroke-width="{}""#,
            PAGE_OUTLINE_COLOUR,
            fmt_num(r.height.min(r.width) / 100.0)
        )
    } else {
        String::new()
    };
    out.push_str(&format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"{}/>"#,
        fmt_num(r.x),
        fmt_num(r.y),
        fmt_num(r.width),
        fmt_num(r.height),
        thumb.background,
        border
    ));

    // Split the cell into an image area and, when captioned, a caption band
    let band = if thumb.caption.is_some() {
        r.height * options.caption_band_fraction.clamp(0.0, 0.5)
    } else {
        0.0
    };
    let (image_y, band_y) = match label {
        LabelPosition::Top => (r.y + band, r.y),
        LabelPosition::Bottom => (r.y, r.bottom() - band),
    };
    let image_h = r.height - band;

    if let Some(href) = thumb.image {
        // Small inset keeps symbols off the cell border
        let inset = r.width.min(image_h) * 0.05;
        out.push_str(&format!(
            r#"<image x="{}" y="{}" width="{}" height="{}" href="{}" preserveAspectRatio="xMidYMid meet"/>"#,
            fmt_num(r.x + inset),
            fmt_num(image_y + inset),
            fmt_num((r.width - inset * 2.0).max(0.0)),
            fmt_num((image_h - inset * 2.0).max(0.0)),
            xml_escape(href)
        ));
    }

    if let Some(caption) = thumb.caption {
        out.push_str(&format!(
            r#"<text x="{}" y="{}" font-family="sans-serif" font-size="{}" fill="{}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
            fmt_num(r.x + r.width / 2.0),
            fmt_num(band_y + band / 2.0),
            fmt_num(band * 0.7),
            caption_colour(&thumb.background),
            xml_escape(caption)
        ));
    }

    out.push_str("</g>\n");
}

/// Format a coordinate: integers without decimals, otherwise up to three
/// decimals with trailing zeros trimmed.
pub(crate) fn fmt_num(v: f64) -> String {
    let s = if (v - v.round()).abs() < 1e-6 {
        format!("{:.0}", v.round())
    } else {
        format!("{v:.3}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

/// Escape the XML special characters for text content and attribute values.
pub(crate) fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::Cell;

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(21.0), "21");
        assert_eq!(fmt_num(114.75), "114.75");
        assert_eq!(fmt_num(71.25 + 1e-9), "71.25");
        assert_eq!(fmt_num(1.0 / 3.0), "0.333");
        assert_eq!(fmt_num(-0.0), "0");
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&apos;");
    }

    #[test]
    fn test_thumbnail_without_url_has_no_image() {
        let board = Board::new(
            1,
            2,
            vec![
                Cell::new("a").with_url("https://example.org/a.png"),
                Cell::new("b"),
            ],
            Default::default(),
        )
        .unwrap();
        let layout = compute_layout_default(&board, &PageSize::a4()).unwrap();
        let thumbs = svg_thumbnails(&board, &layout);
        assert_eq!(thumbs[0].image, Some("https://example.org/a.png"));
        assert_eq!(thumbs[1].image, None);
    }

    #[test]
    fn test_selected_changes_outline() {
        let board = Board::blank(1, 1).unwrap();
        let options = SvgOptions {
            selected: true,
            ..SvgOptions::default()
        };
        let svg = render_board_svg(&board, &PageSize::a4(), &options).unwrap();
        assert!(svg.contains(SELECTED_OUTLINE_COLOUR));
    }
}
