//! Grid geometry shared by the SVG preview and the PDF export.
//!
//! A board is laid out on a page as a uniform grid: the page is padded on all
//! four sides, and the remaining area is split into `rows x columns` equal
//! cells separated by a single spacing value. Both renderers consume the same
//! [`LayoutDescription`], so their orientation and spacing cannot drift.
//!
//! The spacing is one scalar for both axes, derived from the longer inner
//! dimension. On strongly non-square grids the gaps therefore look wider on
//! the short axis; this is a known limitation of the layout, kept so previews
//! match existing printed boards.

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};
use crate::types::{Board, Cell, Orientation, PageSize};

/// Default cell spacing, as a fraction of the largest per-cell extent
pub const DEFAULT_CELL_SPACING_FRACTION: f64 = 0.2;

/// Default page padding, as a fraction of the page's short edge
pub const DEFAULT_PAGE_PADDING_FRACTION: f64 = 0.1;

/// Tunable layout fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub cell_spacing_fraction: f64,
    pub page_padding_fraction: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            cell_spacing_fraction: DEFAULT_CELL_SPACING_FRACTION,
            page_padding_fraction: DEFAULT_PAGE_PADDING_FRACTION,
        }
    }
}

impl LayoutOptions {
    /// # Errors
    /// Returns `InvalidLayoutOptions` for negative or non-finite fractions, or
    /// padding that would leave no drawable area.
    pub fn validate(&self) -> Result<()> {
        let spacing = self.cell_spacing_fraction;
        let padding = self.page_padding_fraction;
        if !spacing.is_finite() || spacing < 0.0 {
            return Err(BoardError::InvalidLayoutOptions(format!(
                "cell spacing fraction must be >= 0, got {spacing}"
            )));
        }
        if !padding.is_finite() || !(0.0..0.5).contains(&padding) {
            return Err(BoardError::InvalidLayoutOptions(format!(
                "page padding fraction must be in [0, 0.5), got {padding}"
            )));
        }
        Ok(())
    }
}

/// Rectangle for one cell, relative to the padded page origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Derived page geometry for one board/page pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDescription {
    pub height: f64,
    pub width: f64,
    pub orientation: Orientation,
    pub page_padding: f64,
    pub cell_spacing: f64,
    pub inner_width: f64,
    pub inner_height: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    /// One rect per cell, in the board's row-major cell order
    pub rects: Vec<Rect>,
}

/// Portrait when the board is taller than it is wide; ties go landscape.
#[must_use]
pub fn orientation_for(rows: u32, columns: u32) -> Orientation {
    if rows > columns {
        Orientation::Portrait
    } else {
        Orientation::Landscape
    }
}

/// Compute the grid layout for `board` on `page`.
///
/// # Errors
/// - `InvalidBoardDimensions` when the board or page is degenerate
/// - `InvalidLayoutOptions` when the fractions are out of range
/// - `LayoutOverflow` when spacing leaves no room for the cells
pub fn compute_layout(
    board: &Board,
    page: &PageSize,
    options: &LayoutOptions,
) -> Result<LayoutDescription> {
    board.validate_dimensions()?;
    page.validate()?;
    options.validate()?;

    let rows = board.rows;
    let columns = board.columns;
    let orientation = orientation_for(rows, columns);
    let (height, width) = match orientation {
        Orientation::Portrait => (page.long_edge(), page.short_edge()),
        Orientation::Landscape => (page.short_edge(), page.long_edge()),
    };

    let page_padding = page.short_edge() * options.page_padding_fraction;
    let inner_height = height - page_padding * 2.0;
    let inner_width = width - page_padding * 2.0;

    let max_cells = f64::from(rows.max(columns));
    let max_dimension = inner_height.max(inner_width);
    let cell_spacing = (max_dimension / max_cells) * options.cell_spacing_fraction;

    let rows_f = f64::from(rows);
    let cols_f = f64::from(columns);
    let cell_width = (inner_width - cell_spacing * (cols_f - 1.0)) / cols_f;
    let cell_height = (inner_height - cell_spacing * (rows_f - 1.0)) / rows_f;

    if !(cell_width.is_finite() && cell_height.is_finite())
        || cell_width <= 0.0
        || cell_height <= 0.0
    {
        return Err(BoardError::LayoutOverflow {
            cell_width,
            cell_height,
        });
    }

    let mut rects = Vec::with_capacity(board.cell_count());
    let mut y = 0.0;
    for _ in 0..rows {
        let mut x = 0.0;
        for _ in 0..columns {
            rects.push(Rect {
                x,
                y,
                width: cell_width,
                height: cell_height,
            });
            x += cell_width + cell_spacing;
        }
        y += cell_height + cell_spacing;
    }

    log::debug!(
        "layout {}x{} on {} ({}): cell {:.2}x{:.2}, spacing {:.2}",
        rows,
        columns,
        page.name,
        orientation.as_str(),
        cell_width,
        cell_height,
        cell_spacing
    );

    Ok(LayoutDescription {
        height,
        width,
        orientation,
        page_padding,
        cell_spacing,
        inner_width,
        inner_height,
        cell_width,
        cell_height,
        rects,
    })
}

/// [`compute_layout`] with the default fractions.
///
/// # Errors
/// See [`compute_layout`].
pub fn compute_layout_default(board: &Board, page: &PageSize) -> Result<LayoutDescription> {
    compute_layout(board, page, &LayoutOptions::default())
}

impl LayoutDescription {
    /// SVG `viewBox` covering the whole page
    #[must_use]
    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }

    /// Stroke width of the page outline in the preview
    #[must_use]
    pub fn outline_width(&self) -> f64 {
        self.height / 50.0
    }

    /// Pair each rect with its source cell, positionally.
    pub fn zip_cells<'a>(&'a self, board: &'a Board) -> impl Iterator<Item = (&'a Rect, &'a Cell)> {
        self.rects.iter().zip(board.cells.iter())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_two_by_two_on_a4() {
        let board = Board::blank(2, 2).unwrap();
        let layout = compute_layout_default(&board, &PageSize::a4()).unwrap();

        assert_eq!(layout.orientation, Orientation::Landscape);
        assert!(approx(layout.height, 210.0));
        assert!(approx(layout.width, 297.0));
        assert!(approx(layout.page_padding, 21.0));
        assert!(approx(layout.inner_width, 255.0));
        assert!(approx(layout.inner_height, 168.0));
        assert!(approx(layout.cell_spacing, 25.5));
        assert!(approx(layout.cell_width, 114.75));
        assert!(approx(layout.cell_height, (168.0 - 25.5) / 2.0));
    }

    #[test]
    fn test_rect_positions_advance_by_spacing() {
        let board = Board::blank(2, 3).unwrap();
        let layout = compute_layout_default(&board, &PageSize::a4()).unwrap();
        let step_x = layout.cell_width + layout.cell_spacing;
        let step_y = layout.cell_height + layout.cell_spacing;

        assert_eq!(layout.rects.len(), 6);
        assert_eq!(layout.rects[0].x, 0.0);
        assert_eq!(layout.rects[0].y, 0.0);
        assert!(approx(layout.rects[2].x, step_x * 2.0));
        assert_eq!(layout.rects[3].x, 0.0);
        assert!(approx(layout.rects[3].y, step_y));
    }

    #[test]
    fn test_last_rect_touches_inner_edge() {
        let board = Board::blank(3, 4).unwrap();
        let layout = compute_layout_default(&board, &PageSize::a4()).unwrap();
        let last = layout.rects.last().unwrap();
        assert!(approx(last.right(), layout.inner_width));
        assert!(approx(last.bottom(), layout.inner_height));
    }

    #[test]
    fn test_portrait_when_taller() {
        let board = Board::blank(3, 2).unwrap();
        let layout = compute_layout_default(&board, &PageSize::a4()).unwrap();
        assert_eq!(layout.orientation, Orientation::Portrait);
        assert_eq!(layout.height, 297.0);
        assert_eq!(layout.width, 210.0);
    }

    #[test]
    fn test_overflow_rejected() {
        let board = Board::blank(1, 4).unwrap();
        let options = LayoutOptions {
            cell_spacing_fraction: 2.0,
            ..LayoutOptions::default()
        };
        let err = compute_layout(&board, &PageSize::a4(), &options).unwrap_err();
        assert!(matches!(err, BoardError::LayoutOverflow { .. }));
    }

    #[test]
    fn test_bad_options_rejected() {
        let board = Board::blank(1, 1).unwrap();
        let options = LayoutOptions {
            page_padding_fraction: 0.5,
            ..LayoutOptions::default()
        };
        let err = compute_layout(&board, &PageSize::a4(), &options).unwrap_err();
        assert!(matches!(err, BoardError::InvalidLayoutOptions(_)));
    }

    #[test]
    fn test_view_box_and_outline() {
        let board = Board::blank(1, 1).unwrap();
        let layout = compute_layout_default(&board, &PageSize::a4()).unwrap();
        assert_eq!(layout.view_box(), "0 0 297 210");
        assert!(approx(layout.outline_width(), 4.2));
    }
}
