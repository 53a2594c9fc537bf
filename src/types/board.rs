use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{BoardError, Result};

/// Identifier of a cell, unique within its board.
pub type CellId = String;

/// Fill used when a cell carries no background colour.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// A user's grid composition of captioned image cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Number of rows (>= 1)
    pub rows: u32,
    /// Number of columns (>= 1)
    pub columns: u32,
    /// Cells in row-major order, `rows * columns` long
    pub cells: Vec<Cell>,
    /// Format applied to every cell unless overridden
    #[serde(default)]
    pub default_cell_format: CellFormat,
}

/// One grid unit holding an optional image and caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub id: CellId,
    /// Symbol image location (http(s), data: or local path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default = "default_background")]
    pub background_colour: String,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    #[serde(default)]
    pub label_position: LabelPosition,
}

/// Where a cell's caption sits relative to its image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    Top,
    #[default]
    Bottom,
}

impl Cell {
    /// Create a cell with a white background and no image or caption.
    #[must_use]
    pub fn new(id: impl Into<CellId>) -> Self {
        Self {
            id: id.into(),
            url: None,
            caption: None,
            background_colour: default_background(),
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    #[must_use]
    pub fn with_background(mut self, colour: impl Into<String>) -> Self {
        self.background_colour = colour.into();
        self
    }

    /// Image URL, treating empty strings as absent.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// Caption text, treating blank captions as absent.
    #[must_use]
    pub fn caption_text(&self) -> Option<&str> {
        self.caption.as_deref().filter(|c| !c.trim().is_empty())
    }
}

impl Board {
    /// Build a validated board.
    ///
    /// # Errors
    /// Returns `InvalidBoardDimensions` when `rows`/`columns` are zero or the
    /// cell count does not match, and `DuplicateCellId` for repeated ids.
    pub fn new(rows: u32, columns: u32, cells: Vec<Cell>, format: CellFormat) -> Result<Self> {
        let board = Self {
            rows,
            columns,
            cells,
            default_cell_format: format,
        };
        board.validate()?;
        Ok(board)
    }

    /// Build a `rows x columns` board of empty cells with ids `"r{row}c{col}"`.
    ///
    /// # Errors
    /// Returns `InvalidBoardDimensions` when either dimension is zero.
    pub fn blank(rows: u32, columns: u32) -> Result<Self> {
        let cells = (0..rows)
            .flat_map(|r| (0..columns).map(move |c| Cell::new(format!("r{r}c{c}"))))
            .collect();
        Self::new(rows, columns, cells, CellFormat::default())
    }

    /// Parse and validate a board from JSON.
    ///
    /// # Errors
    /// Returns `Json` for malformed input, otherwise the errors of [`Board::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let board: Self = serde_json::from_str(json)?;
        board.validate()?;
        Ok(board)
    }

    /// Check the structural invariants of the board.
    ///
    /// # Errors
    /// See [`Board::new`].
    pub fn validate(&self) -> Result<()> {
        self.validate_dimensions()?;

        let mut seen = HashSet::with_capacity(self.cells.len());
        for cell in &self.cells {
            if !seen.insert(cell.id.as_str()) {
                return Err(BoardError::DuplicateCellId(cell.id.clone()));
            }
        }
        Ok(())
    }

    /// Dimension checks only (rows, columns, cell count).
    pub(crate) fn validate_dimensions(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(BoardError::InvalidBoardDimensions(format!(
                "board must have at least one row and column, got {}x{}",
                self.rows, self.columns
            )));
        }
        let expected = self.cell_count();
        if self.cells.len() != expected {
            return Err(BoardError::InvalidBoardDimensions(format!(
                "{}x{} board needs {} cells, has {}",
                self.rows,
                self.columns,
                expected,
                self.cells.len()
            )));
        }
        Ok(())
    }

    /// `rows * columns`
    #[must_use]
    pub fn cell_count(&self) -> usize {
        // u32 * u32 always fits in u64; boards are tens of cells in practice.
        usize::try_from(u64::from(self.rows) * u64::from(self.columns)).unwrap_or(usize::MAX)
    }

    /// Cells organised as a row-major matrix.
    ///
    /// Rows are slices of `cells`; a short trailing row is returned as-is
    /// rather than padded, so no access here can go out of bounds.
    #[must_use]
    pub fn cells_as_matrix(&self) -> Vec<&[Cell]> {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX).max(1);
        self.cells.chunks(width).collect()
    }

    /// Cell at (row, col), both 0-based.
    #[must_use]
    pub fn cell_at(&self, row: u32, col: u32) -> Option<&Cell> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        let idx = u64::from(row) * u64::from(self.columns) + u64::from(col);
        self.cells.get(usize::try_from(idx).ok()?)
    }

    #[must_use]
    pub fn label_position(&self) -> LabelPosition {
        self.default_cell_format.label_position
    }
}
