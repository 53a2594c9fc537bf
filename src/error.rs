//! Structured error types for symboard.
//!
//! Every fallible operation in the crate returns [`Result`], so callers on the
//! JS side see one error shape regardless of which stage failed.

/// All errors that can occur while laying out, rendering or exporting a board.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Rows, columns, cell count or page size are non-positive or inconsistent.
    #[error("Invalid board dimensions: {0}")]
    InvalidBoardDimensions(String),

    /// Inter-cell spacing consumed all of the drawable area.
    #[error("Layout overflow: cell size would be {cell_width} x {cell_height}")]
    LayoutOverflow { cell_width: f64, cell_height: f64 },

    /// Spacing/padding fractions outside their valid range.
    #[error("Invalid layout options: {0}")]
    InvalidLayoutOptions(String),

    /// Two cells on the same board share an identifier.
    #[error("Duplicate cell id: {0}")]
    DuplicateCellId(String),

    /// Table construction was attempted before every cell image settled.
    #[error("Images incomplete: {resolved} of {expected} cells resolved")]
    ImagesIncomplete { expected: usize, resolved: usize },

    /// An image could not be fetched or decoded.
    #[error("Image fetch failed for {url}: {reason}")]
    ImageFetch { url: String, reason: String },

    /// A symbol search backend failed.
    #[error("Search failed: {0}")]
    Search(String),

    /// The operation was aborted before it completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// Conversion to or from a JS value failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BoardError>;

impl BoardError {
    /// Shorthand for an [`BoardError::ImageFetch`] with any displayable reason.
    pub(crate) fn image_fetch(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::ImageFetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<BoardError> for wasm_bindgen::JsValue {
    fn from(e: BoardError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
