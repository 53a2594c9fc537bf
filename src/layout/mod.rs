//! Layout engine for placing board cells on a page.
//!
//! This module handles:
//! - Choosing page orientation from the grid shape
//! - Page padding and inter-cell spacing
//! - Per-cell rectangles in row-major order, shared by every renderer

mod board_layout;

pub use board_layout::{
    compute_layout, compute_layout_default, orientation_for, LayoutDescription, LayoutOptions,
    Rect, DEFAULT_CELL_SPACING_FRACTION, DEFAULT_PAGE_PADDING_FRACTION,
};
