//! Preview rendering.
//!
//! This module provides:
//! - Thumbnail rectangles zipped with their cells
//! - A standalone SVG document for board previews

pub mod svg;

pub use svg::{
    build_svg_thumbnails, render_board_svg, render_layout_svg, svg_thumbnails, SvgOptions,
    SvgThumbnail, PAGE_OUTLINE_COLOUR, SELECTED_OUTLINE_COLOUR,
};
