//! PDF export pipeline.
//!
//! Layout first, then every cell image through the barrier, then the table
//! and the surrounding pdfmake document. The table builder only accepts a
//! [`ResolvedImages`] set, which can only come out of the barrier.

pub mod document;
pub mod embed;
pub mod images;
pub mod pdf_table;

use serde::{Deserialize, Serialize};

pub use document::{build_pdf_document, mm_to_pt, PdfDocument};
pub use embed::{decode_data_url, decode_image, EmbeddedImage, ImageFormat, ResolvedImage};
pub use images::{
    cancellable_resolve, resolve_board_images, ImageBarrier, ImageResolver, ResolvedImages,
};
pub use pdf_table::{build_pdf_table, PdfOptions, Size, StackItem, TableCell, TableDefinition};

use crate::error::Result;
use crate::layout::{compute_layout, LayoutOptions};
use crate::render::SvgOptions;
use crate::types::{Board, PageSize};

/// Every tunable of the preview and export paths, as read from an options
/// file: `{ "layout": {...}, "pdf": {...}, "svg": {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    pub layout: LayoutOptions,
    pub pdf: PdfOptions,
    pub svg: SvgOptions,
}

impl ExportConfig {
    /// # Errors
    /// Returns `Json` when the text is not a valid options object and
    /// `InvalidLayoutOptions` for out-of-range fractions.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.layout.validate()?;
        Ok(config)
    }

    /// SVG options with this config's layout fractions applied.
    #[must_use]
    pub fn svg_options(&self) -> SvgOptions {
        SvgOptions {
            layout: self.layout,
            ..self.svg.clone()
        }
    }
}

/// Layout, table and document in one call, with images already resolved.
///
/// # Errors
/// Any layout or table error, see [`compute_layout`] and [`build_pdf_table`].
pub fn export_board(
    board: &Board,
    page: &PageSize,
    config: &ExportConfig,
    images: &ResolvedImages,
) -> Result<PdfDocument> {
    let layout = compute_layout(board, page, &config.layout)?;
    let table = build_pdf_table(board, &layout, images, &config.pdf)?;
    Ok(build_pdf_document(board, page, &layout, table))
}

/// Full export: validates the layout, waits for every image, then builds.
///
/// Layout errors are reported before any image is requested.
///
/// # Errors
/// Any layout or table error; image failures become placeholders.
pub async fn export_board_pdf<R: ImageResolver>(
    board: &Board,
    page: &PageSize,
    config: &ExportConfig,
    resolver: &R,
) -> Result<PdfDocument> {
    let layout = compute_layout(board, page, &config.layout)?;
    let images = resolve_board_images(board, resolver).await;
    if images.missing_count() > 0 {
        log::warn!(
            "{} of {} cells exported without an image",
            images.missing_count(),
            images.len()
        );
    }
    let table = build_pdf_table(board, &layout, &images, &config.pdf)?;
    Ok(build_pdf_document(board, page, &layout, table))
}
