//! pdfmake document definition wrapping the board table.

use std::collections::BTreeMap;

use serde::Serialize;

use super::pdf_table::{TableDefinition, IMAGE_CELL_STYLE};
use crate::layout::LayoutDescription;
use crate::types::{Board, Orientation, PageSize};

/// Points per millimetre
const PT_PER_MM: f64 = 72.0 / 25.4;

#[must_use]
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * PT_PER_MM
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PdfPageSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfStyle {
    pub alignment: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableLayout {
    pub default_border: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableBlock {
    pub table: TableDefinition,
    pub layout: TableLayout,
}

/// Top-level pdfmake document definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfDocument {
    pub page_size: PdfPageSize,
    pub page_orientation: Orientation,
    /// `[left, top, right, bottom]` in points
    pub page_margins: [f64; 4],
    pub info: DocumentInfo,
    pub styles: BTreeMap<&'static str, PdfStyle>,
    pub content: Vec<TableBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfo {
    pub title: String,
    pub creator: &'static str,
}

impl PdfDocument {
    /// The board table
    #[must_use]
    pub fn table(&self) -> Option<&TableDefinition> {
        self.content.first().map(|block| &block.table)
    }
}

/// Wrap `table` into a document sized to the laid-out page.
///
/// Page dimensions come from `layout`, so they are already swapped for the
/// board's orientation.
#[must_use]
pub fn build_pdf_document(
    board: &Board,
    page: &PageSize,
    layout: &LayoutDescription,
    table: TableDefinition,
) -> PdfDocument {
    let margin = mm_to_pt(layout.page_padding);
    let mut styles = BTreeMap::new();
    styles.insert(IMAGE_CELL_STYLE, PdfStyle { alignment: "center" });

    PdfDocument {
        page_size: PdfPageSize {
            width: mm_to_pt(layout.width),
            height: mm_to_pt(layout.height),
        },
        page_orientation: table.orientation,
        page_margins: [margin; 4],
        info: DocumentInfo {
            title: format!("{}x{} board ({})", board.rows, board.columns, page.name),
            creator: concat!("symboard ", env!("CARGO_PKG_VERSION")),
        },
        styles,
        content: vec![TableBlock {
            table,
            layout: TableLayout {
                default_border: false,
            },
        }],
    }
}
