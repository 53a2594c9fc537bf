//! Builds the table definition consumed by pdfmake.
//!
//! The board becomes one table: content rows interleaved with spacer rows,
//! content cells interleaved with blank spacer columns. pdfmake needs every
//! body row to have the same number of entries, so a spacer row is a single
//! cell spanning all `2 * columns - 1` table columns followed by
//! `2 * columns - 2` covered placeholders.

use serde::{Deserialize, Serialize, Serializer};

use super::embed::ResolvedImage;
use super::images::ResolvedImages;
use crate::color::{caption_colour, normalize_colour};
use crate::error::{BoardError, Result};
use crate::layout::LayoutDescription;
use crate::types::{Board, Cell, LabelPosition, Orientation};

/// Style name applied to every content cell
pub const IMAGE_CELL_STYLE: &str = "imageCell";

/// Table configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfOptions {
    /// Width of spacer columns and height of spacer rows, in points
    pub cell_spacing: f64,
    /// Box the image is scaled to fit, in points
    pub image_fit: [f64; 2],
    /// Caption used for cells without one
    pub empty_caption: String,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            cell_spacing: 10.0,
            image_fit: [90.0, 90.0],
            empty_caption: "[no caption]".to_string(),
        }
    }
}

/// Column width or row height: `"*"` (share remaining space) or fixed points
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Size {
    Auto,
    Fixed(f64),
}

impl Serialize for Size {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str("*"),
            Self::Fixed(v) => serializer.serialize_f64(*v),
        }
    }
}

/// One entry of a content cell's vertical stack
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StackItem {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<&'static str>,
    },
    Image {
        image: String,
        fit: [f64; 2],
        alignment: &'static str,
    },
    Svg {
        svg: String,
        fit: [f64; 2],
        alignment: &'static str,
    },
    /// Empty object standing in for a missing image
    Placeholder {},
}

/// A captioned image cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCell {
    pub stack: Vec<StackItem>,
    pub fill_color: String,
    pub border: [bool; 4],
    pub style: &'static str,
}

/// The spanning cell that opens a spacer row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacerRowCell {
    pub text: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_span: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableCell {
    Content(ContentCell),
    SpacerRow(SpacerRowCell),
    /// Blank spacer column, serialised as `""`
    Blank(&'static str),
    /// Position covered by a preceding `colSpan`, serialised as `{}`
    Covered {},
}

/// pdfmake `table` object plus the orientation it was built for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDefinition {
    pub header_rows: u32,
    pub widths: Vec<Size>,
    pub heights: Vec<Size>,
    pub body: Vec<Vec<TableCell>>,
    #[serde(skip)]
    pub orientation: Orientation,
}

impl TableDefinition {
    /// Number of table columns (content plus spacer)
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.widths.len()
    }
}

/// Build the PDF table for `board`.
///
/// `images` must come from the barrier for this board; orientation is taken
/// from `layout` so the table matches the preview.
///
/// # Errors
/// - `InvalidBoardDimensions` for a malformed board or a layout computed
///   for a different grid
/// - `ImagesIncomplete` when any cell has no settled image
pub fn build_pdf_table(
    board: &Board,
    layout: &LayoutDescription,
    images: &ResolvedImages,
    options: &PdfOptions,
) -> Result<TableDefinition> {
    board.validate_dimensions()?;
    if layout.rects.len() != board.cells.len() {
        return Err(BoardError::InvalidBoardDimensions(format!(
            "layout has {} cells, board has {}",
            layout.rects.len(),
            board.cells.len()
        )));
    }
    let resolved = board
        .cells
        .iter()
        .filter(|c| images.get(&c.id).is_some())
        .count();
    if resolved != board.cells.len() {
        return Err(BoardError::ImagesIncomplete {
            expected: board.cells.len(),
            resolved,
        });
    }

    let columns = usize::try_from(board.columns)
        .map_err(|_| BoardError::InvalidBoardDimensions("too many columns".into()))?;
    let table_columns = columns * 2 - 1;
    let rows = board.cells_as_matrix();
    let row_count = rows.len();

    let mut widths = Vec::with_capacity(table_columns);
    let mut heights = Vec::with_capacity(row_count * 2);
    let mut body = Vec::with_capacity(row_count * 2);

    for (row_number, row) in rows.into_iter().enumerate() {
        let mut table_row = Vec::with_capacity(table_columns);
        for (cell_number, cell) in row.iter().enumerate() {
            let image = images.get(&cell.id).unwrap_or(&ResolvedImage::Missing);
            table_row.push(TableCell::Content(content_cell(
                cell,
                image,
                board.label_position(),
                options,
            )));

            let has_spacer = cell_number + 1 < columns;
            // Widths come from the first row only; every row has the same shape.
            if row_number == 0 {
                widths.push(Size::Auto);
                if has_spacer {
                    widths.push(Size::Fixed(options.cell_spacing));
                }
            }
            if has_spacer {
                table_row.push(TableCell::Blank(""));
            }
        }
        body.push(table_row);
        heights.push(Size::Auto);

        if row_number + 1 < row_count {
            body.push(spacer_row(table_columns));
            heights.push(Size::Fixed(options.cell_spacing));
        }
    }

    log::debug!(
        "pdf table: {} body rows x {} columns, {} images missing",
        body.len(),
        widths.len(),
        images.missing_count()
    );

    Ok(TableDefinition {
        header_rows: 0,
        widths,
        heights,
        body,
        orientation: layout.orientation,
    })
}

fn spacer_row(table_columns: usize) -> Vec<TableCell> {
    let mut row = Vec::with_capacity(table_columns);
    row.push(TableCell::SpacerRow(SpacerRowCell {
        text: "",
        col_span: (table_columns > 1).then_some(table_columns),
    }));
    row.extend((1..table_columns).map(|_| TableCell::Covered {}));
    row
}

fn content_cell(
    cell: &Cell,
    image: &ResolvedImage,
    label: LabelPosition,
    options: &PdfOptions,
) -> ContentCell {
    let fill = normalize_colour(&cell.background_colour);
    let caption = StackItem::Text {
        text: cell
            .caption_text()
            .map_or_else(|| options.empty_caption.clone(), ToString::to_string),
        color: Some(caption_colour(&fill)),
    };

    let image_item = if cell.image_url().is_none() {
        StackItem::Placeholder {}
    } else {
        match image {
            ResolvedImage::Embedded(embedded) => StackItem::Image {
                image: embedded.data_url(),
                fit: options.image_fit,
                alignment: "center",
            },
            ResolvedImage::Svg(markup) => StackItem::Svg {
                svg: markup.clone(),
                fit: options.image_fit,
                alignment: "center",
            },
            ResolvedImage::Missing => StackItem::Placeholder {},
        }
    };

    let stack = match label {
        LabelPosition::Top => vec![caption, image_item],
        LabelPosition::Bottom => vec![image_item, caption],
    };

    ContentCell {
        stack,
        fill_color: fill,
        border: [true; 4],
        style: IMAGE_CELL_STYLE,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_size_serialization() {
        let json = serde_json::to_string(&vec![Size::Auto, Size::Fixed(10.0)]).unwrap();
        assert_eq!(json, r#"["*",10.0]"#);
    }

    #[test]
    fn test_placeholder_serializes_as_empty_object() {
        let json = serde_json::to_string(&StackItem::Placeholder {}).unwrap();
        assert_eq!(json, "{}");
        let json = serde_json::to_string(&TableCell::Covered {}).unwrap();
        assert_eq!(json, "{}");
        let json = serde_json::to_string(&TableCell::Blank("")).unwrap();
        assert_eq!(json, r#""""#);
    }

    #[test]
    fn test_spacer_row_single_column_has_no_span() {
        let row = spacer_row(1);
        assert_eq!(row.len(), 1);
        match &row[0] {
            TableCell::SpacerRow(cell) => assert_eq!(cell.col_span, None),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_spacer_row_spans_all_columns() {
        let row = spacer_row(5);
        assert_eq!(row.len(), 5);
        assert!(matches!(
            &row[0],
            TableCell::SpacerRow(SpacerRowCell {
                col_span: Some(5),
                ..
            })
        ));
        assert!(row[1..].iter().all(|c| matches!(c, TableCell::Covered {})));
    }
}
