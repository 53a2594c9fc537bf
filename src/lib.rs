//! symboard - symbol board layout for the web
//!
//! Lays out a grid of captioned symbols on a printable page and renders it
//! two ways from the same geometry:
//! - An SVG preview for board thumbnails
//! - A pdfmake table definition for PDF export, built only after every cell
//!   image has been fetched
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { render_board_svg_js, export_board_pdf } from 'symboard';
//! await init();
//! preview.innerHTML = render_board_svg_js(JSON.stringify(board), 'A4', false);
//! const doc = await export_board_pdf(JSON.stringify(board), 'A4');
//! pdfMake.createPdf(doc).download('board.pdf');
//! ```

pub mod color;
pub mod error;
pub mod export;
pub mod layout;
pub mod render;
pub mod search;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use error::BoardError;
pub use types::*;

/// Look up a named page size (`A3`, `A4`, `A5`, `Letter`, `Legal`).
///
/// # Errors
/// Returns `InvalidBoardDimensions` for unknown names.
pub fn page_by_name(name: &str) -> error::Result<PageSize> {
    PageSize::named(name)
        .ok_or_else(|| BoardError::InvalidBoardDimensions(format!("unknown page size {name:?}")))
}

/// Install the panic hook so Rust panics show up in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Compute the layout of a board and return it as a `JsValue`
///
/// # Arguments
/// * `board_json` - The board, as JSON
/// * `page_name` - A named page size such as `"A4"`
///
/// # Errors
/// Returns an error if the board is malformed or cannot fit on the page.
#[wasm_bindgen]
pub fn compute_board_layout(board_json: &str, page_name: &str) -> Result<JsValue, JsValue> {
    let board = Board::from_json(board_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let page = page_by_name(page_name).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let layout =
        layout::compute_layout_default(&board, &page).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&layout)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Render a board preview as an SVG document string
///
/// # Errors
/// Returns an error if the board is malformed or cannot fit on the page.
#[wasm_bindgen]
pub fn render_board_svg_js(
    board_json: &str,
    page_name: &str,
    selected: bool,
) -> Result<String, JsValue> {
    let board = Board::from_json(board_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let page = page_by_name(page_name).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let options = render::SvgOptions {
        selected,
        ..render::SvgOptions::default()
    };

    render::render_board_svg(&board, &page, &options).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
