//! SVG preview tests for symboard
//!
//! The preview must share its geometry with the layout engine and never emit
//! broken image references.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{symbol_board, symbol_board_label_top};
use symboard::layout::compute_layout_default;
use symboard::render::{
    build_svg_thumbnails, render_board_svg, render_layout_svg, svg_thumbnails, SvgOptions,
    PAGE_OUTLINE_COLOUR,
};
use symboard::types::{Board, Cell, CellFormat, PageSize};

#[test]
fn test_thumbnails_match_layout() {
    let board = symbol_board(3, 2);
    let page = PageSize::a4();
    let rects = build_svg_thumbnails(&board, &page).unwrap();
    let layout = compute_layout_default(&board, &page).unwrap();
    assert_eq!(rects, layout.rects);
}

#[test]
fn test_document_structure_two_by_two() {
    let svg = render_board_svg(&symbol_board(2, 2), &PageSize::a4(), &SvgOptions::default()).unwrap();

    assert!(svg.contains(r#"viewBox="0 0 297 210""#));
    assert!(svg.contains(r#"transform="translate(21 21)""#));
    assert!(svg.contains(&format!(r#"stroke="{PAGE_OUTLINE_COLOUR}" stroke-width="4.2""#)));
    assert_eq!(svg.matches(r#"<g class="cell""#).count(), 4);
    assert_eq!(svg.matches("<image ").count(), 4);
    assert!(svg.contains(r#"<rect x="140.25" y="0" width="114.75" height="71.25""#));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn test_cells_without_url_have_no_image_element() {
    let cells = vec![
        Cell::new("a").with_url("https://symbols.test/a.png"),
        Cell::new("b").with_url("   "),
        Cell::new("c"),
    ];
    let board = Board::new(1, 3, cells, CellFormat::default()).unwrap();
    let svg = render_board_svg(&board, &PageSize::a4(), &SvgOptions::default()).unwrap();

    assert_eq!(svg.matches("<image ").count(), 1);
    assert!(!svg.contains(r#"href="""#));
}

#[test]
fn test_caption_text_is_escaped() {
    let cells = vec![Cell::new("a").with_caption("fish & <chips>")];
    let board = Board::new(1, 1, cells, CellFormat::default()).unwrap();
    let svg = render_board_svg(&board, &PageSize::a4(), &SvgOptions::default()).unwrap();
    assert!(svg.contains("fish &amp; &lt;chips&gt;"));
}

#[test]
fn test_background_is_normalised() {
    let cells = vec![Cell::new("a").with_background("#FFF0F")];
    let board = Board::new(1, 1, cells, CellFormat::default()).unwrap();
    let layout = compute_layout_default(&board, &PageSize::a4()).unwrap();
    let thumbs = svg_thumbnails(&board, &layout);
    assert_eq!(thumbs[0].background, "#ffffff");

    let cells = vec![Cell::new("a").with_background("FF336699")];
    let board = Board::new(1, 1, cells, CellFormat::default()).unwrap();
    let thumbs = svg_thumbnails(&board, &layout);
    assert_eq!(thumbs[0].background, "#336699");
}

#[test]
fn test_label_position_moves_caption() {
    let page = PageSize::a4();
    let bottom = symbol_board(1, 1);
    let top = symbol_board_label_top(1, 1);
    let layout = compute_layout_default(&bottom, &page).unwrap();

    let caption_y = |svg: &str| -> f64 {
        let start = svg.find("<text ").unwrap();
        let attr = &svg[start..];
        let y_start = attr.find(r#" y=""#).unwrap() + 4;
        let y_end = attr[y_start..].find('"').unwrap() + y_start;
        attr[y_start..y_end].parse().unwrap()
    };

    let bottom_y = caption_y(&render_layout_svg(&bottom, &layout, &SvgOptions::default()));
    let top_y = caption_y(&render_layout_svg(&top, &layout, &SvgOptions::default()));
    assert!(top_y < layout.cell_height / 2.0);
    assert!(bottom_y > layout.cell_height / 2.0);
}

#[test]
fn test_render_is_idempotent() {
    let board = symbol_board(2, 3);
    let page = PageSize::named("A5").unwrap();
    let a = render_board_svg(&board, &page, &SvgOptions::default()).unwrap();
    let b = render_board_svg(&board, &page, &SvgOptions::default()).unwrap();
    assert_eq!(a, b);
}
