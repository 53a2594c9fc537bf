//! Grid layout tests for symboard
//!
//! Orientation, padding, spacing and per-cell rectangles for boards of
//! various shapes on the named page sizes.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{assert_approx, symbol_board};
use symboard::error::BoardError;
use symboard::layout::{compute_layout, compute_layout_default, LayoutOptions};
use symboard::types::{Board, Orientation, PageSize};
use test_case::test_case;

#[test]
fn test_two_by_two_on_a4() {
    let board = symbol_board(2, 2);
    let layout = compute_layout_default(&board, &PageSize::a4()).unwrap();

    assert_eq!(layout.orientation, Orientation::Landscape);
    assert_approx(layout.height, 210.0);
    assert_approx(layout.width, 297.0);
    assert_approx(layout.page_padding, 21.0);
    assert_approx(layout.inner_height, 168.0);
    assert_approx(layout.inner_width, 255.0);
    assert_approx(layout.cell_spacing, 25.5);
    assert_approx(layout.cell_width, 114.75);
    assert_approx(layout.cell_height, 71.25);

    assert_eq!(layout.rects.len(), 4);
    assert_approx(layout.rects[0].x, 0.0);
    assert_approx(layout.rects[0].y, 0.0);
    assert_approx(layout.rects[1].x, 140.25);
    assert_approx(layout.rects[2].y, 96.75);
    assert_approx(layout.rects[3].right(), 255.0);
    assert_approx(layout.rects[3].bottom(), 168.0);
}

#[test_case(3, 2, Orientation::Portrait ; "taller than wide")]
#[test_case(2, 3, Orientation::Landscape ; "wider than tall")]
#[test_case(4, 4, Orientation::Landscape ; "square grid")]
#[test_case(1, 1, Orientation::Landscape ; "single cell")]
#[test_case(5, 1, Orientation::Portrait ; "single column")]
fn test_orientation(rows: u32, columns: u32, expected: Orientation) {
    let layout = compute_layout_default(&symbol_board(rows, columns), &PageSize::a4()).unwrap();
    assert_eq!(layout.orientation, expected);
    match expected {
        Orientation::Portrait => assert!(layout.height > layout.width),
        Orientation::Landscape => assert!(layout.width > layout.height),
    }
}

#[test_case(1, 1)]
#[test_case(2, 3)]
#[test_case(3, 4)]
#[test_case(6, 6)]
#[test_case(1, 8)]
fn test_rects_fill_inner_area(rows: u32, columns: u32) {
    let board = symbol_board(rows, columns);
    for name in ["A3", "A4", "A5", "Letter", "Legal"] {
        let page = PageSize::named(name).unwrap();
        let layout = compute_layout_default(&board, &page).unwrap();

        assert_eq!(layout.rects.len(), board.cells.len());
        let last = layout.rects.last().unwrap();
        assert_approx(last.right(), layout.inner_width);
        assert_approx(last.bottom(), layout.inner_height);
        for rect in &layout.rects {
            assert!(rect.width > 0.0 && rect.height > 0.0);
            assert!(rect.x >= 0.0 && rect.y >= 0.0);
        }
    }
}

#[test]
fn test_rects_are_row_major() {
    let layout = compute_layout_default(&symbol_board(2, 3), &PageSize::a4()).unwrap();
    let first_row = &layout.rects[..3];
    assert!(first_row.windows(2).all(|w| w[1].x > w[0].x));
    assert!(first_row.iter().all(|r| r.y == 0.0));
    assert!(layout.rects[3].y > 0.0);
    assert_eq!(layout.rects[3].x, 0.0);
}

#[test]
fn test_layout_is_deterministic() {
    let board = symbol_board(3, 4);
    let page = PageSize::named("Letter").unwrap();
    let a = compute_layout_default(&board, &page).unwrap();
    let b = compute_layout_default(&board, &page).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_zero_dimensions_rejected() {
    let board = Board {
        rows: 0,
        columns: 2,
        cells: Vec::new(),
        default_cell_format: Default::default(),
    };
    let err = compute_layout_default(&board, &PageSize::a4()).unwrap_err();
    assert!(matches!(err, BoardError::InvalidBoardDimensions(_)));
}

#[test]
fn test_cell_count_mismatch_rejected() {
    let mut board = symbol_board(2, 2);
    board.cells.pop();
    let err = compute_layout_default(&board, &PageSize::a4()).unwrap_err();
    assert!(matches!(err, BoardError::InvalidBoardDimensions(_)));
}

#[test]
fn test_spacing_overflow_is_an_error() {
    let options = LayoutOptions {
        cell_spacing_fraction: 2.0,
        ..LayoutOptions::default()
    };
    let err = compute_layout(&symbol_board(1, 4), &PageSize::a4(), &options).unwrap_err();
    assert!(matches!(err, BoardError::LayoutOverflow { .. }));
}

#[test]
fn test_invalid_page_rejected() {
    let page = PageSize::new("broken", 0.0, 297.0);
    assert!(compute_layout_default(&symbol_board(1, 1), &page).is_err());
}

#[test]
fn test_layout_serializes_camel_case() {
    let layout = compute_layout_default(&symbol_board(1, 2), &PageSize::a4()).unwrap();
    let json = serde_json::to_value(&layout).unwrap();
    assert_eq!(json["orientation"], "landscape");
    assert!(json.get("pagePadding").is_some());
    assert!(json.get("cellWidth").is_some());
    assert_eq!(json["rects"].as_array().unwrap().len(), 2);
}
