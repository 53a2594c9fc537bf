//! Benchmarks for board layout and rendering.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures::executor::block_on;
use symboard::export::{build_pdf_table, resolve_board_images, ImageResolver, PdfOptions};
use symboard::layout::compute_layout_default;
use symboard::render::{render_board_svg, SvgOptions};
use symboard::types::{Board, Cell, CellFormat, PageSize};

const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

struct StaticPng;

impl ImageResolver for StaticPng {
    async fn resolve(&self, _url: &str) -> symboard::error::Result<Vec<u8>> {
        Ok(PNG_BYTES.to_vec())
    }
}

fn board(rows: u32, columns: u32) -> Board {
    let cells = (0..rows * columns)
        .map(|i| {
            Cell::new(format!("c{i}"))
                .with_url(format!("https://symbols.test/{i}.png"))
                .with_caption(format!("word {i}"))
        })
        .collect();
    Board::new(rows, columns, cells, CellFormat::default()).expect("valid board")
}

/// Layout across grid sizes
fn bench_layout(c: &mut Criterion) {
    let page = PageSize::a4();
    let mut group = c.benchmark_group("compute_layout");
    for size in [2u32, 6, 12] {
        let b = board(size, size);
        group.throughput(Throughput::Elements(u64::from(size * size)));
        group.bench_with_input(BenchmarkId::from_parameter(size), &b, |bench, b| {
            bench.iter(|| compute_layout_default(black_box(b), &page).expect("layout"));
        });
    }
    group.finish();
}

/// Full SVG preview
fn bench_svg(c: &mut Criterion) {
    let page = PageSize::a4();
    let b = board(6, 6);
    let options = SvgOptions::default();
    c.bench_function("render_board_svg_6x6", |bench| {
        bench.iter(|| render_board_svg(black_box(&b), &page, &options).expect("svg"));
    });
}

/// PDF table from already resolved images
fn bench_pdf_table(c: &mut Criterion) {
    let page = PageSize::a4();
    let b = board(6, 6);
    let layout = compute_layout_default(&b, &page).expect("layout");
    let images = block_on(resolve_board_images(&b, &StaticPng));
    let options = PdfOptions::default();
    c.bench_function("build_pdf_table_6x6", |bench| {
        bench.iter(|| build_pdf_table(black_box(&b), &layout, &images, &options).expect("table"));
    });
}

criterion_group!(benches, bench_layout, bench_svg, bench_pdf_table);
criterion_main!(benches);
