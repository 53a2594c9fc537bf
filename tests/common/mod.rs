//! Shared fixtures for the integration tests.
//!
//! Boards, in-memory image resolvers, and a resolver whose fetches stay
//! pending until the test releases them.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::{Cell as CallCount, RefCell};
use std::collections::HashMap;

use futures::channel::oneshot;

use symboard::error::{BoardError, Result};
use symboard::export::ImageResolver;
use symboard::types::{Board, Cell, CellFormat, LabelPosition};

/// Smallest valid PNG signature plus IHDR tag; enough for format sniffing.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];

pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

pub const SVG_BYTES: &[u8] = br#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><circle r="5"/></svg>"#;

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[track_caller]
pub fn assert_approx(actual: f64, expected: f64) {
    assert!(
        approx_eq(actual, expected),
        "expected {expected}, got {actual}"
    );
}

/// `rows x columns` board whose cell `i` has id `c{i}`, caption `word {i}`
/// and image `https://symbols.test/{i}.png`.
pub fn symbol_board(rows: u32, columns: u32) -> Board {
    let cells = (0..rows * columns)
        .map(|i| {
            Cell::new(format!("c{i}"))
                .with_url(format!("https://symbols.test/{i}.png"))
                .with_caption(format!("word {i}"))
        })
        .collect();
    Board::new(rows, columns, cells, CellFormat::default()).unwrap()
}

/// Same as [`symbol_board`] with captions above the images.
pub fn symbol_board_label_top(rows: u32, columns: u32) -> Board {
    let mut board = symbol_board(rows, columns);
    board.default_cell_format.label_position = LabelPosition::Top;
    board
}

/// Serves fixed bytes per URL; unknown URLs fail like a 404.
#[derive(Default)]
pub struct MapResolver {
    images: HashMap<String, Vec<u8>>,
    calls: CallCount<usize>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, bytes: &[u8]) -> Self {
        self.images.insert(url.to_string(), bytes.to_vec());
        self
    }

    /// Serve PNG bytes for every cell URL of `board`
    pub fn all_png(board: &Board) -> Self {
        board
            .cells
            .iter()
            .filter_map(|c| c.url.as_deref())
            .fold(Self::new(), |r, url| r.with(url, PNG_BYTES))
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ImageResolver for MapResolver {
    async fn resolve(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.set(self.calls.get() + 1);
        self.images.get(url).cloned().ok_or_else(|| BoardError::ImageFetch {
            url: url.to_string(),
            reason: "HTTP 404 Not Found".to_string(),
        })
    }
}

/// Every fetch waits on a channel; the test completes them one by one.
#[derive(Default)]
pub struct DeferredResolver {
    pending: RefCell<HashMap<String, oneshot::Receiver<Result<Vec<u8>>>>>,
}

impl DeferredResolver {
    /// Register `urls` and return the senders that complete them.
    pub fn new(urls: &[&str]) -> (Self, HashMap<String, oneshot::Sender<Result<Vec<u8>>>>) {
        let mut receivers = HashMap::new();
        let mut senders = HashMap::new();
        for url in urls {
            let (tx, rx) = oneshot::channel();
            receivers.insert((*url).to_string(), rx);
            senders.insert((*url).to_string(), tx);
        }
        (
            Self {
                pending: RefCell::new(receivers),
            },
            senders,
        )
    }
}

impl ImageResolver for DeferredResolver {
    async fn resolve(&self, url: &str) -> Result<Vec<u8>> {
        let receiver = self.pending.borrow_mut().remove(url);
        match receiver {
            Some(rx) => rx.await.unwrap_or(Err(BoardError::Cancelled)),
            None => Err(BoardError::ImageFetch {
                url: url.to_string(),
                reason: "unexpected fetch".to_string(),
            }),
        }
    }
}
