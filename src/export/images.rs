//! Image resolution barrier for PDF export.
//!
//! Every cell's image is fetched independently; the PDF table may only be
//! built once all of them have settled. [`ImageBarrier`] owns the accumulated
//! results and hands the complete set out by value exactly once, so there is
//! no shared map mutated from several callbacks.
//!
//! Failures never block the barrier: a failed fetch settles as
//! [`ResolvedImage::Missing`] with a logged warning.

use std::collections::{HashMap, HashSet};
use std::future::Future;

use futures::future::{AbortHandle, Abortable};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;

use super::embed::{decode_data_url, decode_image, ResolvedImage};
use crate::error::{BoardError, Result};
use crate::types::{Board, CellId};

/// Fetches the raw bytes behind an image URL.
///
/// Implementations are single-threaded (browser `fetch`, local files); the
/// futures they return need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait ImageResolver {
    /// # Errors
    /// Any error is mapped to a missing-image placeholder by the barrier.
    async fn resolve(&self, url: &str) -> Result<Vec<u8>>;
}

/// Every cell's settled image, keyed by cell id.
///
/// Only produced by [`ImageBarrier`], which guarantees completeness for the
/// board it was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImages {
    images: HashMap<CellId, ResolvedImage>,
}

impl ResolvedImages {
    #[must_use]
    pub fn get(&self, cell_id: &str) -> Option<&ResolvedImage> {
        self.images.get(cell_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Number of cells that ended up without an image
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.images.values().filter(|i| i.is_missing()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellId, &ResolvedImage)> {
        self.images.iter()
    }
}

/// Count-down barrier over a board's cells.
#[derive(Debug)]
pub struct ImageBarrier {
    expected: HashSet<CellId>,
    settled: HashMap<CellId, ResolvedImage>,
    released: bool,
}

impl ImageBarrier {
    #[must_use]
    pub fn new(board: &Board) -> Self {
        let expected: HashSet<CellId> = board.cells.iter().map(|c| c.id.clone()).collect();
        Self {
            settled: HashMap::with_capacity(expected.len()),
            expected,
            released: false,
        }
    }

    /// Cells still waiting for a result
    #[must_use]
    pub fn pending(&self) -> usize {
        if self.released {
            return 0;
        }
        self.expected.len().saturating_sub(self.settled.len())
    }

    /// Whether the complete set has already been handed out
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Record one cell's result.
    ///
    /// Returns the complete set on the settlement that resolves the last
    /// pending cell, and `None` on every other call, including any call after
    /// release. Unknown ids and repeat settlements are ignored.
    pub fn settle(&mut self, cell_id: &str, image: ResolvedImage) -> Option<ResolvedImages> {
        if self.released {
            log::debug!("image for {cell_id} settled after release, ignored");
            return None;
        }
        if !self.expected.contains(cell_id) {
            log::debug!("image for unknown cell {cell_id} ignored");
            return None;
        }
        if self.settled.contains_key(cell_id) {
            log::debug!("image for {cell_id} settled twice, keeping the first");
            return None;
        }

        self.settled.insert(cell_id.to_string(), image);
        log::debug!("image barrier: {} pending", self.pending());
        self.release_if_complete()
    }

    fn release_if_complete(&mut self) -> Option<ResolvedImages> {
        if self.released || self.pending() > 0 {
            return None;
        }
        self.released = true;
        Some(ResolvedImages {
            images: std::mem::take(&mut self.settled),
        })
    }

    /// Release whatever has settled, filling unsettled cells with
    /// placeholders. Used when the stream of results ends early.
    fn release_remaining(mut self) -> ResolvedImages {
        for id in &self.expected {
            self.settled
                .entry(id.clone())
                .or_insert(ResolvedImage::Missing);
        }
        ResolvedImages {
            images: self.settled,
        }
    }
}

async fn resolve_one<R: ImageResolver>(resolver: &R, url: &str) -> ResolvedImage {
    let result = if url.starts_with("data:") {
        decode_data_url(url)
    } else {
        match resolver.resolve(url).await {
            Ok(bytes) => decode_image(url, &bytes),
            Err(e) => Err(e),
        }
    };

    match result {
        Ok(image) => image,
        Err(e) => {
            log::warn!("{e}; using empty image placeholder");
            ResolvedImage::Missing
        }
    }
}

/// Resolve every cell's image, concurrently, and return once all settled.
///
/// Cells without a URL settle immediately as missing; `data:` URLs are
/// decoded in place without calling the resolver.
pub async fn resolve_board_images<R: ImageResolver>(board: &Board, resolver: &R) -> ResolvedImages {
    let mut barrier = ImageBarrier::new(board);
    let mut in_flight = FuturesUnordered::new();

    for cell in &board.cells {
        match cell.image_url() {
            None => {
                if let Some(done) = barrier.settle(&cell.id, ResolvedImage::Missing) {
                    return done;
                }
            }
            Some(url) => {
                let id = cell.id.as_str();
                in_flight.push(async move { (id, resolve_one(resolver, url).await) });
            }
        }
    }

    while let Some((id, image)) = in_flight.next().await {
        if let Some(done) = barrier.settle(id, image) {
            return done;
        }
    }

    barrier.release_remaining()
}

/// [`resolve_board_images`] that can be abandoned through the returned handle.
///
/// Aborting drops every in-flight fetch and resolves the future to
/// `BoardError::Cancelled`.
pub fn cancellable_resolve<'a, R: ImageResolver>(
    board: &'a Board,
    resolver: &'a R,
) -> (impl Future<Output = Result<ResolvedImages>> + 'a, AbortHandle) {
    let (handle, registration) = AbortHandle::new_pair();
    let future = Abortable::new(resolve_board_images(board, resolver), registration)
        .map(|outcome| outcome.map_err(|_aborted| BoardError::Cancelled));
    (future, handle)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{Cell, CellFormat};

    fn board_of(cells: Vec<Cell>) -> Board {
        let n = u32::try_from(cells.len()).unwrap();
        Board::new(1, n, cells, CellFormat::default()).unwrap()
    }

    #[test]
    fn test_barrier_releases_once() {
        let board = board_of(vec![Cell::new("a"), Cell::new("b")]);
        let mut barrier = ImageBarrier::new(&board);
        assert_eq!(barrier.pending(), 2);

        assert!(barrier.settle("a", ResolvedImage::Missing).is_none());
        let done = barrier.settle("b", ResolvedImage::Missing).unwrap();
        assert_eq!(done.len(), 2);
        assert!(barrier.is_released());
        assert_eq!(barrier.pending(), 0);

        // Nothing further is ever released
        assert!(barrier.settle("b", ResolvedImage::Missing).is_none());
    }

    #[test]
    fn test_barrier_ignores_unknown_and_repeats() {
        let board = board_of(vec![Cell::new("a"), Cell::new("b")]);
        let mut barrier = ImageBarrier::new(&board);

        assert!(barrier.settle("zzz", ResolvedImage::Missing).is_none());
        assert!(barrier
            .settle("a", ResolvedImage::Svg("<svg/>".into()))
            .is_none());
        assert!(barrier.settle("a", ResolvedImage::Missing).is_none());
        assert_eq!(barrier.pending(), 1);

        let done = barrier.settle("b", ResolvedImage::Missing).unwrap();
        assert_eq!(done.get("a"), Some(&ResolvedImage::Svg("<svg/>".into())));
    }

    #[test]
    fn test_release_remaining_fills_placeholders() {
        let board = board_of(vec![Cell::new("a"), Cell::new("b")]);
        let mut barrier = ImageBarrier::new(&board);
        barrier.settle("a", ResolvedImage::Svg("<svg/>".into()));
        let images = barrier.release_remaining();
        assert_eq!(images.len(), 2);
        assert_eq!(images.missing_count(), 1);
    }
}
