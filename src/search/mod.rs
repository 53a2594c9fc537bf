//! Symbol search panel state.
//!
//! The panel itself holds no I/O: it produces [`SearchRequest`]s, and the
//! host runs them against a [`SymbolSearchService`] and feeds the outcome
//! back with [`SearchPanel::complete`]. Keystrokes go through a
//! [`SearchDebouncer`] so only settled queries reach the backend.

mod debounce;
mod panel;

pub use debounce::{SearchDebouncer, SEARCH_DEBOUNCE_MS};
pub use panel::{
    run_search, SearchPanel, SearchRequest, SearchState, SymbolSearchService, ALL_SYMBOL_SETS,
    DEFAULT_LANGUAGE, LANGUAGE_ISO_FORMAT, SEARCH_LIMIT,
};
