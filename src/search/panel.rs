use serde::Serialize;

use super::debounce::SearchDebouncer;
use crate::error::Result;
use crate::types::{Language, SearchParams, SymbolSearchResult, SymbolSet, SymbolSource};

/// Language requested from Global Symbols until the language list arrives
pub const DEFAULT_LANGUAGE: &str = "eng";

/// ISO format of the language code
pub const LANGUAGE_ISO_FORMAT: &str = "639-3";

/// Symbol-set value meaning "no filter"; never sent to the backend
pub const ALL_SYMBOL_SETS: &str = "all";

/// Results requested per search
pub const SEARCH_LIMIT: u32 = 36;

/// A search to run against a backend, tagged with the generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub generation: u32,
    pub source: SymbolSource,
    pub params: SearchParams,
}

/// Backend reachable by the panel.
#[allow(async_fn_in_trait)]
pub trait SymbolSearchService {
    /// # Errors
    /// Backend failures; the panel reports them as [`SearchState::Failed`].
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SymbolSearchResult>>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchState {
    /// No search has been performed yet
    #[default]
    NotSearched,
    Loading {
        generation: u32,
    },
    Results(Vec<SymbolSearchResult>),
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct SearchPanel {
    query: String,
    source: SymbolSource,
    language: String,
    symbol_set: String,
    languages: Vec<Language>,
    symbol_sets: Vec<SymbolSet>,
    generation: u32,
    state: SearchState,
    debouncer: SearchDebouncer,
}

impl Default for SearchPanel {
    fn default() -> Self {
        Self::new("")
    }
}

impl SearchPanel {
    #[must_use]
    pub fn new(initial_query: &str) -> Self {
        Self {
            query: initial_query.to_string(),
            source: SymbolSource::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            symbol_set: ALL_SYMBOL_SETS.to_string(),
            languages: Vec::new(),
            symbol_sets: Vec::new(),
            generation: 0,
            state: SearchState::NotSearched,
            debouncer: SearchDebouncer::default(),
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    #[must_use]
    pub fn source(&self) -> SymbolSource {
        self.source
    }

    pub fn set_source(&mut self, source: SymbolSource) {
        self.source = source;
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, iso639_3: &str) {
        self.language = iso639_3.to_string();
    }

    #[must_use]
    pub fn symbol_set(&self) -> &str {
        &self.symbol_set
    }

    pub fn set_symbol_set(&mut self, slug: &str) {
        self.symbol_set = slug.to_string();
    }

    #[must_use]
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Replace the language options and select the first one.
    pub fn set_languages(&mut self, languages: Vec<Language>) {
        if let Some(first) = languages.first() {
            self.language.clone_from(&first.iso639_3);
        }
        self.languages = languages;
    }

    #[must_use]
    pub fn symbol_sets(&self) -> &[SymbolSet] {
        &self.symbol_sets
    }

    pub fn set_symbol_sets(&mut self, symbol_sets: Vec<SymbolSet>) {
        self.symbol_sets = symbol_sets;
    }

    #[must_use]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, SearchState::Loading { .. })
    }

    /// Current hits; empty unless the last search succeeded
    #[must_use]
    pub fn results(&self) -> &[SymbolSearchResult] {
        match &self.state {
            SearchState::Results(results) => results,
            _ => &[],
        }
    }

    /// Parameters for the selected source and current query.
    #[must_use]
    pub fn params(&self) -> SearchParams {
        if self.source.has_params() {
            SearchParams {
                query: self.query.clone(),
                language: Some(self.language.clone()),
                language_iso_format: Some(LANGUAGE_ISO_FORMAT.to_string()),
                symbolset: (self.symbol_set != ALL_SYMBOL_SETS).then(|| self.symbol_set.clone()),
                limit: SEARCH_LIMIT,
            }
        } else {
            SearchParams {
                query: self.query.clone(),
                language: None,
                language_iso_format: None,
                symbolset: None,
                limit: SEARCH_LIMIT,
            }
        }
    }

    /// Start a search for the current query.
    ///
    /// Returns `None` for an empty query. Any request still in flight becomes
    /// stale and its response will be discarded.
    pub fn begin_search(&mut self) -> Option<SearchRequest> {
        if self.query.is_empty() {
            return None;
        }
        self.generation = self.generation.wrapping_add(1);
        self.state = SearchState::Loading {
            generation: self.generation,
        };
        Some(SearchRequest {
            generation: self.generation,
            source: self.source,
            params: self.params(),
        })
    }

    /// Apply a backend response. Returns `false` when the response belongs
    /// to a superseded request and was dropped.
    pub fn complete(&mut self, generation: u32, result: Result<Vec<SymbolSearchResult>>) -> bool {
        if generation != self.generation {
            log::debug!(
                "dropping stale search response {generation} (current {})",
                self.generation
            );
            return false;
        }
        self.state = match result {
            Ok(results) => SearchState::Results(results),
            Err(e) => {
                log::warn!("symbol search for {:?} failed: {e}", self.query);
                SearchState::Failed {
                    reason: e.to_string(),
                }
            }
        };
        true
    }

    /// Image URL of the result at `index`
    #[must_use]
    pub fn select(&self, index: usize) -> Option<&str> {
        self.results().get(index).map(|r| r.image_url.as_str())
    }

    /// Feed a keystroke from the query box.
    pub fn key_up(&mut self, text: &str, now_ms: f64) {
        self.debouncer.input(text, now_ms);
    }

    /// Start a search if typing has settled on a new query.
    pub fn poll(&mut self, now_ms: f64) -> Option<SearchRequest> {
        let text = self.debouncer.poll(now_ms)?;
        self.query = text;
        self.begin_search()
    }

    /// When the host should call [`poll`](Self::poll) next
    #[must_use]
    pub fn poll_deadline(&self) -> Option<f64> {
        self.debouncer.deadline()
    }
}

/// Run one search for the panel's current query against `service`.
///
/// Returns `false` when there was nothing to search or the response was
/// superseded while awaiting.
pub async fn run_search<S: SymbolSearchService>(panel: &mut SearchPanel, service: &S) -> bool {
    let Some(request) = panel.begin_search() else {
        return false;
    };
    let result = service.search(&request).await;
    panel.complete(request.generation, result)
}
