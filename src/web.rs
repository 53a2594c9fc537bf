//! Browser glue: image fetching and the search panel, both built on
//! `window` APIs and therefore wasm32-only.

use js_sys::Uint8Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::error::{BoardError, Result};
use crate::export::{self, ExportConfig, ImageResolver};
use crate::search::SearchPanel;
use crate::types::{Board, Language, PageSize, SymbolSearchResult, SymbolSet, SymbolSource};

fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

fn js_error(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Fetches images with `window.fetch` (CORS mode).
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchImageResolver;

impl ImageResolver for FetchImageResolver {
    async fn resolve(&self, url: &str) -> Result<Vec<u8>> {
        let window =
            web_sys::window().ok_or_else(|| BoardError::image_fetch(url, "no window"))?;

        let init = RequestInit::new();
        init.set_method("GET");
        init.set_mode(RequestMode::Cors);
        let request = Request::new_with_str_and_init(url, &init)
            .map_err(|e| BoardError::image_fetch(url, js_error(&e)))?;

        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| BoardError::image_fetch(url, js_error(&e)))?;
        let response: Response = response
            .dyn_into()
            .map_err(|e| BoardError::image_fetch(url, js_error(&e)))?;
        if !response.ok() {
            return Err(BoardError::image_fetch(
                url,
                format!("HTTP {} {}", response.status(), response.status_text()),
            ));
        }

        let buffer = response
            .array_buffer()
            .map_err(|e| BoardError::image_fetch(url, js_error(&e)))?;
        let buffer = JsFuture::from(buffer)
            .await
            .map_err(|e| BoardError::image_fetch(url, js_error(&e)))?;
        Ok(Uint8Array::new(&buffer).to_vec())
    }
}

/// Lay out a board, fetch its images and return the pdfmake document
/// definition, ready for `pdfMake.createPdf(...)`.
///
/// # Errors
/// Invalid board JSON, unknown page name or a board that cannot be laid out.
#[wasm_bindgen]
pub async fn export_board_pdf(board_json: String, page_name: String) -> Result<JsValue> {
    let board = Board::from_json(&board_json)?;
    let page = crate::page_by_name(&page_name)?;
    export_with(&board, &page, &ExportConfig::default()).await
}

/// [`export_board_pdf`] with an options object
/// (`{ layout, pdf, svg }`, all optional).
///
/// # Errors
/// As [`export_board_pdf`], plus malformed options.
#[wasm_bindgen]
pub async fn export_board_pdf_with_options(
    board_json: String,
    page_name: String,
    options_json: String,
) -> Result<JsValue> {
    let board = Board::from_json(&board_json)?;
    let page = crate::page_by_name(&page_name)?;
    let config = ExportConfig::from_json(&options_json)?;
    export_with(&board, &page, &config).await
}

async fn export_with(board: &Board, page: &PageSize, config: &ExportConfig) -> Result<JsValue> {
    let start = now_ms();
    let document = export::export_board_pdf(board, page, config, &FetchImageResolver).await?;
    log::debug!("pdf export took {:.1}ms", now_ms() - start);
    // pdfmake expects plain objects, not ES maps
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    document
        .serialize(&serializer)
        .map_err(|e| BoardError::Serialization(e.to_string()))
}

/// Search panel driven from the page: keystrokes in, requests out.
#[wasm_bindgen]
pub struct BoardSearchPanel {
    inner: SearchPanel,
}

#[wasm_bindgen]
impl BoardSearchPanel {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(initial_query: Option<String>) -> Self {
        Self {
            inner: SearchPanel::new(initial_query.as_deref().unwrap_or("")),
        }
    }

    /// # Errors
    /// Unknown source key.
    pub fn set_source(&mut self, key: &str) -> Result<()> {
        let source = SymbolSource::from_key(key)
            .ok_or_else(|| BoardError::Search(format!("unknown symbol source {key}")))?;
        self.inner.set_source(source);
        Ok(())
    }

    pub fn set_language(&mut self, iso639_3: &str) {
        self.inner.set_language(iso639_3);
    }

    pub fn set_symbol_set(&mut self, slug: &str) {
        self.inner.set_symbol_set(slug);
    }

    /// # Errors
    /// `languages` is not an array of `{ name, iso639_3 }`.
    pub fn set_languages(&mut self, languages: JsValue) -> Result<()> {
        let languages: Vec<Language> = serde_wasm_bindgen::from_value(languages)
            .map_err(|e| BoardError::Serialization(e.to_string()))?;
        self.inner.set_languages(languages);
        Ok(())
    }

    /// # Errors
    /// `symbol_sets` is not an array of `{ name, slug }`.
    pub fn set_symbol_sets(&mut self, symbol_sets: JsValue) -> Result<()> {
        let symbol_sets: Vec<SymbolSet> = serde_wasm_bindgen::from_value(symbol_sets)
            .map_err(|e| BoardError::Serialization(e.to_string()))?;
        self.inner.set_symbol_sets(symbol_sets);
        Ok(())
    }

    pub fn key_up(&mut self, text: &str) {
        self.inner.key_up(text, now_ms());
    }

    /// Milliseconds until [`poll`](Self::poll) should be called, if a query
    /// is pending
    #[must_use]
    pub fn poll_in(&self) -> Option<f64> {
        self.inner
            .poll_deadline()
            .map(|deadline| (deadline - now_ms()).max(0.0))
    }

    /// Pending request as `{ generation, source, params }`, or `undefined`.
    ///
    /// # Errors
    /// Serialization failure.
    pub fn poll(&mut self) -> Result<JsValue> {
        match self.inner.poll(now_ms()) {
            Some(request) => serde_wasm_bindgen::to_value(&request)
                .map_err(|e| BoardError::Serialization(e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Explicit search button: search the given query now.
    ///
    /// # Errors
    /// Serialization failure.
    pub fn search(&mut self, query: &str) -> Result<JsValue> {
        self.inner.set_query(query);
        match self.inner.begin_search() {
            Some(request) => serde_wasm_bindgen::to_value(&request)
                .map_err(|e| BoardError::Serialization(e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Feed back results (array of `{ imageUrl, label?, source? }`) or, when
    /// `error` is set, a failure. Returns `false` for stale generations.
    pub fn complete(&mut self, generation: u32, results: JsValue, error: Option<String>) -> bool {
        let outcome = match error {
            Some(reason) => Err(BoardError::Search(reason)),
            None => serde_wasm_bindgen::from_value::<Vec<SymbolSearchResult>>(results)
                .map_err(|e| BoardError::Serialization(e.to_string())),
        };
        self.inner.complete(generation, outcome)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }

    /// # Errors
    /// Serialization failure.
    pub fn results(&self) -> Result<JsValue> {
        serde_wasm_bindgen::to_value(self.inner.results())
            .map_err(|e| BoardError::Serialization(e.to_string()))
    }

    /// Image URL of the chosen result
    #[must_use]
    pub fn select(&self, index: usize) -> Option<String> {
        self.inner.select(index).map(ToString::to_string)
    }
}
