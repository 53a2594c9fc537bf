use serde::{Deserialize, Serialize};

/// External symbol libraries the search panel can query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolSource {
    #[default]
    #[serde(rename = "gs")]
    GlobalSymbols,
    #[serde(rename = "open-symbols")]
    OpenSymbols,
    #[serde(rename = "the-noun-project")]
    TheNounProject,
}

impl SymbolSource {
    pub const ALL: [Self; 3] = [Self::GlobalSymbols, Self::OpenSymbols, Self::TheNounProject];

    /// Key used by the backend services
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::GlobalSymbols => "gs",
            Self::OpenSymbols => "open-symbols",
            Self::TheNounProject => "the-noun-project",
        }
    }

    /// Human-readable name for the source picker
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::GlobalSymbols => "Global Symbols",
            Self::OpenSymbols => "Open Symbols",
            Self::TheNounProject => "The Noun Project",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    /// Only Global Symbols takes language / symbol-set parameters.
    #[must_use]
    pub fn has_params(self) -> bool {
        matches!(self, Self::GlobalSymbols)
    }
}

/// Query parameters sent to a search backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_iso_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbolset: Option<String>,
    pub limit: u32,
}

/// One hit returned by a search backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolSearchResult {
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Language option offered by Global Symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub iso639_3: String,
}

/// Symbol set option offered by Global Symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSet {
    pub name: String,
    pub slug: String,
}
