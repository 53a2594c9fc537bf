use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};

/// A named paper size. Edges are in millimetres.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PageSize {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

/// Page orientation
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Built-in paper sizes: (name, short edge, long edge) in mm.
pub const NAMED_PAGE_SIZES: [(&str, f64, f64); 5] = [
    ("A3", 297.0, 420.0),
    ("A4", 210.0, 297.0),
    ("A5", 148.0, 210.0),
    ("Letter", 215.9, 279.4),
    ("Legal", 215.9, 355.6),
];

impl PageSize {
    #[must_use]
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }

    /// Look up a built-in size by name (case-insensitive).
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        NAMED_PAGE_SIZES
            .iter()
            .find(|(n, _, _)| n.eq_ignore_ascii_case(name))
            .map(|&(n, short, long)| Self::new(n, short, long))
    }

    #[must_use]
    pub fn a4() -> Self {
        Self::new("A4", 210.0, 297.0)
    }

    #[must_use]
    pub fn short_edge(&self) -> f64 {
        self.x.min(self.y)
    }

    #[must_use]
    pub fn long_edge(&self) -> f64 {
        self.x.max(self.y)
    }

    /// Both edges finite and positive, and the page is not square.
    ///
    /// # Errors
    /// Returns `InvalidBoardDimensions` describing the offending edge.
    pub fn validate(&self) -> Result<()> {
        if !self.x.is_finite() || !self.y.is_finite() || self.x <= 0.0 || self.y <= 0.0 {
            return Err(BoardError::InvalidBoardDimensions(format!(
                "page {} must have positive edges, got {}x{}",
                self.name, self.x, self.y
            )));
        }
        if self.short_edge() >= self.long_edge() {
            return Err(BoardError::InvalidBoardDimensions(format!(
                "page {} short edge must be shorter than long edge ({}x{})",
                self.name, self.x, self.y
            )));
        }
        Ok(())
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::a4()
    }
}

impl Orientation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}
