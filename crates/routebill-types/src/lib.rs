//! Core types for routebill

mod error;

pub use error::*;

use serde::{Deserialize, Serialize};

/// Display/document language
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Gu,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Gu];

    /// Short code used in file names
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Gu => "gu",
        }
    }

    /// Pick the string for this language
    pub fn pick<'a>(&self, en: &'a str, gu: &'a str) -> &'a str {
        match self {
            Language::En => en,
            Language::Gu => gu,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::En => write!(f, "English"),
            Language::Gu => write!(f, "ગુજરાતી"),
        }
    }
}

/// Format a monetary amount for display (two decimals, no rounding before this point)
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// Format a GST percentage the way tables show it (`5%`, `2.5%`)
pub fn format_percent(value: f64) -> String {
    format!("{}%", value)
}
