use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Th,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Th => "th",
        }
    }

    pub fn ordered() -> &'static [Locale] {
        &[Locale::En, Locale::Th]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text with a locale-neutral default and optional per-locale variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub default: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub th: Option<String>,
}

impl LocalizedText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            default: text.into(),
            en: None,
            th: None,
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        let variant = match locale {
            Locale::En => self.en.as_deref(),
            Locale::Th => self.th.as_deref(),
        };
        match variant {
            Some(text) if !text.is_empty() => text,
            _ => &self.default,
        }
    }
}

/// A locale-independent key plus its display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedText {
    pub key: String,
    #[serde(flatten)]
    pub text: LocalizedText,
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/locale.rs"]
mod tests;
