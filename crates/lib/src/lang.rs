//! Language tags understood by the translation API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported languages. English is accepted by the API but never chosen by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Two-letter tag sent as `source` / `target`.
    pub fn tag(self) -> &'static str {
        match self {
            Language::Korean => "ko",
            Language::Japanese => "ja",
            Language::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language tag: {0:?} (expected ko, ja or en)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" => Ok(Language::Korean),
            "ja" => Ok(Language::Japanese),
            "en" => Ok(Language::English),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags() {
        assert_eq!("ko".parse::<Language>(), Ok(Language::Korean));
        assert_eq!(" JA ".parse::<Language>(), Ok(Language::Japanese));
        assert_eq!("en".parse::<Language>(), Ok(Language::English));
    }

    #[test]
    fn rejects_other_tags() {
        let err = "jp".parse::<Language>().unwrap_err();
        assert_eq!(err, UnknownLanguage("jp".to_string()));
    }

    #[test]
    fn serde_uses_api_tags() {
        assert_eq!(serde_json::to_string(&Language::Japanese).unwrap(), "\"ja\"");
        let l: Language = serde_json::from_str("\"ko\"").unwrap();
        assert_eq!(l, Language::Korean);
    }
}
