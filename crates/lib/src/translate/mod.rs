//! Machine translation: the `Translator` seam and the Papago client behind it.

mod papago;

use async_trait::async_trait;

use crate::lang::Language;

pub use papago::{PapagoClient, DEFAULT_API_URL};

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("papago request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("papago api error: {status} {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("papago response is not valid json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("papago response has no message.result.translatedText")]
    MissingTranslation,
}

impl TranslationError {
    /// Raw API error body for `Api`, the display text otherwise.
    pub fn detail(&self) -> String {
        match self {
            TranslationError::Api { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Translates one piece of text between two languages.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError>;
}
