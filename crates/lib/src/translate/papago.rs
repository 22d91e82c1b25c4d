//! Naver Papago NMT client (POST /v1/papago/n2mt, form-encoded).

use async_trait::async_trait;
use serde::Deserialize;

use super::{TranslationError, Translator};
use crate::config::PapagoSettings;
use crate::lang::Language;

pub const DEFAULT_API_URL: &str = "https://openapi.naver.com/v1/papago/n2mt";

/// Client for the Papago n2mt endpoint. Cheap to clone; shares one connection pool.
#[derive(Clone)]
pub struct PapagoClient {
    api_url: String,
    client_id: String,
    client_secret: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct N2mtResponse {
    #[serde(default)]
    message: Option<N2mtMessage>,
}

#[derive(Debug, Deserialize)]
struct N2mtMessage {
    #[serde(default)]
    result: Option<N2mtResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct N2mtResult {
    #[serde(default)]
    translated_text: Option<String>,
}

impl N2mtResponse {
    fn into_translated_text(self) -> Option<String> {
        self.message?.result?.translated_text
    }
}

impl PapagoClient {
    /// `api_url` overrides the public endpoint (tests, proxies).
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        api_url: Option<String>,
    ) -> Self {
        let api_url = api_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            api_url,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_settings(settings: PapagoSettings) -> Self {
        Self::new(settings.client_id, settings.client_secret, settings.api_url)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Translate `text` from `source` to `target`. The text is sent as-is, empty included.
    pub async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError> {
        let form = [
            ("source", source.tag()),
            ("target", target.tag()),
            ("text", text),
        ];
        let res = self
            .client
            .post(&self.api_url)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .form(&form)
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(TranslationError::Api { status, body });
        }
        let data: N2mtResponse = serde_json::from_str(&body)?;
        let translated = data
            .into_translated_text()
            .ok_or(TranslationError::MissingTranslation)?;
        if translated.trim().is_empty() && !text.trim().is_empty() {
            return Err(TranslationError::MissingTranslation);
        }
        log::debug!(
            "papago: translated {} chars {} -> {}",
            text.chars().count(),
            source,
            target
        );
        Ok(translated)
    }
}

#[async_trait]
impl Translator for PapagoClient {
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError> {
        PapagoClient::translate(self, text, source, target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn ok_body(text: &str) -> String {
        serde_json::json!({
            "message": {
                "@type": "response",
                "@service": "naverservice.nmt.proxy",
                "@version": "1.0.0",
                "result": {
                    "srcLangType": "ko",
                    "tarLangType": "ja",
                    "translatedText": text,
                    "engineType": "PRETRANS",
                    "pivot": null
                }
            }
        })
        .to_string()
    }

    fn client_for(server: &mockito::Server) -> PapagoClient {
        PapagoClient::new("id-123", "secret-456", Some(format!("{}/v1/papago/n2mt", server.url())))
    }

    #[test]
    fn default_endpoint_when_unset_or_blank() {
        assert_eq!(PapagoClient::new("a", "b", None).api_url(), DEFAULT_API_URL);
        assert_eq!(
            PapagoClient::new("a", "b", Some("  ".to_string())).api_url(),
            DEFAULT_API_URL
        );
    }

    #[tokio::test]
    async fn translate_sends_credentials_and_form_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/papago/n2mt")
            .match_header("x-naver-client-id", "id-123")
            .match_header("x-naver-client-secret", "secret-456")
            .match_header(
                "content-type",
                Matcher::Regex("^application/x-www-form-urlencoded".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("source".into(), "ko".into()),
                Matcher::UrlEncoded("target".into(), "ja".into()),
                Matcher::UrlEncoded("text".into(), "안녕".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(ok_body("こんにちは"))
            .create_async()
            .await;

        let out = client_for(&server)
            .translate("안녕", Language::Korean, Language::Japanese)
            .await
            .unwrap();

        assert_eq!(out, "こんにちは");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn translate_encodes_reserved_form_characters() {
        let text = "a&target=en&b=100% + c";
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/papago/n2mt")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("source".into(), "ja".into()),
                Matcher::UrlEncoded("target".into(), "ko".into()),
                Matcher::UrlEncoded("text".into(), text.into()),
            ]))
            .with_status(200)
            .with_body(ok_body("ok"))
            .create_async()
            .await;

        let out = client_for(&server)
            .translate(text, Language::Japanese, Language::Korean)
            .await
            .unwrap();

        assert_eq!(out, "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn translate_passes_empty_text_through() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/papago/n2mt")
            .match_body(Matcher::UrlEncoded("text".into(), "".into()))
            .with_status(200)
            .with_body(ok_body(""))
            .create_async()
            .await;

        let out = client_for(&server)
            .translate("", Language::Korean, Language::Japanese)
            .await
            .unwrap();

        assert_eq!(out, "");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_surfaces_raw_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/papago/n2mt")
            .with_status(500)
            .with_body("rate limited")
            .create_async()
            .await;

        let err = client_for(&server)
            .translate("안녕", Language::Korean, Language::Japanese)
            .await
            .unwrap_err();

        match &err {
            TranslationError::Api { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected api error, got {other:?}"),
        }
        assert_eq!(err.detail(), "rate limited");
    }

    #[tokio::test]
    async fn missing_translated_text_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/papago/n2mt")
            .with_status(200)
            .with_body(r#"{"message":{"result":{"srcLangType":"ko"}}}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .translate("안녕", Language::Korean, Language::Japanese)
            .await
            .unwrap_err();

        assert!(matches!(err, TranslationError::MissingTranslation));
    }

    #[tokio::test]
    async fn empty_translation_of_non_empty_text_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/papago/n2mt")
            .with_status(200)
            .with_body(ok_body(""))
            .create_async()
            .await;

        let err = client_for(&server)
            .translate("안녕", Language::Korean, Language::Japanese)
            .await
            .unwrap_err();

        assert!(matches!(err, TranslationError::MissingTranslation));
    }

    #[tokio::test]
    async fn missing_message_object_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/papago/n2mt")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let err = client_for(&server)
            .translate("x", Language::Korean, Language::Japanese)
            .await
            .unwrap_err();

        assert!(matches!(err, TranslationError::MissingTranslation));
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/papago/n2mt")
            .with_status(200)
            .with_body("<html>gateway timeout</html>")
            .create_async()
            .await;

        let err = client_for(&server)
            .translate("x", Language::Korean, Language::Japanese)
            .await
            .unwrap_err();

        assert!(matches!(err, TranslationError::Decode(_)));
    }
}
