//! HTTP route handlers for the translator web application.
//!
//! Pages render Askama templates; `/translate/`, `/translate/batch/` and
//! `/detect/` speak JSON in the gateway's uniform result shape.

mod detect;
mod history;
mod pages;
mod translate;

pub use detect::detect;
pub use history::{delete_translation, history_page};
pub use pages::{index, languages_page};
pub use translate::{translate, translate_batch};

use serde::Deserialize;

const NO_TEXT: &str = "No text provided";
const NO_TARGET: &str = "Target language not specified";

/// Body of `POST /translate/`.
#[derive(Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
    /// `"auto"` or absent for auto-detection
    #[serde(default)]
    pub source_lang: Option<String>,
    #[serde(default)]
    pub target_lang: Option<String>,
}

/// Body of `POST /translate/batch/`.
#[derive(Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub texts: Vec<String>,
    #[serde(default)]
    pub source_lang: Option<String>,
    #[serde(default)]
    pub target_lang: Option<String>,
}

/// Body of `POST /detect/`.
#[derive(Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub text: String,
}

/// Query params for the history page.
#[derive(Deserialize, Default)]
pub struct HistoryQuery {
    /// 1-based page number; anything unparseable means the first page
    #[serde(default)]
    pub page: Option<String>,
}

impl HistoryQuery {
    pub fn page_number(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|page| page.trim().parse().ok())
            .unwrap_or(1)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;
    use translator_gateway_core::{
        AppConfig, Database, Error, Lang, LanguageEntry, NewTranslationRecord,
        ProviderDetection, ProviderInfo, ProviderTranslation, Result, TranslationGateway,
        TranslationPayload, TranslationProvider,
    };

    use crate::identity::REMOTE_USER_HEADER;
    use crate::state::AppState;

    #[derive(Clone, Copy)]
    enum Mode {
        Healthy,
        Rejecting,
        Broken,
    }

    struct MockProvider {
        mode: Mode,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn fail(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.mode {
                Mode::Healthy => Ok(()),
                Mode::Rejecting => Err(Error::ProviderRejected {
                    status: 400,
                    message: "Bad language pair".to_string(),
                }),
                Mode::Broken => Err(Error::ProviderInvalidResponse("garbled".to_string())),
            }
        }
    }

    #[async_trait]
    impl TranslationProvider for MockProvider {
        fn info(&self) -> ProviderInfo {
            ProviderInfo { name: "mock" }
        }

        async fn translate(
            &self,
            texts: &[String],
            target: &Lang,
            _source: Option<&Lang>,
        ) -> Result<Vec<ProviderTranslation>> {
            self.fail()?;
            Ok(texts
                .iter()
                .map(|text| ProviderTranslation {
                    translated_text: if text == "hello" && target.as_str() == "es" {
                        "hola".to_string()
                    } else {
                        format!("{text} ({target})")
                    },
                    detected_source_language: Some("en".to_string()),
                })
                .collect())
        }

        async fn detect(&self, _text: &str) -> Result<ProviderDetection> {
            self.fail()?;
            Ok(ProviderDetection {
                language: "fr".to_string(),
                confidence: 0.87,
            })
        }

        async fn languages(&self, _display_language: &Lang) -> Result<Vec<LanguageEntry>> {
            self.fail()?;
            Ok(vec![
                LanguageEntry::new("de", "German"),
                LanguageEntry::new("ja", "Japanese"),
            ])
        }
    }

    struct Harness {
        app: Router,
        state: Arc<AppState>,
        provider: Arc<MockProvider>,
    }

    fn harness(mode: Mode) -> Harness {
        let provider = Arc::new(MockProvider {
            mode,
            calls: AtomicUsize::new(0),
        });
        let gateway =
            TranslationGateway::new(Arc::clone(&provider) as Arc<dyn TranslationProvider>);
        let db = Database::temporary().unwrap();
        let state = Arc::new(AppState::new(gateway, &db, AppConfig::default()).unwrap());
        let app = crate::app(Arc::clone(&state), PathBuf::from("static"));
        Harness {
            app,
            state,
            provider,
        }
    }

    fn post_json(uri: &str, body: &str, user: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(user) = user {
            builder = builder.header(REMOTE_USER_HEADER, user);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn request(method: &str, uri: &str, user: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(REMOTE_USER_HEADER, user);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, request).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    fn record_for(h: &Harness, owner: &str) -> u64 {
        let payload = TranslationPayload {
            translated_text: "hola".to_string(),
            source_language: "en".to_string(),
            target_language: "es".to_string(),
            original_text: "hello".to_string(),
        };
        h.state
            .history
            .append(NewTranslationRecord::from_payload(Some(owner.to_string()), &payload))
            .unwrap()
            .id
    }

    // =========================================================================
    // POST /translate/
    // =========================================================================

    #[tokio::test]
    async fn test_translate_success_records_history() {
        let h = harness(Mode::Healthy);
        let request = post_json(
            "/translate/",
            r#"{"text":"hello","source_lang":"auto","target_lang":"es"}"#,
            Some("alice"),
        );

        let (status, body) = send_json(&h.app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "translated_text": "hola",
                "source_language": "en",
                "target_language": "es",
                "original_text": "hello",
            })
        );

        let records = h.state.history.list(Some("alice")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].translated_text, "hola");
    }

    #[tokio::test]
    async fn test_translate_trims_text_before_translating_and_recording() {
        let h = harness(Mode::Healthy);
        let request = post_json(
            "/translate/",
            r#"{"text":"  hello\n","target_lang":"es"}"#,
            Some("alice"),
        );

        let (status, body) = send_json(&h.app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translated_text"], "hola");
        assert_eq!(body["original_text"], "hello");

        let records = h.state.history.list(Some("alice")).unwrap();
        assert_eq!(records[0].original_text, "hello");
    }

    #[tokio::test]
    async fn test_translate_anonymous_records_without_owner() {
        let h = harness(Mode::Healthy);
        let request = post_json("/translate/", r#"{"text":"hello","target_lang":"es"}"#, None);

        let (status, _) = send_json(&h.app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(h.state.history.list(None).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_translate_invalid_json() {
        let h = harness(Mode::Healthy);
        let (status, body) = send_json(&h.app, post_json("/translate/", "{not json", None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid JSON data"}));
    }

    #[tokio::test]
    async fn test_translate_empty_text() {
        let h = harness(Mode::Healthy);
        let request = post_json("/translate/", r#"{"text":"   ","target_lang":"es"}"#, None);

        let (status, body) = send_json(&h.app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "No text provided"}));
        assert_eq!(h.provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_translate_missing_target() {
        let h = harness(Mode::Healthy);
        let request = post_json("/translate/", r#"{"text":"hello"}"#, None);

        let (status, body) = send_json(&h.app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Target language not specified");
    }

    #[tokio::test]
    async fn test_translate_provider_rejection_is_bad_request() {
        let h = harness(Mode::Rejecting);
        let request = post_json("/translate/", r#"{"text":"hello","target_lang":"xx"}"#, None);

        let (status, body) = send_json(&h.app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("Bad language pair"));
        assert!(h.state.history.is_empty());
    }

    #[tokio::test]
    async fn test_translate_unexpected_failure_hides_detail() {
        let h = harness(Mode::Broken);
        let request = post_json("/translate/", r#"{"text":"hello","target_lang":"es"}"#, None);

        let (status, body) = send_json(&h.app, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Translation service unavailable"}));
    }

    // =========================================================================
    // POST /translate/batch/ and /detect/
    // =========================================================================

    #[tokio::test]
    async fn test_batch_keeps_order() {
        let h = harness(Mode::Healthy);
        let request = post_json(
            "/translate/batch/",
            r#"{"texts":["hello","","bye"],"target_lang":"es"}"#,
            None,
        );

        let (status, body) = send_json(&h.app, request).await;
        assert_eq!(status, StatusCode::OK);

        let results = body.as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["translated_text"], "hola");
        assert_eq!(results[1]["success"], false);
        assert_eq!(results[2]["original_text"], "bye");
        assert_eq!(h.state.history.len(), 2);
    }

    #[tokio::test]
    async fn test_batch_provider_fault_fails_each_entry() {
        let h = harness(Mode::Rejecting);
        let request = post_json("/translate/batch/", r#"{"texts":["a","b"],"target_lang":"fr"}"#, None);

        let (status, body) = send_json(&h.app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(
            body.as_array()
                .unwrap()
                .iter()
                .all(|entry| entry["success"] == false)
        );
    }

    #[tokio::test]
    async fn test_batch_missing_target() {
        let h = harness(Mode::Healthy);
        let request = post_json("/translate/batch/", r#"{"texts":["a"]}"#, None);

        let (status, _) = send_json(&h.app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_detect() {
        let h = harness(Mode::Healthy);
        let (status, body) =
            send_json(&h.app, post_json("/detect/", r#"{"text":"bonjour"}"#, None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["language"], "fr");
    }

    #[tokio::test]
    async fn test_detect_empty_text() {
        let h = harness(Mode::Healthy);
        let (status, body) = send_json(&h.app, post_json("/detect/", r#"{"text":""}"#, None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No text provided");
    }

    #[tokio::test]
    async fn test_detect_unexpected_failure() {
        let h = harness(Mode::Broken);
        let (status, body) =
            send_json(&h.app, post_json("/detect/", r#"{"text":"bonjour"}"#, None)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Language detection failed"}));
    }

    #[tokio::test]
    async fn test_detect_provider_rejection_is_bad_request() {
        let h = harness(Mode::Rejecting);
        let (status, body) =
            send_json(&h.app, post_json("/detect/", r#"{"text":"bonjour"}"#, None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("Language detection API error:")
        );
    }

    // =========================================================================
    // Pages
    // =========================================================================

    #[tokio::test]
    async fn test_home_falls_back_when_listing_fails() {
        let h = harness(Mode::Broken);
        let (status, body) = send(&h.app, request("GET", "/", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("English"));
        assert!(body.contains("Spanish"));
        assert!(body.contains("French"));
    }

    #[tokio::test]
    async fn test_languages_page_syncs_catalog() {
        let h = harness(Mode::Healthy);
        let (status, body) = send(&h.app, request("GET", "/languages/", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Japanese"));
        assert_eq!(h.state.catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_catalog_synced_once_per_listing() {
        let h = harness(Mode::Healthy);
        let listing = vec![LanguageEntry::new("de", "German")];

        assert!(h.state.refresh_catalog(&listing).await);
        assert!(!h.state.refresh_catalog(&listing).await);
        assert_eq!(h.state.catalog.len(), 1);

        let renamed = vec![LanguageEntry::new("de", "Deutsch")];
        assert!(h.state.refresh_catalog(&renamed).await);
        assert_eq!(h.state.catalog.get("de").unwrap().unwrap().name, "Deutsch");
    }

    #[tokio::test]
    async fn test_repeat_page_views_skip_catalog_sync() {
        let h = harness(Mode::Healthy);
        send(&h.app, request("GET", "/languages/", None)).await;
        send(&h.app, request("GET", "/", None)).await;

        let listed = h.state.display_languages().await;
        assert!(!h.state.refresh_catalog(&listed).await);
        assert_eq!(h.state.catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_history_requires_identity() {
        let h = harness(Mode::Healthy);
        let (status, _) = send(&h.app, request("GET", "/history/", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_history_lists_own_records() {
        let h = harness(Mode::Healthy);
        record_for(&h, "alice");
        record_for(&h, "bob");

        let (status, body) = send(&h.app, request("GET", "/history/?page=abc", Some("alice"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("hola"));
        assert!(body.contains("1 translation(s)"));
    }

    // =========================================================================
    // POST /delete/{id}/
    // =========================================================================

    #[tokio::test]
    async fn test_delete_requires_identity() {
        let h = harness(Mode::Healthy);
        let id = record_for(&h, "alice");

        let (status, _) = send(&h.app, request("POST", &format!("/delete/{id}/"), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(h.state.history.get(id).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_other_owner_not_found() {
        let h = harness(Mode::Healthy);
        let id = record_for(&h, "alice");

        let (status, body) =
            send(&h.app, request("POST", &format!("/delete/{id}/"), Some("mallory"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Translation not found.");
        assert!(h.state.history.get(id).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_redirects_to_history() {
        let h = harness(Mode::Healthy);
        let id = record_for(&h, "alice");

        let response = h
            .app
            .clone()
            .oneshot(request("POST", &format!("/delete/{id}/"), Some("alice")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/history/");
        assert!(h.state.history.get(id).unwrap().is_none());
    }

    #[test]
    fn test_history_query_page_number() {
        let query = |page: Option<&str>| HistoryQuery {
            page: page.map(ToString::to_string),
        };
        assert_eq!(query(None).page_number(), 1);
        assert_eq!(query(Some("3")).page_number(), 3);
        assert_eq!(query(Some("nope")).page_number(), 1);
    }
}
