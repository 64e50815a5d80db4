use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use super::{Provider, ProviderFuture};
use crate::error::TranslationError;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-1.5-pro";
const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct Gemini {
    key: Option<String>,
    model: String,
    temperature: f64,
    timeout: Duration,
    base_url: String,
}

impl Gemini {
    pub fn new(key: Option<String>) -> Self {
        Self {
            key: key.filter(|value| !value.trim().is_empty()),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.model = model;
        }
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        if !base_url.trim().is_empty() {
            self.base_url = base_url.trim_end_matches('/').to_string();
        }
        self
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

impl Provider for Gemini {
    fn model(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: String) -> ProviderFuture {
        let this = self.clone();
        Box::pin(async move {
            let key = this.key.clone().ok_or_else(|| {
                TranslationError::Authentication(
                    "API key not found (set GEMINI_API_KEY or GOOGLE_API_KEY)".to_string(),
                )
            })?;
            let client = reqwest::Client::builder().timeout(this.timeout).build()?;
            let url = this.endpoint();
            let body = request_body(&prompt, this.temperature);

            debug!("sending generateContent request to model {}", this.model);
            let response = client
                .post(&url)
                .header("x-goog-api-key", key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let text = response.text().await?;
            if status.is_success() {
                return extract_text(&text);
            }
            Err(classify_error(status, &text))
        })
    }
}

pub(crate) fn request_body(prompt: &str, temperature: f64) -> Value {
    json!({
        "contents": [
            {
                "parts": [{"text": prompt}],
                "role": "user"
            }
        ],
        "generationConfig": {
            "temperature": temperature
        }
    })
}

/// Joins the text parts of the first candidate. Whitespace is kept as-is.
pub(crate) fn extract_text(body: &str) -> Result<String, TranslationError> {
    let payload: GeminiResponse = serde_json::from_str(body).map_err(|err| {
        TranslationError::MalformedResponse(format!("failed to parse Gemini response JSON: {}", err))
    })?;

    if let Some(usage) = &payload.usage_metadata {
        debug!(
            "gemini usage: prompt={:?}, completion={:?}, total={:?}",
            usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
        );
    }

    let Some(candidate) = payload.candidates.first() else {
        let reason = payload
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .map(|reason| format!("prompt blocked: {}", reason))
            .unwrap_or_else(|| "no candidate returned from Gemini".to_string());
        return Err(TranslationError::MalformedResponse(reason));
    };

    let texts = candidate
        .content
        .as_ref()
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    if texts.is_empty() {
        return Err(TranslationError::MalformedResponse(
            "no text part in Gemini candidate".to_string(),
        ));
    }
    Ok(texts.concat())
}

fn classify_error(status: StatusCode, body: &str) -> TranslationError {
    let detail = extract_gemini_error(body).unwrap_or_else(|| body.trim().to_string());
    let message = format!("Gemini API error ({}): {}", status, detail);
    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || is_invalid_key(body)
    {
        return TranslationError::Authentication(message);
    }
    TranslationError::ServiceUnavailable(message)
}

fn is_invalid_key(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("api_key_invalid") || lower.contains("api key not valid")
}

fn extract_gemini_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<GeminiError>,
    }

    #[derive(Deserialize)]
    struct GeminiError {
        message: Option<String>,
        status: Option<String>,
        code: Option<i32>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let error = parsed.error?;
    let mut parts = Vec::new();
    if let Some(message) = error.message.filter(|value| !value.trim().is_empty()) {
        parts.push(message);
    }
    if let Some(status) = error.status.filter(|value| !value.trim().is_empty()) {
        parts.push(format!("type: {}", status));
    }
    if let Some(code) = error.code {
        parts.push(format!("code: {}", code));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<GeminiPromptFeedback>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiPromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiUsage {
    #[serde(rename = "promptTokenCount")]
    prompt_token_count: Option<u64>,
    #[serde(rename = "candidatesTokenCount")]
    candidates_token_count: Option<u64>,
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Gemini, classify_error, extract_text, request_body};
    use crate::error::TranslationError;
    use crate::providers::Provider;
    use insta::assert_json_snapshot;
    use reqwest::StatusCode;

    #[test]
    fn gemini_request_body_snapshot() {
        let body = request_body("Translate me", 0.7);
        assert_json_snapshot!(body);
    }

    #[test]
    fn extracts_text_verbatim() {
        let payload = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "  Eppadi "}, {"text": "irukkinga?\n"}], "role": "model"}}
            ],
            "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 6, "totalTokenCount": 46}
        }"#;
        assert_eq!(extract_text(payload).unwrap(), "  Eppadi irukkinga?\n");
    }

    #[test]
    fn missing_text_is_malformed() {
        let no_candidates = r#"{"candidates": []}"#;
        let no_parts = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let not_json = "<html>bad gateway</html>";
        for body in [no_candidates, no_parts, not_json] {
            assert!(matches!(
                extract_text(body),
                Err(TranslationError::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn blocked_prompt_reason_is_reported() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let err = extract_text(body).unwrap_err();
        assert_eq!(
            err,
            TranslationError::MalformedResponse("prompt blocked: SAFETY".to_string())
        );
    }

    #[test]
    fn invalid_key_maps_to_authentication() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, body),
            TranslationError::Authentication(_)
        ));
        assert!(matches!(
            classify_error(StatusCode::FORBIDDEN, ""),
            TranslationError::Authentication(_)
        ));
    }

    #[test]
    fn other_statuses_are_unavailable() {
        let body = r#"{"error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}}"#;
        let err = classify_error(StatusCode::SERVICE_UNAVAILABLE, body);
        assert_eq!(
            err,
            TranslationError::ServiceUnavailable(
                "Gemini API error (503 Service Unavailable): The model is overloaded. | type: UNAVAILABLE | code: 503"
                    .to_string()
            )
        );
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let gemini = Gemini::new(None).with_base_url("http://127.0.0.1:9");
        let err = gemini.generate("hello".to_string()).await.unwrap_err();
        assert!(matches!(err, TranslationError::Authentication(_)));
    }

    #[test]
    fn blank_values_keep_defaults() {
        let gemini = Gemini::new(Some("   ".to_string()))
            .with_model(" ")
            .with_base_url("http://localhost:1234/v1beta/models/");
        assert_eq!(gemini.model(), "gemini-1.5-pro");
        assert!(gemini.key.is_none());
        assert_eq!(
            gemini.endpoint(),
            "http://localhost:1234/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }
}
