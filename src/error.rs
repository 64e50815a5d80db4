use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error("{0}")]
    Validation(String),
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("translation service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("malformed response from translation service: {0}")]
    MalformedResponse(String),
    #[error("failed to build instruction: {0}")]
    Prompt(String),
}

impl TranslationError {
    pub fn kind(&self) -> &'static str {
        match self {
            TranslationError::Validation(_) => "validation",
            TranslationError::Authentication(_) => "authentication",
            TranslationError::ServiceUnavailable(_) => "service_unavailable",
            TranslationError::MalformedResponse(_) => "malformed_response",
            TranslationError::Prompt(_) => "prompt",
        }
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return TranslationError::ServiceUnavailable(format!("request timed out: {}", err));
        }
        TranslationError::ServiceUnavailable(err.to_string())
    }
}
