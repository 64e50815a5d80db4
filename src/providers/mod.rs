use std::future::Future;
use std::pin::Pin;

use crate::error::TranslationError;

mod gemini;

pub use gemini::Gemini;

pub type ProviderFuture = Pin<Box<dyn Future<Output = Result<String, TranslationError>> + Send>>;

/// A text-generation backend: one prompt in, one block of text out.
pub trait Provider: Clone + Send + Sync + 'static {
    fn model(&self) -> &str;
    fn generate(&self, prompt: String) -> ProviderFuture;
}

/// `--key` wins over the environment. A missing key is not an error here;
/// the provider reports it when a translation is attempted.
pub fn resolve_key(override_key: Option<&str>) -> Option<String> {
    if let Some(key) = override_key.filter(|value| !value.trim().is_empty()) {
        return Some(key.to_string());
    }
    get_env("GEMINI_API_KEY").or_else(|| get_env("GOOGLE_API_KEY"))
}

fn get_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::resolve_key;

    #[test]
    fn override_key_wins() {
        assert_eq!(resolve_key(Some("from-flag")).as_deref(), Some("from-flag"));
    }
}
