use tracing::debug;

use crate::dialect::Dialect;
use crate::error::TranslationError;
use crate::prompt::{self, Instruction};
use crate::providers::Provider;

#[derive(Debug, Clone)]
pub struct Translator<P: Provider> {
    provider: P,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub text: String,
}

impl<P: Provider> Translator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// One call to the provider. Failures are returned as-is; nothing is retried.
    pub async fn translate(
        &self,
        instruction: &Instruction,
    ) -> Result<TranslationResult, TranslationError> {
        debug!(
            "requesting translation from {} ({} prompt bytes)",
            self.provider.model(),
            instruction.as_str().len()
        );
        let text = self
            .provider
            .generate(instruction.as_str().to_string())
            .await?;
        Ok(TranslationResult { text })
    }

    pub async fn exec(
        &self,
        source_text: &str,
        dialect: Dialect,
    ) -> Result<TranslationResult, TranslationError> {
        let instruction = prompt::build(source_text, dialect)
            .map_err(|err| TranslationError::Prompt(format!("{:#}", err)))?;
        self.translate(&instruction).await
    }
}
