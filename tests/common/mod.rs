#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tamil_dialect_translator::{Provider, ProviderFuture, TranslationError};

#[derive(Clone)]
pub struct StubProvider {
    reply: Result<String, TranslationError>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubProvider {
    pub fn replying(text: &str) -> Self {
        Self::with_reply(Ok(text.to_string()))
    }

    pub fn failing(error: TranslationError) -> Self {
        Self::with_reply(Err(error))
    }

    fn with_reply(reply: Result<String, TranslationError>) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Provider for StubProvider {
    fn model(&self) -> &str {
        "stub-model"
    }

    fn generate(&self, prompt: String) -> ProviderFuture {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt);
        let reply = self.reply.clone();
        Box::pin(async move { reply })
    }
}
