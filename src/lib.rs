use anyhow::{anyhow, Result};
use std::path::Path;

pub mod dialect;
pub mod error;
pub mod logging;
pub mod prompt;
mod providers;
pub mod server;
pub mod settings;
pub mod submission;
mod translator;

pub use dialect::Dialect;
pub use error::TranslationError;
pub use prompt::Instruction;
pub use providers::{Gemini, Provider, ProviderFuture, resolve_key};
pub use submission::{Panel, Phase, Session, TranslationForm};
pub use translator::{TranslationResult, Translator};

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub dialect: Option<String>,
    pub model: Option<String>,
    pub key: Option<String>,
    pub settings_path: Option<String>,
    pub show_dialects: bool,
}

/// Loads settings and builds the Gemini-backed translator once. The API key
/// is captured here; a missing key only fails when a translation is attempted.
pub fn build_translator(config: &Config) -> Result<(Translator<Gemini>, settings::Settings)> {
    let settings_path = config.settings_path.as_deref().map(Path::new);
    let mut settings = settings::load_settings(settings_path)?;
    if let Some(model) = config.model.as_deref() {
        if !model.trim().is_empty() {
            settings.model = model.trim().to_string();
        }
    }
    let key = resolve_key(config.key.as_deref());
    let translator = Translator::new(settings.gemini(key));
    Ok((translator, settings))
}

pub async fn run(config: Config, input: Option<String>) -> Result<String> {
    if config.show_dialects {
        return Ok(Dialect::labels().join("\n"));
    }
    let dialect = Dialect::parse_selection(config.dialect.as_deref())?;
    let (translator, _) = build_translator(&config)?;
    translate_once(&translator, dialect, input.unwrap_or_default()).await
}

pub async fn serve(config: Config, addr: Option<String>) -> Result<()> {
    let (translator, settings) = build_translator(&config)?;
    let addr = addr
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(settings.server_address);
    server::run_server(translator, addr).await
}

/// One submission from the command line: the headline and the translated
/// text on success, an error for warnings and failures.
pub async fn translate_once<P: Provider>(
    translator: &Translator<P>,
    dialect: Option<Dialect>,
    text: String,
) -> Result<String> {
    let form = TranslationForm::new(text, dialect);
    match submission::submit(translator, &form).await {
        Phase::Displaying(panel @ Panel::Translated { .. }) => Ok(format_panel(&panel)),
        Phase::Displaying(Panel::Failed { error, .. }) => Err(error.into()),
        Phase::Warning(message) => Err(anyhow!(message)),
        Phase::Idle | Phase::Validating | Phase::Translating => {
            Err(anyhow!("submission did not complete"))
        }
    }
}

pub fn format_panel(panel: &Panel) -> String {
    match panel {
        Panel::Translated { text, .. } => format!("{}\n{}", panel.headline(), text),
        Panel::Failed { error, .. } => format!("{}\n{}", panel.headline(), error),
    }
}
