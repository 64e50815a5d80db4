//! Form submission flow.
//!
//! `Idle -> Validating -> Translating -> Displaying`, or `Validating -> Warning`
//! when the form is incomplete. Editing the form always returns to `Idle`.

use tracing::{debug, warn};

use crate::dialect::Dialect;
use crate::error::TranslationError;
use crate::providers::Provider;
use crate::translator::Translator;

pub const VALIDATION_WARNING: &str =
    "Please fill in both the English sentence and select a dialect.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationForm {
    pub text: String,
    pub dialect: Option<Dialect>,
}

impl TranslationForm {
    pub fn new(text: impl Into<String>, dialect: Option<Dialect>) -> Self {
        Self {
            text: text.into(),
            dialect,
        }
    }

    pub fn validate(&self) -> Result<Dialect, TranslationError> {
        match self.dialect {
            Some(dialect) if !self.text.trim().is_empty() => Ok(dialect),
            _ => Err(TranslationError::Validation(VALIDATION_WARNING.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    Translated { dialect: Dialect, text: String },
    Failed { dialect: Dialect, error: TranslationError },
}

impl Panel {
    pub fn dialect(&self) -> Dialect {
        match self {
            Panel::Translated { dialect, .. } | Panel::Failed { dialect, .. } => *dialect,
        }
    }

    pub fn headline(&self) -> String {
        match self {
            Panel::Translated { dialect, .. } => format!("Translated in {} dialect:", dialect),
            Panel::Failed { dialect, .. } => {
                format!("Translation into the {} dialect failed:", dialect)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Translating,
    Warning(String),
    Displaying(Panel),
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Validating => "validating",
            Phase::Translating => "translating",
            Phase::Warning(_) => "warning",
            Phase::Displaying(_) => "displaying",
        }
    }
}

/// Runs one submission to completion. The returned phase is always
/// `Warning` or `Displaying`.
pub async fn submit<P: Provider>(translator: &Translator<P>, form: &TranslationForm) -> Phase {
    let dialect = match form.validate() {
        Ok(dialect) => dialect,
        Err(err) => {
            debug!("submission rejected: {}", err);
            return Phase::Warning(err.to_string());
        }
    };
    Phase::Displaying(translate_validated(translator, &form.text, dialect).await)
}

async fn translate_validated<P: Provider>(
    translator: &Translator<P>,
    text: &str,
    dialect: Dialect,
) -> Panel {
    match translator.exec(text, dialect).await {
        Ok(result) => Panel::Translated {
            dialect,
            text: result.text,
        },
        Err(err) => {
            warn!("translation into {} failed: {}", dialect, err);
            Panel::Failed { dialect, error: err }
        }
    }
}

/// Form state plus the current phase, for front ends that keep a form open
/// across several submissions.
#[derive(Debug, Clone)]
pub struct Session<P: Provider> {
    translator: Translator<P>,
    form: TranslationForm,
    phase: Phase,
}

impl<P: Provider> Session<P> {
    pub fn new(translator: Translator<P>) -> Self {
        Self {
            translator,
            form: TranslationForm::default(),
            phase: Phase::Idle,
        }
    }

    pub fn form(&self) -> &TranslationForm {
        &self.form
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.form.text = text.into();
        self.transition(Phase::Idle);
    }

    pub fn select_dialect(&mut self, dialect: Option<Dialect>) {
        self.form.dialect = dialect;
        self.transition(Phase::Idle);
    }

    pub async fn submit(&mut self) -> &Phase {
        self.transition(Phase::Validating);
        match self.form.validate() {
            Err(err) => self.transition(Phase::Warning(err.to_string())),
            Ok(dialect) => {
                self.transition(Phase::Translating);
                let panel = translate_validated(&self.translator, &self.form.text, dialect).await;
                self.transition(Phase::Displaying(panel));
            }
        }
        &self.phase
    }

    fn transition(&mut self, next: Phase) {
        if self.phase != next {
            debug!("submission phase: {} -> {}", self.phase.name(), next.name());
        }
        self.phase = next;
    }
}
