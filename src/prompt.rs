use anyhow::{Context, Result};
use std::fmt;
use tera::{Context as TeraContext, Tera};

use crate::dialect::Dialect;

const DIALECT_PROMPT_TEMPLATE: &str = include_str!("prompts/dialect_prompt.tera");

/// Fully substituted prompt handed to the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction(String);

impl Instruction {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders the dialect prompt. The sentence is inserted exactly as given;
/// callers are expected to have rejected blank input already.
pub fn build(source_text: &str, dialect: Dialect) -> Result<Instruction> {
    let mut context = TeraContext::new();
    context.insert("dialect", dialect.as_str());
    context.insert("text", source_text);
    let rendered = Tera::one_off(DIALECT_PROMPT_TEMPLATE, &context, false)
        .with_context(|| "failed to render dialect prompt")?;
    Ok(Instruction(rendered))
}
