use anyhow::{Context, Result};
use serde::Serialize;
use tera::{Context as TeraContext, Tera};

use crate::dialect::Dialect;
use crate::submission::{Panel, Phase};

const INDEX_TEMPLATE: &str = include_str!("templates/index.html.tera");

#[derive(Debug, Serialize)]
struct PanelView {
    headline: String,
    body: String,
    failed: bool,
}

impl From<&Panel> for PanelView {
    fn from(panel: &Panel) -> Self {
        match panel {
            Panel::Translated { text, .. } => PanelView {
                headline: panel.headline(),
                body: text.clone(),
                failed: false,
            },
            Panel::Failed { error, .. } => PanelView {
                headline: panel.headline(),
                body: error.to_string(),
                failed: true,
            },
        }
    }
}

/// Renders the form page. Every interpolated value is HTML-escaped,
/// including text returned by the model.
pub(crate) fn render(text: &str, selected: Option<Dialect>, phase: &Phase) -> Result<String> {
    let (warning, panel) = match phase {
        Phase::Warning(message) => (Some(message.clone()), None),
        Phase::Displaying(panel) => (None, Some(PanelView::from(panel))),
        _ => (None, None),
    };
    let selected = selected.unwrap_or(Dialect::Chennai);

    let mut context = TeraContext::new();
    context.insert("text", text);
    context.insert("dialects", &Dialect::labels());
    context.insert("selected", selected.as_str());
    context.insert("warning", &warning);
    context.insert("panel", &panel);
    Tera::one_off(INDEX_TEMPLATE, &context, true).with_context(|| "failed to render page template")
}
