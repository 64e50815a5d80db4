use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct TranslateRequest {
    pub(crate) text: Option<String>,
    pub(crate) dialect: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TranslateResponse {
    pub(crate) dialect: Dialect,
    pub(crate) translated: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
    pub(crate) kind: String,
}
