use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Regional Tamil variant the sentence is translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    Chennai,
    Kanyakumari,
    Coimbatore,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Chennai, Dialect::Kanyakumari, Dialect::Coimbatore];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Chennai => "Chennai",
            Dialect::Kanyakumari => "Kanyakumari",
            Dialect::Coimbatore => "Coimbatore",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|dialect| dialect.as_str()).collect()
    }

    /// Empty or blank input means "nothing selected" rather than an error.
    pub fn parse_selection(value: Option<&str>) -> Result<Option<Dialect>, Error> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let raw = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|dialect| dialect.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| {
                anyhow!(
                    "unknown dialect '{}' (expected one of: {})",
                    raw,
                    Self::labels().join(", ")
                )
            })
    }
}
