use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::providers::Gemini;

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model: String,
    pub temperature: f64,
    pub timeout: Duration,
    pub base_url: String,
    pub server_address: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-pro".to_string(),
            temperature: 0.7,
            timeout: Duration::from_secs(60),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            server_address: "127.0.0.1:8501".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    gemini: Option<GeminiSettings>,
    server: Option<ServerSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiSettings {
    model: Option<String>,
    temperature: Option<f64>,
    timeout_seconds: Option<u64>,
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSettings {
    address: Option<String>,
}

pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    load_settings_with_home(extra_path, home_dir().as_deref())
}

pub(crate) fn load_settings_with_home(
    extra_path: Option<&Path>,
    home: Option<&Path>,
) -> Result<Settings> {
    let mut settings = Settings::default();
    settings.merge(parse_settings(DEFAULT_SETTINGS_TOML, Path::new("<built-in>"))?);

    let mut ordered_paths = vec![
        PathBuf::from("settings.toml"),
        PathBuf::from("settings.local.toml"),
    ];

    if let Some(home) = home {
        ensure_home_settings_file(home)?;
        ordered_paths.push(home.join("settings.toml"));
        ordered_paths.push(home.join("settings.local.toml"));
    }

    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            settings.merge(parse_settings(&content, &path)?);
        }
    }

    Ok(settings)
}

fn parse_settings(content: &str, path: &Path) -> Result<SettingsFile> {
    toml::from_str(content)
        .with_context(|| format!("failed to parse settings: {}", path.display()))
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(gemini) = incoming.gemini {
            if let Some(model) = gemini.model {
                if !model.trim().is_empty() {
                    self.model = model.trim().to_string();
                }
            }
            if let Some(temperature) = gemini.temperature {
                if (0.0..=2.0).contains(&temperature) {
                    self.temperature = temperature;
                }
            }
            if let Some(seconds) = gemini.timeout_seconds {
                if seconds > 0 {
                    self.timeout = Duration::from_secs(seconds);
                }
            }
            if let Some(base_url) = gemini.base_url {
                if !base_url.trim().is_empty() {
                    self.base_url = base_url.trim().to_string();
                }
            }
        }
        if let Some(server) = incoming.server {
            if let Some(address) = server.address {
                if !address.trim().is_empty() {
                    self.server_address = address.trim().to_string();
                }
            }
        }
    }

    /// Builds the Gemini client with this configuration baked in.
    pub fn gemini(&self, key: Option<String>) -> Gemini {
        Gemini::new(key)
            .with_model(self.model.clone())
            .with_temperature(self.temperature)
            .with_timeout(self.timeout)
            .with_base_url(self.base_url.clone())
    }
}

fn ensure_home_settings_file(home: &Path) -> Result<()> {
    fs::create_dir_all(home)
        .with_context(|| format!("failed to create settings directory: {}", home.display()))?;
    let path = home.join("settings.toml");
    if !path.exists() {
        fs::write(&path, DEFAULT_SETTINGS_TOML)
            .with_context(|| format!("failed to write settings: {}", path.display()))?;
    }
    Ok(())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().and_then(|home| {
        let home = home.trim();
        if home.is_empty() {
            None
        } else {
            Some(Path::new(home).join(".tamil-dialect-translator"))
        }
    })
}
