use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::theme::ThemeVariant;

/// Application preferences for the terminal front-end, persisted as TOML
/// in the user configuration directory and overridable with `FREESMS_*`
/// environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: ThemeVariant,
    /// Gateway URL override, mainly for self-hosted relays.
    #[serde(default)]
    pub provider_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeVariant::default(),
            provider_url: None,
        }
    }
}

impl Settings {
    /// Load the settings file, falling back to (and writing) defaults
    /// when it is missing or unreadable.
    pub fn new() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file(Self::path()?))
            .merge(Env::prefixed("FREESMS_"));

        match figment.extract() {
            Ok(settings) => Ok(settings),
            Err(_) => {
                let defaults = Settings::default();
                defaults.save().unwrap_or_default();
                Ok(defaults)
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let toml_string = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(Self::path()?, toml_string).context("Failed to write settings file")
    }

    fn path() -> Result<PathBuf> {
        Ok(config_dir()?.join("settings.toml"))
    }
}

/// User configuration directory for the application, created on first
/// use.
pub fn config_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "freesms").context("Cannot determine a home directory")?;
    let dir = dirs.config_dir().to_path_buf();
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unconfigured() {
        let settings = Settings::default();
        assert_eq!(settings.theme, ThemeVariant::SlateDark);
        assert!(settings.provider_url.is_none());
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let settings = Settings {
            theme: ThemeVariant::PaperLight,
            provider_url: Some("http://localhost:8080/sendmsg".to_string()),
        };

        let raw = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&raw).unwrap();

        assert_eq!(parsed.theme, ThemeVariant::PaperLight);
        assert_eq!(parsed.provider_url, settings.provider_url);
    }
}
