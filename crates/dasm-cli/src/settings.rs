//! User settings for the `dasm` binary.
//!
//! Settings live in `settings.toml` under the platform config folder:
//! - macOS: ~/Library/Application Support/org.dasm.dasm/
//! - Windows: %APPDATA%/dasm/dasm/config/
//! - Linux: ~/.config/dasm/
//!
//! A file given with `--config` replaces the default location.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use dasm_store::StoreConfig;

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "dasm";
const APP_NAME: &str = "dasm";
const CONFIG_FILENAME: &str = "settings.toml";

/// Contents of `settings.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `[store]` table.
    pub store: StoreConfig,
}

/// Path of the default settings file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings.
///
/// An explicit path must exist and parse. The default file falls back to
/// defaults when it is missing or unreadable.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read settings {}", path.display()))?;
        let settings = parse_settings(&content)
            .with_context(|| format!("parse settings {}", path.display()))?;
        tracing::info!(path = %path.display(), "Loaded settings");
        return Ok(settings);
    }

    let Some(path) = settings_path() else {
        tracing::warn!("Could not determine settings path, using defaults");
        return Ok(Settings::default());
    };

    match fs::read_to_string(&path) {
        Ok(content) => match parse_settings(&content) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "Loaded settings");
                Ok(settings)
            }
            Err(e) => {
                tracing::warn!("Failed to parse settings file: {e:#}, using defaults");
                Ok(Settings::default())
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "No settings file, using defaults");
            Ok(Settings::default())
        }
        Err(e) => {
            tracing::warn!("Failed to read settings file: {e}, using defaults");
            Ok(Settings::default())
        }
    }
}

fn parse_settings(content: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(content)?;
    settings.store.validate()?;
    Ok(settings)
}
