//! Visual theme preference.
//!
//! One persisted value: light, dark, or follow-the-system. The store is an
//! external collaborator of the UI layer; it has no bearing on session
//! correctness.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

/// What actually gets rendered once the system fallback is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn resolve(self, system_is_dark: bool) -> Appearance {
        match self {
            ThemeMode::Light => Appearance::Light,
            ThemeMode::Dark => Appearance::Dark,
            ThemeMode::System => {
                if system_is_dark {
                    Appearance::Dark
                } else {
                    Appearance::Light
                }
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredPreference {
    theme_mode: ThemeMode,
}

/// File-backed store for the theme preference.
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the saved mode; a missing or unreadable file means the default.
    pub fn load(&self) -> ThemeMode {
        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str::<StoredPreference>(&contents) {
                Ok(stored) => stored.theme_mode,
                Err(e) => {
                    warn!("Ignoring corrupt theme preference: {}", e);
                    ThemeMode::default()
                }
            },
            Err(_) => ThemeMode::default(),
        }
    }

    pub fn save(&self, mode: ThemeMode) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = serde_json::to_string(&StoredPreference { theme_mode: mode })?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        Ok(())
    }
}
