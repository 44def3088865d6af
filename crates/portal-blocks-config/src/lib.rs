//! # portal-blocks-config
//!
//! Editor defaults read from `~/.config/portal-blocks/config.toml`, and the
//! entry points an editor uses to open and save legacy sections with them.

use portal_blocks_engine::editing::Document;
use portal_blocks_engine::{
    AdapterSettings, BlockFactory, FactorySettings, LegacyAdapter, LegacySection,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid setting {key} in {config_path}: {reason}")]
    InvalidSetting {
        config_path: PathBuf,
        key: &'static str,
        reason: String,
    },
}

/// Editor defaults. Both sections are optional; whatever is left out keeps
/// the engine's built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub factory: FactorySettings,
    #[serde(default)]
    pub adapter: AdapterSettings,
}

impl Config {
    /// `Ok(None)` when there is no file at `config_path`.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            log::debug!("no config at {}", config_path.display());
            return Ok(None);
        }

        let config = Self::read(config_path)?;
        config
            .check()
            .map_err(|(key, reason)| ConfigError::InvalidSetting {
                config_path: config_path.to_path_buf(),
                key,
                reason,
            })?;
        log::debug!("loaded editor defaults from {}", config_path.display());
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    /// The user's config, or the built-in defaults when none is saved.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some((key, reason)) = self.check().err() {
            anyhow::bail!("refusing to save invalid setting {key}: {reason}");
        }
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/portal-blocks");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// A factory that creates blocks with this config's defaults.
    pub fn factory(&self) -> BlockFactory {
        BlockFactory::new(self.factory.clone())
    }

    /// An adapter that fills unset legacy settings from this config.
    pub fn adapter(&self) -> LegacyAdapter {
        LegacyAdapter::new(self.adapter.clone())
    }

    /// Start editing `section` as a block tree.
    pub fn open_section(&self, section: &LegacySection) -> Document {
        Document::from_section(section, &self.adapter())
    }

    /// Write `document` back as the legacy section it was opened from.
    pub fn save_section(&self, document: &Document, original: &LegacySection) -> LegacySection {
        document.to_section(&self.adapter(), &original.id, Some(original))
    }

    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
            config_path: config_path.to_path_buf(),
            source,
        })
    }

    /// First setting the engine cannot work with, as `(key, reason)`.
    fn check(&self) -> Result<(), (&'static str, String)> {
        let adapter = &self.adapter;
        if adapter.default_min_items > adapter.default_max_items {
            return Err((
                "adapter.defaultMinItems",
                format!(
                    "{} exceeds adapter.defaultMaxItems ({})",
                    adapter.default_min_items, adapter.default_max_items
                ),
            ));
        }
        if self.factory.id_prefix.is_empty()
            || self.factory.id_prefix.chars().any(char::is_whitespace)
        {
            return Err((
                "factory.idPrefix",
                format!("{:?} must be non-empty without spaces", self.factory.id_prefix),
            ));
        }
        let name_prefix = &self.factory.name_prefix;
        let valid_name = name_prefix
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && name_prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_name {
            return Err((
                "factory.namePrefix",
                format!("{name_prefix:?} must start a valid field name"),
            ));
        }
        Ok(())
    }
}
