use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::paths;
use crate::translation::CatalogSources;

pub const DEFAULT_TRANSLATE_URL: &str =
    "https://translate.google.com/_/TranslateWebserverUi/data/batchexecute";
pub const DEFAULT_LANGUAGES_URL: &str = "https://translate.google.com/";
pub const DEFAULT_NATIVE_NAMES_URL: &str = "https://ssl.gstatic.com/inputtools/js/ln/17/en.js";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:105.0) Gecko/20100101 Firefox/105.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raised when neither the CLI nor the config file names a target language.
#[derive(Debug, thiserror::Error)]
#[error(
    "Missing required configuration: 'to' (target language)\n\n\
     Please provide it via:\n  \
     - CLI option: gtrans --to <lang>\n  \
     - Config file: ~/.config/gtrans/config.toml"
)]
pub struct MissingTargetLanguage;

/// Source language used when neither the CLI nor the config file set one.
pub const AUTO_DETECT: &str = "auto";

/// Default settings in the `[gtrans]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GtransConfig {
    /// Default source language code.
    pub from: Option<String>,
    /// Default target language code.
    pub to: Option<String>,
}

/// Where and how to reach the translate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub translate_url: String,
    pub languages_url: String,
    pub native_names_url: String,
    /// The endpoint misbehaves without a browser-like user agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            languages_url: DEFAULT_LANGUAGES_URL.to_string(),
            native_names_url: DEFAULT_NATIVE_NAMES_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl EndpointConfig {
    pub fn catalog_sources(&self) -> CatalogSources {
        CatalogSources {
            languages_url: self.languages_url.clone(),
            native_names_url: self.native_names_url.clone(),
        }
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/gtrans/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub gtrans: GtransConfig,
    #[serde(default)]
    pub endpoint: EndpointConfig,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub source_language: String,
    pub target_language: String,
    pub endpoint: EndpointConfig,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// # Errors
///
/// Returns an error if no target language is configured anywhere.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let source_language = options
        .from
        .as_ref()
        .or(config_file.gtrans.from.as_ref())
        .cloned()
        .unwrap_or_else(|| AUTO_DETECT.to_string());

    let target_language = options
        .to
        .as_ref()
        .or(config_file.gtrans.to.as_ref())
        .cloned()
        .ok_or(MissingTargetLanguage)?;

    Ok(ResolvedConfig {
        source_language,
        target_language,
        endpoint: config_file.endpoint.clone(),
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Configuration is stored at `$XDG_CONFIG_HOME/gtrans/config.toml`
    /// or `~/.config/gtrans/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    /// Loads the config file, falling back to defaults only when it does not exist.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        match fs::metadata(&self.config_path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ConfigFile::default()),
            _ => self.load(),
        }
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }
}
