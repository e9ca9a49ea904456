use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::error::{ConfigError, Result};
use crate::layout::RootMatch;
use crate::links::SITE_DEPTH_OFFSET;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Navigation marker written into every root command directory
    #[serde(default = "default_marker_file")]
    pub marker_file: String,

    /// Levels between the generated tree and the site's documentation root
    #[serde(default = "default_link_depth_offset")]
    pub link_depth_offset: usize,

    #[serde(default)]
    pub root_match: RootMatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Subcommand passed to the documented binary: `<cmd> <subcommand> <dir>`
    #[serde(default = "default_generator_subcommand")]
    pub subcommand: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::NotFound(path.as_ref().display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist. Without one the user config file is used
    /// when present, otherwise the defaults. Environment overrides apply last.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_with_env(path);
        }

        if let Ok(dir) = Self::config_dir() {
            let path = dir.join("config.toml");
            if path.is_file() {
                debug!("Loading configuration from {}", path.display());
                return Self::load_with_env(path);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let marker = &self.layout.marker_file;
        if marker.is_empty() {
            return Err(ConfigError::Config("Marker file name cannot be empty".to_string()));
        }
        if marker.contains('/') || marker == "." || marker == ".." {
            return Err(ConfigError::Config(format!(
                "Marker file name must be a plain file name: {}", marker
            )));
        }

        if self.generator.subcommand.trim().is_empty() {
            return Err(ConfigError::Config("Generator subcommand cannot be empty".to_string()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(marker) = std::env::var("DOCS_REFORMAT_MARKER_FILE") {
            self.layout.marker_file = marker;
        }

        if let Ok(offset) = std::env::var("DOCS_REFORMAT_LINK_DEPTH_OFFSET") {
            if let Ok(val) = offset.parse() {
                self.layout.link_depth_offset = val;
            }
        }

        if let Ok(mode) = std::env::var("DOCS_REFORMAT_ROOT_MATCH") {
            if let Ok(val) = mode.parse() {
                self.layout.root_match = val;
            }
        }

        if let Ok(subcommand) = std::env::var("DOCS_REFORMAT_GENERATOR_SUBCOMMAND") {
            self.generator.subcommand = subcommand;
        }

        if let Ok(level) = std::env::var("DOCS_REFORMAT_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("docs-reformat"))
            .ok_or_else(|| ConfigError::Config("Could not determine config directory".to_string()))
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            marker_file: default_marker_file(),
            link_depth_offset: default_link_depth_offset(),
            root_match: RootMatch::default(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            subcommand: default_generator_subcommand(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

fn default_marker_file() -> String { ".pages".to_string() }
fn default_link_depth_offset() -> usize { SITE_DEPTH_OFFSET }
fn default_generator_subcommand() -> String { "generate-docs".to_string() }
fn default_log_level() -> String { "warn".to_string() }
