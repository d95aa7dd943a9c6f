//! Configuration System
//!
//! Layered configuration: built-in defaults, then an optional
//! `.blockmap.toml` in the manifest root, then `BLOCKMAP__*` environment
//! variables (for example `BLOCKMAP__MANIFEST__AUTO_IGNORE=true`).

use crate::error::ManifestError;
use crate::logging::LoggingConfig;
use crate::manifest::{ManifestOptions, DEFAULT_OUTPUT_NAME};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the per-root configuration file
pub const CONFIG_FILE_NAME: &str = ".blockmap.toml";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockmapConfig {
    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Manifest policy defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Reserved manifest file name
    #[serde(default = "default_output_name")]
    pub output_name: String,

    /// Relative path prefixes excluded from hashing
    #[serde(default)]
    pub ignore_paths: Vec<String>,

    /// Skip unreadable files instead of failing
    #[serde(default)]
    pub auto_ignore: bool,

    /// Names of extra saves (`<name><output_name>`) excluded from hashing
    #[serde(default)]
    pub saved_names: Vec<String>,
}

fn default_output_name() -> String {
    DEFAULT_OUTPUT_NAME.to_string()
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            output_name: default_output_name(),
            ignore_paths: Vec::new(),
            auto_ignore: false,
            saved_names: Vec::new(),
        }
    }
}

impl ManifestConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.output_name.is_empty() {
            return Err("Output name cannot be empty".to_string());
        }
        if self.output_name.contains('/') || self.output_name.contains('\\') {
            return Err(format!(
                "Output name '{}' must be a file name, not a path",
                self.output_name
            ));
        }
        Ok(())
    }

    pub fn to_options(&self) -> ManifestOptions {
        ManifestOptions {
            output_name: self.output_name.clone(),
            ignore_paths: self.ignore_paths.clone(),
            auto_ignore: self.auto_ignore,
            saved_names: self.saved_names.clone(),
        }
    }
}

impl BlockmapConfig {
    pub fn validate(&self) -> Result<(), ManifestError> {
        self.manifest
            .validate()
            .map_err(|e| ManifestError::ConfigError(format!("manifest: {}", e)))
    }
}

/// Loads `BlockmapConfig` from its sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a manifest root.
    ///
    /// Precedence: env vars > `<root>/.blockmap.toml` > defaults.
    pub fn load(root: &Path) -> Result<BlockmapConfig, ManifestError> {
        let config_path = root.join(CONFIG_FILE_NAME);
        let builder = Config::builder().add_source(
            File::from(config_path)
                .format(FileFormat::Toml)
                .required(false),
        );
        Self::finish(builder)
    }

    /// Load configuration from an explicit file (must exist), with env overrides.
    pub fn load_from_file(path: &Path) -> Result<BlockmapConfig, ManifestError> {
        let builder = Config::builder().add_source(
            File::from(path.to_path_buf())
                .format(FileFormat::Toml)
                .required(true),
        );
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<BlockmapConfig, ManifestError> {
        let config: BlockmapConfig = builder
            .add_source(
                Environment::with_prefix("BLOCKMAP")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("manifest.ignore_paths")
                    .with_list_parse_key("manifest.saved_names")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
