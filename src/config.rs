//! Configuration management for the schema builder
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-builder.toml)
//! - Environment variables (SCHEMA_BUILDER__*)
//!
//! ## Example config file (schema-builder.toml):
//! ```toml
//! [converter]
//! inference = "strict"
//! max_depth = 64
//! detect_cycles = true
//! validate_names = false
//!
//! [output]
//! format = "sdl"
//! pretty = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main configuration for the schema builder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Converter settings
    #[serde(default)]
    pub converter: ConverterConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// How scalar fields without a `type` annotation are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InferenceMode {
    /// Only date/time types describe themselves
    #[default]
    Strict,
    /// Any native type name found in the hint table describes itself
    Native,
}

/// Converter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Scalar inference mode
    #[serde(default)]
    pub inference: InferenceMode,

    /// Maximum record nesting depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Fail on records that contain themselves
    #[serde(default = "default_true")]
    pub detect_cycles: bool,

    /// Check output names against the GraphQL name grammar
    #[serde(default)]
    pub validate_names: bool,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format (sdl or json)
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,
}

/// Output format for converted schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Sdl,
    Json,
}

// Default value functions
fn default_max_depth() -> usize {
    64
}

fn default_true() -> bool {
    true
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            inference: InferenceMode::Strict,
            max_depth: default_max_depth(),
            detect_cycles: true,
            validate_names: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Sdl,
            pretty: true,
        }
    }
}

impl BuilderConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "schema-builder.toml",
            ".schema-builder.toml",
            "config/schema-builder.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "graphql", "schema-builder") {
            let xdg_config = config_dir.config_dir().join("schema-builder.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (SCHEMA_BUILDER__*)
        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_BUILDER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = self
            .to_toml()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
