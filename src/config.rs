//! Configuration file (rdlgen.toml)
//!
//! ```toml
//! [render]
//! column_width = "1.5in"
//! default_field_type = "String"
//!
//! [template]
//! path = "templates/custom.rdl"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RdlError;
use crate::render::RenderSettings;

/// File looked up in the working directory when no config path is given
pub const DEFAULT_CONFIG_FILE: &str = "rdlgen.toml";

/// Template selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Template file; the built-in template is used when absent.
    /// Relative paths are resolved against the config file's directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderSettings,

    #[serde(default)]
    pub template: TemplateConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `rdlgen.toml` in the working
    /// directory is used when present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, RdlError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    debug!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, RdlError> {
        let contents = std::fs::read_to_string(path).map_err(|e| RdlError::ConfigReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config: Config =
            toml::from_str(&contents).map_err(|e| RdlError::ConfigParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        if let Some(template) = config.template.path.take() {
            config.template.path = Some(match path.parent() {
                Some(dir) if template.is_relative() => dir.join(template),
                _ => template,
            });
        }

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(toml: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml)
    }
}
