//! Error types for rdl-generator

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of [`RdlError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed user input (parameter/field lists, descriptor invariants)
    InputValidation,
    /// The template file could not be read
    TemplateMissing,
    /// The template is not well-formed XML or lacks a required region
    TemplateInvalid,
    /// Unexpected fault while writing or checking the rendered document
    RenderFailed,
    /// The rendered document could not be written to disk
    OutputWrite,
    /// The procedure source file could not be read
    SourceRead,
    /// The configuration file could not be read or parsed
    Config,
}

/// Errors that can occur while generating a report definition
#[derive(Error, Debug)]
pub enum RdlError {
    #[error("Invalid input '{token}': {message}")]
    InvalidInput { token: String, message: String },

    #[error("Template not found: {path}")]
    TemplateMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse template: {origin}")]
    TemplateParseError {
        origin: String,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Template has no {region} region")]
    TemplateRegionMissing { region: &'static str },

    #[error("Template has {count} {region} regions, expected exactly one")]
    TemplateRegionDuplicated { region: &'static str, count: usize },

    #[error("Failed to render report definition")]
    RenderFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Rendered report definition failed verification: {message}")]
    RenderCheckFailed { message: String },

    #[error("Failed to write report definition to {path}")]
    OutputWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read procedure source: {path}")]
    SourceReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config file: {path}")]
    ConfigReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {path}")]
    ConfigParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl RdlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RdlError::InvalidInput { .. } => ErrorKind::InputValidation,
            RdlError::TemplateMissing { .. } => ErrorKind::TemplateMissing,
            RdlError::TemplateParseError { .. }
            | RdlError::TemplateRegionMissing { .. }
            | RdlError::TemplateRegionDuplicated { .. } => ErrorKind::TemplateInvalid,
            RdlError::RenderFailed { .. } | RdlError::RenderCheckFailed { .. } => {
                ErrorKind::RenderFailed
            }
            RdlError::OutputWriteError { .. } => ErrorKind::OutputWrite,
            RdlError::SourceReadError { .. } => ErrorKind::SourceRead,
            RdlError::ConfigReadError { .. } | RdlError::ConfigParseError { .. } => {
                ErrorKind::Config
            }
        }
    }

    pub(crate) fn invalid_input(token: impl Into<String>, message: impl Into<String>) -> Self {
        RdlError::InvalidInput {
            token: token.into(),
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for RdlError {
    fn from(err: anyhow::Error) -> Self {
        RdlError::RenderFailed { source: err.into() }
    }
}
