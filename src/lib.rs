//! rdl-generator: report definitions for stored procedures
//!
//! This library renders SQL Server Reporting Services report definitions
//! (.rdl) from a template and a description of a stored procedure: its
//! parameters, the columns of its result set, and the table that shows them.
//! The description can be given directly or extracted from procedure source.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod files;
pub mod inspect;
pub mod render;
pub mod template;
pub mod util;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

pub use descriptor::ReportDescriptor;
pub use error::{ErrorKind, RdlError};
pub use render::RenderSettings;

/// Options for generating a report definition
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Template file (the built-in template when `None`)
    pub template_path: Option<PathBuf>,
    /// Output path for the .rdl file
    pub output_path: PathBuf,
    /// Rendering settings
    pub settings: RenderSettings,
}

/// Render a report definition for `descriptor` and write it to the output path
pub fn generate_report(options: &GenerateOptions, descriptor: &ReportDescriptor) -> Result<PathBuf> {
    // Step 1: Load the template
    let template = match &options.template_path {
        Some(path) => template::ReportTemplate::load(path)?,
        None => template::ReportTemplate::builtin(),
    };
    info!("Using template {}", template.origin());

    // Step 2: Render in memory
    let rendered = render::render(&template, descriptor, &options.settings)
        .with_context(|| format!("Failed to render report for {}", descriptor.procedure_name))?;

    info!(
        "Rendered {} fields and {} parameters",
        descriptor.fields.len(),
        descriptor.parameters.len()
    );

    // Step 3: Write the report definition
    files::write_atomically(&options.output_path, &rendered)?;

    info!("Created report definition: {}", options.output_path.display());

    Ok(options.output_path.clone())
}
