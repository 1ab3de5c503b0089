//! Report definition templates
//!
//! A template is a complete report definition whose placeholder regions
//! (see [`Region`]) are replaced on every render. The crate ships a default
//! template; callers can supply their own file.

mod regions;

use std::path::Path;

use roxmltree::Document;

use crate::error::RdlError;

pub use regions::{Region, RegionMap};

/// Namespace of the 2003/10 report definition schema
pub const RDL_NAMESPACE: &str =
    "http://schemas.microsoft.com/sqlserver/reporting/2003/10/reportdefinition";

const BUILTIN_TEMPLATE: &str = include_str!("../../templates/report_template.rdl");

/// Template source text, read fresh per invocation
#[derive(Debug, Clone)]
pub struct ReportTemplate {
    /// Where the template came from (path or "<builtin>"), for error messages
    origin: String,
    source: String,
}

impl ReportTemplate {
    /// The default template shipped with the crate
    pub fn builtin() -> Self {
        Self {
            origin: "<builtin>".to_string(),
            source: BUILTIN_TEMPLATE.to_string(),
        }
    }

    /// Read a template file and check that it is usable.
    pub fn load(path: &Path) -> Result<Self, RdlError> {
        let source = std::fs::read_to_string(path).map_err(|e| RdlError::TemplateMissing {
            path: path.to_path_buf(),
            source: e,
        })?;
        let template = Self {
            origin: path.display().to_string(),
            source,
        };
        template.check()?;
        Ok(template)
    }

    /// Wrap template text that is already in memory.
    pub fn from_source(origin: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            source: source.into(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parse the template into a document tree.
    pub fn parse(&self) -> Result<Document<'_>, RdlError> {
        // roxmltree rejects a leading byte order mark
        let text = self.source.strip_prefix('\u{feff}').unwrap_or(&self.source);
        Document::parse(text).map_err(|e| RdlError::TemplateParseError {
            origin: self.origin.clone(),
            source: e,
        })
    }

    /// Parse the template and locate every region.
    pub fn check(&self) -> Result<(), RdlError> {
        let doc = self.parse()?;
        RegionMap::locate(&doc)?;
        Ok(())
    }
}
