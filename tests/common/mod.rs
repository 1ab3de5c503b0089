//! Common test utilities for rdl-generator tests

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use rdl_generator::inspect::ReportSummary;
use rdl_generator::{generate_report, GenerateOptions, RenderSettings, ReportDescriptor};

/// Path to a file under tests/fixtures
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Read a fixture file as text
pub fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture '{}': {}", name, e))
}

/// The descriptor used throughout the docs: two date parameters, one field
pub fn sales_descriptor() -> ReportDescriptor {
    ReportDescriptor::new("sales_report_sp")
        .with_parameter("start_date", "DateTime")
        .with_parameter("end_date", "DateTime")
        .with_field("region", "String")
        .with_table_name("Sales Report")
}

/// Test context with temporary directory for isolated test execution
pub struct TestContext {
    /// Kept to prevent temp directory cleanup until TestContext is dropped
    _temp_dir: TempDir,
    pub dir: PathBuf,
}

/// Result of a generate call
pub struct GenerateResult {
    pub success: bool,
    pub output_path: Option<PathBuf>,
    pub errors: Vec<String>,
    pub error: Option<anyhow::Error>,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            dir,
        }
    }

    /// Path of `name` inside the temp directory
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Write a file into the temp directory and return its path
    pub fn write_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Generate a report into `output_name` with the given template
    pub fn generate_with(
        &self,
        descriptor: &ReportDescriptor,
        template_path: Option<PathBuf>,
        output_name: &str,
    ) -> GenerateResult {
        let options = GenerateOptions {
            template_path,
            output_path: self.path(output_name),
            settings: RenderSettings::default(),
        };

        match generate_report(&options, descriptor) {
            Ok(output_path) => GenerateResult {
                success: true,
                output_path: Some(output_path),
                errors: vec![],
                error: None,
            },
            Err(e) => GenerateResult {
                success: false,
                output_path: None,
                errors: vec![format!("{:#}", e)],
                error: Some(e),
            },
        }
    }

    /// Generate with the built-in template and return the written XML,
    /// panicking if generation fails.
    pub fn generate_successfully(&self, descriptor: &ReportDescriptor) -> String {
        let result = self.generate_with(descriptor, None, "report.rdl");
        assert!(result.success, "Generate failed: {:?}", result.errors);
        let output_path = result.output_path.unwrap();
        std::fs::read_to_string(output_path).expect("Failed to read generated report")
    }
}

/// Summarise rendered XML, panicking when it does not parse
pub fn summarize(xml: &str) -> ReportSummary {
    ReportSummary::from_xml(xml).expect("Rendered report should be well-formed XML")
}
