//! Integration tests for the generate workflow

use pretty_assertions::assert_eq;

use rdl_generator::descriptor::ReportDescriptor;
use rdl_generator::{ErrorKind, RdlError};

use crate::common::{fixture_path, sales_descriptor, summarize, TestContext};

fn error_kind(result: &crate::common::GenerateResult) -> Option<ErrorKind> {
    result
        .error
        .as_ref()
        .and_then(|e| e.downcast_ref::<RdlError>())
        .map(RdlError::kind)
}

// ============================================================================
// Successful generation
// ============================================================================

#[test]
fn test_generate_writes_report() {
    let ctx = TestContext::new();
    let result = ctx.generate_with(&sales_descriptor(), None, "out/sales_report_sp.rdl");

    assert!(result.success, "Generate failed: {:?}", result.errors);
    let output_path = result.output_path.unwrap();
    assert_eq!(output_path, ctx.path("out/sales_report_sp.rdl"));
    assert!(output_path.exists(), "Report file should exist");

    let xml = std::fs::read_to_string(&output_path).unwrap();
    let summary = summarize(&xml);
    assert_eq!(summary.fields, vec!["region"]);
    assert_eq!(summary.report_parameters, vec!["start_date", "end_date"]);
}

#[test]
fn test_generate_twice_is_byte_identical() {
    let ctx = TestContext::new();
    let first = ctx.generate_with(&sales_descriptor(), None, "first.rdl");
    let second = ctx.generate_with(&sales_descriptor(), None, "second.rdl");
    assert!(first.success && second.success);

    let first = std::fs::read(first.output_path.unwrap()).unwrap();
    let second = std::fs::read(second.output_path.unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_generate_overwrites_existing_report() {
    let ctx = TestContext::new();
    ctx.write_file("report.rdl", b"stale");
    let xml = ctx.generate_successfully(&sales_descriptor());
    assert!(xml.starts_with("<?xml"));
}

#[test]
fn test_generate_with_custom_template() {
    let ctx = TestContext::new();
    let descriptor = sales_descriptor().with_connection_string("Host=db;Database=sales");
    let result = ctx.generate_with(
        &descriptor,
        Some(fixture_path("templates/report_2005.rdl")),
        "custom.rdl",
    );
    assert!(result.success, "Generate failed: {:?}", result.errors);

    let xml = std::fs::read_to_string(result.output_path.unwrap()).unwrap();
    let summary = summarize(&xml);

    // The 2005 template has no Name on its table and no connection block
    assert_eq!(summary.table_name.as_deref(), Some("Sales Report"));
    assert_eq!(summary.connection_string, None);
    assert!(xml.contains("reporting/2005/01/reportdefinition"));
    assert!(xml.contains("<DataSourceReference>SharedReporting</DataSourceReference>"));
    assert!(xml.contains("<Language>en-GB</Language>"));

    // Footer cells are template content and stay as they are
    assert!(xml.contains(r#"<Textbox Name="FooterNote">"#));
    assert_eq!(summary.header_labels, vec!["Region"]);
}

// ============================================================================
// Failures leave no output behind
// ============================================================================

#[test]
fn test_missing_template_fails_without_output() {
    let ctx = TestContext::new();
    let result = ctx.generate_with(&sales_descriptor(), Some(ctx.path("missing.rdl")), "r.rdl");

    assert!(!result.success);
    assert_eq!(error_kind(&result), Some(ErrorKind::TemplateMissing));
    assert!(!ctx.path("r.rdl").exists());
}

#[test]
fn test_template_without_region_fails_without_output() {
    let ctx = TestContext::new();
    let source = std::fs::read_to_string(fixture_path("templates/report_2005.rdl"))
        .unwrap()
        .replace("<ReportParameters />", "");
    let template = ctx.write_file("no_params.rdl", source.as_bytes());

    let result = ctx.generate_with(&sales_descriptor(), Some(template), "r.rdl");

    assert!(!result.success);
    assert_eq!(error_kind(&result), Some(ErrorKind::TemplateInvalid));
    assert!(
        result.errors[0].contains("ReportParameters"),
        "{:?}",
        result.errors
    );
    assert!(!ctx.path("r.rdl").exists());
}

#[test]
fn test_invalid_descriptor_keeps_existing_output() {
    let ctx = TestContext::new();
    ctx.write_file("r.rdl", b"previous report");
    let descriptor = ReportDescriptor::new("sp")
        .with_field("dup", "String")
        .with_field("dup", "String");

    let result = ctx.generate_with(&descriptor, None, "r.rdl");

    assert!(!result.success);
    assert_eq!(error_kind(&result), Some(ErrorKind::InputValidation));
    assert_eq!(std::fs::read_to_string(ctx.path("r.rdl")).unwrap(), "previous report");
}

#[test]
fn test_unwritable_output_is_reported() {
    let ctx = TestContext::new();
    // A regular file where a directory is needed
    ctx.write_file("blocker", b"");
    let result = ctx.generate_with(&sales_descriptor(), None, "blocker/report.rdl");

    assert!(!result.success);
    assert_eq!(error_kind(&result), Some(ErrorKind::OutputWrite));
}
