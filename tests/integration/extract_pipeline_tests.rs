//! Integration tests for generating reports from procedure source

use pretty_assertions::assert_eq;

use rdl_generator::descriptor::{default_output_file_name, parse_field_list};
use rdl_generator::extract::extract_procedure;
use rdl_generator::files::read_text_with_fallback;

use crate::common::{fixture_path, summarize, TestContext};

#[test]
fn test_extract_and_generate_sales_fixture() {
    let ctx = TestContext::new();
    let source = read_text_with_fallback(&fixture_path("sales_report_sp.sql")).unwrap();
    let extracted = extract_procedure(&source);
    let output_name = default_output_file_name(&extracted.procedure_name);
    let descriptor = extracted.into_descriptor(None, Some("Host=db;Database=sales"));

    let result = ctx.generate_with(&descriptor, None, &output_name);
    assert!(result.success, "Generate failed: {:?}", result.errors);
    assert_eq!(result.output_path.as_deref(), Some(ctx.path("sales_report_sp.rdl").as_path()));

    let xml = std::fs::read_to_string(ctx.path("sales_report_sp.rdl")).unwrap();
    let summary = summarize(&xml);

    assert_eq!(summary.procedure_name.as_deref(), Some("reports.sales_report_sp"));
    assert_eq!(summary.table_name.as_deref(), Some("Sales Report Sp"));
    assert_eq!(
        summary.connection_string.as_deref(),
        Some("Host=db;Database=sales")
    );
    assert_eq!(
        summary.fields,
        vec!["region", "Order Count", "net_sales", "Last Sale"]
    );
    assert_eq!(
        summary.header_labels,
        vec!["Region", "Order Count", "Net Sales", "Last Sale"]
    );
    assert_eq!(
        summary.query_parameters,
        vec![
            "@p_ownerid",
            "@p_start_date",
            "@p_end_date",
            "@p_region",
            "refcursor"
        ]
    );
    assert_eq!(summary.report_parameters.len(), 5);
    assert!(xml.contains("<TypeName>String</TypeName>"));
    assert!(xml.contains("<DataType>Timestamp without time zone</DataType>"));
    assert!(xml.contains("<DataType>String</DataType>"));
    assert!(xml.contains("<DataType>cursor</DataType>"));
}

#[test]
fn test_manual_fields_when_nothing_detected() {
    let ctx = TestContext::new();
    let extracted = extract_procedure(
        "CREATE PROCEDURE dyn_report(IN ownerid integer) AS $$ \
         BEGIN EXECUTE format('SELECT %I FROM t', col); END $$",
    );
    assert!(extracted.needs_manual_fields());

    let mut descriptor = extracted.into_descriptor(Some("Dynamic"), None);
    descriptor.fields = parse_field_list("label, amount:Decimal").unwrap();

    let xml = std::fs::read_to_string(
        ctx.generate_with(&descriptor, None, "dyn.rdl")
            .output_path
            .expect("Generate should succeed"),
    )
    .unwrap();
    let summary = summarize(&xml);
    assert_eq!(summary.fields, vec!["label", "amount"]);
    assert_eq!(summary.query_parameters, vec!["@ownerid", "refcursor"]);
    assert!(xml.contains("<TypeName>Decimal</TypeName>"));
}

#[test]
fn test_windows_1252_source() {
    let ctx = TestContext::new();
    // "Ventes réalisées" with 0xE9 for é
    let path = ctx.write_file(
        "ventes.sql",
        b"CREATE PROCEDURE ventes(IN p_id integer)\n\
          OPEN c FOR SELECT v.total AS \"Ventes r\xe9alis\xe9es\" FROM v;",
    );
    let extracted = extract_procedure(&read_text_with_fallback(&path).unwrap());
    assert_eq!(extracted.fields, vec!["Ventes réalisées"]);

    let descriptor = extracted.into_descriptor(None, None);
    let xml = ctx.generate_successfully(&descriptor);
    assert_eq!(summarize(&xml).header_labels, vec!["Ventes Réalisées"]);
}
