//! Descriptor building and input list parsing tests

use rdl_generator::descriptor::{
    default_output_file_name, default_table_name, map_db_type_to_rdl_type, parse_field_list,
    parse_parameter_list, ReportDescriptor, ReportField, ReportParameter,
};
use rdl_generator::ErrorKind;

// ============================================================================
// Type mapping
// ============================================================================

#[test]
fn test_type_mapping_table() {
    let cases = [
        ("integer", "Integer"),
        ("INTEGER", "Integer"),
        ("character varying", "String"),
        ("varchar", "String"),
        ("char(10)", "String"),
        ("refcursor", "cursor"),
        ("foo", "Foo"),
        ("boolean", "Boolean"),
        ("DateTime", "DateTime"),
    ];
    for (db_type, expected) in cases {
        assert_eq!(map_db_type_to_rdl_type(db_type), expected, "for {}", db_type);
    }
}

#[test]
fn test_report_parameter_data_type() {
    assert_eq!(ReportParameter::new("p_refcur", "refcursor").rdl_data_type(), "cursor");
    assert_eq!(ReportParameter::new("filter", "text").rdl_data_type(), "Text");
}

// ============================================================================
// Input lists
// ============================================================================

#[test]
fn test_parameter_list_with_reserved_cursor() {
    let params = parse_parameter_list("ownerid:integer, p_refcur:refcursor").unwrap();
    let descriptor = ReportDescriptor {
        procedure_name: "sp".to_string(),
        parameters: params,
        ..Default::default()
    };
    assert_eq!(descriptor.reserved_parameter_count(), 1);
    assert_eq!(descriptor.query_binding_count(), 2);
    let bound: Vec<&str> = descriptor.query_parameters().map(|p| p.name.as_str()).collect();
    assert_eq!(bound, vec!["ownerid"]);
}

#[test]
fn test_parameter_list_error_names_token() {
    let err = parse_parameter_list("ownerid:integer, justaname").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InputValidation);
    assert!(err.to_string().contains("'justaname'"), "{}", err);
}

#[test]
fn test_parameter_list_rejects_missing_type() {
    let err = parse_parameter_list("ownerid:").unwrap_err();
    assert!(err.to_string().contains("'ownerid:'"), "{}", err);
}

#[test]
fn test_empty_lists() {
    assert!(parse_parameter_list("").unwrap().is_empty());
    assert!(parse_parameter_list(" , ,").unwrap().is_empty());
    assert!(parse_field_list("").unwrap().is_empty());
}

#[test]
fn test_field_list_mixed_forms() {
    let fields = parse_field_list("region, total:System.Decimal, last_sale DateTime").unwrap();
    assert_eq!(
        fields,
        vec![
            ReportField::untyped("region"),
            ReportField::new("total", "System.Decimal"),
            ReportField::new("last_sale", "DateTime"),
        ]
    );
}

// ============================================================================
// Invariants and defaults
// ============================================================================

#[test]
fn test_duplicate_field_from_input_fails_validation() {
    let descriptor = ReportDescriptor {
        procedure_name: "sp".to_string(),
        fields: parse_field_list("region, region:String").unwrap(),
        ..Default::default()
    };
    let err = descriptor.validate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InputValidation);
    assert!(err.to_string().contains("'region'"));
}

#[test]
fn test_default_names_for_qualified_procedure() {
    assert_eq!(default_table_name("reports.sales_report_sp"), "Sales Report Sp");
    assert_eq!(
        default_output_file_name("reports.sales_report_sp"),
        "sales_report_sp.rdl"
    );
}
