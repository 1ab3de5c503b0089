//! Template loading and region location tests

use rdl_generator::template::{Region, RegionMap, ReportTemplate};
use rdl_generator::{ErrorKind, RdlError};

use crate::common::{fixture_path, TestContext};

#[test]
fn test_load_2005_template_fixture() {
    let template = ReportTemplate::load(&fixture_path("templates/report_2005.rdl")).unwrap();
    let doc = template.parse().unwrap();
    let regions = RegionMap::locate(&doc).unwrap();

    assert!(!regions.contains(Region::ConnectString));
    for region in Region::ALL.into_iter().filter(Region::is_required) {
        assert!(regions.contains(region), "missing {:?}", region);
    }
}

#[test]
fn test_load_missing_file() {
    let ctx = TestContext::new();
    let err = ReportTemplate::load(&ctx.path("nope.rdl")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TemplateMissing);
}

#[test]
fn test_load_malformed_xml() {
    let ctx = TestContext::new();
    let path = ctx.write_file("broken.rdl", b"<Report><DataSets></Report>");
    let err = ReportTemplate::load(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TemplateInvalid);
    assert!(matches!(err, RdlError::TemplateParseError { .. }));
}

#[test]
fn test_each_required_region_is_reported_when_missing() {
    let builtin = ReportTemplate::builtin();
    let removals = [
        ("CommandText", "<CommandText>hspl_Status_SubStatus_master_report</CommandText>"),
        ("QueryParameters", "<QueryParameters>"),
        ("Fields", "<Fields>"),
    ];
    for (region, needle) in removals {
        assert!(builtin.source().contains(needle), "builtin lacks {}", needle);
        // Renaming the element hides the region without breaking well-formedness
        let source = builtin
            .source()
            .replace(needle, &needle.replace(region, &format!("Old{}", region)))
            .replace(&format!("</{}>", region), &format!("</Old{}>", region));
        let template = ReportTemplate::from_source("edited", source);
        let err = template.check().unwrap_err();
        assert!(
            matches!(err, RdlError::TemplateRegionMissing { region: r } if r == region),
            "unexpected error for {}: {}",
            region,
            err
        );
    }
}
