//! Database type to report parameter type mapping

use crate::util::{capitalize_first, contains_ci};

/// Convert a declared database type into a report parameter data type.
///
/// | database type            | report type |
/// |--------------------------|-------------|
/// | `integer`                | `Integer`   |
/// | anything containing char | `String`    |
/// | `refcursor`              | `cursor`    |
/// | anything else            | first letter upper-cased |
pub fn map_db_type_to_rdl_type(db_type: &str) -> String {
    let trimmed = db_type.trim();
    if trimmed.eq_ignore_ascii_case("integer") {
        return "Integer".to_string();
    }
    if contains_ci(trimmed, "char") {
        return "String".to_string();
    }
    if trimmed.eq_ignore_ascii_case("refcursor") {
        return "cursor".to_string();
    }
    capitalize_first(trimmed)
}
