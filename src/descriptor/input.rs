//! Parsing of comma-separated `name:type` lists typed at the prompt
//!
//! Each item is either `name:type` (split at the first colon) or `name type`
//! (split at the first space, so `filter character varying` works). Blank items
//! are skipped.

use crate::error::RdlError;

use super::{ReportField, ReportParameter};

/// Split one list item into `(name, type)`. `None` means the item has no separator.
fn split_item(item: &str) -> Option<(&str, &str)> {
    let (name, data_type) = match item.split_once(':') {
        Some(pair) => pair,
        None => item.split_once(char::is_whitespace)?,
    };
    Some((name.trim(), data_type.trim()))
}

fn items(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Parse a parameter list such as `ownerid:Integer, filter character varying`.
///
/// Every item must carry a type.
pub fn parse_parameter_list(input: &str) -> Result<Vec<ReportParameter>, RdlError> {
    let mut parameters = Vec::new();
    for item in items(input) {
        let (name, data_type) = split_item(item).ok_or_else(|| {
            RdlError::invalid_input(item, "expected 'name:type' or 'name type'")
        })?;
        if name.is_empty() || data_type.is_empty() {
            return Err(RdlError::invalid_input(
                item,
                "expected 'name:type' or 'name type'",
            ));
        }
        parameters.push(ReportParameter::new(name, data_type));
    }
    Ok(parameters)
}

/// Parse a field list such as `product_name:System.String, region`.
///
/// Bare names are accepted and leave the type unset.
pub fn parse_field_list(input: &str) -> Result<Vec<ReportField>, RdlError> {
    let mut fields = Vec::new();
    for item in items(input) {
        match split_item(item) {
            Some((name, type_name)) => {
                if name.is_empty() || type_name.is_empty() {
                    return Err(RdlError::invalid_input(
                        item,
                        "expected 'name', 'name:type' or 'name type'",
                    ));
                }
                fields.push(ReportField::new(name, type_name));
            }
            None => fields.push(ReportField::untyped(item)),
        }
    }
    Ok(fields)
}
