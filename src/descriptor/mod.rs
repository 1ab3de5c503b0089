//! Report descriptor: the structured description of one report variant
//!
//! A descriptor is built once per invocation, either from user input or from
//! [`crate::extract`], and consumed by [`crate::render`].

mod input;
mod types;

use std::collections::HashSet;

use crate::error::RdlError;
use crate::util::title_case;

pub use input::{parse_field_list, parse_parameter_list};
pub use types::map_db_type_to_rdl_type;

/// Parameter names that denote the output cursor of a procedure.
pub const RESERVED_PARAMETER_NAMES: &[&str] = &["p_refcur", "refcursor"];

/// Name of the cursor binding appended to every query parameter list.
pub const CURSOR_BINDING_NAME: &str = "refcursor";

/// Check if a parameter name is a reserved cursor parameter
pub fn is_reserved_parameter(name: &str) -> bool {
    RESERVED_PARAMETER_NAMES
        .iter()
        .any(|&reserved| reserved.eq_ignore_ascii_case(name))
}

/// A stored procedure parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportParameter {
    /// Parameter name as declared by the procedure
    pub name: String,
    /// Declared database type (e.g., "integer", "character varying")
    pub data_type: String,
}

impl ReportParameter {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }

    pub fn is_reserved(&self) -> bool {
        is_reserved_parameter(&self.name)
    }

    /// Data type written to the report parameter (see [`map_db_type_to_rdl_type`])
    pub fn rdl_data_type(&self) -> String {
        map_db_type_to_rdl_type(&self.data_type)
    }
}

/// A column of the procedure's result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportField {
    /// Column name, used both as field name and data field
    pub name: String,
    /// Type name, when known (e.g., "System.Decimal")
    pub type_name: Option<String>,
}

impl ReportField {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
        }
    }
}

/// Everything needed to render one report definition
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportDescriptor {
    /// Stored procedure the report's dataset calls
    pub procedure_name: String,
    /// Procedure parameters, in declaration order
    pub parameters: Vec<ReportParameter>,
    /// Result set columns, in select-list order
    pub fields: Vec<ReportField>,
    /// Name of the report's table item
    pub table_name: String,
    /// Connection string for the data source, if it should be replaced
    pub connection_string: Option<String>,
}

impl ReportDescriptor {
    pub fn new(procedure_name: impl Into<String>) -> Self {
        Self {
            procedure_name: procedure_name.into(),
            ..Default::default()
        }
    }

    pub fn with_parameter(mut self, name: &str, data_type: &str) -> Self {
        self.parameters.push(ReportParameter::new(name, data_type));
        self
    }

    pub fn with_field(mut self, name: &str, type_name: &str) -> Self {
        self.fields.push(ReportField::new(name, type_name));
        self
    }

    pub fn with_table_name(mut self, table_name: &str) -> Self {
        self.table_name = table_name.to_string();
        self
    }

    pub fn with_connection_string(mut self, connection_string: &str) -> Self {
        self.connection_string = Some(connection_string.to_string());
        self
    }

    /// Check the descriptor invariants: a non-empty procedure name without
    /// surrounding whitespace, and unique parameter and field names.
    pub fn validate(&self) -> Result<(), RdlError> {
        if self.procedure_name.trim().is_empty() {
            return Err(RdlError::invalid_input(
                &self.procedure_name,
                "procedure name must not be empty",
            ));
        }
        if self.procedure_name.trim() != self.procedure_name {
            return Err(RdlError::invalid_input(
                &self.procedure_name,
                "procedure name must not have leading or trailing whitespace",
            ));
        }

        let mut seen = HashSet::new();
        for param in &self.parameters {
            if param.name.is_empty() {
                return Err(RdlError::invalid_input("", "parameter name must not be empty"));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(RdlError::invalid_input(
                    &param.name,
                    "duplicate parameter name",
                ));
            }
        }

        seen.clear();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(RdlError::invalid_input("", "field name must not be empty"));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(RdlError::invalid_input(&field.name, "duplicate field name"));
            }
        }

        Ok(())
    }

    /// Parameters bound in the dataset query (reserved cursor parameters excluded)
    pub fn query_parameters(&self) -> impl Iterator<Item = &ReportParameter> {
        self.parameters.iter().filter(|p| !p.is_reserved())
    }

    pub fn reserved_parameter_count(&self) -> usize {
        self.parameters.iter().filter(|p| p.is_reserved()).count()
    }

    /// Number of query parameter bindings, including the trailing cursor binding
    pub fn query_binding_count(&self) -> usize {
        self.parameters.len() - self.reserved_parameter_count() + 1
    }

    /// Field referenced by the detail row colour rule
    pub fn first_field_name(&self) -> &str {
        self.fields
            .first()
            .map(|f| f.name.as_str())
            .unwrap_or("dummy_field")
    }
}

/// Last segment of a possibly schema-qualified procedure name
fn unqualified_name(procedure_name: &str) -> &str {
    procedure_name
        .rsplit('.')
        .next()
        .unwrap_or(procedure_name)
}

/// Table name suggested for a procedure: `sales.order_summary` -> `Order Summary`
pub fn default_table_name(procedure_name: &str) -> String {
    title_case(&unqualified_name(procedure_name).replace('_', " "))
}

/// Output file name suggested for a procedure: `sales.order_summary` -> `order_summary.rdl`
pub fn default_output_file_name(procedure_name: &str) -> String {
    format!("{}.rdl", unqualified_name(procedure_name))
}
