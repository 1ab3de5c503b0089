//! Best-effort extraction of a report descriptor from procedure source text
//!
//! The procedure name, its `IN`/`INOUT` parameters, and the column aliases
//! of the query it opens are recovered by pattern matching. Nothing here
//! fails: unrecognised input yields the `Unknown` name, no parameters or no
//! fields, and callers check [`ExtractedProcedure::needs_manual_fields`].

mod query;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::descriptor::{default_table_name, ReportDescriptor, ReportField, ReportParameter};

pub use query::{select_list_aliases, strip_comments};

/// Procedure name used when the source has no `PROCEDURE <name>`
pub const UNKNOWN_PROCEDURE: &str = "Unknown";

static PROCEDURE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPROCEDURE\s+([\w.]+)").unwrap());

static PROCEDURE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bCREATE\s+(?:OR\s+REPLACE\s+)?PROCEDURE\s+([\w.]+)").unwrap()
});

static PARAMETER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*(?:IN|INOUT)\s+(\w+)\s+(.+?)\s*(?:(?:\bDEFAULT\b|=).*)?$").unwrap()
});

static SQL_QUERY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)sql_query\s*:=\s*'(.*?)';").unwrap());

static OPEN_FOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)OPEN\s+\w+\s+FOR\s+(.*?);").unwrap());

/// What could be recovered from a procedure definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedProcedure {
    /// Procedure name, or [`UNKNOWN_PROCEDURE`]
    pub procedure_name: String,
    /// `IN`/`INOUT` parameters, in declaration order
    pub parameters: Vec<ReportParameter>,
    /// Column aliases of the opened query, in select-list order
    pub fields: Vec<String>,
}

impl ExtractedProcedure {
    /// No field names were detected; the caller has to supply them.
    pub fn needs_manual_fields(&self) -> bool {
        self.fields.is_empty()
    }

    /// Table name offered when the user gives none
    pub fn default_table_name(&self) -> String {
        default_table_name(&self.procedure_name)
    }

    /// Complete the extraction into a descriptor.
    ///
    /// Detected fields carry no type; the render settings supply one.
    pub fn into_descriptor(
        self,
        table_name: Option<&str>,
        connection_string: Option<&str>,
    ) -> ReportDescriptor {
        let table_name = table_name
            .map(str::to_string)
            .unwrap_or_else(|| self.default_table_name());
        ReportDescriptor {
            procedure_name: self.procedure_name,
            parameters: self.parameters,
            fields: self.fields.into_iter().map(ReportField::untyped).collect(),
            table_name,
            connection_string: connection_string.map(str::to_string),
        }
    }
}

/// Extract the procedure name, parameters and result fields from source text.
pub fn extract_procedure(source: &str) -> ExtractedProcedure {
    let code = strip_comments(source);

    let procedure_name = extract_procedure_name(&code);

    let parameters = extract_parameters(&code);
    let fields = extract_fields(source);

    debug!(
        "Extracted procedure {} with {} parameters and {} fields",
        procedure_name,
        parameters.len(),
        fields.len()
    );
    if fields.is_empty() {
        warn!("No result fields detected in procedure {}", procedure_name);
    }

    ExtractedProcedure {
        procedure_name,
        parameters,
        fields,
    }
}

/// Name from the `CREATE [OR REPLACE] PROCEDURE` header, else from any
/// `PROCEDURE <name>` mention
fn extract_procedure_name(code: &str) -> String {
    PROCEDURE_HEADER_RE
        .captures(code)
        .or_else(|| PROCEDURE_NAME_RE.captures(code))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_PROCEDURE.to_string())
}

/// Parameters declared in the argument list of `CREATE [OR REPLACE] PROCEDURE`
fn extract_parameters(code: &str) -> Vec<ReportParameter> {
    let Some(header) = PROCEDURE_HEADER_RE.find(code) else {
        return Vec::new();
    };
    let Some(after_open) = code[header.end()..].trim_start().strip_prefix('(') else {
        debug!("Procedure header has no argument list");
        return Vec::new();
    };
    let Some(arguments) = balanced_arguments(after_open) else {
        debug!("Unterminated procedure argument list");
        return Vec::new();
    };

    let mut parameters: Vec<ReportParameter> = Vec::new();
    for declaration in split_top_level(arguments) {
        let Some(caps) = PARAMETER_RE.captures(declaration) else {
            debug!("Skipping parameter declaration: {}", declaration.trim());
            continue;
        };
        let name = &caps[1];
        if parameters.iter().any(|p| p.name == name) {
            debug!("Skipping duplicate parameter {}", name);
            continue;
        }
        parameters.push(ReportParameter::new(name, caps[2].trim()));
    }
    parameters
}

/// Text up to the parenthesis closing an already opened one
fn balanced_arguments(after_open: &str) -> Option<&str> {
    let mut depth = 1usize;
    for (i, c) in after_open.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&after_open[..i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split at commas that are not inside parentheses
fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}

/// Aliases of the first query strategy that yields any: dynamic
/// `sql_query := '...'` literals, then `OPEN <cursor> FOR <query>`.
fn extract_fields(source: &str) -> Vec<String> {
    let dynamic: Vec<String> = SQL_QUERY_RE
        .captures_iter(source)
        .map(|caps| caps[1].replace("''", "'"))
        .collect();
    let fields = aliases_of(dynamic.iter().map(String::as_str));
    if !fields.is_empty() {
        debug!("Fields taken from sql_query literal");
        return fields;
    }

    let opened = OPEN_FOR_RE
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()));
    aliases_of(opened)
}

fn aliases_of<'a>(queries: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut aliases: Vec<String> = Vec::new();
    for query in queries {
        for alias in select_list_aliases(query) {
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }
    }
    aliases
}
