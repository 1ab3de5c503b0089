//! Summary of an existing report definition
//!
//! Used to check rendered output against its descriptor and by the
//! `inspect` command. Lookups are lenient: a missing region just yields an
//! empty list.

use std::collections::HashSet;
use std::fmt;

use roxmltree::{Document, Node};

use crate::descriptor::{ReportDescriptor, CURSOR_BINDING_NAME};
use crate::error::RdlError;
use crate::template::Region;

/// What a report definition binds and displays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub procedure_name: Option<String>,
    pub table_name: Option<String>,
    pub connection_string: Option<String>,
    /// `Field` names, in document order
    pub fields: Vec<String>,
    /// `QueryParameter` names, in document order
    pub query_parameters: Vec<String>,
    /// `ReportParameter` names, in document order
    pub report_parameters: Vec<String>,
    pub table_columns: usize,
    /// Values of the header row textboxes
    pub header_labels: Vec<String>,
    /// Values of the detail row textboxes
    pub detail_values: Vec<String>,
    /// `Name` of every textbox in the document, in document order
    pub textbox_names: Vec<String>,
}

fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == tag)
}

fn child_names(node: Option<Node>, tag: &str) -> Vec<String> {
    node.map(|n| {
        child_elements(n, tag)
            .map(|c| c.attribute("Name").unwrap_or("").to_string())
            .collect()
    })
    .unwrap_or_default()
}

/// Text of the `Value` of every textbox in a row of cells
fn cell_values(cells: Option<Node>) -> Vec<String> {
    let Some(cells) = cells else {
        return Vec::new();
    };
    child_elements(cells, "TableCell")
        .map(|cell| {
            cell.descendants()
                .find(|d| d.is_element() && d.tag_name().name() == "Textbox")
                .and_then(|textbox| child_elements(textbox, "Value").next())
                .and_then(|value| value.text())
                .unwrap_or("")
                .to_string()
        })
        .collect()
}

impl ReportSummary {
    pub fn from_xml(xml: &str) -> Result<Self, roxmltree::Error> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let doc = Document::parse(xml)?;
        let first = |region: Region| region.find(&doc).into_iter().next();
        let text_of = |region: Region| {
            first(region)
                .and_then(|n| n.text())
                .map(|t| t.trim().to_string())
        };

        Ok(Self {
            procedure_name: text_of(Region::CommandText),
            table_name: first(Region::TableName)
                .and_then(|n| n.attribute("Name"))
                .map(str::to_string),
            connection_string: text_of(Region::ConnectString),
            fields: child_names(first(Region::Fields), "Field"),
            query_parameters: child_names(first(Region::QueryParameters), "QueryParameter"),
            report_parameters: child_names(first(Region::ReportParameters), "ReportParameter"),
            table_columns: first(Region::TableColumns)
                .map(|n| child_elements(n, "TableColumn").count())
                .unwrap_or(0),
            header_labels: cell_values(first(Region::HeaderCells)),
            detail_values: cell_values(first(Region::DetailCells)),
            textbox_names: doc
                .descendants()
                .filter(|n| n.is_element() && n.tag_name().name() == "Textbox")
                .filter_map(|n| n.attribute("Name"))
                .map(str::to_string)
                .collect(),
        })
    }

    /// Check the rendered counts and names against the descriptor they came from.
    pub fn check_against(&self, descriptor: &ReportDescriptor) -> Result<(), RdlError> {
        let field_count = descriptor.fields.len();
        let mismatch = |message: String| Err(RdlError::RenderCheckFailed { message });

        if self.procedure_name.as_deref() != Some(descriptor.procedure_name.as_str()) {
            return mismatch(format!(
                "command text is {:?}, expected {:?}",
                self.procedure_name, descriptor.procedure_name
            ));
        }
        if self.table_name.as_deref() != Some(descriptor.table_name.as_str()) {
            return mismatch(format!(
                "table name is {:?}, expected {:?}",
                self.table_name, descriptor.table_name
            ));
        }

        let expected_fields: Vec<&str> = descriptor.fields.iter().map(|f| f.name.as_str()).collect();
        if self.fields != expected_fields {
            return mismatch(format!(
                "fields are {:?}, expected {:?}",
                self.fields, expected_fields
            ));
        }
        for (what, count) in [
            ("table columns", self.table_columns),
            ("header cells", self.header_labels.len()),
            ("detail cells", self.detail_values.len()),
        ] {
            if count != field_count {
                return mismatch(format!("{} {}, expected {}", count, what, field_count));
            }
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = self
            .textbox_names
            .iter()
            .find(|name| !seen.insert(name.to_ascii_lowercase()))
        {
            return mismatch(format!("textbox name '{}' is used more than once", duplicate));
        }

        if self.report_parameters.len() != descriptor.parameters.len() {
            return mismatch(format!(
                "{} report parameters, expected {}",
                self.report_parameters.len(),
                descriptor.parameters.len()
            ));
        }
        if self.query_parameters.len() != descriptor.query_binding_count()
            || self.query_parameters.last().map(String::as_str) != Some(CURSOR_BINDING_NAME)
        {
            return mismatch(format!(
                "query parameters are {:?}, expected {} ending with '{}'",
                self.query_parameters,
                descriptor.query_binding_count(),
                CURSOR_BINDING_NAME
            ));
        }

        Ok(())
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_none = |v: &Option<String>| v.clone().unwrap_or_else(|| "(none)".to_string());
        writeln!(f, "Procedure:          {}", or_none(&self.procedure_name))?;
        writeln!(f, "Table:              {}", or_none(&self.table_name))?;
        writeln!(f, "Fields:             {}", self.fields.join(", "))?;
        writeln!(f, "Report parameters:  {}", self.report_parameters.join(", "))?;
        writeln!(f, "Query parameters:   {}", self.query_parameters.join(", "))?;
        writeln!(f, "Table columns:      {}", self.table_columns)?;
        writeln!(f, "Header labels:      {}", self.header_labels.join(", "))?;
        write!(f, "Detail values:      {}", self.detail_values.join(", "))
    }
}
