//! Report definition rendering
//!
//! The template is parsed into a tree, its regions are located once, and the
//! tree is written back out with every region's content generated from the
//! descriptor. Whitespace-only text is dropped and the output is re-indented
//! with tabs, so identical inputs always produce identical bytes.
//!
//! Processing instructions inside the template are not carried over.

mod cells;
mod content;
mod xml_helpers;

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use roxmltree::Node;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::descriptor::ReportDescriptor;
use crate::error::RdlError;
use crate::inspect::ReportSummary;
use crate::template::{Region, RegionMap, ReportTemplate};

pub use cells::{detail_textbox_name, field_value_expression, header_textbox_name};
pub use content::REPORT_PARAMETER_DEFAULT;

use xml_helpers::{text_event, write_cdata_element, write_text_element};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Rendering knobs that are not part of the descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Width of every generated table column
    pub column_width: String,
    /// Type name for fields declared without one
    pub default_field_type: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            column_width: "0pt".to_string(),
            default_field_type: "String".to_string(),
        }
    }
}

/// Render a report definition from a template and a descriptor.
///
/// The rendered document is re-read and checked against the descriptor
/// before it is returned.
pub fn render(
    template: &ReportTemplate,
    descriptor: &ReportDescriptor,
    settings: &RenderSettings,
) -> Result<String, RdlError> {
    descriptor.validate()?;

    let doc = template.parse()?;
    let regions = RegionMap::locate(&doc)?;
    debug!(
        "Rendering '{}' from template {}",
        descriptor.procedure_name,
        template.origin()
    );

    let mut document = DocumentWriter {
        writer: Writer::new_with_indent(Vec::with_capacity(template.source().len()), b'\t', 1),
        regions: &regions,
        descriptor,
        settings,
    };
    document.write_document(doc.root_element())?;

    let mut bytes = document.writer.into_inner();
    bytes.push(b'\n');
    let rendered = String::from_utf8(bytes).map_err(|e| RdlError::RenderFailed {
        source: Box::new(e),
    })?;

    let summary = ReportSummary::from_xml(&rendered).map_err(|e| RdlError::RenderFailed {
        source: Box::new(e),
    })?;
    summary.check_against(descriptor)?;

    Ok(rendered)
}

struct DocumentWriter<'a, W: Write> {
    writer: Writer<W>,
    regions: &'a RegionMap,
    descriptor: &'a ReportDescriptor,
    settings: &'a RenderSettings,
}

impl<W: Write> DocumentWriter<'_, W> {
    fn write_document(&mut self, root: Node) -> anyhow::Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.write_element(root)
    }

    fn write_node(&mut self, node: Node) -> anyhow::Result<()> {
        if node.is_element() {
            self.write_element(node)
        } else if node.is_text() {
            match node.text() {
                Some(text) if !text.trim().is_empty() => {
                    self.writer.write_event(text_event(text))?;
                    Ok(())
                }
                _ => Ok(()),
            }
        } else if node.is_comment() {
            let comment = node.text().unwrap_or("");
            self.writer
                .write_event(Event::Comment(BytesText::from_escaped(comment)))?;
            Ok(())
        } else {
            Ok(())
        }
    }

    fn write_element(&mut self, node: Node) -> anyhow::Result<()> {
        let name = element_name(&node);
        let region = self.regions.region_of(&node);
        let start = self.start_tag(&node, &name, region);

        match region {
            None | Some(Region::TableName) => self.write_with_children(node, start, &name),
            Some(Region::ConnectString) => match &self.descriptor.connection_string {
                Some(connection) => {
                    debug!("Replacing connection string");
                    write_cdata_element(&mut self.writer, &name, connection)
                }
                None => self.write_with_children(node, start, &name),
            },
            Some(Region::CommandText) => {
                write_text_element(&mut self.writer, &name, &self.descriptor.procedure_name)
            }
            Some(region) => {
                let count = content::child_count(region, self.descriptor);
                debug!("Replacing {} region with {} entries", region.name(), count);
                if count == 0 {
                    self.writer.write_event(Event::Empty(start))?;
                    return Ok(());
                }
                self.writer.write_event(Event::Start(start))?;
                content::write_region_children(
                    &mut self.writer,
                    region,
                    self.descriptor,
                    self.settings,
                )?;
                self.writer.write_event(Event::End(BytesEnd::new(name)))?;
                Ok(())
            }
        }
    }

    /// Copy an element and its children from the template.
    fn write_with_children(
        &mut self,
        node: Node,
        start: BytesStart<'static>,
        name: &str,
    ) -> anyhow::Result<()> {
        if !node.children().any(|child| produces_output(&child)) {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        self.writer.write_event(Event::Start(start))?;
        for child in node.children() {
            self.write_node(child)?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Build the start tag: new namespace declarations, then the attributes.
    ///
    /// The table region gets its `Name` attribute replaced (or added).
    fn start_tag(&self, node: &Node, name: &str, region: Option<Region>) -> BytesStart<'static> {
        let mut start = BytesStart::new(name.to_string());

        for (key, uri) in namespace_declarations(node) {
            start.push_attribute((key.as_str(), uri.as_str()));
        }

        let rename_table = region == Some(Region::TableName);
        let mut has_name = false;
        for attr in node.attributes() {
            let key = match attr.namespace() {
                Some(uri) => match attribute_prefix(node, uri) {
                    Some(prefix) => format!("{}:{}", prefix, attr.name()),
                    None => attr.name().to_string(),
                },
                None => attr.name().to_string(),
            };
            if rename_table && attr.namespace().is_none() && attr.name() == "Name" {
                has_name = true;
                start.push_attribute((key.as_str(), self.descriptor.table_name.as_str()));
            } else {
                start.push_attribute((key.as_str(), attr.value()));
            }
        }
        if rename_table && !has_name {
            start.push_attribute(("Name", self.descriptor.table_name.as_str()));
        }

        start
    }
}

/// Whether a child node is written out at all
fn produces_output(node: &Node) -> bool {
    if node.is_element() || node.is_comment() {
        return true;
    }
    node.is_text() && node.text().is_some_and(|t| !t.trim().is_empty())
}

/// Qualified element name, unprefixed when the element is in the default namespace
fn element_name(node: &Node) -> String {
    let tag = node.tag_name();
    let Some(uri) = tag.namespace() else {
        return tag.name().to_string();
    };
    if node
        .namespaces()
        .any(|ns| ns.name().is_none() && ns.uri() == uri)
    {
        return tag.name().to_string();
    }
    match node
        .namespaces()
        .find(|ns| ns.uri() == uri)
        .and_then(|ns| ns.name())
    {
        Some(prefix) => format!("{}:{}", prefix, tag.name()),
        None => tag.name().to_string(),
    }
}

fn attribute_prefix(node: &Node, uri: &str) -> Option<String> {
    if uri == XML_NAMESPACE {
        return Some("xml".to_string());
    }
    node.namespaces()
        .filter(|ns| ns.uri() == uri)
        .find_map(|ns| ns.name())
        .map(str::to_string)
}

/// Namespace declarations introduced by this element (not inherited from its parent)
fn namespace_declarations(node: &Node) -> Vec<(String, String)> {
    let inherited: Vec<(Option<String>, String)> = node
        .parent_element()
        .map(|parent| {
            parent
                .namespaces()
                .map(|ns| (ns.name().map(str::to_string), ns.uri().to_string()))
                .collect()
        })
        .unwrap_or_default();

    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .filter(|ns| {
            !inherited
                .iter()
                .any(|(prefix, uri)| prefix.as_deref() == ns.name() && uri == ns.uri())
        })
        .map(|ns| {
            let key = match ns.name() {
                Some(prefix) => format!("xmlns:{}", prefix),
                None => "xmlns".to_string(),
            };
            (key, ns.uri().to_string())
        })
        .collect()
}
