//! Placeholder regions of a report definition template
//!
//! Regions are found by structural query over element local names, so any
//! report definition namespace version works.

use std::collections::HashMap;

use roxmltree::{Document, Node, NodeId};
use tracing::debug;

use crate::error::RdlError;

/// A location in the template whose content is generated from the descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// `ConnectString` text of the data source (optional)
    ConnectString,
    /// `CommandText` of the dataset query: the procedure name
    CommandText,
    /// `Fields` of the dataset
    Fields,
    /// `QueryParameters` of the dataset query
    QueryParameters,
    /// `ReportParameters` of the report
    ReportParameters,
    /// `Name` attribute of the `Table` report item
    TableName,
    /// `TableColumns` of the table
    TableColumns,
    /// `TableCells` of the table header row
    HeaderCells,
    /// `TableCells` of the table detail row
    DetailCells,
}

impl Region {
    pub const ALL: [Region; 9] = [
        Region::ConnectString,
        Region::CommandText,
        Region::Fields,
        Region::QueryParameters,
        Region::ReportParameters,
        Region::TableName,
        Region::TableColumns,
        Region::HeaderCells,
        Region::DetailCells,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::ConnectString => "ConnectString",
            Region::CommandText => "CommandText",
            Region::Fields => "Fields",
            Region::QueryParameters => "QueryParameters",
            Region::ReportParameters => "ReportParameters",
            Region::TableName => "Table",
            Region::TableColumns => "TableColumns",
            Region::HeaderCells => "Header TableCells",
            Region::DetailCells => "Details TableCells",
        }
    }

    /// The connection block is only replaced when the template has one.
    pub fn is_required(&self) -> bool {
        !matches!(self, Region::ConnectString)
    }

    /// Every element of the document matching this region.
    ///
    /// Only elements in the root element's namespace are considered.
    pub fn find<'a, 'input>(&self, doc: &'a Document<'input>) -> Vec<Node<'a, 'input>> {
        let root = doc.root_element();
        let namespace = root.tag_name().namespace();
        root.descendants()
            .filter(|n| n.is_element() && n.tag_name().namespace() == namespace)
            .filter(|n| self.matches(n))
            .collect()
    }

    fn matches(&self, node: &Node) -> bool {
        let tag = node.tag_name().name();
        match self {
            Region::HeaderCells => tag == "TableCells" && row_section(node) == Some("Header"),
            Region::DetailCells => tag == "TableCells" && row_section(node) == Some("Details"),
            _ => tag == self.name(),
        }
    }
}

/// Name of the nearest enclosing table section (`Header`, `Details` or `Footer`).
///
/// Only sections directly under a `Table` count; group headers and footers
/// inside `TableGroups` yield `None`.
fn row_section<'a>(node: &Node<'a, '_>) -> Option<&'a str> {
    let section = node
        .ancestors()
        .skip(1)
        .filter(|a| a.is_element())
        .find(|a| matches!(a.tag_name().name(), "Header" | "Details" | "Footer"))?;
    let parent = section.parent_element()?;
    (parent.tag_name().name() == "Table").then(|| section.tag_name().name())
}

/// Located regions of one parsed template, keyed by node id
#[derive(Debug, Default)]
pub struct RegionMap {
    by_node: HashMap<NodeId, Region>,
}

impl RegionMap {
    /// Find every region in the document.
    ///
    /// Each required region must occur exactly once; the optional connection
    /// block may occur at most once.
    pub fn locate(doc: &Document) -> Result<Self, RdlError> {
        let mut by_node = HashMap::new();
        for region in Region::ALL {
            let found: Vec<NodeId> = region.find(doc).iter().map(|n| n.id()).collect();

            match found.as_slice() {
                [] if region.is_required() => {
                    return Err(RdlError::TemplateRegionMissing {
                        region: region.name(),
                    })
                }
                [] => debug!("Template has no {} region", region.name()),
                [id] => {
                    by_node.insert(*id, region);
                }
                _ => {
                    return Err(RdlError::TemplateRegionDuplicated {
                        region: region.name(),
                        count: found.len(),
                    })
                }
            }
        }

        Ok(Self { by_node })
    }

    /// Region located at this node, if any
    pub fn region_of(&self, node: &Node) -> Option<Region> {
        self.by_node.get(&node.id()).copied()
    }

    pub fn contains(&self, region: Region) -> bool {
        self.by_node.values().any(|&r| r == region)
    }
}
