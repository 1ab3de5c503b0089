//! Generated content of each placeholder region

use quick_xml::Writer;
use std::io::Write;

use super::cells::{write_detail_cell, write_header_cell};
use super::xml_helpers::{end, start, start_named, write_text_element};
use super::RenderSettings;
use crate::descriptor::{ReportDescriptor, CURSOR_BINDING_NAME};
use crate::template::Region;
use crate::util::unique_identifiers;

/// Default value given to every report parameter
pub const REPORT_PARAMETER_DEFAULT: &str = "-1";

/// Number of child elements a region receives
pub(crate) fn child_count(region: Region, descriptor: &ReportDescriptor) -> usize {
    match region {
        Region::Fields | Region::TableColumns | Region::HeaderCells | Region::DetailCells => {
            descriptor.fields.len()
        }
        Region::QueryParameters => descriptor.query_binding_count(),
        Region::ReportParameters => descriptor.parameters.len(),
        Region::ConnectString | Region::CommandText | Region::TableName => 0,
    }
}

/// Write the children of an element-list region.
///
/// Text and attribute regions (`ConnectString`, `CommandText`, `TableName`)
/// are handled by the document writer and produce nothing here.
pub(crate) fn write_region_children<W: Write>(
    writer: &mut Writer<W>,
    region: Region,
    descriptor: &ReportDescriptor,
    settings: &RenderSettings,
) -> anyhow::Result<()> {
    match region {
        Region::Fields => write_fields(writer, descriptor, settings),
        Region::QueryParameters => write_query_parameters(writer, descriptor),
        Region::ReportParameters => write_report_parameters(writer, descriptor),
        Region::TableColumns => write_table_columns(writer, descriptor, settings),
        Region::HeaderCells => {
            for (field, identifier) in descriptor.fields.iter().zip(cell_identifiers(descriptor)) {
                write_header_cell(writer, &field.name, &identifier)?;
            }
            Ok(())
        }
        Region::DetailCells => {
            let first_field = descriptor.first_field_name();
            for (field, identifier) in descriptor.fields.iter().zip(cell_identifiers(descriptor)) {
                write_detail_cell(writer, &field.name, &identifier, first_field)?;
            }
            Ok(())
        }
        Region::ConnectString | Region::CommandText | Region::TableName => Ok(()),
    }
}

/// Textbox identifiers of the table cells, one per field
fn cell_identifiers(descriptor: &ReportDescriptor) -> Vec<String> {
    unique_identifiers(descriptor.fields.iter().map(|f| f.name.as_str()))
}

/// `<Field Name="n"><DataField>n</DataField><TypeName>t</TypeName></Field>`
fn write_fields<W: Write>(
    writer: &mut Writer<W>,
    descriptor: &ReportDescriptor,
    settings: &RenderSettings,
) -> anyhow::Result<()> {
    for field in &descriptor.fields {
        let type_name = field
            .type_name
            .as_deref()
            .unwrap_or(settings.default_field_type.as_str());
        start_named(writer, "Field", &field.name)?;
        write_text_element(writer, "DataField", &field.name)?;
        write_text_element(writer, "TypeName", type_name)?;
        end(writer, "Field")?;
    }
    Ok(())
}

/// One binding per non-reserved parameter, then the cursor binding.
fn write_query_parameters<W: Write>(
    writer: &mut Writer<W>,
    descriptor: &ReportDescriptor,
) -> anyhow::Result<()> {
    for param in descriptor.query_parameters() {
        start_named(writer, "QueryParameter", &format!("@{}", param.name))?;
        write_text_element(writer, "Value", &format!("=Parameters!{}.Value", param.name))?;
        end(writer, "QueryParameter")?;
    }

    start_named(writer, "QueryParameter", CURSOR_BINDING_NAME)?;
    write_text_element(writer, "Value", "")?;
    end(writer, "QueryParameter")
}

fn write_report_parameters<W: Write>(
    writer: &mut Writer<W>,
    descriptor: &ReportDescriptor,
) -> anyhow::Result<()> {
    for param in &descriptor.parameters {
        start_named(writer, "ReportParameter", &param.name)?;
        write_text_element(writer, "DataType", &param.rdl_data_type())?;
        start(writer, "DefaultValue")?;
        start(writer, "Values")?;
        write_text_element(writer, "Value", REPORT_PARAMETER_DEFAULT)?;
        end(writer, "Values")?;
        end(writer, "DefaultValue")?;
        end(writer, "ReportParameter")?;
    }
    Ok(())
}

fn write_table_columns<W: Write>(
    writer: &mut Writer<W>,
    descriptor: &ReportDescriptor,
    settings: &RenderSettings,
) -> anyhow::Result<()> {
    for _ in &descriptor.fields {
        start(writer, "TableColumn")?;
        write_text_element(writer, "Width", &settings.column_width)?;
        end(writer, "TableColumn")?;
    }
    Ok(())
}
