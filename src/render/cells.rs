//! Table cell writers for the header and detail rows

use quick_xml::Writer;
use std::io::Write;

use super::xml_helpers::{
    end, start, start_named, write_empty_element, write_text_element, write_text_elements,
};
use crate::util::{humanize_label, sanitize_identifier};

const BORDER_COLOR: &str = "#dfdfdf";

const HEADER_STYLE: &[(&str, &str)] = &[
    ("FontFamily", "Calibri"),
    ("FontSize", "11pt"),
    ("Color", "#666666"),
    ("TextAlign", "Center"),
    ("PaddingLeft", "8pt"),
    ("PaddingRight", "5pt"),
    ("PaddingTop", "5pt"),
    ("PaddingBottom", "5pt"),
    ("FontWeight", "700"),
    ("BackgroundColor", "#FAFAFA"),
];

const HEADER_LAYOUT: &[(&str, &str)] = &[
    ("Top", ".3in"),
    ("Left", ".3in"),
    ("Height", "0in"),
    ("Width", "2pt"),
    ("CanGrow", "true"),
];

const DETAIL_STYLE: &[(&str, &str)] = &[
    ("FontFamily", "Verdana, Arial, Helvetica"),
    ("FontSize", "10pt"),
    ("TextAlign", "Center"),
    ("PaddingLeft", "8pt"),
    ("PaddingRight", "2pt"),
    ("PaddingTop", "10pt"),
    ("PaddingBottom", "10pt"),
];

const DETAIL_LAYOUT: &[(&str, &str)] = &[
    ("Top", "0in"),
    ("Left", "0in"),
    ("Height", ".25in"),
    ("Width", "0pt"),
    ("CanGrow", "true"),
];

const DETAIL_BACKGROUND: &str = r##"=iif(RowNumber(Nothing) Mod 2, "#FFFFFF","#FFFFFF")"##;

/// Textbox name of a header cell: `Header<identifier>`
pub fn header_textbox_name(field_name: &str) -> String {
    format!("Header{}", sanitize_identifier(field_name))
}

/// Textbox name of a detail cell: `Details<identifier>`
pub fn detail_textbox_name(field_name: &str) -> String {
    format!("Details{}", sanitize_identifier(field_name))
}

/// Value expression binding a textbox to a field
pub fn field_value_expression(field_name: &str) -> String {
    format!("=Fields!{}.Value", field_name)
}

/// Write a `BorderColor` block with the four sides in the given order
fn write_border_color<W: Write>(writer: &mut Writer<W>, sides: &[&str]) -> anyhow::Result<()> {
    start(writer, "BorderColor")?;
    for side in sides {
        write_text_element(writer, side, BORDER_COLOR)?;
    }
    end(writer, "BorderColor")
}

/// Open `<TableCell><ReportItems><Textbox Name="...">`
fn open_cell<W: Write>(writer: &mut Writer<W>, textbox_name: &str) -> anyhow::Result<()> {
    start(writer, "TableCell")?;
    start(writer, "ReportItems")?;
    start_named(writer, "Textbox", textbox_name)
}

fn close_cell<W: Write>(writer: &mut Writer<W>) -> anyhow::Result<()> {
    end(writer, "Textbox")?;
    end(writer, "ReportItems")?;
    end(writer, "TableCell")
}

/// Write one header cell labelled with the humanized field name.
///
/// `identifier` names the textbox and must be unique within the table
/// (see [`crate::util::unique_identifiers`]).
pub fn write_header_cell<W: Write>(
    writer: &mut Writer<W>,
    field_name: &str,
    identifier: &str,
) -> anyhow::Result<()> {
    open_cell(writer, &header_textbox_name(identifier))?;

    start(writer, "Style")?;
    write_text_elements(writer, HEADER_STYLE)?;
    write_border_color(writer, &["Bottom", "Left", "Top", "Right"])?;
    start(writer, "BorderStyle")?;
    for side in ["Bottom", "Left", "Top", "Right"] {
        write_empty_element(writer, side)?;
    }
    end(writer, "BorderStyle")?;
    end(writer, "Style")?;

    write_text_elements(writer, HEADER_LAYOUT)?;
    write_text_element(writer, "Value", &humanize_label(field_name))?;

    close_cell(writer)
}

/// Write one detail cell bound to the field's value.
///
/// The font colour rule references `first_field`, the first field of the dataset.
pub fn write_detail_cell<W: Write>(
    writer: &mut Writer<W>,
    field_name: &str,
    identifier: &str,
    first_field: &str,
) -> anyhow::Result<()> {
    open_cell(writer, &detail_textbox_name(identifier))?;

    start(writer, "Style")?;
    write_text_elements(writer, DETAIL_STYLE)?;
    write_border_color(writer, &["Right", "Top", "Bottom", "Left"])?;
    write_empty_element(writer, "BorderStyle")?;
    write_text_element(writer, "BackgroundColor", DETAIL_BACKGROUND)?;
    let color_rule = format!(
        r##"=iif(Fields!{}.Value < 0, "#000000","#222222")"##,
        first_field
    );
    write_text_element(writer, "Color", &color_rule)?;
    end(writer, "Style")?;

    write_text_elements(writer, DETAIL_LAYOUT)?;
    write_text_element(writer, "Value", &field_value_expression(field_name))?;

    close_cell(writer)
}
