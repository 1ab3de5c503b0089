//! Low-level XML writing utilities for report definition rendering.
//!
//! These are the building blocks the region writers use to emit elements,
//! named elements and style blocks.

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Text event escaping only `<`, `>` and `&`, so quotes in expressions stay readable.
pub(crate) fn text_event(value: &str) -> Event<'_> {
    Event::Text(BytesText::from_escaped(partial_escape(value)))
}

/// Write an element with text content.
///
/// Generates: `<name>value</name>`, or `<name/>` when `value` is empty.
pub(crate) fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> anyhow::Result<()> {
    if value.is_empty() {
        return write_empty_element(writer, name);
    }
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(text_event(value))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Generates: `<name/>`
pub(crate) fn write_empty_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
) -> anyhow::Result<()> {
    writer.write_event(Event::Empty(BytesStart::new(name)))?;
    Ok(())
}

/// Write an element whose content is a CDATA section.
///
/// A value containing `]]>` cannot be wrapped in CDATA and is written as
/// escaped text instead.
///
/// Generates: `<name><![CDATA[value]]></name>`
pub(crate) fn write_cdata_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> anyhow::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    if value.contains("]]>") {
        writer.write_event(text_event(value))?;
    } else {
        writer.write_event(Event::CData(BytesCData::new(value)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Open an element carrying a `Name` attribute.
///
/// Generates: `<element Name="name">`
pub(crate) fn start_named<W: Write>(
    writer: &mut Writer<W>,
    element: &str,
    name: &str,
) -> anyhow::Result<()> {
    let start = BytesStart::new(element).with_attributes([("Name", name)]);
    writer.write_event(Event::Start(start))?;
    Ok(())
}

pub(crate) fn start<W: Write>(writer: &mut Writer<W>, element: &str) -> anyhow::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(element)))?;
    Ok(())
}

pub(crate) fn end<W: Write>(writer: &mut Writer<W>, element: &str) -> anyhow::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(element)))?;
    Ok(())
}

/// Write one text element per `(name, value)` pair.
pub(crate) fn write_text_elements<W: Write>(
    writer: &mut Writer<W>,
    pairs: &[(&str, &str)],
) -> anyhow::Result<()> {
    for (name, value) in pairs {
        write_text_element(writer, name, value)?;
    }
    Ok(())
}
