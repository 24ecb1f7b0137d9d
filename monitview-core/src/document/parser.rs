//! Drives a [`StructureBuilder`] from the quick-xml pull parser

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::error::{DocumentError, DocumentResult};
use crate::tracing::field_names;

use super::builder::{ParseOptions, StructureBuilder};
use super::tree::StatusDocument;

/// Parses a status report body into a [`StatusDocument`].
///
/// Text chunks, CDATA sections, and entity references each count as one
/// character-data event, so an element whose text is split by a reference
/// keeps only its last non-blank chunk.
///
/// # Errors
///
/// Returns a [`DocumentError`] if the XML is not well-formed, a closing tag
/// has no opening tag, elements remain open at the end, or an entity other
/// than the predefined ones is referenced. No partial document is returned.
pub fn parse_status(body: &[u8], options: ParseOptions) -> DocumentResult<StatusDocument> {
    let mut reader = Reader::from_reader(body);
    // Stray closing tags are reported by the builder as `UnmatchedClose`;
    // mismatched names are still rejected by the tokenizer.
    reader.config_mut().allow_unmatched_ends = true;
    let mut builder = StructureBuilder::new(options);
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| DocumentError::Syntax {
                position: reader.error_position(),
                message: e.to_string(),
            })?;

        match event {
            Event::Start(e) => {
                let (name, service_type) = element_parts(&e, &builder, reader.buffer_position())?;
                builder.open(&name, service_type.as_deref());
            }
            Event::Empty(e) => {
                let (name, service_type) = element_parts(&e, &builder, reader.buffer_position())?;
                builder.open(&name, service_type.as_deref());
                builder.close(&name)?;
            }
            Event::End(e) => {
                builder.close(&String::from_utf8_lossy(e.name().as_ref()))?;
            }
            Event::Text(e) => {
                let text = e
                    .decode()
                    .map_err(|err| DocumentError::Encoding(err.to_string()))?;
                builder.text(&text);
            }
            Event::CData(e) => {
                let text = e
                    .decode()
                    .map_err(|err| DocumentError::Encoding(err.to_string()))?;
                builder.text(&text);
            }
            Event::GeneralRef(e) => {
                builder.text(&resolve_reference(&e, reader.buffer_position())?);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, DOCTYPE
            _ => {}
        }
        buf.clear();
    }

    let document = builder.finish()?;
    tracing::debug!(
        { field_names::SERVICE_COUNT } = document.service_count,
        top_level_keys = document.tree.len(),
        "Status document parsed"
    );
    Ok(document)
}

/// Extracts the element name and the raw `TYPE` attribute value
fn element_parts(
    element: &BytesStart<'_>,
    builder: &StructureBuilder,
    position: u64,
) -> DocumentResult<(String, Option<String>)> {
    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();

    let mut service_type = None;
    for attr in element.attributes() {
        let attr = attr.map_err(|e| DocumentError::Syntax {
            position,
            message: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref());
        if builder.is_type_attribute(&key) {
            service_type = Some(String::from_utf8_lossy(&attr.value).into_owned());
        }
    }

    Ok((name, service_type))
}

/// Resolves a character reference or one of the five predefined entities
fn resolve_reference(
    reference: &BytesRef<'_>,
    position: u64,
) -> DocumentResult<Cow<'static, str>> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|e| DocumentError::Syntax {
            position,
            message: e.to_string(),
        })?
    {
        return Ok(Cow::Owned(ch.to_string()));
    }

    let name = reference
        .decode()
        .map_err(|e| DocumentError::Encoding(e.to_string()))?;
    resolve_predefined_entity(&name)
        .map(Cow::Borrowed)
        .ok_or_else(|| DocumentError::UnknownEntity(name.into_owned()))
}
