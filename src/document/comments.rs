//! Parsing of the comments part
//!
//! Each `w:comment` node carries the identifier linking it to a range in the
//! body, optional author/date attributes, and nested paragraphs holding the
//! reviewer's text.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::error::{ExtractError, Result};
use super::io::COMMENTS_PART;
use super::models::CommentRecord;
use super::xml::{is_text_element, resolve_reference};

/// Parse every comment node into a record keyed by identifier.
///
/// Paragraphs within one comment join with a single newline; empty
/// paragraphs are dropped. A comment without a usable id attribute cannot
/// be matched to any range and is skipped.
pub(crate) fn parse_comments(xml: &str) -> Result<HashMap<u64, CommentRecord>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut comments = HashMap::new();
    let mut current: Option<CommentRecord> = None;
    let mut paragraphs: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut in_text = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"comment" => {
                current = comment_from_attributes(e);
                paragraphs.clear();
                paragraph.clear();
            }
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"comment" => {
                // Self-closing comment node: record it with an empty body.
                if let Some(record) = comment_from_attributes(e) {
                    comments.insert(record.id, record);
                }
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"comment" => {
                if let Some(mut record) = current.take() {
                    // Runs not wrapped in a w:p still hold body text.
                    flush_paragraph(&mut paragraph, &mut paragraphs);
                    record.text = paragraphs.join("\n");
                    comments.insert(record.id, record);
                }
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"p" && current.is_some() => {
                flush_paragraph(&mut paragraph, &mut paragraphs);
            }
            Ok(Event::Start(ref e)) if is_text_element(e.name().as_ref()) => {
                in_text = current.is_some();
            }
            Ok(Event::End(ref e)) if is_text_element(e.name().as_ref()) => {
                in_text = false;
            }
            Ok(Event::Text(ref e)) if in_text => {
                let fragment = e.decode().map_err(|err| ExtractError::MalformedXml {
                    part: COMMENTS_PART,
                    detail: err.to_string(),
                })?;
                paragraph.push_str(&fragment);
            }
            Ok(Event::CData(ref e)) if in_text => {
                let fragment =
                    std::str::from_utf8(e).map_err(|err| ExtractError::MalformedXml {
                        part: COMMENTS_PART,
                        detail: err.to_string(),
                    })?;
                paragraph.push_str(fragment);
            }
            Ok(Event::GeneralRef(ref e)) if in_text => {
                if let Some(ch) = resolve_reference(e) {
                    paragraph.push(ch);
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(ExtractError::MalformedXml {
                    part: COMMENTS_PART,
                    detail: err.to_string(),
                });
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(comments)
}

/// Move the pending paragraph text, trimmed, into the finished list.
fn flush_paragraph(paragraph: &mut String, paragraphs: &mut Vec<String>) {
    let text = paragraph.trim();
    if !text.is_empty() {
        paragraphs.push(text.to_string());
    }
    paragraph.clear();
}

/// Build a record from a comment node's attributes, or `None` when the id
/// is missing or non-numeric.
fn comment_from_attributes(e: &BytesStart) -> Option<CommentRecord> {
    let mut id = None;
    let mut author = None;
    let mut date = None;

    for attr in e.attributes().flatten() {
        match attr.key.local_name().as_ref() {
            b"id" => {
                id = String::from_utf8_lossy(&attr.value).parse().ok();
            }
            b"author" => {
                author = attr.unescape_value().ok().map(|value| value.into_owned());
            }
            b"date" => {
                date = attr.unescape_value().ok().map(|value| value.into_owned());
            }
            _ => {}
        }
    }

    Some(CommentRecord {
        id: id?,
        text: String::new(),
        author,
        date,
    })
}
