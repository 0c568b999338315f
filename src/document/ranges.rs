//! Comment range tracking over the document body
//!
//! The body interleaves `commentRangeStart`/`commentRangeEnd` markers with
//! ordinary runs. Ranges may nest or overlap arbitrarily, so the scan keeps
//! a set of currently-open identifiers and attributes each text fragment to
//! every range open at that point.

use std::collections::{HashMap, HashSet};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::error::{ExtractError, Result};
use super::io::DOCUMENT_PART;
use super::xml::{is_text_element, resolve_reference};

/// Commented text keyed by comment identifier, remembering the order in
/// which identifiers first opened a range.
#[derive(Debug, Default)]
pub(crate) struct RangeTexts {
    texts: HashMap<u64, String>,
    order: Vec<u64>,
}

impl RangeTexts {
    /// Raw accumulated text for `id`, untrimmed.
    pub(crate) fn get(&self, id: u64) -> Option<&str> {
        self.texts.get(&id).map(String::as_str)
    }

    /// Identifiers in the order their first range-start appeared.
    pub(crate) fn ids_in_document_order(&self) -> &[u64] {
        &self.order
    }

    fn open(&mut self, id: u64) {
        if !self.texts.contains_key(&id) {
            self.texts.insert(id, String::new());
            self.order.push(id);
        }
    }

    fn append(&mut self, id: u64, fragment: &str) {
        if let Some(text) = self.texts.get_mut(&id) {
            text.push_str(fragment);
        }
    }
}

/// Scan the document body and accumulate, per comment identifier, the text
/// covered while that identifier's range is open.
///
/// Text inside two simultaneously open ranges is attributed to both. A
/// range-end with no prior start is ignored, and ranges still open at the
/// end of the document keep whatever they accumulated.
pub(crate) fn scan_document(xml: &str) -> Result<RangeTexts> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false); // w:t whitespace is significant

    let mut ranges = RangeTexts::default();
    let mut open_ids: HashSet<u64> = HashSet::new();
    let mut in_text = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"commentRangeStart" =>
            {
                if let Some(id) = marker_id(e) {
                    ranges.open(id);
                    open_ids.insert(id);
                }
            }
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"commentRangeEnd" =>
            {
                // An end with no prior start has nothing to seal.
                if let Some(id) = marker_id(e) {
                    open_ids.remove(&id);
                }
            }
            Ok(Event::Start(ref e)) if is_text_element(e.name().as_ref()) => {
                in_text = true;
            }
            Ok(Event::End(ref e)) if is_text_element(e.name().as_ref()) => {
                in_text = false;
            }
            Ok(Event::Text(ref e)) if in_text && !open_ids.is_empty() => {
                let fragment = e.decode().map_err(|err| ExtractError::MalformedXml {
                    part: DOCUMENT_PART,
                    detail: err.to_string(),
                })?;
                for id in &open_ids {
                    ranges.append(*id, &fragment);
                }
            }
            Ok(Event::CData(ref e)) if in_text && !open_ids.is_empty() => {
                // CDATA content is literal text with no markup or references
                let fragment =
                    std::str::from_utf8(e).map_err(|err| ExtractError::MalformedXml {
                        part: DOCUMENT_PART,
                        detail: err.to_string(),
                    })?;
                for id in &open_ids {
                    ranges.append(*id, fragment);
                }
            }
            Ok(Event::GeneralRef(ref e)) if in_text && !open_ids.is_empty() => {
                if let Some(ch) = resolve_reference(e) {
                    let mut utf8 = [0u8; 4];
                    let fragment = ch.encode_utf8(&mut utf8);
                    for id in &open_ids {
                        ranges.append(*id, fragment);
                    }
                }
            }
            Ok(Event::Eof) => break, // still-open ranges seal implicitly
            Err(err) => {
                return Err(ExtractError::MalformedXml {
                    part: DOCUMENT_PART,
                    detail: err.to_string(),
                });
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(ranges)
}

/// Pull the `w:id` attribute off a range marker. Markers with a missing or
/// non-numeric id are skipped rather than failing the whole document.
fn marker_id(e: &BytesStart) -> Option<u64> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == b"id" {
            return String::from_utf8_lossy(&attr.value).parse().ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(inner: &str) -> String {
        format!(
            "<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\" \
             xmlns:m=\"http://schemas.openxmlformats.org/officeDocument/2006/math\">\
             <w:body>{inner}</w:body></w:document>"
        )
    }

    #[test]
    fn collects_text_between_markers() {
        let xml = body(
            "<w:p><w:commentRangeStart w:id=\"1\"/><w:r><w:t xml:space=\"preserve\">Hello </w:t></w:r>\
             <w:commentRangeEnd w:id=\"1\"/></w:p>",
        );
        let ranges = scan_document(&xml).unwrap();
        assert_eq!(ranges.get(1), Some("Hello "));
    }

    #[test]
    fn overlapping_ranges_both_receive_shared_text() {
        let xml = body(
            "<w:p><w:commentRangeStart w:id=\"1\"/><w:r><w:t xml:space=\"preserve\">A </w:t></w:r>\
             <w:commentRangeStart w:id=\"2\"/><w:r><w:t>B</w:t></w:r>\
             <w:commentRangeEnd w:id=\"1\"/><w:r><w:t xml:space=\"preserve\"> C</w:t></w:r>\
             <w:commentRangeEnd w:id=\"2\"/></w:p>",
        );
        let ranges = scan_document(&xml).unwrap();
        assert_eq!(ranges.get(1), Some("A B"));
        assert_eq!(ranges.get(2), Some("B C"));
    }

    #[test]
    fn text_outside_any_range_is_not_collected() {
        let xml = body(
            "<w:p><w:r><w:t>before</w:t></w:r>\
             <w:commentRangeStart w:id=\"3\"/><w:r><w:t>inside</w:t></w:r>\
             <w:commentRangeEnd w:id=\"3\"/><w:r><w:t>after</w:t></w:r></w:p>",
        );
        let ranges = scan_document(&xml).unwrap();
        assert_eq!(ranges.get(3), Some("inside"));
    }

    #[test]
    fn end_without_start_creates_no_accumulator() {
        let xml = body("<w:p><w:commentRangeEnd w:id=\"7\"/><w:r><w:t>text</w:t></w:r></w:p>");
        let ranges = scan_document(&xml).unwrap();
        assert_eq!(ranges.get(7), None);
        assert!(ranges.ids_in_document_order().is_empty());
    }

    #[test]
    fn unclosed_range_keeps_accumulated_text() {
        let xml = body("<w:p><w:commentRangeStart w:id=\"4\"/><w:r><w:t>dangling</w:t></w:r></w:p>");
        let ranges = scan_document(&xml).unwrap();
        assert_eq!(ranges.get(4), Some("dangling"));
    }

    #[test]
    fn reopened_identifier_appends_to_its_text() {
        let xml = body(
            "<w:p><w:commentRangeStart w:id=\"5\"/><w:r><w:t>first</w:t></w:r>\
             <w:commentRangeEnd w:id=\"5\"/><w:r><w:t>skipped</w:t></w:r>\
             <w:commentRangeStart w:id=\"5\"/><w:r><w:t>second</w:t></w:r>\
             <w:commentRangeEnd w:id=\"5\"/></w:p>",
        );
        let ranges = scan_document(&xml).unwrap();
        assert_eq!(ranges.get(5), Some("firstsecond"));
        assert_eq!(ranges.ids_in_document_order(), [5]);
    }

    #[test]
    fn math_text_is_not_collected() {
        let xml = body(
            "<w:p><w:commentRangeStart w:id=\"6\"/>\
             <m:oMath><m:r><m:t>x+1</m:t></m:r></m:oMath>\
             <w:r><w:t>prose</w:t></w:r><w:commentRangeEnd w:id=\"6\"/></w:p>",
        );
        let ranges = scan_document(&xml).unwrap();
        assert_eq!(ranges.get(6), Some("prose"));
    }

    #[test]
    fn first_start_order_is_preserved() {
        let xml = body(
            "<w:p><w:commentRangeStart w:id=\"9\"/><w:r><w:t>a</w:t></w:r><w:commentRangeEnd w:id=\"9\"/>\
             <w:commentRangeStart w:id=\"2\"/><w:r><w:t>b</w:t></w:r><w:commentRangeEnd w:id=\"2\"/>\
             <w:commentRangeStart w:id=\"5\"/><w:r><w:t>c</w:t></w:r><w:commentRangeEnd w:id=\"5\"/></w:p>",
        );
        let ranges = scan_document(&xml).unwrap();
        assert_eq!(ranges.ids_in_document_order(), [9, 2, 5]);
    }

    #[test]
    fn entities_are_decoded() {
        let xml = body(
            "<w:p><w:commentRangeStart w:id=\"1\"/><w:r><w:t>a &amp; b</w:t></w:r>\
             <w:commentRangeEnd w:id=\"1\"/></w:p>",
        );
        let ranges = scan_document(&xml).unwrap();
        assert_eq!(ranges.get(1), Some("a & b"));
    }

    #[test]
    fn character_references_are_decoded() {
        let xml = body(
            "<w:p><w:commentRangeStart w:id=\"1\"/><w:r><w:t>caf&#233; &#x2014; stop</w:t></w:r>\
             <w:commentRangeEnd w:id=\"1\"/></w:p>",
        );
        let ranges = scan_document(&xml).unwrap();
        assert_eq!(ranges.get(1), Some("caf\u{e9} \u{2014} stop"));
    }

    #[test]
    fn cdata_text_is_collected() {
        let xml = body(
            "<w:p><w:commentRangeStart w:id=\"1\"/><w:r><w:t><![CDATA[a < b & c]]></w:t></w:r>\
             <w:commentRangeEnd w:id=\"1\"/></w:p>",
        );
        let ranges = scan_document(&xml).unwrap();
        assert_eq!(ranges.get(1), Some("a < b & c"));
    }

    #[test]
    fn marker_without_id_is_skipped() {
        let xml = body(
            "<w:p><w:commentRangeStart/><w:commentRangeStart w:id=\"1\"/>\
             <w:r><w:t>kept</w:t></w:r><w:commentRangeEnd w:id=\"1\"/></w:p>",
        );
        let ranges = scan_document(&xml).unwrap();
        assert_eq!(ranges.ids_in_document_order(), [1]);
        assert_eq!(ranges.get(1), Some("kept"));
    }

    #[test]
    fn broken_xml_aborts_the_scan() {
        let err = scan_document("<w:document><w:body><w:p></w:document>").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedXml { .. }));
    }
}
