//! Archive access and input validation
//!
//! This module opens the .docx container and pulls out the two XML parts
//! that comment extraction needs: the document body and the comments
//! collection.

use anyhow::bail;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

use super::error::{ExtractError, Result};

pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
pub(crate) const COMMENTS_PART: &str = "word/comments.xml";

/// Present in .xlsx archives; its existence marks a renamed Excel workbook.
const WORKBOOK_PART: &str = "xl/workbook.xml";

/// The raw XML of the parts involved in comment extraction.
pub(crate) struct DocxParts {
    pub(crate) document: String,
    /// `None` when the archive has no comments part, which is a legitimate
    /// state (a document nobody commented on), not an error.
    pub(crate) comments: Option<String>,
}

/// Validates that the file is a legitimate .docx file
///
/// Produces user-facing messages for the CLI; library callers should rely
/// on the typed errors from [`crate::document::extract_comments`] instead.
pub fn validate_docx_file(file_path: &Path) -> anyhow::Result<()> {
    // Check file extension
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if !extension.eq_ignore_ascii_case("docx") {
        bail!(
            "Invalid file format. Expected .docx file, got .{}\n\
            Note: marginalia only reads Word .docx files (not .doc, .xlsx, .zip, etc.)",
            extension
        );
    }

    // Check ZIP structure contains word/document.xml
    let file = File::open(file_path)?;
    let mut archive = ZipArchive::new(file)?;

    if archive.by_name(DOCUMENT_PART).is_err() {
        // Check if it might be an Excel file
        if archive.by_name(WORKBOOK_PART).is_ok() {
            bail!(
                "This appears to be an Excel file (.xlsx).\n\
                marginalia only reads Word documents (.docx)."
            );
        }

        bail!(
            "Invalid .docx file: missing word/document.xml\n\
            This file may be corrupted or is not a valid Word document."
        );
    }

    Ok(())
}

/// Open the document at `path` and read the parts needed for extraction.
pub(crate) fn read_path(path: &Path) -> Result<DocxParts> {
    let file = File::open(path)?;
    read_parts(file)
}

/// Read the parts from any seekable zip stream.
pub(crate) fn read_parts<R: Read + Seek>(reader: R) -> Result<DocxParts> {
    let mut archive = ZipArchive::new(reader).map_err(ExtractError::NotAnArchive)?;

    let document = match part_text(&mut archive, DOCUMENT_PART)? {
        Some(document) => document,
        None => return Err(missing_document_error(&mut archive)),
    };
    let comments = part_text(&mut archive, COMMENTS_PART)?;

    Ok(DocxParts { document, comments })
}

/// Tell a plain missing body apart from an archive that is really an Excel
/// workbook.
fn missing_document_error<R: Read + Seek>(archive: &mut ZipArchive<R>) -> ExtractError {
    if archive.by_name(WORKBOOK_PART).is_ok() {
        ExtractError::ExcelWorkbook
    } else {
        ExtractError::MissingPart(DOCUMENT_PART)
    }
}

/// Read one archive member as text, or `None` when the member is absent.
fn part_text<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut member = match archive.by_name(name) {
        Ok(member) => member,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(ExtractError::NotAnArchive(err)),
    };

    // The declared size is untrusted zip metadata, so no preallocation.
    let mut bytes = Vec::new();
    member.read_to_end(&mut bytes)?;

    // Some producers put a UTF-8 BOM ahead of the XML declaration.
    let text = String::from_utf8_lossy(&bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    Ok(Some(text.to_string()))
}
