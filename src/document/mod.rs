//! Comment extraction pipeline for .docx documents
//!
//! The pipeline makes two independent passes over the archive: one across
//! the document body collecting the text each comment range covers, one
//! across the comments part collecting comment bodies. The results are then
//! joined by comment identifier into ordered output rows.

pub mod error;
pub mod models;

mod assemble;
mod comments;
mod io;
mod ranges;
mod xml;

// Re-export the models and the CLI-facing validator
pub use io::validate_docx_file;
pub use models::*;

use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;

use error::Result;

/// Extract comment rows from the document at `path`.
///
/// Returns an empty vector for a valid document that simply has no
/// comments. Errors are reserved for unreadable or structurally broken
/// files; see [`error::ExtractError`].
pub fn extract_comments(path: &Path, options: &ExtractOptions) -> Result<Vec<CommentRow>> {
    let parts = io::read_path(path)?;
    extract_parts(parts, options)
}

/// Extract comment rows from an already-open, seekable container such as an
/// in-memory buffer.
pub fn extract_from_reader<R: Read + Seek>(
    reader: R,
    options: &ExtractOptions,
) -> Result<Vec<CommentRow>> {
    let parts = io::read_parts(reader)?;
    extract_parts(parts, options)
}

fn extract_parts(parts: io::DocxParts, options: &ExtractOptions) -> Result<Vec<CommentRow>> {
    let ranges = ranges::scan_document(&parts.document)?;
    let comments = match parts.comments {
        Some(xml) => comments::parse_comments(&xml)?,
        // No comments part means no comments, not a broken file.
        None => HashMap::new(),
    };
    Ok(assemble::assemble_rows(&ranges, &comments, options))
}
