//! Core data structures for extracted comments
//!
//! This module defines the public types flowing through the extraction
//! pipeline: parsed comments, assembled output rows, and the caller-supplied
//! extraction policy.

use serde::{Deserialize, Serialize};

/// A single comment as parsed from the comments part.
///
/// `author` and `date` are `None` when the attribute is absent on the
/// comment node, which is distinct from an attribute present but empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: u64,
    pub text: String,
    pub author: Option<String>,
    pub date: Option<String>,
}

/// One output row: a comment paired with the text its range covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: u64,
    pub commented_text: String,
    pub comment: String,
    pub author: Option<String>,
    pub date: Option<String>,
}

/// Extraction policy supplied by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Emit rows whose commented text is empty after trimming.
    pub keep_empty: bool,
    /// Carry the comment author into the output rows.
    pub include_author: bool,
    /// Carry the comment date into the output rows.
    pub include_date: bool,
}
