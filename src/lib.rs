//! marginalia: extract reviewer comments from .docx files
//!
//! This library pairs every comment in a Word document with the exact text
//! span it annotates, and renders the result as CSV, JSON, or a Markdown
//! table.

pub mod config;
pub mod document;
pub mod export;

/// Export format options
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Markdown,
}

// Re-export commonly used types
pub use document::{CommentRecord, CommentRow, ExtractOptions};
pub use document::{extract_comments, extract_from_reader};
