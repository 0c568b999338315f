//! Error types for comment extraction

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The input could not be opened as a zip container at all.
    #[error("not a .docx archive: {0}")]
    NotAnArchive(zip::result::ZipError),

    /// The archive opened but holds a spreadsheet package, not a Word
    /// document. Renamed .xlsx files are reported this way instead of as a
    /// bare missing part.
    #[error("not a Word document: the archive contains xl/workbook.xml and looks like an Excel workbook (.xlsx)")]
    ExcelWorkbook,

    /// A part the extraction cannot proceed without is absent.
    ///
    /// Only raised for the document body; a missing comments part is a
    /// legitimate state (a document with no comments) and is not an error.
    #[error("required part missing from archive: {0}")]
    MissingPart(&'static str),

    /// Structurally broken XML in one of the parts. Aborts the whole file;
    /// no partial output is produced.
    #[error("malformed XML in {part}: {detail}")]
    MalformedXml { part: &'static str, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
