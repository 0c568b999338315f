//! Export functionality for extracted comment rows
//!
//! Renders assembled rows as CSV (the default), pretty-printed JSON, or a
//! padded Markdown pipe table. Column layout follows the extraction
//! options: author/date columns appear only when the caller asked for them.

use anyhow::Result;
use serde_json::json;
use unicode_segmentation::UnicodeSegmentation;

use crate::ExportFormat;
use crate::document::models::{CommentRow, ExtractOptions};

/// Render `rows` in the requested format.
pub fn render(
    format: &ExportFormat,
    rows: &[CommentRow],
    options: &ExtractOptions,
) -> Result<String> {
    match format {
        ExportFormat::Csv => Ok(render_csv(rows, options)),
        ExportFormat::Json => render_json(rows, options),
        ExportFormat::Markdown => Ok(render_markdown(rows, options)),
    }
}

fn column_headers(options: &ExtractOptions) -> Vec<&'static str> {
    let mut headers = vec!["Commented Text", "Comment"];
    if options.include_author {
        headers.push("Author");
    }
    if options.include_date {
        headers.push("Date");
    }
    headers
}

fn row_cells<'a>(row: &'a CommentRow, options: &ExtractOptions) -> Vec<&'a str> {
    let mut cells = vec![row.commented_text.as_str(), row.comment.as_str()];
    if options.include_author {
        cells.push(row.author.as_deref().unwrap_or(""));
    }
    if options.include_date {
        cells.push(row.date.as_deref().unwrap_or(""));
    }
    cells
}

/// Render rows as CSV with a header row.
pub fn render_csv(rows: &[CommentRow], options: &ExtractOptions) -> String {
    let mut out = String::new();
    push_csv_record(&mut out, &column_headers(options));
    for row in rows {
        push_csv_record(&mut out, &row_cells(row, options));
    }
    out
}

fn push_csv_record(out: &mut String, cells: &[&str]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_csv_field(out, cell);
    }
    out.push('\n');
}

/// Quote a field when it contains a comma, quote, or line break; quotes
/// inside a quoted field are doubled.
fn push_csv_field(out: &mut String, field: &str) {
    if field.contains(['"', ',', '\n', '\r']) {
        out.push('"');
        for ch in field.chars() {
            if ch == '"' {
                out.push('"');
            }
            out.push(ch);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// Render rows as a pretty-printed JSON array.
///
/// Author/date keys appear only when requested, and serialize as `null`
/// when the comment carried no such attribute.
pub fn render_json(rows: &[CommentRow], options: &ExtractOptions) -> Result<String> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let mut record = serde_json::Map::new();
        record.insert("id".to_string(), json!(row.id));
        record.insert("commented_text".to_string(), json!(row.commented_text));
        record.insert("comment".to_string(), json!(row.comment));
        if options.include_author {
            record.insert("author".to_string(), json!(row.author));
        }
        if options.include_date {
            record.insert("date".to_string(), json!(row.date));
        }
        records.push(serde_json::Value::Object(record));
    }
    let mut out = serde_json::to_string_pretty(&records)?;
    out.push('\n');
    Ok(out)
}

/// Render rows as a Markdown pipe table with padded columns.
pub fn render_markdown(rows: &[CommentRow], options: &ExtractOptions) -> String {
    let headers = column_headers(options);
    let escaped: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row_cells(row, options)
                .iter()
                .map(|cell| escape_markdown_cell(cell))
                .collect()
        })
        .collect();

    // Column widths follow the widest cell, with a minimum of 3
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in &escaped {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(display_width(cell));
            }
        }
    }
    widths.iter_mut().for_each(|w| *w = (*w).max(3));

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = String::new();
    push_markdown_row(&mut out, &header_cells, &widths);
    out.push('|');
    for width in &widths {
        out.push(' ');
        out.push_str(&"-".repeat(*width));
        out.push_str(" |");
    }
    out.push('\n');
    for row in &escaped {
        push_markdown_row(&mut out, row, &widths);
    }
    out
}

fn push_markdown_row(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.iter().zip(widths) {
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(width.saturating_sub(display_width(cell))));
        out.push_str(" |");
    }
    out.push('\n');
}

/// Pipes would break the table structure; line breaks become `<br>`.
fn escape_markdown_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}

/// Display width in graphemes for proper unicode handling.
fn display_width(text: &str) -> usize {
    UnicodeSegmentation::graphemes(text, true).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_fields_quote_only_when_needed() {
        let mut out = String::new();
        push_csv_field(&mut out, "plain");
        assert_eq!(out, "plain");

        let mut out = String::new();
        push_csv_field(&mut out, "a, b");
        assert_eq!(out, "\"a, b\"");

        let mut out = String::new();
        push_csv_field(&mut out, "say \"hi\"");
        assert_eq!(out, "\"say \"\"hi\"\"\"");

        let mut out = String::new();
        push_csv_field(&mut out, "two\nlines");
        assert_eq!(out, "\"two\nlines\"");
    }

    #[test]
    fn markdown_cells_escape_pipes_and_newlines() {
        assert_eq!(escape_markdown_cell("a|b"), "a\\|b");
        assert_eq!(escape_markdown_cell("a\nb"), "a<br>b");
        assert_eq!(escape_markdown_cell("a\r\nb"), "a<br>b");
    }

    #[test]
    fn display_width_counts_graphemes() {
        assert_eq!(display_width("héllo"), 5);
        assert_eq!(display_width(""), 0);
    }
}
