//! Joining range text with comment bodies into ordered output rows

use std::collections::HashMap;

use super::models::{CommentRecord, CommentRow, ExtractOptions};
use super::ranges::RangeTexts;

/// Pair each commented range with its comment body, in the order ranges
/// first opened in the document.
///
/// Ranges with no matching comment are dropped, as are comments with no
/// matching range. Rows whose commented text trims to empty are dropped
/// unless `keep_empty` is set. Author and date are carried only when the
/// corresponding option asks for them.
pub(crate) fn assemble_rows(
    ranges: &RangeTexts,
    comments: &HashMap<u64, CommentRecord>,
    options: &ExtractOptions,
) -> Vec<CommentRow> {
    let mut rows = Vec::new();

    for &id in ranges.ids_in_document_order() {
        let comment = match comments.get(&id) {
            Some(comment) => comment,
            None => continue, // range never got a comment body
        };
        let commented_text = ranges.get(id).unwrap_or("").trim();
        if commented_text.is_empty() && !options.keep_empty {
            continue;
        }

        rows.push(CommentRow {
            id,
            commented_text: commented_text.to_string(),
            comment: comment.text.clone(),
            author: if options.include_author {
                comment.author.clone()
            } else {
                None
            },
            date: if options.include_date {
                comment.date.clone()
            } else {
                None
            },
        });
    }

    rows
}
