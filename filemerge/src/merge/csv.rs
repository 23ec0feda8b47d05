//! CSV row appending.
//!
//! Works on lines, not fields: quoting is never interpreted, so a quoted
//! field containing a newline is split like any other line.
//!
//! Line endings are normalized to `\n` (a trailing `\r` is dropped), and
//! inputs holding only a header contribute no line at all.

use std::iter;

use crate::descriptor::ResolvedFile;
use crate::utils::decode_text;

/// Append the data rows of every input under a single header.
///
/// The header is the first non-blank line of the first input that has one.
/// Every contributing input drops its own first line and keeps the rest.
/// Inputs without non-blank lines are skipped and never supply the header.
pub fn merge(files: &[ResolvedFile]) -> String {
    let (header, rows) = files.iter().fold(
        (None::<String>, Vec::<String>::new()),
        |(header, mut rows), file| {
            let text = decode_text(&file.bytes);
            let mut lines = non_blank_lines(&text);

            let Some(first) = lines.next() else {
                tracing::debug!(file = %file.name, "skipping CSV input without rows");
                return (header, rows);
            };

            rows.extend(lines.map(str::to_string));
            (header.or_else(|| Some(first.to_string())), rows)
        },
    );

    header
        .map(|header| {
            iter::once(header)
                .chain(rows)
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .unwrap_or_default()
}

/// Lines with a trailing `\r` removed, skipping whitespace-only lines.
fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
}
