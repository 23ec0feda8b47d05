//! Text concatenation with file-name banners.

use std::fmt::Write;

use crate::descriptor::ResolvedFile;
use crate::utils::decode_text;

/// Concatenate inputs, each preceded by a `=== <name> ===` banner.
///
/// Banners and contents are separated by blank lines; the combined result
/// is trimmed, so it never starts or ends with whitespace.
pub fn merge(files: &[ResolvedFile]) -> String {
    let mut merged = String::new();

    for file in files {
        // Writing into a String cannot fail
        let _ = write!(merged, "\n\n=== {} ===\n\n", file.name);
        merged.push_str(&decode_text(&file.bytes));
    }

    merged.trim().to_string()
}
