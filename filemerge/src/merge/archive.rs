//! ZIP packing.
//!
//! One deflated entry per input, named after the input. Entry names are
//! unique within an archive: a repeated name gets a ` (n)` suffix before
//! its extension (`notes.txt`, `notes (1).txt`, `notes (2).txt`).

use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::descriptor::ResolvedFile;
use crate::error::Result;

/// Pack every input into a ZIP archive.
pub fn merge(files: &[ResolvedFile]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for (name, file) in entry_names(files).into_iter().zip(files) {
        writer.start_file(name, options)?;
        writer.write_all(&file.bytes)?;
    }

    let buffer = writer.finish()?.into_inner();
    tracing::debug!(entries = files.len(), size = buffer.len(), "packed ZIP archive");
    Ok(buffer)
}

/// Unique entry names, in input order.
pub fn entry_names(files: &[ResolvedFile]) -> Vec<String> {
    let mut used = HashSet::new();

    files
        .iter()
        .enumerate()
        .map(|(index, file)| {
            let base = if file.name.trim().is_empty() {
                format!("file-{}", index + 1)
            } else {
                file.name.clone()
            };

            let mut candidate = base.clone();
            let mut n = 1;
            while !used.insert(candidate.clone()) {
                candidate = with_suffix(&base, n);
                n += 1;
            }
            candidate
        })
        .collect()
}

fn with_suffix(name: &str, n: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !stem.ends_with('/') && !ext.contains('/') => {
            format!("{stem} ({n}).{ext}")
        }
        _ => format!("{name} ({n})"),
    }
}
