//! Shared helpers for the integration tests.

#![allow(dead_code)]

use lopdf::{Document, Object, dictionary};
use std::path::Path;
use tempfile::TempDir;

use filemerge::config::{FetchSettings, OverwriteMode};
use filemerge::io::{DirectorySink, HttpFetcher};
use filemerge::{FileStatus, Pipeline};

/// Timestamp every test pipeline stamps its outputs with.
pub const TIMESTAMP: i64 = 1_700_000_000_000;

fn fixed_clock() -> i64 {
    TIMESTAMP
}

/// Build a PDF with one page per entry in `widths`, each page carrying
/// its own MediaBox.
pub fn pdf_with_pages(widths: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = widths
        .iter()
        .map(|&width| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), 792.into()],
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => widths.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("Failed to serialize test PDF");
    buffer
}

/// Page widths of a PDF in page order.
pub fn page_widths(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).expect("Merged output is not a PDF");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let media_box = page.get(b"MediaBox").and_then(|m| m.as_array()).unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}

/// Pipeline writing into `dir` with a fixed clock.
pub fn pipeline_in(dir: &Path) -> Pipeline {
    Pipeline::new(
        HttpFetcher::with_settings(&FetchSettings::default()).expect("Failed to build client"),
        DirectorySink::new(dir, OverwriteMode::NoClobber),
    )
    .with_clock(fixed_clock)
}

/// Create a temporary output directory.
pub fn temp_output_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Read a generated output file from `dir`.
pub fn read_output(dir: &Path, file_name: &str) -> Vec<u8> {
    std::fs::read(dir.join(file_name)).expect("Output file was not created")
}

/// Whether every status in `statuses` equals `expected`.
pub fn all_have_status(
    statuses: impl IntoIterator<Item = FileStatus>,
    expected: FileStatus,
) -> bool {
    statuses.into_iter().all(|s| s == expected)
}
