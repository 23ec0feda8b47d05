//! End-to-end runs of every merge mode over local inputs.

use rstest::rstest;
use std::io::{Cursor, Read};

use filemerge::output::{NoProgress, ProgressEvent};
use filemerge::{FileSet, FileStatus, MergeMode};

use crate::common::{
    all_have_status, page_widths, pdf_with_pages, pipeline_in, read_output, temp_output_dir,
};

#[tokio::test]
async fn test_pdf_merge_appends_pages_in_order() {
    let dir = temp_output_dir();
    let mut files = FileSet::new();
    files.add_local("cover.pdf", pdf_with_pages(&[100]));
    files.add_local("body.pdf", pdf_with_pages(&[200, 300]));
    files.add_local("back.pdf", pdf_with_pages(&[400]));

    let outcome = pipeline_in(dir.path())
        .merge(files.descriptors_mut(), MergeMode::Pdf, &mut NoProgress)
        .await;

    let output = outcome.output().expect("PDF merge failed");
    assert_eq!(output.file_name, "merged-1700000000000.pdf");
    assert_eq!(output.media_type, "application/pdf");

    let written = read_output(dir.path(), &output.file_name);
    assert_eq!(written, output.bytes);
    assert_eq!(page_widths(&written), vec![100, 200, 300, 400]);
    assert!(all_have_status(files.iter().map(|f| f.status()), FileStatus::Completed));
}

#[tokio::test]
async fn test_zip_merge_round_trips_entries() {
    let dir = temp_output_dir();
    let report = pdf_with_pages(&[612]);
    let mut files = FileSet::new();
    files.add_local("report.pdf", report.clone());
    files.add_local("notes.txt", b"remember the milk".to_vec());
    files.add_local("notes.txt", b"and the eggs".to_vec());

    let outcome = pipeline_in(dir.path())
        .merge(files.descriptors_mut(), MergeMode::Zip, &mut NoProgress)
        .await;

    let output = outcome.output().expect("ZIP merge failed");
    assert_eq!(output.file_name, "merged-files-1700000000000.zip");

    let written = read_output(dir.path(), &output.file_name);
    let mut archive = zip::ZipArchive::new(Cursor::new(written)).unwrap();
    assert_eq!(archive.len(), 3);

    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();
        entries.push((entry.name().to_string(), contents));
    }

    assert_eq!(entries[0].0, "report.pdf");
    assert_eq!(entries[0].1, report);
    assert_eq!(entries[1], ("notes.txt".to_string(), b"remember the milk".to_vec()));
    assert_eq!(entries[2], ("notes (1).txt".to_string(), b"and the eggs".to_vec()));
}

#[rstest]
#[case::csv(
    MergeMode::Csv,
    &[("jan.csv", "date,amount\n2024-01-01,10\n"), ("feb.csv", "date,amount\r\n2024-02-01,20\r\n")],
    "merged-data-1700000000000.csv",
    "date,amount\n2024-01-01,10\n2024-02-01,20"
)]
#[case::csv_blank_first(
    MergeMode::Csv,
    &[("empty.csv", "\n \n"), ("a.csv", "id\n1"), ("b.csv", "id\n2")],
    "merged-data-1700000000000.csv",
    "id\n1\n2"
)]
#[case::text(
    MergeMode::Text,
    &[("a.txt", "hello"), ("b.md", "# world\n")],
    "merged-text-1700000000000.txt",
    "=== a.txt ===\n\nhello\n\n=== b.md ===\n\n# world"
)]
#[tokio::test]
async fn test_text_based_modes(
    #[case] mode: MergeMode,
    #[case] inputs: &[(&str, &str)],
    #[case] file_name: &str,
    #[case] expected: &str,
) {
    let dir = temp_output_dir();
    let mut files = FileSet::new();
    for (name, contents) in inputs {
        files.add_local(*name, contents.as_bytes().to_vec());
    }

    let outcome = pipeline_in(dir.path())
        .merge(files.descriptors_mut(), mode, &mut NoProgress)
        .await;

    let output = outcome.output().expect("merge failed");
    assert_eq!(output.file_name, file_name);

    let written = String::from_utf8(read_output(dir.path(), file_name)).unwrap();
    assert_eq!(written, expected);
}

#[tokio::test]
async fn test_progress_milestones() {
    let dir = temp_output_dir();
    let mut files = FileSet::new();
    for name in ["a.txt", "b.txt", "c.txt", "d.txt"] {
        files.add_local(name, name.as_bytes().to_vec());
    }
    let mut events: Vec<ProgressEvent> = Vec::new();

    let outcome = pipeline_in(dir.path())
        .merge(files.descriptors_mut(), MergeMode::Text, &mut |e: ProgressEvent| {
            events.push(e)
        })
        .await;

    assert!(outcome.is_success());
    let percentages: Vec<u8> = events.iter().map(|e| e.percentage).collect();
    assert_eq!(percentages, vec![0, 0, 10, 20, 30, 50, 90, 100]);
    assert_eq!(events[1].message, "Downloading a.txt...");
    assert_eq!(events[5].message, "Merging files...");
    assert_eq!(events[6].message, "Preparing output...");
}

#[tokio::test]
async fn test_named_mode() {
    let dir = temp_output_dir();
    let mut files = FileSet::new();
    files.add_local("a.txt", b"1".to_vec());
    files.add_local("b.txt", b"2".to_vec());

    let outcome = pipeline_in(dir.path())
        .merge_named(files.descriptors_mut(), "Text", &mut NoProgress)
        .await;

    assert!(outcome.is_success());
    assert!(dir.path().join("merged-text-1700000000000.txt").exists());
}
