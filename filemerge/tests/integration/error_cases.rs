//! Failure handling at the run boundary.

use filemerge::output::NoProgress;
use filemerge::validation::Validator;
use filemerge::{FileMergeError, FileSet, FileStatus, MergeMode};

use crate::common::{pdf_with_pages, pipeline_in, read_output, temp_output_dir};

#[tokio::test]
async fn test_invalid_pdf_names_the_file() {
    let dir = temp_output_dir();
    let mut files = FileSet::new();
    files.add_local("good.pdf", pdf_with_pages(&[100]));
    files.add_local("scan.pdf", b"%PDF-1.4 truncated".to_vec());

    let outcome = pipeline_in(dir.path())
        .merge(files.descriptors_mut(), MergeMode::Pdf, &mut NoProgress)
        .await;

    let error = outcome.error().expect("merge should fail");
    assert!(error.contains("scan.pdf"), "{error}");
    assert!(files.iter().all(|f| f.status() == FileStatus::Error));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_existing_output_is_not_overwritten() {
    let dir = temp_output_dir();
    let pipeline = pipeline_in(dir.path());

    let mut first = FileSet::new();
    first.add_local("a.txt", b"first".to_vec());
    first.add_local("b.txt", b"run".to_vec());
    let outcome = pipeline
        .merge(first.descriptors_mut(), MergeMode::Text, &mut NoProgress)
        .await;
    let file_name = outcome.output().expect("first run failed").file_name.clone();

    let mut second = FileSet::new();
    second.add_local("a.txt", b"second".to_vec());
    second.add_local("b.txt", b"run".to_vec());
    let err = pipeline
        .try_merge(second.descriptors_mut(), MergeMode::Text, &mut NoProgress)
        .await
        .unwrap_err();

    assert!(matches!(err, FileMergeError::OutputExists { .. }));
    assert_eq!(err.exit_code(), 4);
    let kept = String::from_utf8(read_output(dir.path(), &file_name)).unwrap();
    assert!(kept.contains("first"));
    assert!(second.iter().all(|f| f.status() == FileStatus::Error));
}

#[tokio::test]
async fn test_unsupported_mode_fails_before_fetching() {
    let dir = temp_output_dir();
    let mut files = FileSet::new();
    // Unreachable; fetching it would fail with a different message
    files.add_urls(["http://127.0.0.1:9/a.docx", "http://127.0.0.1:9/b.docx"]);

    let outcome = pipeline_in(dir.path())
        .merge_named(files.descriptors_mut(), "docx", &mut NoProgress)
        .await;

    assert_eq!(outcome.error(), Some("Unsupported merge type: docx"));
    assert!(files.iter().all(|f| f.status() == FileStatus::Pending));
}

#[tokio::test]
async fn test_pipeline_accepts_single_and_empty_sets() {
    let dir = temp_output_dir();
    let pipeline = pipeline_in(dir.path());

    let mut empty = FileSet::new();
    let outcome = pipeline
        .merge(empty.descriptors_mut(), MergeMode::Csv, &mut NoProgress)
        .await;
    assert!(outcome.output().expect("empty CSV merge failed").is_empty());

    // The minimum count is enforced by the validator, not the run
    let mut single = FileSet::new();
    single.add_local("only.pdf", pdf_with_pages(&[100]));
    let err = Validator::new()
        .validate(single.descriptors(), MergeMode::Pdf)
        .unwrap_err();
    assert!(matches!(err, FileMergeError::TooFewFiles { actual: 1, .. }));
}

#[test]
fn test_exit_codes() {
    let acquisition = FileMergeError::acquisition("a.pdf", "timed out");
    assert_eq!(acquisition.to_string(), "Failed to download a.pdf: timed out");
    assert_eq!(acquisition.exit_code(), 2);

    let invalid = FileMergeError::invalid_pdf("b.pdf", "bad header");
    assert_eq!(invalid.exit_code(), 3);
}
