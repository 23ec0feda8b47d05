//! Runs that fetch inputs from an HTTP server.

use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use filemerge::config::{FetchSettings, OverwriteMode};
use filemerge::io::{DirectorySink, HttpFetcher};
use filemerge::output::{NoProgress, ProgressEvent};
use filemerge::{FileSet, FileStatus, MergeMode, Pipeline};

use crate::common::{page_widths, pdf_with_pages, pipeline_in, read_output, temp_output_dir};

async fn serve(server: &MockServer, route: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_mixed_local_and_remote_pdf() {
    let server = MockServer::start().await;
    serve(&server, "/docs/appendix.pdf", pdf_with_pages(&[300, 400])).await;

    let dir = temp_output_dir();
    let mut files = FileSet::new();
    files.add_local("intro.pdf", pdf_with_pages(&[100]));
    files.add_urls([format!("{}/docs/appendix.pdf", server.uri())]);

    assert_eq!(files.descriptors()[1].name(), "appendix.pdf");
    assert_eq!(files.descriptors()[1].status(), FileStatus::Pending);

    let outcome = pipeline_in(dir.path())
        .merge(files.descriptors_mut(), MergeMode::Pdf, &mut NoProgress)
        .await;

    let output = outcome.output().expect("merge failed");
    let written = read_output(dir.path(), &output.file_name);
    assert_eq!(page_widths(&written), vec![100, 300, 400]);
    assert!(files.iter().all(|f| f.status() == FileStatus::Completed));
}

#[tokio::test]
async fn test_remote_csv_uses_first_header() {
    let server = MockServer::start().await;
    serve(&server, "/a.csv", b"id,name\n1,ada\n".to_vec()).await;
    serve(&server, "/b.csv", b"id,name\n2,grace\n".to_vec()).await;

    let dir = temp_output_dir();
    let mut files = FileSet::new();
    files.add_urls([
        format!("{}/a.csv", server.uri()),
        format!("{}/b.csv", server.uri()),
    ]);

    let outcome = pipeline_in(dir.path())
        .merge(files.descriptors_mut(), MergeMode::Csv, &mut NoProgress)
        .await;

    let output = outcome.output().expect("merge failed");
    assert_eq!(output.bytes, b"id,name\n1,ada\n2,grace");
}

#[tokio::test]
async fn test_server_error_fails_run_without_output() {
    let server = MockServer::start().await;
    serve(&server, "/ok.txt", b"fine".to_vec()).await;
    Mock::given(method("GET"))
        .and(path("/broken.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = temp_output_dir();
    let mut files = FileSet::new();
    files.add_urls([
        format!("{}/ok.txt", server.uri()),
        format!("{}/broken.txt", server.uri()),
    ]);
    let mut percentages = Vec::new();

    let outcome = pipeline_in(dir.path())
        .merge(files.descriptors_mut(), MergeMode::Text, &mut |e: ProgressEvent| {
            percentages.push(e.percentage)
        })
        .await;

    let error = outcome.error().expect("run should fail");
    assert!(error.starts_with("Failed to download broken.txt: "), "{error}");
    assert!(error.contains("500"), "{error}");
    assert_eq!(percentages, vec![0, 0, 20]);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(files.descriptors()[1].status(), FileStatus::Error);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"late".to_vec())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let dir = temp_output_dir();
    let fetcher = HttpFetcher::with_settings(&FetchSettings {
        timeout: Duration::from_millis(200),
        ..FetchSettings::default()
    })
    .unwrap();
    let pipeline = Pipeline::new(fetcher, DirectorySink::new(dir.path(), OverwriteMode::Force));

    let mut files = FileSet::new();
    files.add_local("a.txt", b"local".to_vec());
    files.add_urls([format!("{}/slow.txt", server.uri())]);

    let outcome = pipeline
        .merge(files.descriptors_mut(), MergeMode::Text, &mut NoProgress)
        .await;

    let error = outcome.error().expect("run should time out");
    assert!(error.starts_with("Failed to download slow.txt: "), "{error}");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
