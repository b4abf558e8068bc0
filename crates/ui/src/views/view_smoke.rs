use std::fs;
use std::path::Path;

use survey_core::model::{AnswerValue, LikertScore};

use super::test_harness::{ViewKind, setup_view_harness};

fn image_dir(names: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in names {
        fs::write(dir.path().join(name), b"img").expect("write image");
    }
    dir
}

#[tokio::test(flavor = "current_thread")]
async fn survey_view_smoke_renders_first_image_and_form() {
    let dir = image_dir(&["b.jpg", "a.png", "notes.txt"]);
    let mut harness = setup_view_harness(ViewKind::Survey, dir.path());

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Current Image: a.png"), "missing current image in {html}");
    assert!(html.contains("Image 1 / 2"), "missing position in {html}");
    assert!(!html.contains("notes.txt"), "non-image listed in {html}");
    assert!(html.contains("Section 1 – Respondent Information"));
    assert!(html.contains("Section 6 – Open Feedback"));
    assert!(html.contains("Submit evaluation for this image"));
}

#[tokio::test(flavor = "current_thread")]
async fn survey_view_smoke_reports_missing_directory() {
    let mut harness = setup_view_harness(ViewKind::Survey, Path::new("/no/such/images"));

    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("Directory not found: /no/such/images"),
        "missing error in {html}"
    );
    assert!(!html.contains("Submit evaluation"), "form shown in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn survey_view_smoke_reports_empty_directory() {
    let dir = image_dir(&["readme.md"]);
    let mut harness = setup_view_harness(ViewKind::Survey, dir.path());

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("No PNG/JPG images found in:"), "missing error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn export_view_smoke_lists_submitted_rows() {
    let dir = image_dir(&["a.png"]);
    let mut harness = setup_view_harness(ViewKind::Export, dir.path());

    let mut session = harness.service.start_session();
    session.open(dir.path()).expect("open");
    session
        .set_answer("q1_realistic", AnswerValue::Likert(LikertScore::new(5).unwrap()))
        .expect("answer");
    session.submit().await.expect("submit");
    assert_eq!(harness.log.record_count().unwrap(), 1);

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("1 evaluation recorded."), "missing count in {html}");
    assert!(html.contains("a.png"), "missing row in {html}");
    assert!(html.contains("Source: memory"), "missing location in {html}");
    assert_eq!(
        html.matches(",a.png,").count(),
        1,
        "csv preview should hold the same single row as the table in {html}"
    );
    assert!(html.contains("timestamp,image_filename,name"), "missing csv header in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn export_view_smoke_handles_empty_log() {
    let dir = image_dir(&[]);
    let mut harness = setup_view_harness(ViewKind::Export, dir.path());

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("No evaluations recorded yet."), "missing placeholder in {html}");
}
