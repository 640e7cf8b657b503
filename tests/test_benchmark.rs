//! Integration tests for benchmark passes and the end-to-end run.
//!
//! Tests cover:
//! - Skipping undecodable images within a pass
//! - Excluding input conversion from the timed region
//! - Report rows and cells for a full run with a stub detector
//! - Annotated output files
//! - The zero-image early exit
//! - Fatal missing-backend errors

mod common;

use common::*;
use facebench::pipeline::run_pass;
use facebench::report::PLACEHOLDER;

#[test]
fn test_pass_skips_unreadable_images() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    write_test_jpeg(dir.path(), "a.jpg");
    write_corrupt_image(dir.path(), "b.jpg");
    write_test_jpeg(dir.path(), "c.jpg");
    let images = facebench::discovery::discover_images(dir.path())?;

    let mut detector = StubDetector::one_face("Stub");
    let outcome = run_pass(&mut detector, &images)?;

    let names: Vec<_> = outcome.results.iter().map(|r| r.image_name.as_str()).collect();
    assert_eq!(names, vec!["a.jpg", "c.jpg"]);
    assert_eq!(outcome.skipped, vec!["b.jpg".to_string()]);

    for result in &outcome.results {
        assert_eq!(result.face_count(), result.boxes.len());
        assert!(result.elapsed_seconds() >= 0.0);
        assert_eq!(result.boxes, vec![CanonicalBox::new(4, 4, 24, 20)]);
    }

    Ok(())
}

#[test]
fn test_pass_converts_to_detector_layout() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    write_test_jpeg(dir.path(), "a.jpg");
    let images = facebench::discovery::discover_images(dir.path())?;

    // The stub asserts that it receives frames in its own layout
    let mut detector = StubDetector {
        name: "Gray".into(),
        boxes: vec![NativeBox::Corners { x1: 1.0, y1: 2.0, x2: 3.0, y2: 4.0 }],
        layout: ChannelLayout::Luma,
    };
    let outcome = run_pass(&mut detector, &images)?;
    assert_eq!(outcome.results[0].boxes, vec![CanonicalBox::new(1, 2, 3, 4)]);

    Ok(())
}

#[test]
fn test_input_conversion_is_not_timed() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    write_test_jpeg(dir.path(), "a.jpg");
    write_test_jpeg(dir.path(), "b.jpg");
    let images = facebench::discovery::discover_images(dir.path())?;

    let delay = std::time::Duration::from_millis(200);
    let mut detector = SlowPrepareDetector { delay };
    let started = std::time::Instant::now();
    let outcome = run_pass(&mut detector, &images)?;

    // Conversion did run, once per image
    assert!(started.elapsed() >= delay * 2);
    assert_eq!(outcome.results.len(), 2);
    for result in &outcome.results {
        assert!(result.elapsed < delay, "{} timed at {:?}", result.image_name, result.elapsed);
    }

    Ok(())
}

#[test]
fn test_end_to_end_with_corrupt_image() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image_dir = dir.path().join("benchmark_images");
    write_test_jpeg(&image_dir, "one.jpg");
    write_test_jpeg(&image_dir, "two.jpg");
    write_corrupt_image(&image_dir, "broken.jpg");

    let out_dir = dir.path().join("benchmark_outputs");
    let report_path = dir.path().join("BENCHMARK_RESULTS.md");

    let summary = Benchmark::new(&image_dir)
        .with_report(&report_path)
        .with_annotations(&out_dir)
        .add_detector(StubLoader::one_face("Stub"))
        .run()?
        .expect("images were present");

    assert_eq!(summary.images.len(), 3);
    assert_eq!(summary.passes.len(), 1);
    assert_eq!(summary.passes[0].results.len(), 2);

    let report = std::fs::read_to_string(&report_path)?;
    let rows: Vec<&str> = report
        .lines()
        .filter(|l| l.starts_with("| ") && !l.starts_with("| Image"))
        .collect();

    // One row per discovered image; only the decodable ones carry data
    assert_eq!(rows.len(), 3);
    let data_rows: Vec<&&str> = rows.iter().filter(|r| r.contains("1 (")).collect();
    assert_eq!(data_rows.len(), 2);
    assert!(rows.contains(&format!("| broken.jpg | {} |", PLACEHOLDER).as_str()));
    for row in data_rows {
        assert!(row.ends_with("s) |"), "unexpected cell in {row}");
    }
    assert!(report.contains("## Unreadable images\n\n- broken.jpg (Stub)"));

    assert!(out_dir.join("one_Stub.jpg").is_file());
    assert!(out_dir.join("two_Stub.jpg").is_file());

    assert!(!out_dir.join("broken_Stub.jpg").exists());

    Ok(())
}

#[test]
fn test_columns_follow_insertion_order() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    write_test_jpeg(dir.path(), "a.jpg");
    let report_path = dir.path().join("report.md");

    Benchmark::new(dir.path())
        .with_report(&report_path)
        .add_column("MTCNN")
        .add_detector(StubLoader::one_face("BlazeFace"))
        .add_detector(StubLoader::one_face("SeetaFace"))
        .run()?;

    let report = std::fs::read_to_string(&report_path)?;
    assert!(report.contains("| Image | MTCNN | BlazeFace | SeetaFace |"));
    let row = report
        .lines()
        .find(|l| l.starts_with("| a.jpg"))
        .expect("row for a.jpg");
    let cells: Vec<&str> = row.trim_matches('|').split(" | ").map(str::trim).collect();
    assert_eq!(cells[1], PLACEHOLDER);
    assert!(cells[2].starts_with("1 ("));
    assert!(cells[3].starts_with("1 ("));

    Ok(())
}

#[test]
fn test_no_images_writes_nothing() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image_dir = dir.path().join("benchmark_images");
    std::fs::create_dir(&image_dir)?;
    let out_dir = dir.path().join("benchmark_outputs");
    let report_path = dir.path().join("BENCHMARK_RESULTS.md");

    let summary = Benchmark::new(&image_dir)
        .with_report(&report_path)
        .with_annotations(&out_dir)
        .add_detector(StubLoader::one_face("Stub"))
        .run()?;

    assert!(summary.is_none());
    assert!(!report_path.exists());
    assert!(!out_dir.exists());

    Ok(())
}

#[test]
fn test_missing_backend_is_fatal() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    write_test_jpeg(dir.path(), "a.jpg");
    let report_path = dir.path().join("report.md");

    let err = Benchmark::new(dir.path())
        .with_report(&report_path)
        .add_detector(Box::new(MissingLoader))
        .run()
        .expect_err("missing backend must abort the run");

    assert!(matches!(
        err.downcast_ref::<DetectorError>(),
        Some(DetectorError::MissingBackend { .. })
    ));
    assert!(err.to_string().contains("--features missing"));
    assert!(!report_path.exists());

    Ok(())
}

#[test]
fn test_report_is_overwritten() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    write_test_jpeg(dir.path(), "a.jpg");
    let report_path = dir.path().join("report.md");
    std::fs::write(&report_path, "stale contents that must disappear\n")?;

    Benchmark::new(dir.path())
        .with_report(&report_path)
        .add_detector(StubLoader::one_face("Stub"))
        .run()?;

    let report = std::fs::read_to_string(&report_path)?;
    assert!(report.starts_with("# Detection Pipeline Benchmark"));
    assert!(!report.contains("stale"));

    Ok(())
}
