//! End-to-end tests: load an image, assess it, render and export.

mod common;

use common::*;
use qualview::export::to_delimited_text;
use qualview::{FilterResampler, Resampler, ZoomDirection, ZoomPreset};

#[test]
fn test_new_session_is_unloaded() {
    let session = Session::new();
    assert!(!session.is_loaded());
    assert!(session.composite().is_none());
    assert!(session.preview().is_none());
    assert!(session.rows().is_empty());
    assert_eq!(session.zoom_label(), "100%");
}

#[test]
fn test_load_image_from_disk() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = write_test_image(dir.path(), "face.png", 64, 48);

    let mut session = Session::new();
    session.load_image(&path)?;

    let loaded = session.loaded().expect("image loaded");
    assert_eq!(loaded.image.dimensions(), (64, 48));
    assert_eq!(loaded.source, path.display().to_string());
    Ok(())
}

#[test]
fn test_load_missing_image_fails() {
    let mut session = Session::new();
    assert!(session.load_image(std::path::Path::new("/nonexistent.png")).is_err());
    assert!(!session.is_loaded());
}

#[test]
fn test_zero_area_image_stays_unloaded() -> anyhow::Result<()> {
    let mut session = Session::new();
    session.set_image(&image::DynamicImage::ImageRgb8(gradient_rgb(8, 8)), "a.png")?;
    assert!(session.is_loaded());

    let empty = image::DynamicImage::new_rgb8(0, 10);
    assert!(session.set_image(&empty, "empty.png").is_err());
    assert!(!session.is_loaded());
    Ok(())
}

#[test]
fn test_assess_without_image_fails() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let (_, record) = write_replay_fixture(dir.path());
    let engine = ReplayEngine::from_file(&record)?;

    let mut session = Session::new();
    let err = session.assess(&engine).expect_err("no image loaded");
    assert!(err.to_string().contains("No image loaded"));
    Ok(())
}

#[test]
fn test_assess_stores_results() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let (image, record) = write_replay_fixture(dir.path());

    let mut session = Session::new();
    session.load_image(&image)?;
    session.assess(&ReplayEngine::from_file(&record)?)?;

    assert_eq!(session.annotations().faces.len(), 1);
    assert!(session.annotations().segmentation.is_some());
    assert_eq!(session.assessment().len(), 4);

    let names: Vec<&str> = session.rows().iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["HeadPose", "UnifiedQualityScore", "Sharpness", "EyesOpen"]);
    Ok(())
}

#[test]
fn test_failed_assessment_clears_previous_results() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let (image, record) = write_replay_fixture(dir.path());

    let mut session = Session::new();
    session.load_image(&image)?;
    session.assess(&ReplayEngine::from_file(&record)?)?;
    assert!(!session.assessment().is_empty());

    let failing_dir = tempfile::TempDir::new()?;
    let failing = write_replay_record(
        failing_dir.path(),
        r#"{ "failure": { "code": "FaceDetectionError", "info": "no face" } }"#,
    );
    assert!(session.assess(&ReplayEngine::from_file(&failing)?).is_err());

    assert!(session.assessment().is_empty());
    assert!(session.annotations().is_empty());
    assert!(session.is_loaded());
    Ok(())
}

#[test]
fn test_loading_new_image_discards_results() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let (image, record) = write_replay_fixture(dir.path());

    let mut session = Session::new();
    session.load_image(&image)?;
    session.assess(&ReplayEngine::from_file(&record)?)?;

    session.load_image(&image)?;
    assert!(session.assessment().is_empty());
    assert!(session.annotations().faces.is_empty());
    Ok(())
}

#[test]
fn test_composite_follows_overlay_flags() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let (image, record) = write_replay_fixture(dir.path());

    let mut session = Session::new();
    session.load_image(&image)?;
    session.state_mut().overlays = OverlayFlags::none();
    session.state_mut().overlays.original = true;

    let plain = session.composite().expect("loaded");
    let loaded = session.loaded().expect("loaded");
    assert_eq!(plain.as_bytes(), loaded.image.as_bytes());

    session.assess(&ReplayEngine::from_file(&record)?)?;
    session.state_mut().overlays.faces = true;
    let boxed = session.composite().expect("loaded");
    assert_eq!(boxed.pixel(10, 10), Some(&[255u8, 0, 0][..]));
    assert_eq!(boxed.dimensions(), (64, 48));
    Ok(())
}

#[test]
fn test_preview_fits_viewport() -> anyhow::Result<()> {
    let mut session = Session::new();
    session.set_image(&image::DynamicImage::ImageRgb8(gradient_rgb(1280, 960)), "big.png")?;

    session.fit_to_viewport(640, 480);
    assert_eq!(session.zoom_label(), "50%");
    let preview = session.preview().expect("loaded");
    assert_eq!(preview.dimensions(), (640, 480));

    session.zoom_preset(ZoomPreset::Quarter);
    assert_eq!(session.preview().expect("loaded").dimensions(), (320, 240));

    session.zoom(ZoomDirection::In);
    assert_eq!(session.zoom_label(), "26%");
    Ok(())
}

#[test]
fn test_save_image_is_full_resolution() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let (image, record) = write_replay_fixture(dir.path());

    let mut session = Session::new();
    session.load_image(&image)?;
    session.assess(&ReplayEngine::from_file(&record)?)?;
    session.zoom_preset(ZoomPreset::Quarter);

    let out = dir.path().join("out.png");
    session.save_image(&out)?;

    let saved = image::open(&out)?;
    assert_eq!((saved.width(), saved.height()), (64, 48));
    let composite = session.composite().expect("loaded");
    assert_eq!(saved.to_rgb8().as_raw(), composite.as_bytes());
    Ok(())
}

#[test]
fn test_save_without_image_fails() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let session = Session::new();

    assert!(session.save_image(&dir.path().join("out.png")).is_err());
    assert!(session.save_assessment(&dir.path().join("out.csv")).is_err());
    Ok(())
}

#[test]
fn test_save_assessment_writes_export() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let (image, record) = write_replay_fixture(dir.path());

    let mut session = Session::new();
    session.load_image(&image)?;
    session.assess(&ReplayEngine::from_file(&record)?)?;

    let out = dir.path().join("results.csv");
    session.save_assessment(&out)?;

    let written = std::fs::read_to_string(&out)?;
    let source = image.display().to_string();
    assert_eq!(written, to_delimited_text(session.assessment(), &source));

    let data = written.lines().nth(1).expect("data line");
    assert!(data.starts_with(&format!("{};", source)));
    assert!(data.ends_with(";97;75;88;-1"));
    Ok(())
}

#[test]
fn test_empty_viewport_keeps_positive_scale() -> anyhow::Result<()> {
    let mut session = Session::new();
    session.set_image(&image::DynamicImage::ImageRgb8(gradient_rgb(640, 480)), "a.png")?;
    session.zoom_preset(ZoomPreset::Half);

    session.fit_to_viewport(0, 480);
    assert_eq!(session.state().scale, 0.5);

    session.fit_to_viewport(640, 0);
    assert_eq!(session.state().scale, 0.5);

    for _ in 0..5 {
        session.zoom(ZoomDirection::In);
    }
    assert!(session.state().scale > 0.5);
    assert!(session.preview().is_some_and(|p| p.width() > 1));
    Ok(())
}

/// Nearest-neighbour resampler that counts how often it is called.
struct CountingResampler {
    calls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl Resampler for CountingResampler {
    fn resample(&self, image: &RasterImage, width: u32, height: u32) -> RasterImage {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        FilterResampler {
            filter: image::imageops::FilterType::Nearest,
        }
        .resample(image, width, height)
    }

    fn name(&self) -> &str {
        "counting"
    }
}

#[test]
fn test_session_uses_configured_resampler() -> anyhow::Result<()> {
    let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let mut session = Session::new().with_resampler(Box::new(CountingResampler {
        calls: calls.clone(),
    }));
    session.set_image(&image::DynamicImage::ImageRgb8(gradient_rgb(100, 80)), "a.png")?;
    session.fit_to_viewport(50, 50);

    let preview = session.preview().expect("loaded");
    assert_eq!(preview.dimensions(), (50, 40));
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);

    // Full-resolution output never goes through the resampler
    let dir = tempfile::TempDir::new()?;
    session.save_image(&dir.path().join("full.png"))?;
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    Ok(())
}
