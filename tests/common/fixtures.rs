#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use qualview::{MeasureCode, MeasurementResult, QualityAssessment, RasterImage};

/// Horizontal/vertical gradient so every pixel differs from its neighbours.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    })
}

pub fn gradient_raster(width: u32, height: u32) -> RasterImage {
    RasterImage::wrap(&DynamicImage::ImageRgb8(gradient_rgb(width, height)))
        .expect("non-empty test image")
}

/// Uniform RGB image with every channel set to `value`.
pub fn uniform_raster(width: u32, height: u32, value: u8) -> RasterImage {
    RasterImage::filled(width, height, [value, value, value]).expect("non-empty test image")
}

/// Sample assessment: two successes, one failure, one category and one
/// identifier missing from the name table.
pub fn sample_assessment() -> QualityAssessment {
    QualityAssessment::new()
        .with(0x41, MeasurementResult::success(0.75, 75.0))
        .with(0x49, MeasurementResult::success(12.5, 88.0))
        .with(0x4d, MeasurementResult::failure("no eyes found"))
        .with(-0x58, MeasurementResult::success(3.0, 97.0))
        .with(0x7f, MeasurementResult::success(1.0, 10.0))
}

pub fn code(value: i32) -> MeasureCode {
    MeasureCode(value)
}

/// Save a gradient PNG into `dir` and return its path.
pub fn write_test_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient_rgb(width, height)
        .save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test image");
    path
}

/// Save a single-channel mask PNG where pixels inside `rect` get `value`.
pub fn write_test_mask(
    dir: &Path,
    name: &str,
    width: u32,
    height: u32,
    rect: (u32, u32, u32, u32),
    value: u8,
) -> PathBuf {
    let (left, top, w, h) = rect;
    let mask = GrayImage::from_fn(width, height, |x, y| {
        if x >= left && x < left + w && y >= top && y < top + h {
            Luma([value])
        } else {
            Luma([0])
        }
    });
    let path = dir.join(name);
    mask.save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test mask");
    path
}

/// Write a replay record JSON into `dir` and return its path.
pub fn write_replay_record(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("results.json");
    std::fs::write(&path, json).expect("Failed to write replay record");
    path
}

pub const RECORD_JSON: &str = r#"{
    "faces": [{ "left": 10, "top": 10, "width": 40, "height": 40 }],
    "landmarks": [{ "x": 20, "y": 20 }, { "x": 30, "y": 30 }],
    "segmentation_mask": "seg.png",
    "occlusion_mask": "occ.png",
    "landmarked_region": "region.png",
    "assessments": [
        { "id": 73, "status": "success", "raw_score": 12.5, "scalar": 88 },
        { "id": 65, "status": "success", "raw_score": 0.75, "scalar": 75 },
        { "id": 77, "status": { "failure": { "reason": "no eyes" } }, "raw_score": 0.0, "scalar": 0 },
        { "id": -88, "status": "success", "raw_score": 3.0, "scalar": 97 }
    ]
}"#;

/// Lay out a complete recorded run for a 64x48 image in `dir`:
/// the image, the three masks and the JSON record. Returns (image, record).
pub fn write_replay_fixture(dir: &Path) -> (PathBuf, PathBuf) {
    let image = write_test_image(dir, "face.png", 64, 48);
    write_test_mask(dir, "seg.png", 64, 48, (0, 0, 32, 48), 1);
    write_test_mask(dir, "occ.png", 64, 48, (8, 8, 8, 8), 1);
    write_test_mask(dir, "region.png", 64, 48, (16, 16, 16, 16), 255);
    let record = write_replay_record(dir, RECORD_JSON);
    (image, record)
}
