//! Boundary to the external face-quality engine.
//!
//! The engine is a black box: it takes an image plus a request mask and returns
//! face boxes, landmarks, masks and measurements, or a status code with a message.

use std::path::{Path, PathBuf};

use image::ImageReader;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Annotations, FaceBox, LandmarkSet, MeasureCode, MeasurementResult, QualityAssessment};
use crate::raster::{LabelMask, RasterImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnCode {
    Success,
    ImageReadingError,
    ConfigError,
    FaceDetectionError,
    FaceLandmarkExtractionError,
    FaceOcclusionSegmentationError,
    FaceParsingError,
    MissingMaskError,
    UnknownError,
}

/// Engine failure: a status code and a human-readable message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{code:?}: {info}")]
pub struct EngineError {
    pub code: ReturnCode,
    pub info: String,
}

impl EngineError {
    pub fn new(code: ReturnCode, info: impl Into<String>) -> Self {
        Self {
            code,
            info: info.into(),
        }
    }
}

/// Bitmask selecting which preprocessing results the engine should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRequest(u32);

impl ResultRequest {
    pub const NONE: ResultRequest = ResultRequest(0);
    pub const FACES: ResultRequest = ResultRequest(1);
    pub const LANDMARKS: ResultRequest = ResultRequest(1 << 1);
    pub const LANDMARKED_REGION: ResultRequest = ResultRequest(1 << 2);
    pub const SEGMENTATION_MASK: ResultRequest = ResultRequest(1 << 3);
    pub const OCCLUSION_MASK: ResultRequest = ResultRequest(1 << 4);
    pub const ALL: ResultRequest = ResultRequest(0b1_1111);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: ResultRequest) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ResultRequest {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        ResultRequest(self.0 | rhs.0)
    }
}

/// Everything a successful assessment returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOutput {
    pub annotations: Annotations,
    pub assessment: QualityAssessment,
}

pub trait QualityEngine {
    fn assess(&self, image: &RasterImage, request: ResultRequest) -> Result<EngineOutput, EngineError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedMeasurement {
    pub id: MeasureCode,
    #[serde(flatten)]
    pub result: MeasurementResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedFailure {
    pub code: ReturnCode,
    pub info: String,
}

/// On-disk form of one recorded engine run. Mask paths are relative to the
/// record file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayRecord {
    #[serde(default)]
    pub faces: Vec<FaceBox>,
    #[serde(default)]
    pub landmarks: Option<LandmarkSet>,
    #[serde(default)]
    pub segmentation_mask: Option<PathBuf>,
    #[serde(default)]
    pub occlusion_mask: Option<PathBuf>,
    #[serde(default)]
    pub landmarked_region: Option<PathBuf>,
    #[serde(default)]
    pub assessments: Vec<RecordedMeasurement>,
    #[serde(default)]
    pub failure: Option<RecordedFailure>,
}

/// Engine that replays a recorded run from a JSON file instead of running
/// the quality algorithms.
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    record: ReplayRecord,
    base_dir: PathBuf,
}

impl ReplayEngine {
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        if !path.is_file() {
            return Err(EngineError::new(
                ReturnCode::ConfigError,
                format!("Not an existing file: {}", path.display()),
            ));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            EngineError::new(ReturnCode::ConfigError, format!("Failed to read {}: {}", path.display(), e))
        })?;
        let record: ReplayRecord = serde_json::from_str(&text).map_err(|e| {
            EngineError::new(ReturnCode::ConfigError, format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        tracing::debug!(
            "Loaded replay record {} ({} measurements)",
            path.display(),
            record.assessments.len()
        );
        Ok(Self { record, base_dir })
    }

    pub fn from_record(record: ReplayRecord, base_dir: PathBuf) -> Self {
        Self { record, base_dir }
    }

    pub fn record(&self) -> &ReplayRecord {
        &self.record
    }

    fn load_mask(&self, relative: &Path, image: &RasterImage, code: ReturnCode) -> Result<LabelMask, EngineError> {
        let path = self.base_dir.join(relative);
        let decoded = ImageReader::open(&path)
            .map_err(|e| EngineError::new(code, format!("Failed to open mask {}: {}", path.display(), e)))?
            .decode()
            .map_err(|e| EngineError::new(code, format!("Failed to decode mask {}: {}", path.display(), e)))?;

        let mask = LabelMask::from_luma(decoded.to_luma8());
        if !mask.matches(image) {
            return Err(EngineError::new(
                ReturnCode::MissingMaskError,
                format!(
                    "Mask {} is {:?}, image is {:?}",
                    path.display(),
                    mask.dimensions(),
                    image.dimensions()
                ),
            ));
        }
        Ok(mask)
    }

    fn load_requested(
        &self,
        requested: bool,
        relative: Option<&PathBuf>,
        image: &RasterImage,
        code: ReturnCode,
    ) -> Result<Option<LabelMask>, EngineError> {
        match relative {
            Some(relative) if requested => self.load_mask(relative, image, code).map(Some),
            _ => Ok(None),
        }
    }
}

impl QualityEngine for ReplayEngine {
    fn assess(&self, image: &RasterImage, request: ResultRequest) -> Result<EngineOutput, EngineError> {
        if let Some(failure) = &self.record.failure {
            return Err(EngineError::new(failure.code, failure.info.clone()));
        }

        let record = &self.record;
        let annotations = Annotations {
            faces: if request.contains(ResultRequest::FACES) {
                record.faces.clone()
            } else {
                Vec::new()
            },
            landmarks: record
                .landmarks
                .clone()
                .filter(|_| request.contains(ResultRequest::LANDMARKS)),
            segmentation: self.load_requested(
                request.contains(ResultRequest::SEGMENTATION_MASK),
                record.segmentation_mask.as_ref(),
                image,
                ReturnCode::FaceParsingError,
            )?,
            occlusion: self.load_requested(
                request.contains(ResultRequest::OCCLUSION_MASK),
                record.occlusion_mask.as_ref(),
                image,
                ReturnCode::FaceOcclusionSegmentationError,
            )?,
            landmarked_region: self.load_requested(
                request.contains(ResultRequest::LANDMARKED_REGION),
                record.landmarked_region.as_ref(),
                image,
                ReturnCode::FaceLandmarkExtractionError,
            )?,
        };

        let assessment = record
            .assessments
            .iter()
            .map(|m| (m.id, m.result.clone()))
            .collect();

        Ok(EngineOutput {
            annotations,
            assessment,
        })
    }
}
