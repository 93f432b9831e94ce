use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::raster::LabelMask;

/// Detected face rectangle in full-resolution image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceBox {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceBox {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: i32,
    pub y: i32,
}

impl Landmark {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Anatomical group a landmark index belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkGroup {
    FaceContour,
    Eyebrows,
    Nose,
    EyeBoundary,
    OuterLips,
    InnerLips,
    Pupils,
}

/// Exclusive end index of each group, in landmark order. Anything past the
/// last range is a pupil.
const GROUP_RANGES: [(usize, LandmarkGroup); 6] = [
    (33, LandmarkGroup::FaceContour),
    (47, LandmarkGroup::Eyebrows),
    (60, LandmarkGroup::Nose),
    (76, LandmarkGroup::EyeBoundary),
    (88, LandmarkGroup::OuterLips),
    (96, LandmarkGroup::InnerLips),
];

impl LandmarkGroup {
    pub const ALL: [LandmarkGroup; 7] = [
        LandmarkGroup::FaceContour,
        LandmarkGroup::Eyebrows,
        LandmarkGroup::Nose,
        LandmarkGroup::EyeBoundary,
        LandmarkGroup::OuterLips,
        LandmarkGroup::InnerLips,
        LandmarkGroup::Pupils,
    ];

    pub fn of_index(index: usize) -> Self {
        GROUP_RANGES
            .iter()
            .find(|(end, _)| index < *end)
            .map(|(_, group)| *group)
            .unwrap_or(LandmarkGroup::Pupils)
    }
}

/// Ordered landmark points; the group of each point is implied by its index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    pub points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn grouped(&self) -> impl Iterator<Item = (LandmarkGroup, &Landmark)> + '_ {
        self.points
            .iter()
            .enumerate()
            .map(|(i, point)| (LandmarkGroup::of_index(i), point))
    }
}

/// Everything the engine produced for one image besides the measurements.
/// Absent entries have not been computed yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    pub faces: Vec<FaceBox>,
    pub landmarks: Option<LandmarkSet>,
    pub segmentation: Option<LabelMask>,
    pub occlusion: Option<LabelMask>,
    pub landmarked_region: Option<LabelMask>,
}

impl Annotations {
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
            && self.landmarks.is_none()
            && self.segmentation.is_none()
            && self.occlusion.is_none()
            && self.landmarked_region.is_none()
    }
}

/// Raw measurement identifier as emitted by the engine. Resolved to a name
/// through [`crate::export::names`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasureCode(pub i32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementStatus {
    Success,
    Failure { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    pub status: MeasurementStatus,
    /// Native-scale score
    pub raw_score: f64,
    /// Normalized score
    pub scalar: f64,
}

impl MeasurementResult {
    pub fn success(raw_score: f64, scalar: f64) -> Self {
        Self {
            status: MeasurementStatus::Success,
            raw_score,
            scalar,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            status: MeasurementStatus::Failure {
                reason: reason.into(),
            },
            raw_score: -1.0,
            scalar: -1.0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == MeasurementStatus::Success
    }
}

/// One result per attempted measurement, iterated in ascending identifier order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityAssessment {
    results: BTreeMap<MeasureCode, MeasurementResult>,
}

impl QualityAssessment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the result for `code`.
    pub fn insert(&mut self, code: MeasureCode, result: MeasurementResult) -> Option<MeasurementResult> {
        self.results.insert(code, result)
    }

    pub fn with(mut self, code: i32, result: MeasurementResult) -> Self {
        self.insert(MeasureCode(code), result);
        self
    }

    pub fn get(&self, code: MeasureCode) -> Option<&MeasurementResult> {
        self.results.get(&code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeasureCode, &MeasurementResult)> + '_ {
        self.results.iter().map(|(code, result)| (*code, result))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }
}

impl FromIterator<(MeasureCode, MeasurementResult)> for QualityAssessment {
    fn from_iter<T: IntoIterator<Item = (MeasureCode, MeasurementResult)>>(iter: T) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}
