//! Measurement identifier → display name table.
//!
//! Identifiers come in two tiers: specific measures, and umbrella categories
//! that aggregate a breakdown of specific measures. The two tiers are listed
//! separately; nothing here infers a category from the sign of its code.

use crate::models::MeasureCode;

/// Bumped whenever an entry is added, renamed or renumbered.
pub const NAME_TABLE_VERSION: u32 = 1;

/// Name used for identifiers missing from the table.
pub const UNRECOGNIZED_NAME: &str = "NotSet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityMeasure {
    UnifiedQualityScore,
    BackgroundUniformity,
    IlluminationUniformity,
    LuminanceMean,
    LuminanceVariance,
    UnderExposurePrevention,
    OverExposurePrevention,
    DynamicRange,
    Sharpness,
    CompressionArtifacts,
    NaturalColour,
    SingleFacePresent,
    EyesOpen,
    MouthClosed,
    EyesVisible,
    MouthOcclusionPrevention,
    FaceOcclusionPrevention,
    InterEyeDistance,
    HeadSize,
    LeftwardCropOfTheFaceImage,
    RightwardCropOfTheFaceImage,
    DownwardCropOfTheFaceImage,
    UpwardCropOfTheFaceImage,
    HeadPoseYaw,
    HeadPosePitch,
    HeadPoseRoll,
    ExpressionNeutrality,
    NoHeadCoverings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureCategory {
    Luminance,
    CropOfTheFaceImage,
    HeadPose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureId {
    Measure(QualityMeasure),
    Category(MeasureCategory),
}

static MEASURES: [(i32, QualityMeasure, &str); 28] = [
    (0x41, QualityMeasure::UnifiedQualityScore, "UnifiedQualityScore"),
    (0x42, QualityMeasure::BackgroundUniformity, "BackgroundUniformity"),
    (0x43, QualityMeasure::IlluminationUniformity, "IlluminationUniformity"),
    (0x44, QualityMeasure::LuminanceMean, "LuminanceMean"),
    (0x45, QualityMeasure::LuminanceVariance, "LuminanceVariance"),
    (0x46, QualityMeasure::UnderExposurePrevention, "UnderExposurePrevention"),
    (0x47, QualityMeasure::OverExposurePrevention, "OverExposurePrevention"),
    (0x48, QualityMeasure::DynamicRange, "DynamicRange"),
    (0x49, QualityMeasure::Sharpness, "Sharpness"),
    (0x4a, QualityMeasure::CompressionArtifacts, "CompressionArtifacts"),
    (0x4b, QualityMeasure::NaturalColour, "NaturalColour"),
    (0x4c, QualityMeasure::SingleFacePresent, "SingleFacePresent"),
    (0x4d, QualityMeasure::EyesOpen, "EyesOpen"),
    (0x4e, QualityMeasure::MouthClosed, "MouthClosed"),
    (0x4f, QualityMeasure::EyesVisible, "EyesVisible"),
    (0x50, QualityMeasure::MouthOcclusionPrevention, "MouthOcclusionPrevention"),
    (0x51, QualityMeasure::FaceOcclusionPrevention, "FaceOcclusionPrevention"),
    (0x52, QualityMeasure::InterEyeDistance, "InterEyeDistance"),
    (0x53, QualityMeasure::HeadSize, "HeadSize"),
    (0x54, QualityMeasure::LeftwardCropOfTheFaceImage, "LeftwardCropOfTheFaceImage"),
    (0x55, QualityMeasure::RightwardCropOfTheFaceImage, "RightwardCropOfTheFaceImage"),
    (0x56, QualityMeasure::DownwardCropOfTheFaceImage, "DownwardCropOfTheFaceImage"),
    (0x57, QualityMeasure::UpwardCropOfTheFaceImage, "UpwardCropOfTheFaceImage"),
    (0x58, QualityMeasure::HeadPoseYaw, "HeadPoseYaw"),
    (0x59, QualityMeasure::HeadPosePitch, "HeadPosePitch"),
    (0x5a, QualityMeasure::HeadPoseRoll, "HeadPoseRoll"),
    (0x5b, QualityMeasure::ExpressionNeutrality, "ExpressionNeutrality"),
    (0x5c, QualityMeasure::NoHeadCoverings, "NoHeadCoverings"),
];

static CATEGORIES: [(i32, MeasureCategory, &str, &[QualityMeasure]); 3] = [
    (
        -0x44,
        MeasureCategory::Luminance,
        "Luminance",
        &[QualityMeasure::LuminanceMean, QualityMeasure::LuminanceVariance],
    ),
    (
        -0x54,
        MeasureCategory::CropOfTheFaceImage,
        "CropOfTheFaceImage",
        &[
            QualityMeasure::LeftwardCropOfTheFaceImage,
            QualityMeasure::RightwardCropOfTheFaceImage,
            QualityMeasure::DownwardCropOfTheFaceImage,
            QualityMeasure::UpwardCropOfTheFaceImage,
        ],
    ),
    (
        -0x58,
        MeasureCategory::HeadPose,
        "HeadPose",
        &[
            QualityMeasure::HeadPoseYaw,
            QualityMeasure::HeadPosePitch,
            QualityMeasure::HeadPoseRoll,
        ],
    ),
];

impl QualityMeasure {
    pub fn all() -> impl Iterator<Item = QualityMeasure> {
        MEASURES.iter().map(|(_, m, _)| *m)
    }

    fn entry(self) -> Option<&'static (i32, QualityMeasure, &'static str)> {
        MEASURES.iter().find(|(_, m, _)| *m == self)
    }

    pub fn code(self) -> MeasureCode {
        MeasureCode(self.entry().map(|(code, _, _)| *code).unwrap_or(-1))
    }

    pub fn name(self) -> &'static str {
        self.entry().map(|(_, _, name)| *name).unwrap_or(UNRECOGNIZED_NAME)
    }

    /// The umbrella category this measure is part of, if any.
    pub fn category(self) -> Option<MeasureCategory> {
        CATEGORIES
            .iter()
            .find(|(_, _, _, breakdown)| breakdown.contains(&self))
            .map(|(_, category, _, _)| *category)
    }
}

impl MeasureCategory {
    pub fn all() -> impl Iterator<Item = MeasureCategory> {
        CATEGORIES.iter().map(|(_, c, _, _)| *c)
    }

    fn entry(self) -> Option<&'static (i32, MeasureCategory, &'static str, &'static [QualityMeasure])> {
        CATEGORIES.iter().find(|(_, c, _, _)| *c == self)
    }

    pub fn code(self) -> MeasureCode {
        MeasureCode(self.entry().map(|(code, _, _, _)| *code).unwrap_or(-1))
    }

    pub fn name(self) -> &'static str {
        self.entry().map(|(_, _, name, _)| *name).unwrap_or(UNRECOGNIZED_NAME)
    }

    /// Specific measures this category aggregates.
    pub fn breakdown(self) -> &'static [QualityMeasure] {
        self.entry().map(|(_, _, _, breakdown)| *breakdown).unwrap_or(&[])
    }
}

impl MeasureId {
    pub fn from_code(code: MeasureCode) -> Option<Self> {
        if let Some((_, measure, _)) = MEASURES.iter().find(|(c, _, _)| *c == code.0) {
            return Some(MeasureId::Measure(*measure));
        }
        CATEGORIES
            .iter()
            .find(|(c, _, _, _)| *c == code.0)
            .map(|(_, category, _, _)| MeasureId::Category(*category))
    }

    pub fn code(self) -> MeasureCode {
        match self {
            MeasureId::Measure(m) => m.code(),
            MeasureId::Category(c) => c.code(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MeasureId::Measure(m) => m.name(),
            MeasureId::Category(c) => c.name(),
        }
    }

    pub fn is_category(self) -> bool {
        matches!(self, MeasureId::Category(_))
    }
}

/// Display name for `code`, or [`UNRECOGNIZED_NAME`] when it is not in the table.
pub fn measure_name(code: MeasureCode) -> &'static str {
    match MeasureId::from_code(code) {
        Some(id) => id.name(),
        None => {
            tracing::warn!("Unrecognized measurement identifier {}", code.0);
            UNRECOGNIZED_NAME
        }
    }
}
