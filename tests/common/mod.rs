mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from qualview for tests
pub use qualview::{
    Annotations, ChannelOrder, DisplayState, FaceBox, LabelMask, Landmark, LandmarkGroup,
    LandmarkSet, MeasureCode, MeasurementResult, OverlayFlags, QualityAssessment, RasterImage,
    ReplayEngine, ResultRequest, ReturnCode, Session,
};
