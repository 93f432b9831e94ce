pub mod compose;
pub mod display;
pub mod engine;
pub mod export;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod raster;
pub mod session;

pub use display::{DisplayState, FilterResampler, OverlayFlags, Resampler, ZoomDirection, ZoomPreset};
pub use engine::{EngineError, EngineOutput, QualityEngine, ReplayEngine, ResultRequest, ReturnCode};
pub use models::{
    Annotations, FaceBox, Landmark, LandmarkGroup, LandmarkSet, MeasureCode, MeasurementResult,
    MeasurementStatus, QualityAssessment,
};
pub use pipeline::{DebugConfig, LayerInput, LayerStep, Pipeline};
pub use raster::{ChannelOrder, LabelMask, RasterImage};
pub use session::Session;
