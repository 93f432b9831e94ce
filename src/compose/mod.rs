pub mod blend;
pub mod palette;
pub mod steps;

use std::sync::Arc;

use crate::display::OverlayFlags;
use crate::models::Annotations;
use crate::pipeline::Pipeline;
use crate::raster::RasterImage;

/// Build the standard compositing pipeline.
///
/// Layer order is fixed: original (or blank), face boxes, landmarks,
/// segmentation, occlusion, landmarked region.
pub fn build_standard_pipeline() -> Pipeline {
    use steps::*;

    Pipeline::new()
        .add_step(Arc::new(BlankOriginalStep))
        .add_step(Arc::new(FaceBoxStep))
        .add_step(Arc::new(LandmarkStep))
        .add_step(Arc::new(SegmentationStep))
        .add_step(Arc::new(OcclusionStep))
        .add_step(Arc::new(LandmarkedRegionStep))
}

/// Composite `annotations` over `base` with the standard pipeline.
///
/// Callers must only invoke this with a loaded image; the base is never
/// modified.
pub fn compose(base: &RasterImage, annotations: &Annotations, overlays: &OverlayFlags) -> RasterImage {
    build_standard_pipeline().compose(base, annotations, overlays)
}
