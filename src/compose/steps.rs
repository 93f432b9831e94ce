use image::RgbImage;
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::compose::blend::{blend, colorize, colorize_binary};
use crate::compose::palette::{
    self, FACE_BOX_COLOR, LANDMARKED_REGION_COLOR, OCCLUSION_COLOR, OVERLAY_ALPHA, WHITE,
};
use crate::models::FaceBox;
use crate::pipeline::{LayerInput, LayerStep};
use crate::raster::LabelMask;

/// Face box stroke width: 1% of the shorter image side, rounded up.
pub fn stroke_thickness(width: u32, height: u32) -> i32 {
    ((0.01 * width.min(height) as f64).ceil() as i32).max(1)
}

/// Landmark disk radius: 0.5% of the shorter image side, rounded up.
pub fn landmark_radius(width: u32, height: u32) -> i32 {
    ((0.005 * width.min(height) as f64).ceil() as i32).max(1)
}

/// Replaces the original pixels with white when the original is hidden
pub struct BlankOriginalStep;

impl LayerStep for BlankOriginalStep {
    fn is_enabled(&self, input: &LayerInput) -> bool {
        !input.overlays.original
    }

    fn process(&self, canvas: RgbImage, _input: &LayerInput) -> RgbImage {
        let (width, height) = canvas.dimensions();
        RgbImage::from_pixel(width, height, WHITE)
    }

    fn name(&self) -> &str {
        "Blank Original"
    }
}

/// Unfilled red rectangle per detected face
pub struct FaceBoxStep;

impl FaceBoxStep {
    fn draw(canvas: &mut RgbImage, face: &FaceBox, thickness: i32) {
        let (canvas_width, canvas_height) = canvas.dimensions();
        let Some((left, top, right, bottom)) = visible_bounds(face, canvas_width, canvas_height, thickness) else {
            tracing::debug!("Face box {:?} lies outside the image, not drawing it", face);
            return;
        };

        // Nested one-pixel outlines, growing inward from the face border
        for inset in 0..thickness {
            let width = right - left + 1 - 2 * inset;
            let height = bottom - top + 1 - 2 * inset;
            if width <= 0 || height <= 0 {
                break;
            }
            let rect = Rect::at(left + inset, top + inset).of_size(width as u32, height as u32);
            draw_hollow_rect_mut(canvas, rect, FACE_BOX_COLOR);
        }
    }
}

/// Inclusive corners of `face` clamped to the canvas plus a margin of
/// `2 * thickness + 1`, so a clamped edge and all its inner outlines stay
/// off-canvas. `None` for empty boxes and boxes that miss the canvas.
fn visible_bounds(face: &FaceBox, width: u32, height: u32, thickness: i32) -> Option<(i32, i32, i32, i32)> {
    if face.width <= 0 || face.height <= 0 {
        return None;
    }

    let left = i64::from(face.left);
    let top = i64::from(face.top);
    let right = left + i64::from(face.width) - 1;
    let bottom = top + i64::from(face.height) - 1;
    if right < 0 || bottom < 0 || left >= i64::from(width) || top >= i64::from(height) {
        return None;
    }

    let margin = 2 * i64::from(thickness) + 1;
    let clamp = |v: i64, extent: u32| i32::try_from(v.clamp(-margin, i64::from(extent) - 1 + margin)).ok();
    Some((
        clamp(left, width)?,
        clamp(top, height)?,
        clamp(right, width)?,
        clamp(bottom, height)?,
    ))
}

impl LayerStep for FaceBoxStep {
    fn is_enabled(&self, input: &LayerInput) -> bool {
        input.overlays.faces && !input.annotations.faces.is_empty()
    }

    fn process(&self, mut canvas: RgbImage, input: &LayerInput) -> RgbImage {
        let (width, height) = canvas.dimensions();
        let thickness = stroke_thickness(width, height);
        for face in &input.annotations.faces {
            Self::draw(&mut canvas, face, thickness);
        }
        canvas
    }

    fn name(&self) -> &str {
        "Face Boxes"
    }
}

/// Filled disk per landmark, colored by anatomical group
pub struct LandmarkStep;

impl LayerStep for LandmarkStep {
    fn is_enabled(&self, input: &LayerInput) -> bool {
        input.overlays.landmarks
            && input
                .annotations
                .landmarks
                .as_ref()
                .is_some_and(|set| !set.is_empty())
    }

    fn process(&self, mut canvas: RgbImage, input: &LayerInput) -> RgbImage {
        let Some(landmarks) = &input.annotations.landmarks else {
            return canvas;
        };
        let (width, height) = canvas.dimensions();
        let radius = landmark_radius(width, height);
        for (group, point) in landmarks.grouped() {
            draw_filled_circle_mut(&mut canvas, (point.x, point.y), radius, palette::landmark_color(group));
        }
        canvas
    }

    fn name(&self) -> &str {
        "Landmarks"
    }
}

/// Shared gate for the three mask layers: flag on, mask present and aligned.
fn usable_mask<'a>(enabled: bool, mask: Option<&'a LabelMask>, input: &LayerInput, layer: &str) -> Option<&'a LabelMask> {
    if !enabled {
        return None;
    }
    let mask = mask?;
    if !mask.matches(input.base) {
        tracing::warn!(
            "{} mask is {:?} but image is {:?}, not drawing it",
            layer,
            mask.dimensions(),
            input.base.dimensions()
        );
        return None;
    }
    Some(mask)
}

/// Face-parsing labels through the fixed palette, blended at 30%
pub struct SegmentationStep;

impl LayerStep for SegmentationStep {
    fn is_enabled(&self, input: &LayerInput) -> bool {
        usable_mask(
            input.overlays.segmentation,
            input.annotations.segmentation.as_ref(),
            input,
            self.name(),
        )
        .is_some()
    }

    fn process(&self, canvas: RgbImage, input: &LayerInput) -> RgbImage {
        match &input.annotations.segmentation {
            Some(mask) => blend(&canvas, &colorize(mask, palette::segmentation_color), OVERLAY_ALPHA),
            None => canvas,
        }
    }

    fn name(&self) -> &str {
        "Segmentation"
    }
}

/// Occluded pixels red, the rest white, blended at 30%
pub struct OcclusionStep;

impl LayerStep for OcclusionStep {
    fn is_enabled(&self, input: &LayerInput) -> bool {
        usable_mask(
            input.overlays.occlusion,
            input.annotations.occlusion.as_ref(),
            input,
            self.name(),
        )
        .is_some()
    }

    fn process(&self, canvas: RgbImage, input: &LayerInput) -> RgbImage {
        match &input.annotations.occlusion {
            Some(mask) => blend(&canvas, &colorize_binary(mask, OCCLUSION_COLOR, WHITE), OVERLAY_ALPHA),
            None => canvas,
        }
    }

    fn name(&self) -> &str {
        "Occlusion"
    }
}

/// Landmarked region blue, the rest white, blended at 30%
pub struct LandmarkedRegionStep;

impl LayerStep for LandmarkedRegionStep {
    fn is_enabled(&self, input: &LayerInput) -> bool {
        usable_mask(
            input.overlays.landmarked_region,
            input.annotations.landmarked_region.as_ref(),
            input,
            self.name(),
        )
        .is_some()
    }

    fn process(&self, canvas: RgbImage, input: &LayerInput) -> RgbImage {
        match &input.annotations.landmarked_region {
            Some(mask) => blend(
                &canvas,
                &colorize_binary(mask, LANDMARKED_REGION_COLOR, WHITE),
                OVERLAY_ALPHA,
            ),
            None => canvas,
        }
    }

    fn name(&self) -> &str {
        "Landmarked Region"
    }
}
