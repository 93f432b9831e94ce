use image::DynamicImage;
use image::imageops::{self, FilterType};

use crate::raster::RasterImage;

/// Multiplier applied per zoom-in/zoom-out action.
pub const DEFAULT_ZOOM_STEP: f64 = 1.05;

/// Which layers the compositor draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayFlags {
    pub original: bool,
    pub faces: bool,
    pub landmarks: bool,
    pub segmentation: bool,
    pub occlusion: bool,
    pub landmarked_region: bool,
}

impl Default for OverlayFlags {
    fn default() -> Self {
        Self {
            original: true,
            faces: true,
            landmarks: false,
            segmentation: false,
            occlusion: false,
            landmarked_region: false,
        }
    }
}

impl OverlayFlags {
    /// Original image plus every overlay.
    pub fn all() -> Self {
        Self {
            original: true,
            faces: true,
            landmarks: true,
            segmentation: true,
            occlusion: true,
            landmarked_region: true,
        }
    }

    /// Nothing at all, not even the original pixels.
    pub fn none() -> Self {
        Self {
            original: false,
            faces: false,
            landmarks: false,
            segmentation: false,
            occlusion: false,
            landmarked_region: false,
        }
    }
}

/// Caller-owned view configuration, consumed on every recomposite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayState {
    pub scale: f64,
    pub zoom_step: f64,
    pub overlays: OverlayFlags,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            zoom_step: DEFAULT_ZOOM_STEP,
            overlays: OverlayFlags::default(),
        }
    }
}

impl DisplayState {
    pub fn zoom(&mut self, direction: ZoomDirection) {
        self.scale = apply_zoom(self.scale, self.zoom_step, direction);
    }

    pub fn set_preset(&mut self, preset: ZoomPreset) {
        self.scale = preset.scale();
    }

    /// Status text for the current scale, e.g. "105%".
    pub fn zoom_label(&self) -> String {
        zoom_label(self.scale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Directly selectable scales that bypass the incremental step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomPreset {
    Quarter,
    Half,
    Actual,
    Double,
    Quadruple,
}

impl ZoomPreset {
    pub const ALL: [ZoomPreset; 5] = [
        ZoomPreset::Quarter,
        ZoomPreset::Half,
        ZoomPreset::Actual,
        ZoomPreset::Double,
        ZoomPreset::Quadruple,
    ];

    pub fn scale(self) -> f64 {
        match self {
            ZoomPreset::Quarter => 0.25,
            ZoomPreset::Half => 0.5,
            ZoomPreset::Actual => 1.0,
            ZoomPreset::Double => 2.0,
            ZoomPreset::Quadruple => 4.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ZoomPreset::Quarter => "1:4",
            ZoomPreset::Half => "1:2",
            ZoomPreset::Actual => "1:1",
            ZoomPreset::Double => "2:1",
            ZoomPreset::Quadruple => "4:1",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}

/// Uniform scale that fits the whole image into the viewport.
///
/// Zero-sized images and zero-sized viewports have no meaningful fit and get
/// the identity scale, so the result is always positive.
pub fn preferred_scale(image_width: u32, image_height: u32, viewport_width: u32, viewport_height: u32) -> f64 {
    if image_width == 0 || image_height == 0 || viewport_width == 0 || viewport_height == 0 {
        return 1.0;
    }
    let horizontal = viewport_width as f64 / image_width as f64;
    let vertical = viewport_height as f64 / image_height as f64;
    horizontal.min(vertical)
}

/// Parse a `WxH` viewport size. Both sides must be positive.
pub fn parse_viewport(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{}'", s))?;
    let w = w.trim().parse::<u32>().map_err(|e| format!("bad width: {}", e))?;
    let h = h.trim().parse::<u32>().map_err(|e| format!("bad height: {}", e))?;
    if w == 0 || h == 0 {
        return Err(format!("viewport must be at least 1x1, got '{}'", s));
    }
    Ok((w, h))
}

pub fn apply_zoom(scale: f64, step: f64, direction: ZoomDirection) -> f64 {
    match direction {
        ZoomDirection::In => scale * step,
        ZoomDirection::Out => scale / step,
    }
}

pub fn zoom_label(scale: f64) -> String {
    format!("{}%", (scale * 100.0).round() as i64)
}

/// Target size for `scale`, or `None` when either side rounds to nothing.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> Option<(u32, u32)> {
    let w = (width as f64 * scale).round();
    let h = (height as f64 * scale).round();
    if !(w >= 1.0 && h >= 1.0) || w > u32::MAX as f64 || h > u32::MAX as f64 {
        return None;
    }
    Some((w as u32, h as u32))
}

/// Interpolation backend used to produce display copies.
pub trait Resampler: Send + Sync {
    /// Resize `image` to exactly `width`x`height` (both non-zero).
    fn resample(&self, image: &RasterImage, width: u32, height: u32) -> RasterImage;

    fn name(&self) -> &str;
}

/// Resampling through `image::imageops` with a configurable filter.
#[derive(Debug, Clone, Copy)]
pub struct FilterResampler {
    pub filter: FilterType,
}

impl Default for FilterResampler {
    fn default() -> Self {
        // High-quality interpolation
        Self {
            filter: FilterType::CatmullRom,
        }
    }
}

impl Resampler for FilterResampler {
    fn resample(&self, image: &RasterImage, width: u32, height: u32) -> RasterImage {
        let resized = match image.as_dynamic() {
            DynamicImage::ImageLuma8(gray) => {
                DynamicImage::ImageLuma8(imageops::resize(gray, width, height, self.filter))
            }
            other => DynamicImage::ImageRgb8(imageops::resize(
                &other.to_rgb8(),
                width,
                height,
                self.filter,
            )),
        };
        RasterImage::from_dynamic_unchecked(resized)
    }

    fn name(&self) -> &str {
        match self.filter {
            FilterType::Nearest => "nearest",
            FilterType::Triangle => "triangle",
            FilterType::CatmullRom => "catmull-rom",
            FilterType::Gaussian => "gaussian",
            FilterType::Lanczos3 => "lanczos3",
        }
    }
}

/// Display copy of `image` at `scale`. The input is never modified; a scale
/// that collapses either side yields a 1x1 placeholder.
pub fn resample(image: &RasterImage, scale: f64, resampler: &dyn Resampler) -> RasterImage {
    match scaled_dimensions(image.width(), image.height(), scale) {
        Some((width, height)) => {
            tracing::debug!(
                "Resampling {}x{} -> {}x{} ({})",
                image.width(),
                image.height(),
                width,
                height,
                resampler.name()
            );
            resampler.resample(image, width, height)
        }
        None => {
            tracing::debug!("Scale {} collapses {}x{} image, using placeholder", scale, image.width(), image.height());
            RasterImage::placeholder()
        }
    }
}
