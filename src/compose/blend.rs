use image::{Rgb, RgbImage};

use crate::raster::LabelMask;

/// Per-channel weighted average `alpha * overlay + (1 - alpha) * base`.
///
/// Both buffers must have the same dimensions; a mismatched overlay leaves
/// `base` unchanged.
pub fn blend(base: &RgbImage, overlay: &RgbImage, alpha: f64) -> RgbImage {
    if base.dimensions() != overlay.dimensions() {
        tracing::warn!(
            "Overlay {:?} does not match base {:?}, skipping blend",
            overlay.dimensions(),
            base.dimensions()
        );
        return base.clone();
    }

    let beta = 1.0 - alpha;
    let mut out = base.clone();
    for (dst, src) in out.pixels_mut().zip(overlay.pixels()) {
        for c in 0..3 {
            let value = alpha * src[c] as f64 + beta * dst[c] as f64;
            dst[c] = value.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Full-resolution color layer with one color per mask value.
pub fn colorize<F>(mask: &LabelMask, color_of: F) -> RgbImage
where
    F: Fn(u8) -> Rgb<u8>,
{
    let luma = mask.as_luma();
    RgbImage::from_fn(luma.width(), luma.height(), |x, y| color_of(luma.get_pixel(x, y)[0]))
}

/// Color layer for a boolean mask: `on` where set, `off` elsewhere.
pub fn colorize_binary(mask: &LabelMask, on: Rgb<u8>, off: Rgb<u8>) -> RgbImage {
    colorize(mask, |v| if v != 0 { on } else { off })
}
