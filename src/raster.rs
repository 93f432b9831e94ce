use std::path::Path;

use anyhow::Result;
use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

/// Channel order of a raw buffer handed over by a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    /// Reversed order, as produced by the engine's own decoder
    Bgr,
}

/// A decoded image in canonical form: 1 channel (grayscale) or 3 channels (RGB),
/// row-major, top-to-bottom, never zero-area.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    // Always ImageLuma8 or ImageRgb8
    inner: DynamicImage,
}

impl RasterImage {
    /// Wrap a decoded image. Returns `None` for zero-area images,
    /// which callers treat as the "unloaded" state.
    pub fn wrap(img: &DynamicImage) -> Option<Self> {
        if img.width() == 0 || img.height() == 0 {
            return None;
        }

        let inner = if img.color().has_color() {
            DynamicImage::ImageRgb8(img.to_rgb8())
        } else {
            DynamicImage::ImageLuma8(img.to_luma8())
        };

        Some(Self { inner })
    }

    /// Build from a raw interleaved buffer, normalizing the channel order to RGB.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: u8,
        data: Vec<u8>,
        order: ChannelOrder,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            anyhow::bail!("Zero-area image ({}x{})", width, height);
        }

        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            anyhow::bail!(
                "Buffer length {} does not match {}x{}x{}",
                data.len(),
                width,
                height,
                channels
            );
        }

        let inner = match channels {
            1 => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
            3 => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
            other => anyhow::bail!("Unsupported channel count: {}", other),
        }
        .ok_or_else(|| anyhow::anyhow!("Failed to build {}x{} image buffer", width, height))?;

        Ok(Self { inner }.normalize_channel_order(order))
    }

    /// A `width`x`height` RGB image with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self::from_rgb(RgbImage::from_pixel(width, height, Rgb(color))))
    }

    /// The 1x1 white buffer shown when there is nothing sensible to draw.
    pub fn placeholder() -> Self {
        Self::from_rgb(RgbImage::from_pixel(1, 1, Rgb([255, 255, 255])))
    }

    pub(crate) fn from_rgb(img: RgbImage) -> Self {
        Self {
            inner: DynamicImage::ImageRgb8(img),
        }
    }

    pub(crate) fn from_dynamic_unchecked(inner: DynamicImage) -> Self {
        Self { inner }
    }

    /// Deep copy for drawing overlays into; the base image is never touched.
    pub fn clone_for_annotation(&self) -> Self {
        self.clone()
    }

    /// Bring a buffer stored in `order` into canonical RGB order.
    /// Grayscale images have no channel order and are returned as-is.
    pub fn normalize_channel_order(self, order: ChannelOrder) -> Self {
        match (order, self.inner) {
            (ChannelOrder::Bgr, DynamicImage::ImageRgb8(mut rgb)) => {
                for pixel in rgb.pixels_mut() {
                    pixel.0.swap(0, 2);
                }
                Self::from_rgb(rgb)
            }
            (_, inner) => Self { inner },
        }
    }

    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn channels(&self) -> u8 {
        self.inner.color().channel_count()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    /// Channel values of the pixel at (x, y), or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let channels = self.channels() as usize;
        let offset = (y as usize * self.width() as usize + x as usize) * channels;
        self.as_bytes().get(offset..offset + channels)
    }

    /// Three-channel copy; grayscale is replicated into R, G and B.
    pub fn to_rgb_image(&self) -> RgbImage {
        self.inner.to_rgb8()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.inner
    }

    /// Encode to disk; the format follows the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.inner
            .save(path)
            .map_err(|e| anyhow::anyhow!("Failed to save image to {}: {}", path.display(), e))
    }
}

/// Per-pixel label or flag aligned with a [`RasterImage`].
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMask {
    inner: GrayImage,
}

impl LabelMask {
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let len = data.len();
        let inner = ImageBuffer::from_raw(width, height, data).ok_or_else(|| {
            anyhow::anyhow!("Mask buffer length {} does not match {}x{}", len, width, height)
        })?;
        Ok(Self { inner })
    }

    pub fn from_luma(inner: GrayImage) -> Self {
        Self { inner }
    }

    /// Mask of the given size with every pixel set to `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            inner: GrayImage::from_pixel(width, height, Luma([value])),
        }
    }

    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        self.inner.get_pixel_checked(x, y).map(|p| p[0])
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        self.get(x, y).is_some_and(|v| v != 0)
    }

    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        if let Some(pixel) = self.inner.get_pixel_mut_checked(x, y) {
            pixel[0] = value;
        }
    }

    pub fn as_luma(&self) -> &GrayImage {
        &self.inner
    }

    pub fn matches(&self, image: &RasterImage) -> bool {
        self.dimensions() == image.dimensions()
    }
}
