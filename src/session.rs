use std::path::Path;

use anyhow::Result;
use image::ImageReader;

use crate::compose::build_standard_pipeline;
use crate::display::{self, DisplayState, FilterResampler, Resampler, ZoomDirection, ZoomPreset};
use crate::engine::{QualityEngine, ResultRequest};
use crate::export::{self, AssessmentRow};
use crate::models::{Annotations, QualityAssessment};
use crate::pipeline::Pipeline;
use crate::raster::RasterImage;

/// A loaded image together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image: RasterImage,
    /// Path written into the export's `Filename` column
    pub source: String,
}

/// One demonstrator session: the loaded image, the latest engine results,
/// and the view configuration used to render them.
pub struct Session {
    loaded: Option<LoadedImage>,
    annotations: Annotations,
    assessment: QualityAssessment,
    state: DisplayState,
    pipeline: Pipeline,
    resampler: Box<dyn Resampler>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            loaded: None,
            annotations: Annotations::default(),
            assessment: QualityAssessment::default(),
            state: DisplayState::default(),
            pipeline: build_standard_pipeline(),
            resampler: Box::new(FilterResampler::default()),
        }
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_resampler(mut self, resampler: Box<dyn Resampler>) -> Self {
        self.resampler = resampler;
        self
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DisplayState {
        &mut self.state
    }

    pub fn loaded(&self) -> Option<&LoadedImage> {
        self.loaded.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn assessment(&self) -> &QualityAssessment {
        &self.assessment
    }

    /// Decode and load an image from disk, discarding previous results.
    pub fn load_image(&mut self, path: &Path) -> Result<()> {
        tracing::info!("Loading image from '{}' ...", path.display());
        let decoded = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

        self.set_image(&decoded, path.display().to_string())?;
        tracing::info!("Image loaded.");
        Ok(())
    }

    /// Load an already decoded image. A zero-area image leaves the session unloaded.
    pub fn set_image(&mut self, decoded: &image::DynamicImage, source: impl Into<String>) -> Result<()> {
        self.loaded = None;
        self.clear_results();

        let image = RasterImage::wrap(decoded)
            .ok_or_else(|| anyhow::anyhow!("Image has zero area ({}x{})", decoded.width(), decoded.height()))?;

        self.loaded = Some(LoadedImage {
            image,
            source: source.into(),
        });
        Ok(())
    }

    pub fn clear_results(&mut self) {
        self.annotations = Annotations::default();
        self.assessment.clear();
    }

    /// Set the scale so the whole image fits the viewport. An empty viewport
    /// keeps the current scale.
    pub fn fit_to_viewport(&mut self, viewport_width: u32, viewport_height: u32) {
        if viewport_width == 0 || viewport_height == 0 {
            tracing::warn!(
                "Viewport {}x{} is empty, keeping scale {}",
                viewport_width,
                viewport_height,
                self.state.scale
            );
            return;
        }
        if let Some(loaded) = &self.loaded {
            let (width, height) = loaded.image.dimensions();
            self.state.scale = display::preferred_scale(width, height, viewport_width, viewport_height);
        }
    }

    pub fn zoom(&mut self, direction: ZoomDirection) {
        self.state.zoom(direction);
    }

    pub fn zoom_preset(&mut self, preset: ZoomPreset) {
        self.state.set_preset(preset);
    }

    pub fn zoom_label(&self) -> String {
        self.state.zoom_label()
    }

    /// Run the engine on the loaded image. On failure no partial results are kept.
    pub fn assess(&mut self, engine: &dyn QualityEngine) -> Result<()> {
        tracing::info!("Quality assessment ...");
        let Some(loaded) = &self.loaded else {
            tracing::error!("No image loaded.");
            anyhow::bail!("No image loaded.");
        };

        match engine.assess(&loaded.image, ResultRequest::ALL) {
            Ok(output) => {
                self.annotations = output.annotations;
                self.assessment = output.assessment;
                tracing::info!(
                    "Quality assessment done ({} measurements, {} faces)",
                    self.assessment.len(),
                    self.annotations.faces.len()
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!("Quality assessment returned: {}", e);
                self.clear_results();
                Err(e.into())
            }
        }
    }

    /// Full-resolution composite for the current overlay flags.
    pub fn composite(&self) -> Option<RasterImage> {
        let loaded = self.loaded.as_ref()?;
        Some(
            self.pipeline
                .compose(&loaded.image, &self.annotations, &self.state.overlays),
        )
    }

    /// Display copy of the composite at the current scale.
    pub fn preview(&self) -> Option<RasterImage> {
        let composite = self.composite()?;
        Some(display::resample(&composite, self.state.scale, self.resampler.as_ref()))
    }

    pub fn rows(&self) -> Vec<AssessmentRow> {
        export::to_rows(&self.assessment)
    }

    /// Save the full-resolution composite, independent of the current zoom.
    pub fn save_image(&self, path: &Path) -> Result<()> {
        tracing::info!("Saving image to '{}' ...", path.display());
        let composite = self
            .composite()
            .ok_or_else(|| anyhow::anyhow!("No image loaded."))?;
        composite.save(path)?;
        tracing::info!("Image saved.");
        Ok(())
    }

    pub fn save_assessment(&self, path: &Path) -> Result<()> {
        tracing::info!("Exporting assessment to '{}' ...", path.display());
        let loaded = self
            .loaded
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No image loaded."))?;
        export::write_delimited(path, &self.assessment, &loaded.source)?;
        tracing::info!("Assessment exported.");
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
