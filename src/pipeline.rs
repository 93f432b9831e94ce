use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use image::RgbImage;

use crate::display::OverlayFlags;
use crate::models::Annotations;
use crate::raster::RasterImage;

/// Read-only inputs shared by every layer of one compositing run
pub struct LayerInput<'a> {
    /// The loaded image, already in canonical channel order
    pub base: &'a RasterImage,

    /// Engine outputs to visualize
    pub annotations: &'a Annotations,

    /// Which layers the caller wants drawn
    pub overlays: &'a OverlayFlags,
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Directory receiving one PNG per executed stage
    pub output_dir: PathBuf,
}

/// Trait that all compositing layers must implement
pub trait LayerStep: Send + Sync {
    /// Whether this layer draws anything for the given input.
    /// A missing prerequisite (e.g. no mask yet) counts as disabled.
    fn is_enabled(&self, input: &LayerInput) -> bool;

    /// Draw onto the canvas produced by the previous stage
    fn process(&self, canvas: RgbImage, input: &LayerInput) -> RgbImage;

    /// Human-readable name for this step (used in logs and debug file names)
    fn name(&self) -> &str;
}

/// Ordered layer pipeline. Each enabled stage consumes the previous stage's
/// output; later stages draw over earlier ones.
#[derive(Clone, Default)]
pub struct Pipeline {
    steps: Vec<Arc<dyn LayerStep>>,
    debug: Option<DebugConfig>,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Add a layer to the end of the pipeline
    pub fn add_step(mut self, step: Arc<dyn LayerStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Composite all enabled layers over a copy of `base`.
    /// The result is always three-channel RGB at full resolution.
    pub fn compose(&self, base: &RasterImage, annotations: &Annotations, overlays: &OverlayFlags) -> RasterImage {
        let input = LayerInput {
            base,
            annotations,
            overlays,
        };

        let mut canvas = base.clone_for_annotation().to_rgb_image();
        self.save_debug_stage(&canvas, "00_input.png");

        for (step_idx, step) in self.steps.iter().enumerate() {
            if !step.is_enabled(&input) {
                tracing::debug!("Skipping layer: {}", step.name());
                continue;
            }

            tracing::debug!("Drawing layer: {}", step.name());
            canvas = step.process(canvas, &input);

            let filename = format!(
                "{:02}_{}.png",
                step_idx + 1,
                step.name().to_lowercase().replace(' ', "_")
            );
            self.save_debug_stage(&canvas, &filename);
        }

        RasterImage::from_rgb(canvas)
    }

    /// Write an intermediate canvas if debug mode is on. Failures only warn;
    /// compositing never aborts because of debug output.
    fn save_debug_stage(&self, canvas: &RgbImage, filename: &str) {
        let Some(debug) = &self.debug else {
            return;
        };

        let output_path = debug.output_dir.join(filename);
        match canvas.save(&output_path) {
            Ok(()) => tracing::debug!("Debug: saved {}", output_path.display()),
            Err(e) => tracing::warn!("Failed to save debug image {}: {}", output_path.display(), e),
        }
    }
}
