use clap::Parser;
use std::path::PathBuf;

use qualview::compose::build_standard_pipeline;
use qualview::display::parse_viewport;
use qualview::{ReplayEngine, Session, ZoomDirection, ZoomPreset};

#[derive(Parser)]
#[command(name = "qualview")]
#[command(about = "Visualize and export face image quality assessments")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Recorded engine results (JSON) to assess the image with
    #[arg(long, value_name = "FILE")]
    results: Option<PathBuf>,

    /// Draw overlays on a white canvas instead of the original pixels
    #[arg(long)]
    hide_original: bool,

    /// Do not draw face boxes
    #[arg(long)]
    no_faces: bool,

    /// Draw facial landmarks
    #[arg(long)]
    landmarks: bool,

    /// Blend the face-parsing segmentation mask
    #[arg(long)]
    segmentation: bool,

    /// Blend the occlusion mask
    #[arg(long)]
    occlusion: bool,

    /// Blend the landmarked region
    #[arg(long)]
    landmarked_region: bool,

    /// Viewport the preview is fitted into
    #[arg(long, value_name = "WxH", default_value = "640x480", value_parser = parse_viewport)]
    viewport: (u32, u32),

    /// Fixed zoom instead of fit-to-viewport (1:4, 1:2, 1:1, 2:1, 4:1)
    #[arg(long, value_name = "RATIO", value_parser = parse_zoom)]
    zoom: Option<ZoomPreset>,

    /// Zoom in this many steps
    #[arg(long, value_name = "N", default_value_t = 0)]
    zoom_in: u32,

    /// Zoom out this many steps
    #[arg(long, value_name = "N", default_value_t = 0)]
    zoom_out: u32,

    /// Save the full-resolution visualization
    #[arg(long, value_name = "FILE")]
    save_image: Option<PathBuf>,

    /// Save the scaled preview
    #[arg(long, value_name = "FILE")]
    save_preview: Option<PathBuf>,

    /// Export the assessment as delimited text
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Save every compositing stage to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_zoom(s: &str) -> Result<ZoomPreset, String> {
    ZoomPreset::from_label(s).ok_or_else(|| format!("unknown zoom '{}', expected 1:4, 1:2, 1:1, 2:1 or 4:1", s))
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    qualview::logging::init(args.verbose)?;

    let mut pipeline = build_standard_pipeline();
    if let Some(debug_dir) = args.debug_out.clone() {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    let mut session = Session::new().with_pipeline(pipeline);
    {
        let overlays = &mut session.state_mut().overlays;
        overlays.original = !args.hide_original;
        overlays.faces = !args.no_faces;
        overlays.landmarks = args.landmarks;
        overlays.segmentation = args.segmentation;
        overlays.occlusion = args.occlusion;
        overlays.landmarked_region = args.landmarked_region;
    }

    session.load_image(&args.image_path)?;

    let (viewport_width, viewport_height) = args.viewport;
    match args.zoom {
        Some(preset) => session.zoom_preset(preset),
        None => session.fit_to_viewport(viewport_width, viewport_height),
    }
    for _ in 0..args.zoom_in {
        session.zoom(ZoomDirection::In);
    }
    for _ in 0..args.zoom_out {
        session.zoom(ZoomDirection::Out);
    }

    if let Some(results) = &args.results {
        let engine = ReplayEngine::from_file(results)?;
        session.assess(&engine)?;
    }

    let rows = session.rows();
    if rows.is_empty() {
        println!("No assessment available.");
    } else {
        println!("\n{:<32} {:>14} {:>6}", "component", "native", "value");
        for row in &rows {
            println!("{:<32} {:>14.6} {:>6}", row.name, row.raw_score, row.scalar);
        }
        println!();
    }
    println!("Zoom: {}", session.zoom_label());

    if let Some(path) = &args.save_image {
        session.save_image(path)?;
    }

    if let Some(path) = &args.save_preview {
        if let Some(preview) = session.preview() {
            if args.verbose {
                println!("Preview: {}x{}", preview.width(), preview.height());
            }
            preview.save(path)?;
        }
    }

    if let Some(path) = &args.export {
        session.save_assessment(path)?;
    }

    Ok(())
}
