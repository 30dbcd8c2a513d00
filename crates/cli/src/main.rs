use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use bokeh_core::compositing::bokeh_compositor::BokehCompositor;
use bokeh_core::compositing::intensity::BokehIntensity;
use bokeh_core::exposure::exposure_math::{
    clamp_exposure, exposure_compensation_index, nearest_iso,
};
use bokeh_core::exposure::shutter_rule::recommended_shutter_speed;
use bokeh_core::imaging::domain::image_writer::ImageWriter;
use bokeh_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use bokeh_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use bokeh_core::masking::mask_processor::ResampleFilter;
use bokeh_core::pipeline::bokeh_settings::BokehSettings;
use bokeh_core::pipeline::frame_processor::{FrameOutcome, FrameProcessor};
use bokeh_core::pipeline::pipeline_logger::{PipelineLogger, StdoutPipelineLogger};
use bokeh_core::segmentation::domain::segmenter::FixedMaskSegmenter;
use bokeh_core::shared::config::CompositorConfig;
use bokeh_core::shared::constants::DEFAULT_EV_STEPS_PER_UNIT;

/// Background blur compositing and camera exposure helpers.
#[derive(Parser)]
#[command(name = "bokeh")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Blur the background of a frame using a grayscale foreground mask.
    Composite {
        /// Input frame image.
        frame: PathBuf,

        /// Foreground mask image (white = subject). Any resolution.
        mask: PathBuf,

        /// Output image file.
        output: PathBuf,

        /// Blur intensity (0.0-1.0). Out-of-range values are clamped.
        #[arg(long, default_value = "0.5")]
        intensity: f32,

        /// Mask feather radius in pixels (overrides config).
        #[arg(long)]
        feather: Option<u32>,

        /// Blur radius at full intensity (overrides config).
        #[arg(long)]
        max_radius: Option<u32>,

        /// Upscale the mask with nearest-neighbour instead of bilinear.
        #[arg(long)]
        nearest: bool,

        /// Compositor config JSON (defaults to the user config directory).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print recommended exposure settings.
    Exposure {
        /// Recording frame rate.
        #[arg(long, default_value = "30")]
        fps: f64,

        /// Requested ISO, snapped to the nearest supported value.
        #[arg(long)]
        iso: Option<i64>,

        /// Requested exposure compensation in EV.
        #[arg(long)]
        ev: Option<f32>,

        /// Device compensation steps per EV.
        #[arg(long, default_value_t = DEFAULT_EV_STEPS_PER_UNIT)]
        ev_steps: u32,
    },

    /// Show the compositor config, or write the defaults with --init.
    Config {
        /// Write the default config to the user config directory.
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Composite {
            frame,
            mask,
            output,
            intensity,
            feather,
            max_radius,
            nearest,
            config,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(feather) = feather {
                config.feather_radius = feather;
            }
            if let Some(max_radius) = max_radius {
                config.max_radius = max_radius;
            }
            if nearest {
                config.resample = ResampleFilter::Nearest;
            }
            run_composite(&frame, &mask, &output, BokehIntensity::new(intensity), config)
        }
        Command::Exposure {
            fps,
            iso,
            ev,
            ev_steps,
        } => {
            run_exposure(fps, iso, ev, ev_steps);
            Ok(())
        }
        Command::Config { init } => run_config(init),
    }
}

fn load_config(path: Option<&Path>) -> Result<CompositorConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(CompositorConfig::load(p)?),
        None => Ok(CompositorConfig::load_or_default()),
    }
}

fn run_config(init: bool) -> Result<(), Box<dyn std::error::Error>> {
    if init {
        let path = CompositorConfig::default().save_default()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }
    match CompositorConfig::default_path() {
        Some(path) if path.exists() => println!("Config: {}", path.display()),
        Some(path) => println!("Config: {} (not present, using defaults)", path.display()),
        None => println!("Config: no user config directory, using defaults"),
    }
    let config = CompositorConfig::load_or_default();
    println!("  min_radius:     {}", config.min_radius);
    println!("  max_radius:     {}", config.max_radius);
    println!("  feather_radius: {}", config.feather_radius);
    println!("  resample:       {}", config.resample);
    Ok(())
}

fn run_composite(
    frame_path: &Path,
    mask_path: &Path,
    output: &Path,
    intensity: BokehIntensity,
    config: CompositorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = ImageFileReader::new();
    let frame = reader.read_frame(frame_path)?;
    let mask = reader.read_mask(mask_path)?;
    log::info!(
        "Frame {}x{}, mask {}x{}, intensity {:.2}, resample {}",
        frame.width(),
        frame.height(),
        mask.width(),
        mask.height(),
        intensity.value(),
        config.resample
    );

    let mut processor = FrameProcessor::new(
        Box::new(FixedMaskSegmenter::new(mask)),
        Arc::new(BokehCompositor::new(config)),
        Arc::new(BokehSettings::new(true, intensity)),
    );
    let mut logger = StdoutPipelineLogger::new(1);
    let processed = processor.process(frame, 0, &mut logger)?;
    logger.progress(1, 0);

    if let FrameOutcome::Composited { radius } = processed.outcome {
        log::info!("Background blurred with radius {radius}");
    }

    ImageFileWriter::new().write(output, &processed.frame, None)?;
    logger.summary();
    println!("Wrote {}", output.display());
    Ok(())
}

fn run_exposure(fps: f64, iso: Option<i64>, ev: Option<f32>, ev_steps: u32) {
    println!("Shutter: {} (180° rule at {fps} fps)", recommended_shutter_speed(fps));
    if let Some(iso) = iso {
        println!("ISO: {}", nearest_iso(iso));
    }
    if let Some(ev) = ev {
        let clamped = clamp_exposure(ev);
        println!(
            "EV: {clamped:+.1} (compensation index {})",
            exposure_compensation_index(ev, ev_steps)
        );
    }
}
