#![deny(unsafe_code)]
//! CLI binary for the dissolve particle field.
//!
//! Subcommands:
//! - `render <image>`: sample an image, run the field N frames, write PNGs
//! - `config`: print the resolved configuration and its schema

mod error;

use clap::{Parser, Subcommand};
use dissolve_core::field::DEFAULT_SCATTER_SEED;
use dissolve_core::{FieldConfig, ParticleField, Raster, Rgba};
use dissolve_host::snapshot::{load_image, write_png};
use dissolve_host::{Command as FieldCommand, RenderLoop};
use error::CliError;
use log::info;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "dissolve", about = "Disintegrate and reform an image as particles")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Config sources shared by every subcommand, applied in field order.
#[derive(clap::Args)]
struct ConfigArgs {
    /// JSON file with `sampling_gap`, `influence_radius`, `friction`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Settings as a JSON string, overlaid on the config file.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Pixel stride between sampled particles.
    #[arg(long)]
    gap: Option<usize>,

    /// Pointer influence radius (squared-distance threshold).
    #[arg(long)]
    radius: Option<f64>,

    /// Velocity multiplier per frame, in (0, 1].
    #[arg(long)]
    friction: Option<f64>,
}

#[derive(Subcommand)]
enum Command {
    /// Sample an image into particles, run the field, and write PNG frames.
    Render {
        /// Source image (any format the decoder understands).
        image: PathBuf,

        /// Surface width in pixels.
        #[arg(short = 'W', long, default_value_t = 800)]
        width: usize,

        /// Surface height in pixels.
        #[arg(short = 'H', long, default_value_t = 600)]
        height: usize,

        /// Number of frames to render.
        #[arg(short, long, default_value_t = 120)]
        frames: u64,

        /// Seed for the scatter generator.
        #[arg(long, default_value_t = DEFAULT_SCATTER_SEED)]
        seed: u64,

        #[command(flatten)]
        settings: ConfigArgs,

        /// Scatter every particle before the first frame.
        #[arg(long)]
        scatter: bool,

        /// Hold the pointer at `x,y` from the first frame.
        #[arg(long)]
        pointer: Option<String>,

        /// Frames the pointer stays before leaving the surface.
        #[arg(long, default_value_t = 30)]
        pointer_frames: u64,

        /// Background the frames are flattened onto (`#rrggbb` or `#rrggbbaa`).
        #[arg(long, default_value = "#000000")]
        background: String,

        /// Output file for the last frame.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Directory that receives numbered intermediate frames.
        #[arg(long)]
        frames_dir: Option<PathBuf>,

        /// Write every K-th frame into `--frames-dir`.
        #[arg(long, default_value_t = 1)]
        every: u64,
    },
    /// Print the resolved configuration and the settings schema.
    Config {
        #[command(flatten)]
        settings: ConfigArgs,
    },
}

/// Defaults, then the config file, then `--params`, then explicit flags.
fn resolve_config(args: &ConfigArgs) -> Result<FieldConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
            let value: serde_json::Value = serde_json::from_str(&text)
                .map_err(|e| CliError::Input(format!("{}: {e}", path.display())))?;
            FieldConfig::from_json(&value)
        }
        None => FieldConfig::default(),
    };

    let params: serde_json::Value = serde_json::from_str(&args.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    config = config.merged_with(&params);

    if let Some(gap) = args.gap {
        config.sampling_gap = gap;
    }
    if let Some(radius) = args.radius {
        config.influence_radius = radius;
    }
    if let Some(friction) = args.friction {
        config.friction = friction;
    }
    Ok(config.normalized())
}

/// Parses `x,y` into surface coordinates.
fn parse_point(spec: &str) -> Result<(f64, f64), CliError> {
    let invalid = || CliError::Input(format!("invalid --pointer {spec:?}, expected x,y"));
    let (x, y) = spec.split_once(',').ok_or_else(invalid)?;
    let x: f64 = x.trim().parse().map_err(|_| invalid())?;
    let y: f64 = y.trim().parse().map_err(|_| invalid())?;
    if x.is_finite() && y.is_finite() {
        Ok((x, y))
    } else {
        Err(invalid())
    }
}

fn frame_path(dir: &Path, frame: u64) -> PathBuf {
    dir.join(format!("frame_{frame:05}.png"))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Config { settings } => {
            let config = resolve_config(&settings)?;
            if cli.json {
                let info = serde_json::json!({
                    "config": config.to_json(),
                    "schema": FieldConfig::param_schema(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let (size, radius, friction) = config.to_menu_units();
                println!("sampling_gap:     {}", config.sampling_gap);
                println!("influence_radius: {}", config.influence_radius);
                println!("friction:         {}", config.friction);
                println!("menu units:       size {size}, radius {radius}, friction {friction}");
            }
        }
        Command::Render {
            image,
            width,
            height,
            frames,
            seed,
            settings,
            scatter,
            pointer,
            pointer_frames,
            background,
            output,
            frames_dir,
            every,
        } => {
            let config = resolve_config(&settings)?;
            let background = Rgba::from_hex(&background)?;
            let pointer = pointer
                .as_deref()
                .map(parse_point)
                .transpose()?
                // Zero frames means the pointer never enters.
                .filter(|_| pointer_frames > 0);
            if every == 0 {
                return Err(CliError::Input("--every must be at least 1".into()));
            }

            let source = load_image(&image)?;
            info!(
                "loaded {} ({}x{})",
                image.display(),
                source.width(),
                source.height()
            );

            let field = ParticleField::with_seed(Raster::new(width, height)?, config, seed)?;
            let mut render = RenderLoop::new(field);
            render.push(FieldCommand::Reinit(Some(source)));
            if scatter {
                render.push(FieldCommand::Scatter);
            }
            if let Some((x, y)) = pointer {
                render.push(FieldCommand::PointerMove { x, y });
            }

            if let Some(dir) = &frames_dir {
                std::fs::create_dir_all(dir)
                    .map_err(|e| CliError::Io(format!("{}: {e}", dir.display())))?;
            }

            let tx = render.sender();
            let mut written = 0u64;
            render.run(Some(frames), |frame, field| {
                if pointer.is_some() && frame == pointer_frames {
                    // The loop owns the receiver for the whole run.
                    let _ = tx.send(FieldCommand::PointerLeave);
                }
                if let Some(dir) = &frames_dir {
                    if frame % every == 0 {
                        write_png(field.surface(), background, &frame_path(dir, frame))?;
                        written += 1;
                    }
                }
                Ok(ControlFlow::Continue(()))
            })?;

            write_png(render.field().surface(), background, &output)?;

            let particles = render.field().len();
            if cli.json {
                let info = serde_json::json!({
                    "image": image.display().to_string(),
                    "width": width,
                    "height": height,
                    "frames": frames,
                    "seed": seed,
                    "particles": particles,
                    "config": config.to_json(),
                    "frames_written": written,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({width}x{height}, {particles} particles, {frames} frames, seed {seed}) -> {}",
                    image.display(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
