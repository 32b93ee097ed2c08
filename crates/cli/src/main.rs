#![deny(unsafe_code)]
//! CLI binary for the wavefront phased-array renderer.
//!
//! Subcommands:
//! - `render [view]`: evaluate a view at one instant, write PNG
//! - `probe <px> <py>`: gain in dB at a pixel, read back from the gain map colors
//! - `decode <color>`: gain in dB encoded by a gain-map color
//! - `animate`: drive the live view with a fixed-rate clock, write numbered PNGs
//! - `list`: print available views and the parameter schema

mod clock;
mod error;
mod input;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use wavefront_core::color::{ColorMapper, GainColorScale, Srgb};
use wavefront_core::evaluator::EvaluationMode;
use wavefront_core::params::ArrayParameters;
use wavefront_core::{Scene, SimulationContext, View};
use wavefront_views::snapshot::{write_png, write_view_png};
use wavefront_views::{AnimationDriver, GainMapSnapshot, ViewKind};

use clock::FixedRateClock;
use error::CliError;
use input::SceneArgs;

#[derive(Parser)]
#[command(name = "wavefront", about = "Phased-array wave interference renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Color scale for the gain view.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum GainScale {
    Decibel,
    Linear,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a view at one instant and write a PNG.
    Render {
        /// View name ("wave" or "gain"); defaults to the scene's view.
        view: Option<String>,

        #[command(flatten)]
        scene: SceneArgs,

        /// Color scale for the gain view (decibel if omitted); rejected for other views.
        #[arg(long, value_enum)]
        scale: Option<GainScale>,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Also write the resolved scene as JSON for later reproduction.
        #[arg(long)]
        save_scene: Option<PathBuf>,
    },
    /// Read the gain in dB at a canvas pixel from the rendered gain map.
    Probe {
        /// Pixel column, 0 at the left.
        px: usize,
        /// Pixel row, 0 at the top.
        py: usize,

        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Decode a gain-map color such as "#cf4070" into dB.
    Decode { color: String },
    /// Animate the live view with a fixed-rate clock and write numbered frames.
    Animate {
        #[command(flatten)]
        scene: SceneArgs,

        /// Number of frames to write.
        #[arg(short = 'n', long, default_value_t = 60)]
        frames: usize,

        /// Simulated frame rate.
        #[arg(long, default_value_t = 30.0)]
        fps: f64,

        /// Directory for frame_NNNN.png and gain.png.
        #[arg(short, long, default_value = "frames")]
        out_dir: PathBuf,
    },
    /// List available views and parameters.
    List,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Renders `scene` on the CPU and returns the view holding the frame.
fn render_scene(scene: &Scene, scale: Option<GainScale>) -> Result<ViewKind, CliError> {
    let region = scene.region()?;
    let mut ctx = SimulationContext::new(scene.array_parameters(), region)?;
    ctx.set_time(scene.time)?;

    let mut view = match (scene.view.as_str(), scale) {
        ("gain", Some(GainScale::Linear)) => ViewKind::Gain(GainMapSnapshot::with_mapper(
            region.pixel_width(),
            region.pixel_height(),
            ColorMapper::GainLinear,
        )?),
        ("gain", _) | (_, None) => ViewKind::from_name(&scene.view, &region)?,
        (name, Some(_)) => {
            return Err(CliError::Input(format!(
                "--scale applies only to the gain view, not '{name}'"
            )));
        }
    };
    view.render(&ctx)?;
    Ok(view)
}

fn save_scene(scene: &Scene, path: &Path) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(scene)?;
    fs::write(path, text)
        .map_err(|e| CliError::Io(format!("cannot write {}: {e}", path.display())))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let views = ViewKind::list_views();
            let schema = ArrayParameters::param_schema();
            if cli.json {
                print_json(&serde_json::json!({
                    "views": views,
                    "params": schema,
                }))?;
            } else {
                println!("Views:");
                for name in views {
                    println!("  {name}");
                }
                println!("Parameters:");
                if let Some(entries) = schema.as_object() {
                    for (key, info) in entries {
                        let description = info["description"].as_str().unwrap_or_default();
                        println!("  {key:<12} {description}");
                    }
                }
            }
        }
        Command::Render {
            view,
            scene,
            scale,
            output,
            save_scene: scene_path,
        } => {
            let scene = scene.resolve(view.as_deref())?;
            let frame = render_scene(&scene, scale)?;
            write_png(&frame.pixels(), scene.width, scene.height, &output)?;
            if let Some(path) = &scene_path {
                save_scene(&scene, path)?;
            }

            if cli.json {
                print_json(&serde_json::json!({
                    "view": scene.view,
                    "width": scene.width,
                    "height": scene.height,
                    "time": scene.time,
                    "output": output.display().to_string(),
                }))?;
            } else {
                eprintln!(
                    "rendered {} ({}x{}, t = {} s) -> {}",
                    scene.view,
                    scene.width,
                    scene.height,
                    scene.time,
                    output.display()
                );
            }
        }
        Command::Probe { px, py, scene } => {
            let scene = scene.resolve(Some("gain"))?;
            let region = scene.region()?;
            let ctx = SimulationContext::new(scene.array_parameters(), region)?;
            let snapshot = GainMapSnapshot::compute(&ctx, ColorMapper::gain_decibel())?;
            let probed = snapshot.probe(px, py).ok_or_else(|| {
                CliError::Input(format!(
                    "pixel ({px}, {py}) is outside the {}x{} canvas",
                    scene.width, scene.height
                ))
            })?;

            let point = region.to_physical(px as f64, py as f64);
            let magnitude = ctx.evaluator(EvaluationMode::SteadyState).steady_state(point);
            let exact = GainColorScale::default().magnitude_to_db(magnitude);

            if cli.json {
                print_json(&serde_json::json!({
                    "px": px,
                    "py": py,
                    "x": point.x,
                    "y": point.y,
                    "gain_db": probed,
                    "exact_gain_db": exact,
                }))?;
            } else {
                println!(
                    "({px}, {py}) at ({:.3} m, {:.3} m): {probed:.1} dB (exact {exact:.2} dB)",
                    point.x, point.y
                );
            }
        }
        Command::Decode { color } => {
            let rgb = Srgb::from_hex(&color)?.to_rgb8();
            let db = GainColorScale::default().decode(rgb);
            if cli.json {
                print_json(&serde_json::json!({ "color": color, "gain_db": db }))?;
            } else {
                println!("{color}: {db:.1} dB");
            }
        }
        Command::Animate {
            scene,
            frames,
            fps,
            out_dir,
        } => {
            let scene = scene.resolve(Some("wave"))?;
            let region = scene.region()?;
            let clock = FixedRateClock::new(fps)?;
            fs::create_dir_all(&out_dir)?;

            let mut driver = AnimationDriver::new(
                scene.array_parameters(),
                region,
                ColorMapper::gain_decibel(),
                clock,
            )?;
            write_view_png(driver.gain(), &out_dir.join("gain.png"))?;

            driver.start();
            let mut written = 0;
            while written < frames {
                let Some((handle, now_ms)) = driver.scheduler_mut().tick() else {
                    break;
                };
                driver.on_frame(handle, now_ms);
                write_view_png(driver.wave(), &out_dir.join(format!("frame_{written:04}.png")))?;
                written += 1;
            }
            driver.stop();

            if cli.json {
                print_json(&serde_json::json!({
                    "frames": written,
                    "dropped": driver.dropped_frames(),
                    "time": driver.time(),
                    "out_dir": out_dir.display().to_string(),
                }))?;
            } else {
                eprintln!(
                    "animated {written} frames ({} dropped, t = {:.3} s) -> {}",
                    driver.dropped_frames(),
                    driver.time(),
                    out_dir.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(view: &str) -> Scene {
        let mut scene = Scene::new(view);
        scene.width = 24;
        scene.height = 12;
        scene
    }

    #[test]
    fn gain_view_honors_linear_scale() {
        let view = render_scene(&scene("gain"), Some(GainScale::Linear)).unwrap();
        assert_eq!(view.mapper(), ColorMapper::GainLinear);
        assert_eq!(view.probe(3, 3), None);
    }

    #[test]
    fn gain_view_defaults_to_decibel() {
        let view = render_scene(&scene("gain"), None).unwrap();
        assert_eq!(view.mapper(), ColorMapper::gain_decibel());
    }

    #[test]
    fn scale_is_rejected_for_wave_view() {
        for scale in [GainScale::Linear, GainScale::Decibel] {
            let err = render_scene(&scene("wave"), Some(scale)).err().unwrap();
            assert!(matches!(err, CliError::Input(_)));
            assert_eq!(err.exit_code(), 12);
        }
    }

    #[test]
    fn unknown_view_still_reports_registry_error() {
        let err = render_scene(&scene("spectrum"), None).err().unwrap();
        assert!(matches!(err, CliError::Wave(_)));
    }
}
