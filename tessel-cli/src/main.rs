//! Tessel CLI
//!
//! Plans paint tasks from an overlay manifest and a palette manifest, and
//! rehearses a run against a simulated, charge-limited canvas.

mod sim;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use tessel_common::logging::{LoggingConfig, init_logging};
use tessel_common::warning::clear_warnings;
use tessel_core::{
    BuildError, Clock, ColorId, Executor, ExecutorConfig, Origin, PaintTask, Plan, VirtualClock,
    build_from_source,
};
use tessel_overlay::{FileOverlay, FilePalette, OverlayManifest};

use sim::SimulatedCanvas;

/// Tessel: reproduce a palette-quantized image on a charge-limited canvas
#[derive(Parser, Debug)]
#[command(name = "tessel")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Summarize the tasks an overlay needs
    tessel plan --overlay overlay.json --palette palette.json

    # Dump the task list as JSON
    tessel plan --overlay overlay.json --palette palette.json --json

    # Rehearse a run: 20 charges, one more every 30 seconds
    tessel simulate --overlay overlay.json --palette palette.json --charges 20 --regen-ms 30000

    # Replay a task list saved by `plan --json`
    tessel plan --overlay overlay.json --palette palette.json --json > tasks.json
    tessel simulate --overlay overlay.json --palette palette.json --tasks tasks.json
"#)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the task list and print it
    Plan {
        #[command(flatten)]
        inputs: Inputs,

        /// Print every task as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Run the executor against an in-memory canvas
    Simulate {
        #[command(flatten)]
        inputs: Inputs,

        /// Charges available at the start (also the cap)
        #[arg(long, default_value = "20")]
        charges: u32,

        /// Milliseconds of virtual time per regenerated charge
        #[arg(long, default_value = "30000")]
        regen_ms: u64,

        /// Executor pacing as JSON (`poll_interval_ms`, `settle_ms`, `paint_mode_settle_ms`)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Give up after this many seconds of virtual time
        #[arg(long, value_name = "SECS")]
        deadline: Option<u64>,

        /// Simulate a canvas lacking the control for this color id
        #[arg(long, value_name = "ID")]
        missing_color: Option<String>,

        /// Run this task list (as written by `plan --json`) instead of building one
        #[arg(long, value_name = "FILE")]
        tasks: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct Inputs {
    /// Overlay manifest (image, region, pixel offset, tile size)
    #[arg(long, value_name = "FILE")]
    overlay: PathBuf,

    /// Palette manifest (color control ids and CSS colors)
    #[arg(long, value_name = "FILE")]
    palette: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::with_verbosity(cli.verbose));

    match cli.command {
        Command::Plan { inputs, json } => plan(&inputs, json),
        Command::Simulate {
            inputs,
            charges,
            regen_ms,
            config,
            deadline,
            missing_color,
            tasks,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => ExecutorConfig::default(),
            };
            let (origin, tasks) = match tasks {
                Some(path) => (overlay_origin(&inputs.overlay)?, load_tasks(&path)?),
                None => {
                    let plan = build(&inputs)?;
                    (plan.origin, plan.tasks)
                }
            };
            simulate(
                origin,
                tasks,
                charges,
                Duration::from_millis(regen_ms),
                config,
                deadline.map(Duration::from_secs),
                missing_color.map(ColorId::new),
            )
        }
    }
}

fn load_config(path: &Path) -> Result<ExecutorConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read executor config '{}'", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid executor config '{}'", path.display()))
}

fn load_tasks(path: &Path) -> Result<Vec<PaintTask>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read task list '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid task list '{}'", path.display()))
}

/// Origin of the overlay placement, without decoding its image.
fn overlay_origin(path: &Path) -> Result<Origin> {
    let basis = OverlayManifest::load(path)?.basis();
    Origin::from_basis(&basis).with_context(|| {
        format!("overlay '{}' is placed outside the canvas coordinate range", path.display())
    })
}

fn build(inputs: &Inputs) -> Result<Plan> {
    clear_warnings();
    let overlay = FileOverlay::new(&inputs.overlay);
    let palette = FilePalette::new(&inputs.palette);

    let plan = match build_from_source(&overlay, &palette) {
        Ok(plan) => plan,
        Err(err @ BuildError::SourceNotReady(_)) => {
            // The trait only says "not ready"; the loader knows why.
            if let Err(cause) = overlay.load() {
                return Err(cause).context(err.to_string());
            }
            return Err(err.into());
        }
    };

    if plan.palette.is_empty() {
        let path = inputs.palette.display();
        let _ = palette
            .try_controls()
            .with_context(|| format!("no usable colors in palette '{path}'"))?;
        bail!("palette '{path}' lists no colors");
    }
    Ok(plan)
}

fn plan(inputs: &Inputs, json: bool) -> Result<()> {
    let plan = build(inputs)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan.tasks)?);
        return Ok(());
    }

    let stats = &plan.stats;
    println!("{}", "=== Plan ===".bold());
    println!("origin:      ({}, {})", plan.origin.x, plan.origin.y);
    println!("palette:     {} colors", plan.palette.len());
    println!("pixels:      {}", stats.pixels);
    println!("transparent: {}", stats.transparent);
    println!("tasks:       {}", stats.emitted.green());
    if stats.unmatched > 0 {
        println!(
            "unmatched:   {} pixels in {} colors",
            stats.unmatched.yellow(),
            stats.unmatched_colors.len()
        );
        for rgb in &stats.unmatched_colors {
            println!("  {}", rgb.yellow());
        }
    }
    Ok(())
}

fn simulate(
    origin: Origin,
    tasks: Vec<PaintTask>,
    charges: u32,
    regen: Duration,
    config: ExecutorConfig,
    deadline: Option<Duration>,
    missing_color: Option<ColorId>,
) -> Result<()> {
    if tasks.is_empty() {
        bail!("nothing to paint: the task list is empty");
    }

    let clock = VirtualClock::new();
    let mut canvas = SimulatedCanvas::new(clock.clone(), charges, charges, regen);
    if let Some(color) = missing_color {
        canvas = canvas.without_color(color);
    }

    let mut executor = Executor::new(canvas, clock.clone(), origin).with_config(config);
    if let Some(budget) = deadline {
        executor = executor.with_deadline(clock.now() + budget);
    }

    let total = tasks.len();
    log::info!("simulating {total} tasks, {charges} charges, one per {regen:?}");
    let result = executor.run_all(tasks);
    let (canvas, _) = executor.into_parts();

    println!("{}", "=== Simulation ===".bold());
    println!("virtual time:    {:.1?}", clock.elapsed());
    println!("painted:         {} / {total}", canvas.painted().len());
    println!("refill requests: {}", canvas.refill_requests());
    if canvas.wasted_confirms() > 0 {
        println!("wasted confirms: {}", canvas.wasted_confirms().red());
    }

    match result {
        Ok(report) => {
            println!(
                "{} {} tasks, {} poll waits ({:.1?} waiting)",
                "done:".green().bold(),
                report.dispatched,
                report.poll_cycles,
                report.waited
            );
            Ok(())
        }
        Err(err) => {
            println!("{} {err}", "stopped:".red().bold());
            let completed = err.completed();
            Err(err).context(format!("run stopped after {completed} of {total} tasks"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tessel_core::Point;

    /// A 2x1 red overlay at region (1, 0), pixel (5, 7).
    fn write_overlay(dir: &Path) -> PathBuf {
        fs::write(
            dir.join("art.svg"),
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="1" shape-rendering="crispEdges"><rect width="2" height="1" fill="#ff0000"/></svg>"##,
        )
        .unwrap();
        let path = dir.join("overlay.json");
        fs::write(
            &path,
            r#"{ "image": "art.svg", "region": { "x": 1, "y": 0 }, "pixel": { "x": 5, "y": 7 } }"#,
        )
        .unwrap();
        path
    }

    fn inputs(dir: &Path, palette: &str) -> Inputs {
        Inputs {
            overlay: write_overlay(dir),
            palette: dir.join(palette),
        }
    }

    #[test]
    fn test_missing_palette_explained() {
        let dir = TempDir::new().unwrap();
        let err = build(&inputs(dir.path(), "absent.json")).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("no usable colors"), "{message}");
        assert!(message.contains("failed to read"), "{message}");
    }

    #[test]
    fn test_unparseable_palette_explained() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("palette.json"),
            r#"{ "controls": [ { "id": "color-1", "color": "hotpink" } ] }"#,
        )
        .unwrap();
        let err = build(&inputs(dir.path(), "palette.json")).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported color 'hotpink'"));
    }

    #[test]
    fn test_empty_palette_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("palette.json"), r#"{ "controls": [] }"#).unwrap();
        let err = build(&inputs(dir.path(), "palette.json")).unwrap_err();
        assert!(err.to_string().contains("lists no colors"));
    }

    #[test]
    fn test_plan_json_replays_through_executor() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("palette.json"),
            r##"{ "controls": [ { "id": "color-4", "color": "#f00" } ] }"##,
        )
        .unwrap();
        let inputs = inputs(dir.path(), "palette.json");
        let plan = build(&inputs).unwrap();
        assert_eq!(plan.tasks.len(), 2);

        let tasks_path = dir.path().join("tasks.json");
        fs::write(&tasks_path, serde_json::to_string_pretty(&plan.tasks).unwrap()).unwrap();
        let tasks = load_tasks(&tasks_path).unwrap();
        assert_eq!(tasks, plan.tasks);

        let origin = overlay_origin(&inputs.overlay).unwrap();
        assert_eq!(origin, Origin::new(1005, 7));

        let clock = VirtualClock::new();
        let canvas = SimulatedCanvas::new(clock.clone(), 5, 5, Duration::from_secs(1));
        let mut executor = Executor::new(canvas, clock, origin);
        let report = executor.run_all(tasks).unwrap();
        let (canvas, _) = executor.into_parts();

        assert_eq!(report.dispatched, 2);
        assert_eq!(
            canvas.painted().get(&Point::new(1006, 7)),
            Some(&ColorId::new("4"))
        );
    }
}
