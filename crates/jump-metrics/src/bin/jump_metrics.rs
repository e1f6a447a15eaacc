use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jump_metrics::annotate::HudStyle;
use jump_metrics::{analyze_with, JumpConfig, LandmarkSource, LandmarkStream};
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "jump-metrics",
    version,
    about = "Measure a vertical jump from a recorded pose landmark stream"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a landmark stream and write the jump report.
    Analyze(AnalyzeArgs),
    /// Print the default configuration as JSON.
    DefaultConfig,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Landmark stream (JSON).
    input: PathBuf,
    /// Configuration file (JSON); missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Report path; overrides the config file.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Write one HUD overlay per frame (JSON lines).
    #[arg(long)]
    hud: Option<PathBuf>,
    /// Frame rate to use instead of the one stored in the stream.
    #[arg(long)]
    fps: Option<f32>,
    /// off, error, warn, info, debug or trace. With `tracing`, JUMP_METRICS_LOG
    /// or RUST_LOG take precedence.
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Emit JSON logs (only with the `tracing` feature).
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::DefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&JumpConfig::default())?);
            Ok(())
        }
        Command::Analyze(args) => run_analyze(args),
    }
}

fn init_logging(args: &AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let level = args
        .log_level
        .parse::<log::LevelFilter>()
        .map_err(|_| format!("invalid log level `{}`", args.log_level))?;
    #[cfg(feature = "tracing")]
    {
        let format = if args.json_logs {
            jump_metrics::core::LogFormat::Json
        } else {
            jump_metrics::core::LogFormat::Plain
        };
        jump_metrics::core::init_tracing(format, level);
    }
    #[cfg(not(feature = "tracing"))]
    {
        if args.json_logs {
            eprintln!("--json-logs needs the `tracing` feature; using plain logs");
        }
        jump_metrics::core::init_with_level(level)?;
    }
    Ok(())
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&args)?;

    let mut config = match &args.config {
        Some(path) => JumpConfig::load_json(path)?,
        None => JumpConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.fps_override = Some(fps);
    }
    if let Some(path) = &args.output {
        config.output_path = Some(path.display().to_string());
    }
    if let Some(path) = &args.hud {
        config.hud_path = Some(path.display().to_string());
    }
    let params = config.build_params()?;

    let mut stream = LandmarkStream::load_json(&args.input)?;
    stream.fps = config.effective_fps(stream.fps);
    let mut source = stream.into_source();
    let video = source.video_info();
    info!(
        "analyzing {} ({}x{} @ {:.2} fps)",
        args.input.display(),
        video.geometry.width,
        video.geometry.height,
        video.fps
    );

    let mut hud_out = match &config.hud_path {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };
    let style = HudStyle::default();

    let run = analyze_with(&mut source, params, |outcome| {
        if let Some(out) = hud_out.as_mut() {
            for hud in outcome.gap_overlays(&style) {
                serde_json::to_writer(&mut *out, &hud)?;
                out.write_all(b"\n")?;
            }
            serde_json::to_writer(&mut *out, &outcome.overlay(&style))?;
            out.write_all(b"\n")?;
        }
        Ok(())
    })?;

    if let Some(mut out) = hud_out {
        out.flush()?;
    }
    if let Some(err) = &run.aborted {
        warn!("stream ended early: {err}");
    }
    if run.malformed_frames > 0 || run.rejected_frames > 0 {
        warn!(
            "{} malformed and {} out-of-order frames were skipped",
            run.malformed_frames, run.rejected_frames
        );
    }

    let output = config.output_path();
    run.report.write_json(&output)?;
    info!("report written to {}", output.display());
    println!("{}", run.report);
    Ok(())
}
