use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use motion_synth::config::{AppConfig, MappingConfig};
use motion_synth::fixtures::{self, Gesture, GestureSpec, OfflineSession};
use motion_synth::mapping::{build_strategy, StrategyKind};
use motion_synth::tracking::PoseInput;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "motion_synth",
    about = "Offline harness and player for motion-driven additive synthesis"
)]
struct Cli {
    /// JSON config file; must exist and parse (without it: assets/motion_synth.json, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the configured mapping strategy
    #[arg(long, global = true)]
    strategy: Option<StrategyKind>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a recording or synthetic gesture to a WAV file and print a JSON report
    Render {
        #[command(flatten)]
        source: PoseSource,
        #[arg(long)]
        output: PathBuf,
        /// Also write the report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Stream the parameter set of every frame to stdout as JSON lines
    Map {
        #[command(flatten)]
        source: PoseSource,
    },
    /// Play a recording or synthetic gesture through the default output device
    Play {
        #[command(flatten)]
        source: PoseSource,
    },
    /// List available mapping strategies
    Strategies,
}

#[derive(Args, Debug)]
struct PoseSource {
    /// Pose recording (JSON array or JSON lines); overrides --gesture
    #[arg(long)]
    input: Option<PathBuf>,
    /// Synthetic gesture: arm-raise, wrist-sweep or idle
    #[arg(long, default_value = "arm-raise")]
    gesture: Gesture,
    #[arg(long, default_value_t = 4.0)]
    duration: f32,
    #[arg(long, default_value_t = 30.0)]
    fps: f32,
    /// Landmark noise amplitude for synthetic gestures
    #[arg(long, default_value_t = 0.0)]
    jitter: f32,
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

impl PoseSource {
    fn load(&self) -> Result<Vec<PoseInput>> {
        match &self.input {
            Some(path) => fixtures::load_recording(path),
            None => Ok(fixtures::synthesize(
                &GestureSpec::new(self.gesture)
                    .with_duration(self.duration)
                    .with_fps(self.fps)
                    .with_jitter(self.jitter, self.seed),
            )),
        }
    }
}

#[derive(Serialize)]
struct StrategyEntry {
    name: &'static str,
    description: &'static str,
    space: String,
    voices: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::load(),
    };
    if let Some(strategy) = cli.strategy {
        config.mapping.strategy = strategy;
    }
    config
        .validate()
        .map_err(|err| anyhow!(err))
        .context("validating configuration")?;

    match cli.command {
        Commands::Render {
            source,
            output,
            report,
        } => run_render(config, &source, &output, report.as_deref()),
        Commands::Map { source } => run_map(config, &source),
        Commands::Play { source } => run_play(config, &source),
        Commands::Strategies => run_strategies(),
    }
}

/// Strict load for a file named on the command line; only the implicit
/// default path falls back to built-in defaults
fn load_config(path: &Path) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config {}", path.display()))?;
    tracing::info!("[motion_synth] Loaded configuration from {}", path.display());
    Ok(config)
}

fn run_render(
    config: AppConfig,
    source: &PoseSource,
    output: &Path,
    report_path: Option<&Path>,
) -> Result<ExitCode> {
    let poses = source.load()?;
    let session = OfflineSession::new(config)?;
    let rendered = session
        .render(&poses)
        .with_context(|| format!("rendering {} poses", poses.len()))?;

    fixtures::write_wav(output, &rendered.samples, rendered.sample_rate)?;

    let json = serde_json::to_string(&rendered.report)?;
    println!("{json}");
    if let Some(path) = report_path {
        std::fs::write(path, serde_json::to_string_pretty(&rendered.report)?)
            .with_context(|| format!("writing report {}", path.display()))?;
    }
    Ok(ExitCode::from(0))
}

fn run_map(config: AppConfig, source: &PoseSource) -> Result<ExitCode> {
    let poses = source.load()?;
    let session = OfflineSession::new(config)?;
    for frame in session.map(&poses)? {
        println!("{}", serde_json::to_string(&frame)?);
    }
    Ok(ExitCode::from(0))
}

fn run_strategies() -> Result<ExitCode> {
    for kind in StrategyKind::ALL {
        let config = MappingConfig {
            strategy: kind,
            ..MappingConfig::default()
        };
        let strategy = build_strategy(&config).map_err(|err| anyhow!(err))?;
        let entry = StrategyEntry {
            name: kind.name(),
            description: kind.description(),
            space: format!("{:?}", kind.space()).to_lowercase(),
            voices: strategy.voice_count(),
        };
        println!("{}", serde_json::to_string(&entry)?);
    }
    Ok(ExitCode::from(0))
}

#[cfg(feature = "cpal_backend")]
fn run_play(config: AppConfig, source: &PoseSource) -> Result<ExitCode> {
    use std::thread;
    use std::time::{Duration, Instant};

    use motion_synth::engine::{CpalBackend, SynthEngine};
    use motion_synth::pipeline::MotionPipeline;

    let poses = source.load()?;
    let mut pipeline = MotionPipeline::new(&config).map_err(|err| anyhow!(err))?;
    let mut engine =
        SynthEngine::new(CpalBackend::new(), config.synth.clone()).map_err(|err| anyhow!(err))?;
    let publisher = engine
        .start()
        .map_err(|err| anyhow!(err))
        .context("opening output stream")?;
    pipeline.connect(publisher);

    let started = Instant::now();
    let first = poses.first().map(|pose| pose.timestamp).unwrap_or_default();
    for pose in &poses {
        let offset = (pose.timestamp - first) / 1000.0;
        if offset.is_finite() && offset > 0.0 {
            if let Some(wait) = Duration::from_secs_f64(offset).checked_sub(started.elapsed()) {
                thread::sleep(wait);
            }
        }
        pipeline.process(pose);
    }

    let mut publisher = pipeline.disconnect();
    engine
        .shutdown(publisher.as_mut())
        .map_err(|err| anyhow!(err))
        .context("stopping output stream")?;
    eprintln!(
        "Played {} poses ({} frames rendered)",
        poses.len(),
        engine.backend().frames_rendered()
    );
    Ok(ExitCode::from(0))
}

#[cfg(not(feature = "cpal_backend"))]
fn run_play(_config: AppConfig, _source: &PoseSource) -> Result<ExitCode> {
    Err(anyhow!(motion_synth::error::AudioError::BackendUnavailable {
        backend: "cpal".to_string(),
    }))
    .context("real-time playback requires building with --features cpal_backend")
}
