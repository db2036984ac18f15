//! Offline sessions: a pose sequence played through the whole system.
//!
//! The pipeline runs on the calling thread and the engine uses the offline
//! backend, which renders exactly as many buffers as the pose timestamps
//! say have elapsed. The result is what a live session with the same input
//! would have produced, sample for sample.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use crate::config::AppConfig;
use crate::engine::{OfflineBackend, SynthEngine};
use crate::mapping::ParameterSet;
use crate::pipeline::MotionPipeline;
use crate::tracking::PoseInput;

/// Summary of an offline render
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub strategy: String,
    pub frames: usize,
    pub frames_skipped: usize,
    pub sets_published: u64,
    pub sets_superseded: u64,
    pub buffers: usize,
    pub sample_rate: u32,
    pub duration_secs: f32,
    pub peak: f32,
    pub rms: f32,
    /// Whether the final buffer had faded below -60 dB of the peak
    pub ends_silent: bool,
}

/// Rendered audio plus its report
pub struct SessionOutput {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub report: SessionReport,
}

/// One mapped frame, as streamed by the CLI `map` command
#[derive(Debug, Clone, Serialize)]
pub struct MappedFrame {
    pub timestamp_ms: f64,
    pub params: ParameterSet,
}

/// Runs pose sequences through pipeline and offline engine
pub struct OfflineSession {
    config: AppConfig,
}

impl OfflineSession {
    pub fn new(config: AppConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|err| anyhow!(err))
            .context("validating configuration")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Render `poses` to mono samples
    ///
    /// Buffers are rendered between consecutive poses in proportion to the
    /// timestamp gap, carrying the fractional remainder forward. After the
    /// last pose one more frame interval is rendered, then the engine fades
    /// out as on a live shutdown.
    pub fn render(&self, poses: &[PoseInput]) -> Result<SessionOutput> {
        let synth = &self.config.synth;
        let buffer_seconds = synth.buffer_seconds();

        let mut pipeline = MotionPipeline::new(&self.config).map_err(|err| anyhow!(err))?;
        let mut engine =
            SynthEngine::new(OfflineBackend::new(), synth.clone()).map_err(|err| anyhow!(err))?;
        let publisher = engine.start().map_err(|err| anyhow!(err))?;
        pipeline.connect(publisher);

        let mut buffers = 0usize;
        let mut owed = 0.0f64;
        let mut last_timestamp: Option<f64> = None;
        let mut frames_skipped = 0usize;

        for pose in poses {
            if let Some(previous) = last_timestamp {
                let elapsed = (pose.timestamp - previous) / 1000.0;
                if elapsed.is_finite() && elapsed > 0.0 {
                    owed += elapsed / buffer_seconds as f64;
                }
                let due = owed.floor();
                owed -= due;
                engine.advance(due as usize).map_err(|err| anyhow!(err))?;
                buffers += due as usize;
            }
            last_timestamp = Some(pose.timestamp);

            if pipeline.process(pose).is_none() {
                frames_skipped += 1;
            }
        }

        let tail = (self.config.tracking.default_delta_time / buffer_seconds).ceil() as usize;
        engine.advance(tail).map_err(|err| anyhow!(err))?;
        buffers += tail;

        let mut publisher = pipeline.disconnect();
        let (sets_published, sets_superseded) = publisher
            .as_ref()
            .map(|p| (p.published(), p.superseded()))
            .unwrap_or_default();
        engine
            .shutdown(publisher.as_mut())
            .map_err(|err| anyhow!(err))
            .context("fading out offline engine")?;
        buffers += synth.fade_buffers();

        let mut backend = engine.into_backend();
        let sample_rate = backend.sample_rate();
        let samples = backend.take_samples();

        let peak = samples.iter().fold(0.0f32, |max, s| max.max(s.abs()));
        let rms = if samples.is_empty() {
            0.0
        } else {
            (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
        };
        let last_buffer = &samples[samples.len().saturating_sub(synth.buffer_size)..];
        let ends_silent = last_buffer
            .iter()
            .all(|s| s.abs() <= peak * crate::synth::SILENCE_THRESHOLD);

        let report = SessionReport {
            strategy: pipeline.strategy_kind().to_string(),
            frames: poses.len(),
            frames_skipped,
            sets_published,
            sets_superseded,
            buffers,
            sample_rate,
            duration_secs: samples.len() as f32 / sample_rate.max(1) as f32,
            peak,
            rms,
            ends_silent,
        };
        log::info!(
            "[OfflineSession] {} frames -> {} buffers, peak {:.3}",
            report.frames,
            report.buffers,
            report.peak
        );

        Ok(SessionOutput {
            samples,
            sample_rate,
            report,
        })
    }

    /// Run `poses` through the motion domain only
    ///
    /// Poses without landmarks produce no entry.
    pub fn map(&self, poses: &[PoseInput]) -> Result<Vec<MappedFrame>> {
        let mut pipeline = MotionPipeline::new(&self.config).map_err(|err| anyhow!(err))?;
        Ok(poses
            .iter()
            .filter_map(|pose| {
                pipeline.process(pose).map(|params| MappedFrame {
                    timestamp_ms: pose.timestamp,
                    params: params.clone(),
                })
            })
            .collect())
    }
}
