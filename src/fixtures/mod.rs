//! Fixture utilities for the deterministic CLI harness.
//!
//! This module loads recorded pose sequences, synthesizes scripted gestures,
//! runs them through the pipeline against the offline engine, and writes
//! the rendered audio as WAV. It is intentionally desktop-focused to support
//! CI and QA workflows.

mod gestures;
mod session;

pub use gestures::{synthesize, Gesture, GestureSpec};
pub use session::{MappedFrame, OfflineSession, SessionOutput, SessionReport};

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::tracking::PoseInput;

/// Load a pose recording from disk
///
/// Accepts either a JSON array of pose payloads or JSON lines with one
/// payload per line.
pub fn load_recording(path: &Path) -> Result<Vec<PoseInput>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let poses = parse_recording(&text).with_context(|| format!("parsing {}", path.display()))?;
    log::info!("[Fixtures] Loaded {} poses from {}", poses.len(), path.display());
    Ok(poses)
}

/// Parse recording text in either supported layout
pub fn parse_recording(text: &str) -> Result<Vec<PoseInput>> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).context("decoding JSON array of poses");
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).with_context(|| format!("decoding pose on line {}", index + 1))
        })
        .collect()
}

/// Write mono samples as a 32-bit float WAV file
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer =
        hound::WavWriter::create(path, spec).with_context(|| format!("creating {}", path.display()))?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer
        .finalize()
        .with_context(|| format!("finalizing {}", path.display()))
}

/// Read a mono WAV file back as f32 samples
pub fn read_wav(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader =
        hound::WavReader::open(path).with_context(|| format!("opening {}", path.display()))?;
    let spec = reader.spec();
    if spec.channels != 1 {
        return Err(anyhow!(
            "{} must be mono (found {} channels)",
            path.display(),
            spec.channels
        ));
    }

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|sample| sample.map_err(|err| anyhow!(err)))
            .collect::<Result<Vec<f32>>>()?,
        hound::SampleFormat::Int => {
            let max = ((1i64 << (spec.bits_per_sample - 1)) - 1) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / max).map_err(|err| anyhow!(err)))
                .collect::<Result<Vec<f32>>>()?
        }
    };

    Ok((samples, spec.sample_rate))
}
