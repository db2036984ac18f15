//! Callback-counted time for device backends.
//!
//! A device decides its own buffer size, and the oscillator bank smooths
//! once per callback. Elapsed audio is therefore measured in callbacks that
//! have actually run, never in wall time derived from the configured buffer
//! size.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::AudioError;
use crate::synth::OscillatorBank;

/// How long `wait_for` tolerates a callback counter that does not move
pub const DEFAULT_STALL_TIMEOUT: Duration = Duration::from_millis(500);

const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Audio-thread half: renders the bank and counts callbacks
pub struct CallbackRenderer {
    bank: OscillatorBank,
    started: Arc<AtomicU64>,
    callbacks: Arc<AtomicU64>,
    frames: Arc<AtomicU64>,
}

/// Control-thread half: observes and waits on the callback count
#[derive(Clone)]
pub struct CallbackClock {
    started: Arc<AtomicU64>,
    callbacks: Arc<AtomicU64>,
    frames: Arc<AtomicU64>,
}

impl CallbackRenderer {
    /// Wrap `bank` and return the renderer with its clock
    pub fn new(bank: OscillatorBank) -> (Self, CallbackClock) {
        let started = Arc::new(AtomicU64::new(0));
        let callbacks = Arc::new(AtomicU64::new(0));
        let frames = Arc::new(AtomicU64::new(0));
        (
            Self {
                bank,
                started: Arc::clone(&started),
                callbacks: Arc::clone(&callbacks),
                frames: Arc::clone(&frames),
            },
            CallbackClock {
                started,
                callbacks,
                frames,
            },
        )
    }

    /// One device callback: render, then count it
    pub fn render(&mut self, data: &mut [f32], channels: usize) {
        self.started.fetch_add(1, Ordering::AcqRel);
        self.bank.render_interleaved(data, channels);
        self.frames
            .fetch_add((data.len() / channels.max(1)) as u64, Ordering::Relaxed);
        self.callbacks.fetch_add(1, Ordering::Release);
    }

    pub fn bank(&self) -> &OscillatorBank {
        &self.bank
    }
}

impl CallbackClock {
    /// Callbacks completed so far
    pub fn callbacks(&self) -> u64 {
        self.callbacks.load(Ordering::Acquire)
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Block until `buffers` callbacks that start after this call have completed
    ///
    /// A callback already running may have taken its parameter update before
    /// the caller published, so it is not counted.
    ///
    /// # Errors
    /// `HardwareError` if the count stops moving for `stall_timeout`, e.g.
    /// when the device was unplugged or the stream paused.
    pub fn wait_for(&self, buffers: u64, stall_timeout: Duration) -> Result<(), AudioError> {
        let target = self.started.load(Ordering::Acquire) + buffers;
        let mut last_seen = self.callbacks();
        let mut last_progress = Instant::now();

        while last_seen < target {
            thread::sleep(POLL_INTERVAL);
            let now = self.callbacks();
            if now != last_seen {
                last_seen = now;
                last_progress = Instant::now();
            } else if last_progress.elapsed() >= stall_timeout {
                return Err(AudioError::HardwareError {
                    details: format!(
                        "Output callbacks stalled with {} of {} buffers pending",
                        (target - now).min(buffers),
                        buffers
                    ),
                });
            }
        }
        Ok(())
    }
}
