// OscillatorBank - sample-accurate additive synthesis
//
// Parameters arrive at motion rate (tens of Hz) while audio is produced at
// the device rate. The bank bridges the two without clicks:
//
// 1. At each buffer boundary, take the newest ParameterSet (if any) and copy
//    it into the waves' targets, resizing the wave list to match
// 2. Move every wave's current frequency and amplitude a fixed fraction of
//    the way toward its target
// 3. Render the buffer with those values held constant, summing all waves
//
// Render-path guarantees: wave storage is reserved for `max_waves` up
// front, so nothing here allocates, locks or blocks.

use std::f32::consts::TAU;

use super::channel::ParameterReceiver;
use super::wave::Wave;
use crate::config::SynthConfig;
use crate::mapping::ParameterSet;

/// Peak amplitude below which a wave counts as inaudible (-60 dB)
pub const SILENCE_THRESHOLD: f32 = 1e-3;

/// Bank of summed sine oscillators
pub struct OscillatorBank {
    waves: Vec<Wave>,
    sample_rate: u32,
    radians_per_hz: f32,
    smoothing_factor: f32,
    max_waves: usize,
    receiver: Option<ParameterReceiver>,
    buffers_rendered: u64,
}

impl OscillatorBank {
    /// Create a bank that is only driven through [`OscillatorBank::apply`]
    ///
    /// # Arguments
    /// * `config` - Sample rate, smoothing factor and wave limit
    pub fn new(config: &SynthConfig) -> Self {
        Self {
            waves: Vec::with_capacity(config.max_waves),
            sample_rate: config.sample_rate,
            radians_per_hz: TAU / config.sample_rate.max(1) as f32,
            smoothing_factor: config.smoothing_factor,
            max_waves: config.max_waves,
            receiver: None,
            buffers_rendered: 0,
        }
    }

    /// Create a bank that polls `receiver` at every buffer boundary
    pub fn with_receiver(config: &SynthConfig, receiver: ParameterReceiver) -> Self {
        let mut bank = Self::new(config);
        bank.receiver = Some(receiver);
        bank
    }

    /// Set new targets for the next buffer
    ///
    /// The wave list is resized to the set's length (truncated to
    /// `max_waves`); new waves start from the silent default.
    pub fn apply(&mut self, set: &ParameterSet) {
        apply_targets(&mut self.waves, set, self.max_waves);
    }

    /// Render one mono buffer, overwriting `out`
    pub fn render(&mut self, out: &mut [f32]) {
        self.begin_buffer();
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Render one interleaved buffer with the mono signal on every channel
    ///
    /// # Arguments
    /// * `data` - Interleaved output, `frames * channels` samples
    /// * `channels` - Channel count of the device stream
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        self.begin_buffer();
        for frame in data.chunks_mut(channels) {
            let value = self.next_sample();
            frame.iter_mut().for_each(|sample| *sample = value);
        }
    }

    /// Set every amplitude target to 0; the waves fade out over the next buffers
    pub fn mute(&mut self) {
        for wave in &mut self.waves {
            wave.target_amplitude = 0.0;
        }
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn smoothing_factor(&self) -> f32 {
        self.smoothing_factor
    }

    pub fn buffers_rendered(&self) -> u64 {
        self.buffers_rendered
    }

    /// True when every target is 0 and every wave is below [`SILENCE_THRESHOLD`]
    pub fn is_silent(&self) -> bool {
        self.waves
            .iter()
            .all(|wave| wave.target_amplitude == 0.0 && wave.current_amplitude < SILENCE_THRESHOLD)
    }

    /// Pull the newest set from the channel and step the smoothing
    fn begin_buffer(&mut self) {
        if let Some(receiver) = self.receiver.as_mut() {
            if let Some(set) = receiver.receive() {
                apply_targets(&mut self.waves, set, self.max_waves);
            }
        }
        for wave in &mut self.waves {
            wave.smooth(self.smoothing_factor);
        }
        self.buffers_rendered += 1;
    }

    #[inline]
    fn next_sample(&mut self) -> f32 {
        let radians_per_hz = self.radians_per_hz;
        self.waves
            .iter_mut()
            .map(|wave| wave.next_sample(radians_per_hz))
            .sum()
    }
}

fn apply_targets(waves: &mut Vec<Wave>, set: &ParameterSet, max_waves: usize) {
    let count = set.len().min(max_waves);
    // within reserved capacity
    waves.resize(count, Wave::SILENT);
    for (wave, params) in waves.iter_mut().zip(set.iter()) {
        wave.set_target(params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::OscillatorParams;
    use crate::synth::ParameterChannel;
    use rustfft::num_complex::Complex;
    use rustfft::FftPlanner;

    fn config() -> SynthConfig {
        SynthConfig::default()
    }

    fn tone(frequency: f32, amplitude: f32) -> ParameterSet {
        ParameterSet::from(vec![OscillatorParams::new(frequency, amplitude, 0.0)])
    }

    #[test]
    fn test_gap_shrinks_by_smoothing_factor_each_buffer() {
        let mut bank = OscillatorBank::new(&config());
        let mut buffer = vec![0.0; 128];
        bank.apply(&tone(440.0, 0.0));
        bank.render(&mut buffer);

        bank.apply(&tone(880.0, 1.0));
        let mut previous_gap = (880.0f32 - 440.0, 1.0f32);
        for _ in 0..20 {
            bank.render(&mut buffer);
            let wave = bank.waves()[0];
            let gap = (
                wave.target_frequency - wave.current_frequency,
                wave.target_amplitude - wave.current_amplitude,
            );
            assert!((gap.0 - 0.9 * previous_gap.0).abs() < 1e-2);
            assert!((gap.1 - 0.9 * previous_gap.1).abs() < 1e-5);
            previous_gap = gap;
        }
    }

    #[test]
    fn test_output_is_overwritten() {
        let mut bank = OscillatorBank::new(&config());
        let mut buffer = vec![7.0; 64];
        bank.render(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_no_jump_exceeds_smoothing_step_plus_slope() {
        let synth = config();
        let mut bank = OscillatorBank::new(&synth);
        let mut buffer = vec![0.0; synth.buffer_size];
        let mut last = 0.0f32;

        let targets = [(220.0, 0.8), (880.0, 0.1), (660.0, 1.0), (330.0, 0.0)];
        for (frequency, amplitude) in targets {
            bank.apply(&tone(frequency, amplitude));
            for _ in 0..40 {
                let before = bank.waves()[0];
                bank.render(&mut buffer);
                let after = bank.waves()[0];

                let amp_step = (after.current_amplitude - before.current_amplitude).abs();
                let peak = before.current_amplitude.max(after.current_amplitude);
                let slope = peak * TAU * after.current_frequency / synth.sample_rate as f32;
                let bound = amp_step + slope + 1e-4;

                for &sample in &buffer {
                    assert!(
                        (sample - last).abs() <= bound,
                        "jump {} exceeds {}",
                        (sample - last).abs(),
                        bound
                    );
                    last = sample;
                }
            }
        }
    }

    #[test]
    fn test_spectral_peak_at_target_frequency() {
        let synth = config();
        let mut bank = OscillatorBank::new(&synth);
        bank.apply(&tone(1000.0, 0.5));

        let mut buffer = vec![0.0; synth.buffer_size];
        for _ in 0..200 {
            bank.render(&mut buffer);
        }

        const N: usize = 8192;
        let mut samples = Vec::with_capacity(N);
        while samples.len() < N {
            bank.render(&mut buffer);
            samples.extend_from_slice(&buffer);
        }
        samples.truncate(N);

        let mut spectrum: Vec<Complex<f32>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
        FftPlanner::new().plan_fft_forward(N).process(&mut spectrum);

        let peak_bin = spectrum[..N / 2]
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
            .map(|(bin, _)| bin)
            .unwrap();
        let peak_hz = peak_bin as f32 * synth.sample_rate as f32 / N as f32;
        let bin_width = synth.sample_rate as f32 / N as f32;
        assert!((peak_hz - 1000.0).abs() <= bin_width, "peak at {} Hz", peak_hz);
    }

    #[test]
    fn test_mute_fades_to_silence() {
        let synth = config();
        let mut bank = OscillatorBank::new(&synth);
        let mut buffer = vec![0.0; synth.buffer_size];
        bank.apply(&tone(440.0, 1.0));
        for _ in 0..100 {
            bank.render(&mut buffer);
        }
        assert!(!bank.is_silent());

        bank.mute();
        for _ in 0..synth.fade_buffers() {
            bank.render(&mut buffer);
        }
        assert!(bank.is_silent());
        assert!(buffer.iter().all(|s| s.abs() < SILENCE_THRESHOLD));
    }

    #[test]
    fn test_resize_and_truncate() {
        let synth = SynthConfig {
            max_waves: 3,
            ..config()
        };
        let mut bank = OscillatorBank::new(&synth);
        let set: ParameterSet = (1..=5)
            .map(|i| OscillatorParams::new(110.0 * i as f32, 0.2, 0.0))
            .collect();
        bank.apply(&set);
        assert_eq!(bank.wave_count(), 3);
        // new waves glide from the silent default
        assert_eq!(bank.waves()[2].current_frequency, 440.0);
        assert_eq!(bank.waves()[2].target_frequency, 330.0);

        bank.apply(&tone(220.0, 0.5));
        assert_eq!(bank.wave_count(), 1);
        assert!(bank.waves.capacity() >= 3);
    }

    #[test]
    fn test_channel_updates_apply_at_buffer_boundaries() {
        let synth = config();
        let (mut publisher, receiver) = ParameterChannel::new(synth.channel_capacity, synth.max_waves);
        let mut bank = OscillatorBank::with_receiver(&synth, receiver);
        let mut buffer = vec![0.0; synth.buffer_size];

        for frequency in [200.0, 300.0, 400.0] {
            publisher.publish(&tone(frequency, 0.5));
        }
        assert_eq!(bank.wave_count(), 0);

        bank.render(&mut buffer);
        assert_eq!(bank.waves()[0].target_frequency, 400.0);
        assert_eq!(bank.buffers_rendered(), 1);
    }

    #[test]
    fn test_interleaved_duplicates_mono() {
        let mut bank = OscillatorBank::new(&config());
        bank.apply(&tone(440.0, 1.0));
        let mut data = vec![0.0; 256];
        bank.render_interleaved(&mut data, 2);
        for frame in data.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert!(data.iter().any(|&s| s != 0.0));
    }
}
