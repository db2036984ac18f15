// Envelope module - attack/release state for harmonic chord voices
//
// Each harmonic owns one accumulator. Once per mapping call:
//
//   a += attack * drive - release * dt * a
//
// then clamp to [0, 1] and snap to 0 below the voice's noise floor. Drive
// is a non-negative motion intensity (normalized speed, optionally weighted
// by proximity), and may exceed 1 when several sources add up.

use super::params::{OscillatorParams, ParameterSet};

/// Static description of one partial of a chord voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    /// Frequency as a multiple of the fundamental
    pub ratio: f32,
    /// Relative weight of this partial in the voice
    pub weight: f32,
    /// Phase offset in radians
    pub phase: f32,
    /// Gain applied to the drive per step
    pub attack: f32,
    /// Decay rate per second
    pub release: f32,
}

impl Harmonic {
    pub const fn new(ratio: f32, weight: f32, phase: f32, attack: f32, release: f32) -> Self {
        Self {
            ratio,
            weight,
            phase,
            attack,
            release,
        }
    }
}

/// Live state of one chord voice
#[derive(Debug, Clone)]
pub struct ChordState {
    fundamental: f32,
    harmonics: Vec<Harmonic>,
    amplitudes: Vec<f32>,
    floor: f32,
}

impl ChordState {
    /// # Arguments
    /// * `fundamental` - Base frequency in Hz
    /// * `harmonics` - Partials of the voice, in output order
    /// * `floor` - Accumulators below this value snap to exactly 0
    pub fn new(fundamental: f32, harmonics: Vec<Harmonic>, floor: f32) -> Self {
        let amplitudes = vec![0.0; harmonics.len()];
        Self {
            fundamental,
            harmonics,
            amplitudes,
            floor,
        }
    }

    pub fn fundamental(&self) -> f32 {
        self.fundamental
    }

    pub fn set_fundamental(&mut self, fundamental: f32) {
        self.fundamental = fundamental;
    }

    pub fn harmonics(&self) -> &[Harmonic] {
        &self.harmonics
    }

    /// Current per-harmonic accumulators, each in [0, 1]
    pub fn amplitudes(&self) -> &[f32] {
        &self.amplitudes
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    pub fn len(&self) -> usize {
        self.harmonics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.harmonics.is_empty()
    }

    /// Advance every accumulator by one step
    ///
    /// # Arguments
    /// * `drive` - Motion intensity, >= 0 (negative or NaN counts as 0)
    /// * `dt` - Step length in seconds
    pub fn step(&mut self, drive: f32, dt: f32) {
        let drive = if drive > 0.0 { drive } else { 0.0 };
        for (amplitude, harmonic) in self.amplitudes.iter_mut().zip(&self.harmonics) {
            let next = *amplitude + harmonic.attack * drive - harmonic.release * dt * *amplitude;
            let next = next.clamp(0.0, 1.0);
            *amplitude = if next < self.floor { 0.0 } else { next };
        }
    }

    /// Append this voice's partials to `out`
    ///
    /// Each partial sounds at `fundamental * ratio` with amplitude
    /// `weight * accumulator * gain`.
    pub fn emit(&self, gain: f32, out: &mut ParameterSet) {
        for (amplitude, harmonic) in self.amplitudes.iter().zip(&self.harmonics) {
            out.push(OscillatorParams::new(
                self.fundamental * harmonic.ratio,
                harmonic.weight * amplitude * gain,
                harmonic.phase,
            ));
        }
    }

    /// Append this voice's partials at zero amplitude
    pub fn emit_silent(&self, out: &mut ParameterSet) {
        for harmonic in &self.harmonics {
            out.push(OscillatorParams::new(
                self.fundamental * harmonic.ratio,
                0.0,
                harmonic.phase,
            ));
        }
    }

    pub fn reset(&mut self) {
        self.amplitudes.iter_mut().for_each(|a| *a = 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const DT: f32 = 1.0 / 30.0;

    fn triad(floor: f32) -> ChordState {
        ChordState::new(
            440.0,
            vec![
                Harmonic::new(1.0, 0.5, 0.0, 0.1, 6.0),
                Harmonic::new(2.5, 0.3, 0.0, 0.1, 18.0),
                Harmonic::new(5.0, 0.2, 0.0, 0.1, 36.0),
            ],
            floor,
        )
    }

    #[test]
    fn test_accumulators_stay_bounded_under_random_drive() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for floor in [0.0, 0.01, 0.1] {
            let mut state = triad(floor);
            for _ in 0..5_000 {
                let drive: f32 = rng.gen_range(0.0..3.0);
                state.step(drive, DT);
                for &a in state.amplitudes() {
                    assert!((0.0..=1.0).contains(&a), "accumulator {} out of bounds", a);
                    assert!(a == 0.0 || a >= floor);
                }
            }
        }
    }

    #[test]
    fn test_huge_attack_saturates_at_one() {
        let mut state = ChordState::new(220.0, vec![Harmonic::new(1.0, 1.0, 0.0, 10.0, 0.5)], 0.0);
        state.step(5.0, DT);
        assert_eq!(state.amplitudes()[0], 1.0);
    }

    #[test]
    fn test_values_below_floor_snap_to_zero() {
        let mut state = triad(0.1);
        // 0.1 * 0.5 = 0.05, below the floor
        state.step(0.5, DT);
        assert!(state.amplitudes().iter().all(|&a| a == 0.0));

        // full drive: 0.1, exactly at the floor, survives
        state.step(1.0, DT);
        assert!((state.amplitudes()[0] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_release_decays_to_zero() {
        let mut state = triad(0.01);
        for _ in 0..10 {
            state.step(1.0, DT);
        }
        assert!(state.amplitudes()[0] > 0.0);

        for _ in 0..60 {
            state.step(0.0, DT);
        }
        assert!(state.amplitudes().iter().all(|&a| a == 0.0));
    }

    #[test]
    fn test_negative_and_nan_drive_count_as_zero() {
        let mut state = triad(0.0);
        state.step(-4.0, DT);
        state.step(f32::NAN, DT);
        assert!(state.amplitudes().iter().all(|&a| a == 0.0));
    }

    #[test]
    fn test_emit_applies_weights_and_gain() {
        let mut state = triad(0.0);
        state.step(1.0, DT);
        let mut out = ParameterSet::new();
        state.emit(0.5, &mut out);

        assert_eq!(out.len(), 3);
        let partials = out.as_slice();
        assert_eq!(partials[1].frequency, 1100.0);
        assert!((partials[0].amplitude - 0.5 * 0.1 * 0.5).abs() < 1e-6);

        let mut silent = ParameterSet::new();
        state.emit_silent(&mut silent);
        assert!(silent.is_silent());
        assert_eq!(silent.as_slice()[2].frequency, 2200.0);
    }
}
