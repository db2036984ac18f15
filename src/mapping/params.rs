// Oscillator parameter types shared by the mapping and synthesis stages

use serde::{Deserialize, Serialize};

/// Target state for one sine oscillator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorParams {
    /// Frequency in Hz, always > 0
    pub frequency: f32,
    /// Linear amplitude in [0, 1]
    pub amplitude: f32,
    /// Phase offset in radians
    #[serde(default)]
    pub phase: f32,
}

impl OscillatorParams {
    /// A4 at zero amplitude
    pub const SILENT: OscillatorParams = OscillatorParams {
        frequency: 440.0,
        amplitude: 0.0,
        phase: 0.0,
    };

    pub const fn new(frequency: f32, amplitude: f32, phase: f32) -> Self {
        Self {
            frequency,
            amplitude,
            phase,
        }
    }

    /// Same pitch and phase, zero amplitude
    pub fn muted(&self) -> Self {
        Self {
            amplitude: 0.0,
            ..*self
        }
    }

    pub fn is_finite(&self) -> bool {
        self.frequency.is_finite() && self.amplitude.is_finite() && self.phase.is_finite()
    }
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self::SILENT
    }
}

/// Ordered list of oscillator targets; one entry per wave
///
/// Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(Vec<OscillatorParams>);

impl ParameterSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }

    pub fn push(&mut self, params: OscillatorParams) {
        self.0.push(params);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn as_slice(&self) -> &[OscillatorParams] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OscillatorParams> {
        self.0.iter()
    }

    /// Overwrite with the contents of `other`, reusing this set's allocation
    pub fn copy_from(&mut self, other: &ParameterSet) {
        self.copy_prefix_from(other, other.len());
    }

    /// Overwrite with at most `limit` leading entries of `other`
    pub fn copy_prefix_from(&mut self, other: &ParameterSet, limit: usize) {
        self.0.clear();
        self.0.extend_from_slice(&other.0[..other.len().min(limit)]);
    }

    pub fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    /// Zero every amplitude in place
    pub fn mute(&mut self) {
        for params in &mut self.0 {
            params.amplitude = 0.0;
        }
    }

    /// Copy with every amplitude forced to 0
    pub fn muted(&self) -> Self {
        Self(self.0.iter().map(OscillatorParams::muted).collect())
    }

    pub fn is_silent(&self) -> bool {
        self.0.iter().all(|params| params.amplitude == 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(OscillatorParams::is_finite)
    }

    /// Sum of all amplitudes; the peak the summed output can reach
    pub fn total_amplitude(&self) -> f32 {
        self.0.iter().map(|params| params.amplitude).sum()
    }
}

impl From<Vec<OscillatorParams>> for ParameterSet {
    fn from(params: Vec<OscillatorParams>) -> Self {
        Self(params)
    }
}

impl FromIterator<OscillatorParams> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = OscillatorParams>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a OscillatorParams;
    type IntoIter = std::slice::Iter<'a, OscillatorParams>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
