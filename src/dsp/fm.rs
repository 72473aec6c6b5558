use crate::dsp::oscillator::{Oscillator, Waveform};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase Modulation
================

The operator here is a second oscillator (the modulator) whose output is
added to a carrier's phase right before the carrier waveform is evaluated:

    m      = modulator_waveform(modulator_phase)
    sample = carrier_waveform(carrier_phase + β · m)

β is the modulation index. It scales how far the modulator pushes the
carrier's phase, which in the ear translates to sideband energy around the
carrier. The offset is recomputed fresh each sample rather than integrated,
so this is phase modulation, not true frequency modulation. At the small
indices used here (β ≤ 1) the two are audibly interchangeable.

The modulator's frequency comes from one of two modes:

Harmonic: locked to a ratio of the carrier. The operator is retuned to
  carrier_frequency · ratio when a note first claims a voice slot. Ratio
  edits or carrier retunes after that moment do not chase the modulator;
  the lock is sampled at trigger time.

Inharmonic: free-running at a fixed frequency, unrelated to any carrier.
  Clangorous, bell-like sidebands.

One operator serves the entire voice pool. Every active voice is bent by
the same modulator on the same sample, which is what gives the chorus of
voices a single shared vibrato-like movement.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FmMode {
    Harmonic,
    Inharmonic,
}

/// Modulation index bounds.
pub const MAX_INDEX: f32 = 1.0;
/// Harmonic ratio floor.
pub const MIN_RATIO: f32 = 0.001;

/// Stock settings applied when the operator is first engaged.
pub const DEFAULT_MODULATOR_HZ: f32 = 20.0;
pub const DEFAULT_INDEX: f32 = 0.2;
pub const DEFAULT_RATIO: f32 = 1.0;

/// A single modulator applied to every carrier in the pool.
#[derive(Debug, Clone, Copy)]
pub struct FmOperator {
    modulator: Oscillator,
    index: f32,
    ratio: f32,
    mode: FmMode,
}

impl FmOperator {
    pub fn new() -> Self {
        Self {
            modulator: Oscillator::new(Waveform::Sine, DEFAULT_MODULATOR_HZ),
            index: DEFAULT_INDEX,
            ratio: DEFAULT_RATIO,
            mode: FmMode::Inharmonic,
        }
    }

    /// Advance both phase accumulators one sample and evaluate the carrier
    /// waveform at its bent phase.
    #[inline]
    pub fn modulate(&mut self, carrier: &mut Oscillator, sample_rate: f32) -> f32 {
        let m = self.modulator.next_sample(sample_rate);
        let carrier_phase = carrier.advance_phase(sample_rate);
        carrier.waveform().eval(carrier_phase + self.index * m)
    }

    /// Lock the modulator to a freshly triggered carrier.
    ///
    /// Harmonic mode only; Inharmonic modulators keep their fixed frequency.
    pub fn retune(&mut self, carrier_frequency: f32) {
        if self.mode == FmMode::Harmonic {
            self.modulator.set_frequency(carrier_frequency * self.ratio);
        }
    }

    pub fn set_index(&mut self, index: f32) {
        self.index = index.clamp(0.0, MAX_INDEX);
    }

    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio.max(MIN_RATIO);
    }

    pub fn set_mode(&mut self, mode: FmMode) {
        self.mode = mode;
    }

    pub fn set_modulator_frequency(&mut self, frequency_hz: f32) {
        self.modulator.set_frequency(frequency_hz);
    }

    pub fn set_modulator_waveform(&mut self, waveform: Waveform) {
        self.modulator.set_waveform(waveform);
    }

    pub fn index(&self) -> f32 {
        self.index
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn mode(&self) -> FmMode {
        self.mode
    }

    pub fn modulator(&self) -> &Oscillator {
        &self.modulator
    }
}

impl Default for FmOperator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    const SAMPLE_RATE: f32 = 44_100.0;

    #[test]
    fn zero_index_reduces_to_plain_oscillator() {
        let mut op = FmOperator::new();
        op.set_index(0.0);

        let mut carrier = Oscillator::new(Waveform::Sine, 440.0);
        let mut reference = Oscillator::new(Waveform::Sine, 440.0);

        for _ in 0..512 {
            let modulated = op.modulate(&mut carrier, SAMPLE_RATE);
            let plain = reference.next_sample(SAMPLE_RATE);
            assert!((modulated - plain).abs() < 1e-6);
        }
    }

    #[test]
    fn sine_carrier_matches_closed_form() {
        let mut op = FmOperator::new();
        op.set_mode(FmMode::Inharmonic);
        op.set_modulator_frequency(100.0);
        op.set_index(0.8);

        let mut carrier = Oscillator::new(Waveform::Sine, 440.0);

        for n in 0..256 {
            let t = (n + 1) as f32 / SAMPLE_RATE;
            let m = (TAU * 100.0 * t).sin();
            let expected = (TAU * 440.0 * t + 0.8 * m).sin();
            let actual = op.modulate(&mut carrier, SAMPLE_RATE);
            assert!(
                (actual - expected).abs() < 2e-3,
                "sample {n}: expected {expected}, got {actual}"
            );
        }
    }

    #[test]
    fn harmonic_retune_samples_ratio_at_trigger() {
        let mut op = FmOperator::new();
        op.set_mode(FmMode::Harmonic);
        op.set_ratio(2.0);

        op.retune(220.0);
        assert!((op.modulator().frequency() - 440.0).abs() < 1e-6);

        // Later ratio edits do not chase already-locked modulators.
        op.set_ratio(3.0);
        assert!((op.modulator().frequency() - 440.0).abs() < 1e-6);
    }

    #[test]
    fn inharmonic_retune_is_a_no_op() {
        let mut op = FmOperator::new();
        op.set_mode(FmMode::Inharmonic);
        op.set_modulator_frequency(55.0);
        op.retune(880.0);
        assert!((op.modulator().frequency() - 55.0).abs() < 1e-6);
    }

    #[test]
    fn index_is_clamped() {
        let mut op = FmOperator::new();
        op.set_index(7.0);
        assert_eq!(op.index(), MAX_INDEX);
        op.set_index(-1.0);
        assert_eq!(op.index(), 0.0);
    }
}
