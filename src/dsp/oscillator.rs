use std::f32::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulator Oscillators
=============================

Every periodic waveform here is generated the same way: keep a running angle
(the phase), advance it each sample by an amount proportional to frequency,
and evaluate a shaping function at the new angle.

    increment = 2π · frequency / sample_rate
    phase     = (phase + increment) mod 2π

The shaping functions:

Sine: sin(phase). The pure tone, fundamental only.

Square: sign of sin(phase). Snaps between +1 and -1, odd harmonics only.
  The sign test uses >= so phase 0 lands on +1.

Triangle: asin(sin(phase)) · 2/π. The arcsine folds the sine into straight
  line segments; the 2/π factor rescales the fold back to [-1, 1].

Saw: 2 · (phase / 2π) - 1. A bare linear ramp over the cycle. Not
  band-limited, so it aliases above a few kHz. That grit is part of the
  sound this crate models; band-limited synthesis is out of scope.

The single-subtraction wrap (`if phase >= 2π { phase -= 2π }`) is enough
because the increment stays below 2π for any frequency under the sample
rate. Wrapping every sample keeps the accumulator from drifting off into
large floats where sin() loses precision.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Saw,
}

impl Waveform {
    /// Evaluate the waveform at a phase angle in radians.
    ///
    /// Output is in [-1, 1] for any phase in [0, 2π).
    #[inline]
    pub fn eval(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Square => {
                if phase.sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => phase.sin().asin() * 2.0 / PI,
            Waveform::Saw => 2.0 * (phase / TAU) - 1.0,
        }
    }
}

/// Per-sample phase step for a frequency at a sample rate.
#[inline]
pub fn phase_increment(frequency_hz: f32, sample_rate: f32) -> f32 {
    TAU * frequency_hz / sample_rate
}

/// Frequencies are clamped to this floor at the point of change.
pub const MIN_FREQUENCY_HZ: f32 = 0.001;

/// A single periodic generator: waveform select, frequency, running phase.
///
/// The phase persists across calls and is never reset by retuning, so
/// frequency changes are click-free (phase-continuous).
#[derive(Debug, Clone, Copy)]
pub struct Oscillator {
    waveform: Waveform,
    frequency_hz: f32,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency_hz: f32) -> Self {
        Self {
            waveform,
            frequency_hz: frequency_hz.max(MIN_FREQUENCY_HZ),
            phase: 0.0,
        }
    }

    /// Advance the accumulator one sample and return the wrapped phase.
    ///
    /// Invariant: the returned phase is in [0, 2π) for any frequency below
    /// the sample rate.
    #[inline]
    pub fn advance_phase(&mut self, sample_rate: f32) -> f32 {
        self.phase += phase_increment(self.frequency_hz, sample_rate);
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        self.phase
    }

    /// Advance one sample and evaluate the waveform at the new phase.
    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let phase = self.advance_phase(sample_rate);
        self.waveform.eval(phase)
    }

    pub fn set_frequency(&mut self, frequency_hz: f32) {
        self.frequency_hz = frequency_hz.max(MIN_FREQUENCY_HZ);
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Rewind the accumulator to phase zero.
    pub fn reset_phase(&mut self) {
        self.phase = 0.0;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn frequency(&self) -> f32 {
        self.frequency_hz
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }
}
