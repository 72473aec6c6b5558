use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Biquad Filters
==============

A biquad is a second-order IIR filter: five coefficients and two samples of
memory on each side of the recurrence. Chained in series they form the
subtractive half of this crate, carving harmonics out of the raw oscillator
mix.

| type      | passes            | rejects          |
| --------- | ----------------- | ---------------- |
| low-pass  | below cutoff      | above cutoff     |
| high-pass | above cutoff      | below cutoff     |
| band-pass | around cutoff     | both sides       |
| notch     | everything else   | at cutoff        |

Coefficient design follows the second-order RBJ cookbook:

    ω0 = 2π · cutoff / sample_rate
    α  = sin(ω0) / (2 · resonance)

with a type-specific numerator and the shared denominator
a0 = 1 + α, a1 = -2cos(ω0), a2 = 1 - α. Everything is divided through by
a0 before storage, so the stored coefficients always describe a recurrence
with unity a0.

Processing is the direct-form-I recurrence

    y = b0·x + b1·x1 + b2·x2 - a1·y1 - a2·y2

followed by shifting the delay line. Coefficient recomputation never touches
the delay line, so parameter sweeps stay click-free.

Two clamps keep the recurrence numerically sane: cutoff is held inside
[20 Hz, sample_rate/2 - 100 Hz], and resonance never drops below 0.05. An
undamped α near zero would push the poles onto the unit circle and the
output would ring without bound.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

impl FilterType {
    pub fn label(self) -> &'static str {
        match self {
            FilterType::LowPass => "LPF",
            FilterType::HighPass => "HPF",
            FilterType::BandPass => "BPF",
            FilterType::Notch => "Notch",
        }
    }
}

/// Cutoff floor in Hz.
pub const MIN_CUTOFF_HZ: f32 = 20.0;
/// Margin kept below Nyquist when clamping cutoff.
pub const CUTOFF_NYQUIST_MARGIN_HZ: f32 = 100.0;
/// Resonance floor. Values below this leave the recurrence underdamped.
pub const MIN_RESONANCE: f32 = 0.05;

/// Cutoff and resonance given to freshly added chain filters.
pub const DEFAULT_CUTOFF_HZ: f32 = 800.0;
pub const DEFAULT_RESONANCE: f32 = 0.7;

#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    filter_type: FilterType,
    cutoff_hz: f32,
    resonance: f32,

    // Normalized coefficients (a0 divided through).
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    // Direct-form-I delay line.
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    pub fn new(filter_type: FilterType, cutoff_hz: f32, resonance: f32, sample_rate: f32) -> Self {
        let mut filter = Self {
            filter_type,
            cutoff_hz,
            resonance,
            b0: 0.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        filter.set_params(filter_type, cutoff_hz, resonance, sample_rate);
        filter
    }

    pub fn lowpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz, DEFAULT_RESONANCE, sample_rate)
    }

    pub fn highpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz, DEFAULT_RESONANCE, sample_rate)
    }

    pub fn bandpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz, DEFAULT_RESONANCE, sample_rate)
    }

    pub fn notch(cutoff_hz: f32, sample_rate: f32) -> Self {
        Self::new(FilterType::Notch, cutoff_hz, DEFAULT_RESONANCE, sample_rate)
    }

    /// Recompute coefficients from type, cutoff, and resonance.
    ///
    /// Inputs are clamped here, at the point of change. The delay line is
    /// left untouched; only the coefficients move.
    pub fn set_params(
        &mut self,
        filter_type: FilterType,
        cutoff_hz: f32,
        resonance: f32,
        sample_rate: f32,
    ) {
        let cutoff = cutoff_hz.clamp(MIN_CUTOFF_HZ, sample_rate / 2.0 - CUTOFF_NYQUIST_MARGIN_HZ);
        let resonance = resonance.max(MIN_RESONANCE);

        let w0 = TAU * cutoff / sample_rate;
        let cosw = w0.cos();
        let sinw = w0.sin();
        let alpha = sinw / (2.0 * resonance);

        let (b0, b1, b2) = match filter_type {
            FilterType::LowPass => {
                let b = (1.0 - cosw) / 2.0;
                (b, 1.0 - cosw, b)
            }
            FilterType::HighPass => {
                let b = (1.0 + cosw) / 2.0;
                (b, -(1.0 + cosw), b)
            }
            FilterType::BandPass => (alpha, 0.0, -alpha),
            FilterType::Notch => (1.0, -2.0 * cosw, 1.0),
        };
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cosw;
        let a2 = 1.0 - alpha;

        self.filter_type = filter_type;
        self.cutoff_hz = cutoff;
        self.resonance = resonance;
        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = a1 / a0;
        self.a2 = a2 / a0;
    }

    /// Run one sample through the direct-form-I recurrence.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;

        y
    }

    /// Zero the delay line.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Stored coefficients as (b0, b1, b2, a1, a2).
    pub fn coefficients(&self) -> (f32, f32, f32, f32, f32) {
        (self.b0, self.b1, self.b2, self.a1, self.a2)
    }
}

/// An ordered, capacity-bounded run of biquads applied in series.
///
/// Insertion order is processing order. Removal shifts later filters down
/// one slot without reordering the survivors.
#[derive(Debug, Clone)]
pub struct FilterChain {
    filters: Vec<Biquad>,
    capacity: usize,
    sample_rate: f32,
}

impl FilterChain {
    pub fn new(capacity: usize, sample_rate: f32) -> Self {
        Self {
            filters: Vec::with_capacity(capacity),
            capacity,
            sample_rate,
        }
    }

    /// Append a filter with the stock low-pass settings.
    ///
    /// Returns false when the chain is already at capacity.
    pub fn add(&mut self) -> bool {
        if self.filters.len() >= self.capacity {
            return false;
        }
        self.filters.push(Biquad::new(
            FilterType::LowPass,
            DEFAULT_CUTOFF_HZ,
            DEFAULT_RESONANCE,
            self.sample_rate,
        ));
        true
    }

    /// Drop the filter at `index`, shifting later entries down. Out-of-range
    /// indices are a no-op.
    pub fn remove(&mut self, index: usize) {
        if index < self.filters.len() {
            self.filters.remove(index);
        }
    }

    /// Reconfigure the filter at `index`; no-op when out of range.
    pub fn set_params(
        &mut self,
        index: usize,
        filter_type: FilterType,
        cutoff_hz: f32,
        resonance: f32,
    ) {
        let sample_rate = self.sample_rate;
        if let Some(filter) = self.filters.get_mut(index) {
            filter.set_params(filter_type, cutoff_hz, resonance, sample_rate);
        }
    }

    /// Thread one sample through every filter in order.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        self.filters.iter_mut().fold(x, |s, f| f.process(s))
    }

    pub fn get(&self, index: usize) -> Option<&Biquad> {
        self.filters.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Biquad> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
