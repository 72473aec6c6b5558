//! Low-level DSP primitives used by the synthesis engine.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs and to run on the audio callback. They
//! intentionally stay focused on the signal-processing math so the engine can
//! layer on voice management and parameter handoff.

/// Biquad filter design and serial filter chains.
pub mod filter;
/// Phase-modulation operator shared across the voice pool.
pub mod fm;
/// Oscillator waveforms and the phase accumulator.
pub mod oscillator;
