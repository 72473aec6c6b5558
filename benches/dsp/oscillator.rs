//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use phasor_dsp::dsp::oscillator::{Oscillator, Waveform};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 44_100.0;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - one sin() per sample
        let mut osc = Oscillator::new(Waveform::Sine, 440.0);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                for slot in buffer.iter_mut() {
                    *slot = osc.next_sample(black_box(SAMPLE_RATE));
                }
            })
        });

        // Square - sin() plus a branch
        let mut osc = Oscillator::new(Waveform::Square, 440.0);
        group.bench_with_input(BenchmarkId::new("square", size), &size, |b, _| {
            b.iter(|| {
                for slot in buffer.iter_mut() {
                    *slot = osc.next_sample(black_box(SAMPLE_RATE));
                }
            })
        });

        // Triangle - sin() and asin()
        let mut osc = Oscillator::new(Waveform::Triangle, 440.0);
        group.bench_with_input(BenchmarkId::new("triangle", size), &size, |b, _| {
            b.iter(|| {
                for slot in buffer.iter_mut() {
                    *slot = osc.next_sample(black_box(SAMPLE_RATE));
                }
            })
        });

        // Saw - pure arithmetic ramp
        let mut osc = Oscillator::new(Waveform::Saw, 440.0);
        group.bench_with_input(BenchmarkId::new("saw", size), &size, |b, _| {
            b.iter(|| {
                for slot in buffer.iter_mut() {
                    *slot = osc.next_sample(black_box(SAMPLE_RATE));
                }
            })
        });
    }

    group.finish();
}
