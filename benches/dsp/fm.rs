//! Benchmarks for the phase-modulation operator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use phasor_dsp::dsp::fm::{FmMode, FmOperator};
use phasor_dsp::dsp::oscillator::{Oscillator, Waveform};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 44_100.0;

pub fn bench_fm(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/fm");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine carrier, the common case: two sin() per sample
        let mut op = FmOperator::new();
        op.set_mode(FmMode::Harmonic);
        op.set_ratio(2.0);
        op.retune(220.0);
        op.set_index(0.8);
        let mut carrier = Oscillator::new(Waveform::Sine, 220.0);

        group.bench_with_input(BenchmarkId::new("sine_carrier", size), &size, |b, _| {
            b.iter(|| {
                for slot in buffer.iter_mut() {
                    *slot = op.modulate(black_box(&mut carrier), black_box(SAMPLE_RATE));
                }
            })
        });

        // Triangle carrier, the most transcendental-heavy pairing
        let mut carrier = Oscillator::new(Waveform::Triangle, 220.0);
        group.bench_with_input(BenchmarkId::new("triangle_carrier", size), &size, |b, _| {
            b.iter(|| {
                for slot in buffer.iter_mut() {
                    *slot = op.modulate(black_box(&mut carrier), black_box(SAMPLE_RATE));
                }
            })
        });
    }

    group.finish();
}
