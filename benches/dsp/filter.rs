//! Benchmarks for biquad processing and filter chains.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use phasor_dsp::dsp::filter::{Biquad, FilterChain, FilterType};
use phasor_dsp::dsp::oscillator::{Oscillator, Waveform};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 44_100.0;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let mut input = vec![0.0f32; size];
        let mut osc = Oscillator::new(Waveform::Saw, 220.0);
        for slot in input.iter_mut() {
            *slot = osc.next_sample(SAMPLE_RATE);
        }

        // Single biquad, the per-filter recurrence cost
        let mut filter = Biquad::lowpass(1_000.0, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("biquad", size), &size, |b, _| {
            b.iter(|| {
                for &x in &input {
                    black_box(filter.process(black_box(x)));
                }
            })
        });

        // Full chain at capacity, the worst case the engine runs per sample
        let mut chain = FilterChain::new(5, SAMPLE_RATE);
        for _ in 0..5 {
            chain.add();
        }
        chain.set_params(0, FilterType::LowPass, 2_000.0, 0.7);
        chain.set_params(1, FilterType::HighPass, 100.0, 0.7);
        chain.set_params(2, FilterType::BandPass, 800.0, 1.2);
        chain.set_params(3, FilterType::Notch, 3_000.0, 0.9);
        chain.set_params(4, FilterType::LowPass, 5_000.0, 0.5);
        group.bench_with_input(BenchmarkId::new("chain5", size), &size, |b, _| {
            b.iter(|| {
                for &x in &input {
                    black_box(chain.process(black_box(x)));
                }
            })
        });

        // Coefficient recomputation, the control-path cost
        group.bench_with_input(BenchmarkId::new("set_params", size), &size, |b, _| {
            let mut cutoff = 500.0;
            b.iter(|| {
                cutoff = if cutoff > 5_000.0 { 500.0 } else { cutoff + 7.0 };
                filter.set_params(FilterType::LowPass, black_box(cutoff), 0.7, SAMPLE_RATE);
            })
        });
    }

    group.finish();
}
