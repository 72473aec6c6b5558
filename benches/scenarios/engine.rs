//! Benchmarks for complete render blocks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use phasor_dsp::dsp::filter::FilterType;
use phasor_dsp::dsp::fm::FmMode;
use phasor_dsp::engine::{Engine, EngineConfig};

use crate::BLOCK_SIZES;

fn chord(engine: &mut Engine) {
    engine.note_on(1, 261.6);
    engine.note_on(2, 329.6);
    engine.note_on(3, 392.0);
    engine.note_on(4, 523.3);
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Four plain voices, no filters: the additive baseline
        let mut engine = Engine::new(EngineConfig::default());
        chord(&mut engine);
        group.bench_with_input(BenchmarkId::new("voices4", size), &size, |b, _| {
            b.iter(|| {
                engine.render_block(black_box(&mut buffer));
            })
        });

        // Four voices through a full filter chain: the subtractive worst case
        let mut engine = Engine::new(EngineConfig::default());
        chord(&mut engine);
        for _ in 0..5 {
            engine.add_filter();
        }
        engine.set_filter_params(0, FilterType::LowPass, 2_000.0, 0.7);
        engine.set_filter_params(1, FilterType::HighPass, 80.0, 0.7);
        group.bench_with_input(BenchmarkId::new("voices4_chain5", size), &size, |b, _| {
            b.iter(|| {
                engine.render_block(black_box(&mut buffer));
            })
        });

        // Four FM voices: two oscillators per voice
        let mut engine = Engine::new(EngineConfig::default());
        engine.set_fm_enabled(true);
        engine.set_fm_mode(FmMode::Harmonic);
        engine.set_fm_ratio(2.0);
        engine.set_fm_index(0.8);
        chord(&mut engine);
        group.bench_with_input(BenchmarkId::new("voices4_fm", size), &size, |b, _| {
            b.iter(|| {
                engine.render_block(black_box(&mut buffer));
            })
        });

        // Full pool, FM, and chain together: the hard deadline case
        let mut engine = Engine::new(EngineConfig::default());
        engine.set_fm_enabled(true);
        engine.set_fm_index(0.5);
        for key in 0..8u32 {
            engine.note_on(key, 220.0 * (1.0 + key as f32 * 0.25));
        }
        for _ in 0..5 {
            engine.add_filter();
        }
        group.bench_with_input(BenchmarkId::new("full_load", size), &size, |b, _| {
            b.iter(|| {
                engine.render_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
