//! Headless render: a filtered chord plus two additive partials, printed as
//! summary statistics instead of played back.

use phasor_dsp::{
    dsp::{filter::FilterType, oscillator::Waveform},
    engine::{Engine, EngineConfig},
};

fn main() {
    let config = EngineConfig::default();
    let mut engine = Engine::new(config);

    engine.note_on(1, 261.6);
    engine.note_on(2, 329.6);
    engine.note_on(3, 392.0);

    engine.add_filter();
    engine.set_filter_params(0, FilterType::LowPass, 1_200.0, 0.7);

    engine.bank_mut().add();
    engine.bank_mut().add();
    engine.bank_mut().set_slot(0, Waveform::Sine, 110.0, 0.4);
    engine.bank_mut().set_slot(1, Waveform::Triangle, 220.0, 0.3);
    engine.bank_mut().set_playing(true);

    let mut block = vec![0.0f32; 512];
    let blocks = 100;

    let mut peak = 0.0f32;
    let mut sum_sq = 0.0f64;
    let mut rendered = 0usize;

    for _ in 0..blocks {
        engine.render_block(&mut block);
        for &s in &block {
            peak = peak.max(s.abs());
            sum_sq += (s as f64) * (s as f64);
        }
        rendered += block.len();
    }

    let rms = (sum_sq / rendered as f64).sqrt();
    let seconds = rendered as f32 / config.sample_rate;

    println!("Rendered {} samples ({:.2}s)", rendered, seconds);
    println!("Peak: {:.3}  RMS: {:.3}", peak, rms);
}
