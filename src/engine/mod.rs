//! The render engine: voice mixing, filtering, and the pull-based block
//! entry point driven by the host audio callback.
//!
//! `Engine::render_block` is the realtime boundary. Inside it there is no
//! allocation, no locking, and no I/O; control changes arrive either through
//! direct setters (single-threaded hosts) or through an SPSC message queue
//! drained at the top of each block (threaded hosts). Parameter state is
//! only ever touched between blocks, so the per-sample loop reads a stable
//! snapshot.

pub mod scope;

pub use scope::ScopeBuffer;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::filter::{FilterChain, FilterType};
use crate::dsp::fm::{FmMode, FmOperator};
use crate::dsp::oscillator::Waveform;
use crate::synth::bank::OscillatorBank;
use crate::synth::message::ControlMessage;
use crate::synth::pool::VoicePool;
use crate::synth::voice::KeyId;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Output sample rate in Hz. The reference hardware ran at 22,050 or
    /// 44,100; anything positive works.
    pub sample_rate: f32,
    /// Voice pool capacity. Fixed for the life of the engine.
    pub max_voices: usize,
    /// Filter chain capacity.
    pub max_filters: usize,
    /// Additive bank capacity.
    pub max_bank_oscillators: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            max_voices: 8,
            max_filters: 5,
            max_bank_oscillators: 8,
        }
    }
}

pub struct Engine {
    pool: VoicePool,
    bank: OscillatorBank,
    fm: FmOperator,
    fm_enabled: bool,
    filters: FilterChain,
    scope: ScopeBuffer,
    sample_rate: f32,
    #[cfg(feature = "rtrb")]
    control: Option<rtrb::Consumer<ControlMessage>>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            pool: VoicePool::new(config.max_voices),
            bank: OscillatorBank::new(config.max_bank_oscillators),
            fm: FmOperator::new(),
            fm_enabled: false,
            filters: FilterChain::new(config.max_filters, config.sample_rate),
            scope: ScopeBuffer::new(),
            sample_rate: config.sample_rate,
            #[cfg(feature = "rtrb")]
            control: None,
        }
    }

    /// Build an engine that drains `rx` at the start of every block.
    #[cfg(feature = "rtrb")]
    pub fn with_control(config: EngineConfig, rx: rtrb::Consumer<ControlMessage>) -> Self {
        let mut engine = Self::new(config);
        engine.control = Some(rx);
        engine
    }

    /// Fill `out` with mono samples.
    ///
    /// Per sample: sum the active voices (through the FM operator when it is
    /// engaged), average by the active count, add the bank, run the filter
    /// chain, write the slot, and mirror the value into the scope ring. The
    /// loop runs unconditionally; with nothing sounding it writes zeros.
    pub fn render_block(&mut self, out: &mut [f32]) {
        #[cfg(feature = "rtrb")]
        self.drain_control();

        let Self {
            pool,
            bank,
            fm,
            fm_enabled,
            filters,
            scope,
            sample_rate,
            ..
        } = self;
        let sample_rate = *sample_rate;
        let fm_enabled = *fm_enabled;

        for slot in out.iter_mut() {
            let mut mix = 0.0;
            let mut sounding = 0usize;

            for voice in pool.voices_mut() {
                if !voice.active() {
                    continue;
                }
                sounding += 1;
                mix += if fm_enabled {
                    fm.modulate(voice.oscillator_mut(), sample_rate)
                } else {
                    voice.oscillator_mut().next_sample(sample_rate)
                };
            }

            if sounding > 0 {
                mix /= sounding as f32;
            }

            mix += bank.next_sample(sample_rate);

            let sample = filters.process(mix);
            *slot = sample;
            scope.push(sample);
        }
    }

    #[cfg(feature = "rtrb")]
    fn drain_control(&mut self) {
        if let Some(mut rx) = self.control.take() {
            while let Ok(msg) = rx.pop() {
                self.apply(msg);
            }
            self.control = Some(rx);
        }
    }

    /// Apply one control message. Public so non-queue hosts can reuse the
    /// same dispatch.
    pub fn apply(&mut self, msg: ControlMessage) {
        match msg {
            ControlMessage::NoteOn { key, frequency } => self.note_on(key, frequency),
            ControlMessage::NoteOff { key } => self.note_off(key),
            ControlMessage::AllNotesOff => self.all_notes_off(),
            ControlMessage::SetWaveform { key, waveform } => self.set_waveform(key, waveform),

            ControlMessage::AddFilter => {
                self.add_filter();
            }
            ControlMessage::RemoveFilter { index } => self.remove_filter(index),
            ControlMessage::SetFilterParams {
                index,
                filter_type,
                cutoff,
                resonance,
            } => self.set_filter_params(index, filter_type, cutoff, resonance),

            ControlMessage::SetFmEnabled { enabled } => self.set_fm_enabled(enabled),
            ControlMessage::SetFmWaveform { waveform } => self.fm.set_modulator_waveform(waveform),
            ControlMessage::SetFmMode { mode } => self.fm.set_mode(mode),
            ControlMessage::SetFmIndex { index } => self.fm.set_index(index),
            ControlMessage::SetFmRatio { ratio } => self.fm.set_ratio(ratio),
            ControlMessage::SetFmFrequency { frequency } => {
                self.fm.set_modulator_frequency(frequency)
            }

            ControlMessage::AddBankOscillator => {
                self.bank.add();
            }
            ControlMessage::RemoveBankOscillator { index } => self.bank.remove(index),
            ControlMessage::SetBankOscillator {
                index,
                waveform,
                frequency,
                amplitude,
            } => self.bank.set_slot(index, waveform, frequency, amplitude),
            ControlMessage::SetBankPlaying { playing } => self.bank.set_playing(playing),
        }
    }

    /// Trigger a key.
    ///
    /// A fresh trigger (new slot or a steal) also locks the FM modulator to
    /// the new carrier when the operator is engaged in Harmonic mode.
    /// Retuning an already-sounding key leaves the modulator alone.
    pub fn note_on(&mut self, key: KeyId, frequency: f32) {
        let outcome = self.pool.note_on(key, frequency);
        if self.fm_enabled && outcome.is_fresh_trigger() {
            self.fm.retune(frequency);
        }
    }

    pub fn note_off(&mut self, key: KeyId) {
        self.pool.note_off(key);
    }

    pub fn all_notes_off(&mut self) {
        self.pool.all_notes_off();
    }

    pub fn set_waveform(&mut self, key: Option<KeyId>, waveform: Waveform) {
        self.pool.set_waveform(key, waveform);
    }

    /// Append a stock filter; false when the chain is full.
    pub fn add_filter(&mut self) -> bool {
        self.filters.add()
    }

    pub fn remove_filter(&mut self, index: usize) {
        self.filters.remove(index);
    }

    pub fn set_filter_params(
        &mut self,
        index: usize,
        filter_type: FilterType,
        cutoff: f32,
        resonance: f32,
    ) {
        self.filters.set_params(index, filter_type, cutoff, resonance);
    }

    pub fn set_fm_enabled(&mut self, enabled: bool) {
        self.fm_enabled = enabled;
    }

    /// Configure the whole operator in one call. The third value is the
    /// harmonic ratio or the fixed modulator frequency, depending on `mode`.
    pub fn set_fm_operator(
        &mut self,
        enabled: bool,
        waveform: Waveform,
        mode: FmMode,
        ratio_or_frequency: f32,
        index: f32,
    ) {
        self.fm.set_modulator_waveform(waveform);
        self.fm.set_mode(mode);
        match mode {
            FmMode::Harmonic => self.fm.set_ratio(ratio_or_frequency),
            FmMode::Inharmonic => self.fm.set_modulator_frequency(ratio_or_frequency),
        }
        self.fm.set_index(index);
        self.fm_enabled = enabled;
    }

    pub fn set_fm_mode(&mut self, mode: FmMode) {
        self.fm.set_mode(mode);
    }

    pub fn set_fm_index(&mut self, index: f32) {
        self.fm.set_index(index);
    }

    pub fn set_fm_ratio(&mut self, ratio: f32) {
        self.fm.set_ratio(ratio);
    }

    pub fn set_fm_frequency(&mut self, frequency: f32) {
        self.fm.set_modulator_frequency(frequency);
    }

    pub fn set_fm_waveform(&mut self, waveform: Waveform) {
        self.fm.set_modulator_waveform(waveform);
    }

    /// Copy the visualization window into `out`, oldest sample first.
    pub fn scope_window(&self, out: &mut [f32]) {
        self.scope.write_window(out);
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn bank(&self) -> &OscillatorBank {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut OscillatorBank {
        &mut self.bank
    }

    pub fn fm(&self) -> &FmOperator {
        &self.fm
    }

    pub fn fm_enabled(&self) -> bool {
        self.fm_enabled
    }

    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
