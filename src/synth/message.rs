#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::dsp::filter::FilterType;
use crate::dsp::fm::FmMode;
use crate::dsp::oscillator::Waveform;
use crate::synth::voice::KeyId;

/// Everything a control thread may ask of the engine.
///
/// Messages are applied at block boundaries on the audio thread, never in
/// the middle of a render. Each variant maps onto one engine setter, so a
/// parameter change either lands wholesale before a block or not at all;
/// the render loop cannot observe a half-applied update.
#[derive(Debug, Copy, Clone)]
pub enum ControlMessage {
    NoteOn { key: KeyId, frequency: f32 },
    NoteOff { key: KeyId },
    AllNotesOff,
    SetWaveform { key: Option<KeyId>, waveform: Waveform },

    AddFilter,
    RemoveFilter { index: usize },
    SetFilterParams {
        index: usize,
        filter_type: FilterType,
        cutoff: f32,
        resonance: f32,
    },

    SetFmEnabled { enabled: bool },
    SetFmWaveform { waveform: Waveform },
    SetFmMode { mode: FmMode },
    SetFmIndex { index: f32 },
    SetFmRatio { ratio: f32 },
    SetFmFrequency { frequency: f32 },

    AddBankOscillator,
    RemoveBankOscillator { index: usize },
    SetBankOscillator {
        index: usize,
        waveform: Waveform,
        frequency: f32,
        amplitude: f32,
    },
    SetBankPlaying { playing: bool },
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ControlMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        Consumer::pop(self).ok()
    }
}
