use crate::dsp::oscillator::Waveform;
use crate::synth::voice::{KeyId, Voice};

/// What a `note_on` did with the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSlot {
    /// A voice with this key was already sounding and was retuned in place.
    Retuned(usize),
    /// An inactive slot was claimed.
    Activated(usize),
    /// The pool was full; slot 0 was reassigned.
    Stolen(usize),
}

impl NoteSlot {
    pub fn index(self) -> usize {
        match self {
            NoteSlot::Retuned(i) | NoteSlot::Activated(i) | NoteSlot::Stolen(i) => i,
        }
    }

    /// True when the note claimed a slot it did not already hold.
    pub fn is_fresh_trigger(self) -> bool {
        !matches!(self, NoteSlot::Retuned(_))
    }
}

/// Fixed-capacity arena of key-triggered voices.
///
/// All slots are built up front and reused in place; nothing is allocated
/// after construction. Slot order is iteration order for the render loop.
#[derive(Debug, Clone)]
pub struct VoicePool {
    voices: Vec<Voice>,
    default_waveform: Waveform,
}

impl VoicePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            voices: vec![Voice::new(Waveform::Sine); capacity],
            default_waveform: Waveform::Sine,
        }
    }

    /// Trigger a key.
    ///
    /// An already-active matching voice is retuned in place. Otherwise the
    /// first inactive slot is claimed. With no inactive slot left, slot 0 is
    /// stolen. Stealing slot 0 rather than erroring is the defined overflow
    /// policy; all other sounding voices are left untouched.
    pub fn note_on(&mut self, key: KeyId, frequency_hz: f32) -> NoteSlot {
        if let Some(index) = self.find(key) {
            self.voices[index].start(key, frequency_hz);
            return NoteSlot::Retuned(index);
        }

        if let Some(index) = self.voices.iter().position(|v| !v.active()) {
            self.voices[index].start(key, frequency_hz);
            return NoteSlot::Activated(index);
        }

        self.voices[0].start(key, frequency_hz);
        NoteSlot::Stolen(0)
    }

    /// Release a key. Unknown keys are a no-op.
    pub fn note_off(&mut self, key: KeyId) {
        if let Some(index) = self.find(key) {
            self.voices[index].stop();
        }
    }

    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            voice.stop();
        }
    }

    /// Select the waveform for one sounding voice, or for every slot (and
    /// future allocations) when `key` is `None`.
    pub fn set_waveform(&mut self, key: Option<KeyId>, waveform: Waveform) {
        match key {
            Some(key) => {
                if let Some(index) = self.find(key) {
                    self.voices[index].set_waveform(waveform);
                }
            }
            None => {
                self.default_waveform = waveform;
                for voice in &mut self.voices {
                    voice.set_waveform(waveform);
                }
            }
        }
    }

    /// Slot index of the active voice holding `key`, if any.
    pub fn find(&self, key: KeyId) -> Option<usize> {
        self.voices
            .iter()
            .position(|v| v.active() && v.key() == key)
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.active()).count()
    }

    pub fn default_waveform(&self) -> Waveform {
        self.default_waveform
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn voices_mut(&mut self) -> &mut [Voice] {
        &mut self.voices
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }
}
