use crate::dsp::oscillator::{Oscillator, Waveform};

/// Trigger identifier binding a voice to an external key.
///
/// Opaque to the core; callers typically pass a keyboard scan code.
pub type KeyId = u32;

/// One pool slot: an oscillator bound to a trigger key.
///
/// Slots are created once and reused in place. Activation retunes the
/// embedded oscillator but never resets its phase, so retriggering a key is
/// click-free.
#[derive(Debug, Clone, Copy)]
pub struct Voice {
    active: bool,
    key: KeyId,
    osc: Oscillator,
}

impl Voice {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            active: false,
            key: 0,
            osc: Oscillator::new(waveform, 440.0),
        }
    }

    pub(crate) fn start(&mut self, key: KeyId, frequency_hz: f32) {
        self.active = true;
        self.key = key;
        self.osc.set_frequency(frequency_hz);
    }

    pub(crate) fn stop(&mut self) {
        self.active = false;
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn key(&self) -> KeyId {
        self.key
    }

    pub fn frequency(&self) -> f32 {
        self.osc.frequency()
    }

    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.osc.set_waveform(waveform);
    }

    pub fn oscillator_mut(&mut self) -> &mut Oscillator {
        &mut self.osc
    }
}
