//! Phasor - application state, audio stream, and key handling.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rtrb::{Producer, PushError, RingBuffer};

use phasor_dsp::{
    dsp::{filter::FilterType, fm::FmMode, oscillator::Waveform},
    engine::{Engine, EngineConfig},
    synth::{message::ControlMessage, voice::KeyId},
    MAX_BLOCK_SIZE, SCOPE_CAPACITY,
};

use crate::ui::{self, FilterRow, StatusSnapshot};

/// Bottom-row note keys and their base frequencies (A3 through C5), the
/// piano layout the reference demos used.
const KEYMAP: &[(char, f32)] = &[
    ('z', 220.0),
    ('s', 233.1),
    ('x', 247.0),
    ('c', 261.6),
    ('f', 277.2),
    ('v', 293.7),
    ('g', 311.1),
    ('b', 329.6),
    ('n', 349.2),
    ('j', 370.0),
    ('m', 392.0),
    ('k', 415.3),
    (',', 440.0),
    ('l', 466.2),
    ('.', 493.9),
    ('/', 523.3),
];

const WAVEFORMS: &[Waveform] = &[
    Waveform::Sine,
    Waveform::Square,
    Waveform::Triangle,
    Waveform::Saw,
];

fn next_filter_type(current: FilterType) -> FilterType {
    match current {
        FilterType::LowPass => FilterType::HighPass,
        FilterType::HighPass => FilterType::BandPass,
        FilterType::BandPass => FilterType::Notch,
        FilterType::Notch => FilterType::LowPass,
    }
}

pub struct Phasor {
    /// Notes currently sounding, keyed by their keyboard character.
    held: HashSet<char>,
    octave_shift: i32,
    waveform_index: usize,
    selected_filter: Option<usize>,
    fm_waveform_index: usize,
}

impl Phasor {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            octave_shift: 0,
            waveform_index: 0,
            selected_filter: None,
            fm_waveform_index: 0,
        }
    }

    /// Run the synthesizer until Esc.
    pub fn run(mut self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let (tx, rx) = RingBuffer::<ControlMessage>::new(256);
        let engine = Arc::new(Mutex::new(Engine::with_control(
            EngineConfig {
                sample_rate,
                ..EngineConfig::default()
            },
            rx,
        )));

        let audio_engine = engine.clone();
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let mut engine = audio_engine.lock().unwrap();
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames];
                    engine.render_block(block);

                    // Mono to all channels.
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }
                    frames_written += frames;
                }
            },
            |err| eprintln!("Audio error: {}", err),
            None,
        )?;
        stream.play()?;

        let terminal = ratatui::init();
        let result = self.event_loop(terminal, engine, tx, sample_rate);
        ratatui::restore();
        result
    }

    fn event_loop(
        &mut self,
        mut terminal: ratatui::DefaultTerminal,
        engine: Arc<Mutex<Engine>>,
        mut tx: Producer<ControlMessage>,
        sample_rate: f32,
    ) -> EyreResult<()> {
        let mut scope = vec![0.0f32; SCOPE_CAPACITY];

        loop {
            // One short lock per frame: copy the scope window and the
            // parameter readouts, then render without holding it.
            let snapshot = {
                let engine = engine.lock().unwrap();
                engine.scope_window(&mut scope);
                StatusSnapshot {
                    sample_rate,
                    waveform: WAVEFORMS[self.waveform_index],
                    octave_shift: self.octave_shift,
                    held: self.held.len(),
                    filter_capacity: engine.filters().capacity(),
                    filters: engine
                        .filters()
                        .iter()
                        .map(|f| FilterRow {
                            filter_type: f.filter_type(),
                            cutoff_hz: f.cutoff_hz(),
                            resonance: f.resonance(),
                        })
                        .collect(),
                    selected_filter: self.selected_filter,
                    fm_on: engine.fm_enabled(),
                    fm_mode: engine.fm().mode(),
                    fm_waveform: engine.fm().modulator().waveform(),
                    fm_frequency: engine.fm().modulator().frequency(),
                    fm_index: engine.fm().index(),
                    fm_ratio: engine.fm().ratio(),
                }
            };

            terminal.draw(|frame| ui::render(frame, &scope, &snapshot))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if key.code == KeyCode::Esc {
                        send(&mut tx, ControlMessage::AllNotesOff);
                        return Ok(());
                    }
                    self.handle_key(key.code, &mut tx, &snapshot);
                }
            }
        }
    }

    fn handle_key(
        &mut self,
        code: KeyCode,
        tx: &mut Producer<ControlMessage>,
        snap: &StatusSnapshot,
    ) {
        match code {
            KeyCode::Char(ch) if KEYMAP.iter().any(|&(k, _)| k == ch) => {
                // Terminals report no key-up, so note keys toggle.
                let key = ch as KeyId;
                if self.held.remove(&ch) {
                    send(tx, ControlMessage::NoteOff { key });
                } else {
                    self.held.insert(ch);
                    let base = KEYMAP.iter().find(|&&(k, _)| k == ch).unwrap().1;
                    let frequency = base * 2.0f32.powi(self.octave_shift);
                    send(tx, ControlMessage::NoteOn { key, frequency });
                }
            }
            KeyCode::Char(' ') => {
                self.held.clear();
                send(tx, ControlMessage::AllNotesOff);
            }
            KeyCode::Char('1') => self.octave_shift = (self.octave_shift - 1).max(-3),
            KeyCode::Char('2') => self.octave_shift = (self.octave_shift + 1).min(2),
            KeyCode::Tab => {
                self.waveform_index = (self.waveform_index + 1) % WAVEFORMS.len();
                send(
                    tx,
                    ControlMessage::SetWaveform {
                        key: None,
                        waveform: WAVEFORMS[self.waveform_index],
                    },
                );
            }

            KeyCode::Char('=') => {
                if snap.filters.len() < snap.filter_capacity {
                    send(tx, ControlMessage::AddFilter);
                    self.selected_filter = Some(snap.filters.len());
                }
            }
            KeyCode::Backspace => {
                if let Some(index) = self.selected_filter {
                    send(tx, ControlMessage::RemoveFilter { index });
                    self.selected_filter = if snap.filters.len() > 1 {
                        Some(index.min(snap.filters.len().saturating_sub(2)))
                    } else {
                        None
                    };
                }
            }
            KeyCode::Char('[') => {
                self.selected_filter = self.selected_filter.and_then(|i| i.checked_sub(1));
            }
            KeyCode::Char(']') => {
                if let Some(i) = self.selected_filter {
                    if i + 1 < snap.filters.len() {
                        self.selected_filter = Some(i + 1);
                    }
                } else if !snap.filters.is_empty() {
                    self.selected_filter = Some(0);
                }
            }
            KeyCode::Char('q') => {
                self.edit_filter(tx, snap, |row| row.filter_type = next_filter_type(row.filter_type));
            }
            KeyCode::Up => self.edit_filter(tx, snap, |row| row.cutoff_hz += 100.0),
            KeyCode::Down => self.edit_filter(tx, snap, |row| row.cutoff_hz -= 100.0),
            KeyCode::Right => self.edit_filter(tx, snap, |row| row.resonance += 0.05),
            KeyCode::Left => self.edit_filter(tx, snap, |row| row.resonance -= 0.05),

            KeyCode::Char('o') => {
                send(
                    tx,
                    ControlMessage::SetFmEnabled {
                        enabled: !snap.fm_on,
                    },
                );
            }
            KeyCode::Char('w') => {
                let mode = match snap.fm_mode {
                    FmMode::Harmonic => FmMode::Inharmonic,
                    FmMode::Inharmonic => FmMode::Harmonic,
                };
                send(tx, ControlMessage::SetFmMode { mode });
            }
            KeyCode::Char('e') => {
                self.fm_waveform_index = (self.fm_waveform_index + 1) % WAVEFORMS.len();
                send(
                    tx,
                    ControlMessage::SetFmWaveform {
                        waveform: WAVEFORMS[self.fm_waveform_index],
                    },
                );
            }
            KeyCode::Char('r') => send(
                tx,
                ControlMessage::SetFmIndex {
                    index: snap.fm_index - 0.05,
                },
            ),
            KeyCode::Char('t') => send(
                tx,
                ControlMessage::SetFmIndex {
                    index: snap.fm_index + 0.05,
                },
            ),
            KeyCode::Char('y') => send(
                tx,
                ControlMessage::SetFmRatio {
                    ratio: snap.fm_ratio - 1.0,
                },
            ),
            KeyCode::Char('u') => send(
                tx,
                ControlMessage::SetFmRatio {
                    ratio: snap.fm_ratio + 1.0,
                },
            ),
            KeyCode::Char('d') => send(
                tx,
                ControlMessage::SetFmFrequency {
                    frequency: snap.fm_frequency - 10.0,
                },
            ),
            KeyCode::Char('h') => send(
                tx,
                ControlMessage::SetFmFrequency {
                    frequency: snap.fm_frequency + 10.0,
                },
            ),
            _ => {}
        }
    }

    /// Ship an edit of the selected filter based on its last known values.
    /// The engine clamps on receipt; the next frame's snapshot shows the
    /// clamped result.
    fn edit_filter(
        &mut self,
        tx: &mut Producer<ControlMessage>,
        snap: &StatusSnapshot,
        adjust: impl FnOnce(&mut FilterRow),
    ) {
        let Some(index) = self.selected_filter else {
            return;
        };
        let Some(row) = snap.filters.get(index) else {
            return;
        };
        let mut row = *row;
        adjust(&mut row);
        send(
            tx,
            ControlMessage::SetFilterParams {
                index,
                filter_type: row.filter_type,
                cutoff: row.cutoff_hz,
                resonance: row.resonance,
            },
        );
    }
}

/// Push a message, backing off briefly while the ring is full.
fn send(tx: &mut Producer<ControlMessage>, message: ControlMessage) {
    let mut pending = message;
    loop {
        match tx.push(pending) {
            Ok(_) => break,
            Err(PushError::Full(returned)) => {
                if tx.is_abandoned() {
                    eprintln!("Control queue abandoned; dropping {:?}", returned);
                    break;
                }
                pending = returned;
                std::thread::sleep(Duration::from_micros(200));
            }
        }
    }
}
