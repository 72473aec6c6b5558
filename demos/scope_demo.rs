//! Renders an auto-cycling arpeggio on the UI thread and draws the engine's
//! visualization window as a terminal chart. Press any key to quit.

use std::{thread, time::Duration};

use color_eyre::Result;
use crossterm::event::{self, Event};
use ratatui::{
    style::{Color, Style},
    symbols,
    text::Line,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    DefaultTerminal, Frame,
};

use phasor_dsp::{
    engine::{Engine, EngineConfig},
    SCOPE_CAPACITY,
};

const NOTES: &[(u32, f32)] = &[(1, 261.6), (2, 329.6), (3, 392.0), (4, 523.3)];

fn main() -> Result<()> {
    color_eyre::install()?;
    let terminal = ratatui::init();

    let config = EngineConfig::default();
    let mut engine = Engine::new(config);
    engine.add_filter();

    let result = run(terminal, &mut engine, config.sample_rate);
    ratatui::restore();
    result
}

fn run(mut terminal: DefaultTerminal, engine: &mut Engine, sample_rate: f32) -> Result<()> {
    let block_size = 1024usize;
    let mut block = vec![0.0f32; block_size];
    let mut window = vec![0.0f32; SCOPE_CAPACITY];
    let block_duration = Duration::from_secs_f32(block_size as f32 / sample_rate);

    let note_samples = (sample_rate * 0.5) as usize;
    let mut samples_into_note = note_samples; // trigger the first note immediately
    let mut note_index = 0usize;
    let mut sounding: Option<u32> = None;

    loop {
        if samples_into_note >= note_samples {
            if let Some(key) = sounding.take() {
                engine.note_off(key);
            }
            let (key, freq) = NOTES[note_index];
            engine.note_on(key, freq);
            sounding = Some(key);
            note_index = (note_index + 1) % NOTES.len();
            samples_into_note = 0;
        }

        engine.render_block(&mut block);
        samples_into_note += block_size;

        engine.scope_window(&mut window);
        terminal.draw(|frame| draw(frame, &window))?;

        if event::poll(Duration::from_millis(1))? {
            if matches!(event::read()?, Event::Key(_)) {
                break Ok(());
            }
        }

        thread::sleep(block_duration);
    }
}

fn draw(frame: &mut Frame, window: &[f32]) {
    let points: Vec<(f64, f64)> = window
        .iter()
        .enumerate()
        .map(|(i, &s)| (i as f64, s as f64))
        .collect();

    let peak = window.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));

    let dataset = Dataset::default()
        .name("Scope")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title("Scope demo - press any key to quit")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, window.len() as f64]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([-1.0, 1.0]),
        );

    frame.render_widget(chart, frame.area());

    let info = Paragraph::new(vec![Line::from(format!("Peak: {:.3}", peak))]);
    let mut area = frame.area();
    if area.height > 2 {
        area.y = area.height - 1;
        area.height = 1;
        frame.render_widget(info, area);
    }
}
