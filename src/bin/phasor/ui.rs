//! Terminal layout: scope chart, spectrum analyzer, and parameter readouts.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    symbols,
    text::Line,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use rustfft::{num_complex::Complex, FftPlanner};

use phasor_dsp::dsp::{filter::FilterType, fm::FmMode, oscillator::Waveform};

/// Display copy of one chain filter.
#[derive(Debug, Clone, Copy)]
pub struct FilterRow {
    pub filter_type: FilterType,
    pub cutoff_hz: f32,
    pub resonance: f32,
}

/// Everything the UI shows besides the scope itself, copied out of the
/// engine under one short lock per frame.
pub struct StatusSnapshot {
    pub sample_rate: f32,
    pub waveform: Waveform,
    pub octave_shift: i32,
    pub held: usize,
    pub filter_capacity: usize,
    pub filters: Vec<FilterRow>,
    pub selected_filter: Option<usize>,
    pub fm_on: bool,
    pub fm_mode: FmMode,
    pub fm_waveform: Waveform,
    pub fm_frequency: f32,
    pub fm_index: f32,
    pub fm_ratio: f32,
}

fn waveform_name(waveform: Waveform) -> &'static str {
    match waveform {
        Waveform::Sine => "Sine",
        Waveform::Square => "Square",
        Waveform::Triangle => "Triangle",
        Waveform::Saw => "Saw",
    }
}

pub fn render(frame: &mut Frame, scope: &[f32], snap: &StatusSnapshot) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(frame.area());

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[1]);

    let points: Vec<(f64, f64)> = scope
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64, sample as f64))
        .collect();
    frame.render_widget(scope_chart(&points, scope.len()), columns[0]);

    let spectrum = spectrum_bins(scope, snap.sample_rate);
    frame.render_widget(spectrum_chart(&spectrum), right[0]);

    frame.render_widget(status_pane(snap), right[1]);
}

fn scope_chart<'a>(points: &'a [(f64, f64)], len: usize) -> Chart<'a> {
    let dataset = Dataset::default()
        .name("Output")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(points);

    Chart::new(vec![dataset])
        .block(
            Block::default()
                .title("Scope - Esc to quit")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("Sample")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, len as f64]),
        )
        .y_axis(
            Axis::default()
                .title("Amplitude")
                .style(Style::default().fg(Color::Gray))
                .bounds([-1.0, 1.0])
                .labels(vec!["-1.0", "-0.5", "0.0", "0.5", "1.0"]),
        )
}

fn spectrum_chart<'a>(data: &'a [(f64, f64)]) -> Chart<'a> {
    let dataset = Dataset::default()
        .name("Spectrum")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(data);

    let max_freq = data
        .iter()
        .map(|(f, _)| *f)
        .fold(1.0f64, |acc, f| acc.max(f));

    Chart::new(vec![dataset])
        .block(Block::default().title("Spectrum").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("Frequency (Hz)")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max_freq]),
        )
        .y_axis(
            Axis::default()
                .title("Magnitude (dB)")
                .style(Style::default().fg(Color::Gray))
                .bounds([-100.0, 10.0])
                .labels(vec!["-100", "-60", "-20", "10"]),
        )
}

fn status_pane(snap: &StatusSnapshot) -> Paragraph<'static> {
    let mut lines = vec![
        Line::from(format!(
            "Waveform: {} (Tab)   Octave: {:+}   Notes held: {}",
            waveform_name(snap.waveform),
            snap.octave_shift,
            snap.held
        )),
        Line::from(""),
        Line::from(format!(
            "Filters {}/{} (= add, Backspace remove, [/] select)",
            snap.filters.len(),
            snap.filter_capacity
        )),
    ];

    for (i, f) in snap.filters.iter().enumerate() {
        let marker = if snap.selected_filter == Some(i) {
            ">"
        } else {
            " "
        };
        lines.push(Line::from(format!(
            "{} {}: {}  Cutoff={:.0}Hz  Res={:.2}",
            marker,
            i + 1,
            f.filter_type.label(),
            f.cutoff_hz,
            f.resonance
        )));
    }

    lines.push(Line::from(""));
    if snap.fm_on {
        let mode = match snap.fm_mode {
            FmMode::Harmonic => format!("Harmonic ratio={:.3}", snap.fm_ratio),
            FmMode::Inharmonic => format!("Inharmonic {:.0}Hz", snap.fm_frequency),
        };
        lines.push(Line::from(format!(
            "FM: on  {}  {}  beta={:.2}",
            waveform_name(snap.fm_waveform),
            mode,
            snap.fm_index
        )));
    } else {
        lines.push(Line::from("FM: off (o)"));
    }

    lines.push(Line::from(""));
    lines.push(Line::from("Keys: Z row notes | 1/2 octave | Space all off"));
    lines.push(Line::from("Filter: q type, Up/Down cutoff, Left/Right res"));
    lines.push(Line::from("FM: w mode, e wave, r/t beta, y/u ratio, d/h freq"));

    Paragraph::new(lines).block(Block::default().title("Status").borders(Borders::ALL))
}

/// Log-spaced magnitude bins over the scope window, in dB.
fn spectrum_bins(window: &[f32], sample_rate: f32) -> Vec<(f64, f64)> {
    let n = window.len();
    if n == 0 {
        return Vec::new();
    }

    // Hann window against spectral leakage.
    let mut buf: Vec<Complex<f32>> = window
        .iter()
        .enumerate()
        .map(|(i, &sample)| {
            let w = if n > 1 {
                let x = std::f32::consts::TAU * i as f32 / (n - 1) as f32;
                0.5 * (1.0 - x.cos())
            } else {
                1.0
            };
            Complex::new(sample * w, 0.0)
        })
        .collect();

    FftPlanner::new().plan_fft_forward(n).process(&mut buf);

    let min_freq = 20.0f64;
    let max_freq = (sample_rate as f64 / 2.0).min(20_000.0);
    let bins = 40;

    (0..bins)
        .filter_map(|i| {
            let t = i as f64 / (bins - 1) as f64;
            let freq = min_freq * (max_freq / min_freq).powf(t);
            let bin = (freq * n as f64 / sample_rate as f64).round() as usize;
            if bin >= n / 2 {
                return None;
            }
            let c = buf[bin];
            let magnitude = ((c.re * c.re + c.im * c.im) as f64).sqrt();
            let db = if magnitude > 1e-10 {
                20.0 * magnitude.log10()
            } else {
                -100.0
            };
            Some((freq, db))
        })
        .collect()
}
