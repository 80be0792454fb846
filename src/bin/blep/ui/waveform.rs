//! Oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Samples shown at once
const SCOPE_WINDOW: usize = 1024;

/// Start the window on a rising zero crossing so periodic signals stand
/// still between frames.
fn triggered(buffer: &[f32]) -> &[f32] {
    if buffer.is_empty() {
        return buffer;
    }
    let window = SCOPE_WINDOW.min(buffer.len());
    let search_end = buffer.len() - window;
    let start = buffer[..=search_end]
        .windows(2)
        .position(|pair| pair[0] < 0.0 && pair[1] >= 0.0)
        .map_or(search_end, |i| i + 1);
    &buffer[start..start + window]
}

pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32]) {
    let block = Block::default().title(" Waveform ").borders(Borders::ALL);

    let samples = triggered(audio_buffer);
    let data: Vec<(f64, f64)> = samples
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, samples.len().max(1) as f64])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .labels(vec!["-1", "0", "1"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
