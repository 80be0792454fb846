//! Parameter readout

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::UiState;

pub fn render_status(frame: &mut Frame, area: Rect, state: &UiState, sample_rate: f32) {
    let block = Block::default().title(" blep ").borders(Borders::ALL);

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().add_modifier(Modifier::BOLD);
    let waveform_style = if state.waveform.is_band_limited() {
        value.fg(Color::Green)
    } else {
        value.fg(Color::Yellow)
    };

    let line = Line::from(vec![
        Span::styled(" Waveform ", label),
        Span::styled(state.waveform.name(), waveform_style),
        Span::styled("  Frequency ", label),
        Span::styled(format!("{:.1} Hz", state.frequency), value),
        Span::styled("  Level ", label),
        Span::styled(format!("{:.0}%", state.amplitude * 100.0), value),
        Span::styled("  Width ", label),
        Span::styled(format!("{:.0}%", state.pulse_width * 100.0), value),
        Span::styled("  Rate ", label),
        Span::styled(format!("{sample_rate} Hz"), value),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
