//! TUI for blep
//!
//! Oscilloscope and spectrum of the running oscillator, plus keyboard
//! control of its parameters.

mod spectrum;
mod status;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use std::time::Duration;

use blep_osc::{
    control::OscMessage,
    graph::{OscillatorSettings, Waveform},
};

use spectrum::{render_spectrum, SpectrumAnalyzer};
use status::render_status;
use waveform::render_waveform;

/// Samples kept for visualization (also the FFT size)
const VIS_BUFFER_SIZE: usize = 4096;

/// One equal-tempered semitone
const SEMITONE: f32 = 1.059_463_1;

/// Oscillator parameters as last sent to the audio thread
#[derive(Clone, Copy, Debug)]
pub struct UiState {
    pub waveform: Waveform,
    pub frequency: f32,
    pub amplitude: f32,
    pub pulse_width: f32,
}

impl UiState {
    pub fn from_settings(settings: &OscillatorSettings) -> Self {
        Self {
            waveform: settings.waveform,
            frequency: settings.frequency,
            amplitude: settings.amplitude,
            pulse_width: settings.pulse_width,
        }
    }
}

/// Naive waveform for a band-limited one and vice versa.
fn counterpart(waveform: Waveform) -> Waveform {
    match waveform {
        Waveform::Sawtooth => Waveform::BandLimitSawtooth,
        Waveform::SawtoothReverse => Waveform::BandLimitSawtoothReverse,
        Waveform::Square => Waveform::BandLimitSquare,
        Waveform::Pulse => Waveform::BandLimitPulse,
        Waveform::BandLimitSawtooth => Waveform::Sawtooth,
        Waveform::BandLimitSawtoothReverse => Waveform::SawtoothReverse,
        Waveform::BandLimitSquare => Waveform::Square,
        Waveform::BandLimitPulse => Waveform::Pulse,
        other => other,
    }
}

pub struct UiApp {
    audio_rx: Consumer<f32>,
    control_tx: Producer<OscMessage>,
    state: UiState,
    sample_rate: f32,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        audio_rx: Consumer<f32>,
        control_tx: Producer<OscMessage>,
        state: UiState,
        sample_rate: f32,
    ) -> Self {
        Self {
            audio_rx,
            control_tx,
            state,
            sample_rate,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Keep the newest VIS_BUFFER_SIZE samples
    fn poll_audio(&mut self) {
        let available = self.audio_rx.slots();
        if available == 0 {
            return;
        }
        if let Ok(chunk) = self.audio_rx.read_chunk(available) {
            let (first, second) = chunk.as_slices();
            self.audio_buffer.extend_from_slice(first);
            self.audio_buffer.extend_from_slice(second);
            chunk.commit_all();
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn send(&mut self, message: OscMessage) {
        // a full ring means the audio thread is stalled; drop the change
        let _ = self.control_tx.push(message);
    }

    fn select(&mut self, waveform: Waveform) {
        self.state.waveform = waveform;
        self.send(OscMessage::Begin(waveform));
    }

    fn handle_key(&mut self, key: KeyCode) {
        let all = Waveform::ALL;
        let index = all
            .iter()
            .position(|&w| w == self.state.waveform)
            .unwrap_or(0);

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Right => self.select(all[(index + 1) % all.len()]),
            KeyCode::Left => self.select(all[(index + all.len() - 1) % all.len()]),
            KeyCode::Char('b') | KeyCode::Char('B') => {
                self.select(counterpart(self.state.waveform))
            }
            KeyCode::Up | KeyCode::Down => {
                let factor = if key == KeyCode::Up {
                    SEMITONE
                } else {
                    1.0 / SEMITONE
                };
                let nyquist = self.sample_rate / 2.0;
                self.state.frequency = (self.state.frequency * factor).clamp(20.0, nyquist);
                self.send(OscMessage::Frequency(self.state.frequency));
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('-') => {
                let delta = if key == KeyCode::Char('-') { -0.05 } else { 0.05 };
                self.state.amplitude = (self.state.amplitude + delta).clamp(0.0, 1.0);
                self.send(OscMessage::Amplitude(self.state.amplitude));
            }
            KeyCode::Char('[') | KeyCode::Char(']') => {
                let delta = if key == KeyCode::Char('[') { -0.05 } else { 0.05 };
                self.state.pulse_width = (self.state.pulse_width + delta).clamp(0.05, 0.95);
                self.send(OscMessage::PulseWidth(self.state.pulse_width));
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),       // Status
                Constraint::Percentage(40),  // Waveform
                Constraint::Min(8),          // Spectrum
                Constraint::Length(1),       // Help
            ])
            .split(frame.area());

        render_status(frame, chunks[0], &self.state, self.sample_rate);
        render_waveform(frame, chunks[1], &self.audio_buffer);
        render_spectrum(frame, chunks[2], self.spectrum.data());

        let help = Paragraph::new(
            " [←/→] Waveform  [B] Naive/band-limited  [↑/↓] Pitch  [+/-] Level  [[/]] Width  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
