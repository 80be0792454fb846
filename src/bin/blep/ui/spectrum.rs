//! Spectrum analyzer widget
//!
//! FFT of the scope buffer shown on a log-frequency axis. Each display
//! point keeps the loudest FFT bin it covers, so narrow alias lines stay
//! visible instead of falling between points.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::ops::Range;
use std::sync::Arc;

/// Display points across the frequency axis
const SPECTRUM_POINTS: usize = 160;
const MIN_FREQ: f64 = 20.0;
const FLOOR_DB: f64 = -120.0;

pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    /// FFT bins covered by each display point
    ranges: Vec<Range<usize>>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10(frequency), dB relative to the loudest point)
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        let window: Vec<f32> = (0..buffer_len)
            .map(|i| {
                if buffer_len > 1 {
                    let denom = (buffer_len - 1) as f32;
                    0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos())
                } else {
                    1.0
                }
            })
            .collect();

        let nyquist = (sample_rate as f64 / 2.0).max(MIN_FREQ * 2.0);
        let bin_hz = sample_rate as f64 / buffer_len.max(1) as f64;
        let half = (buffer_len / 2).max(1);
        let ratio = nyquist / MIN_FREQ;

        let mut ranges = Vec::with_capacity(SPECTRUM_POINTS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_POINTS);
        for i in 0..SPECTRUM_POINTS {
            let lo = MIN_FREQ * ratio.powf(i as f64 / SPECTRUM_POINTS as f64);
            let hi = MIN_FREQ * ratio.powf((i + 1) as f64 / SPECTRUM_POINTS as f64);
            let start = ((lo / bin_hz).round() as usize).min(half - 1);
            let end = ((hi / bin_hz).round() as usize).clamp(start + 1, half);
            ranges.push(start..end);
            spectrum.push(((lo * hi).sqrt().log10(), FLOOR_DB));
        }

        Self {
            window,
            ranges,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
        }
    }

    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let mut loudest = f64::MIN;
        for (point, range) in self.spectrum.iter_mut().zip(&self.ranges) {
            let power = self.scratch[range.clone()]
                .iter()
                .map(|c| c.norm_sqr())
                .fold(1e-20f32, f32::max);
            point.1 = 10.0 * (power as f64).log10();
            loudest = loudest.max(point.1);
        }
        for point in &mut self.spectrum {
            point.1 = (point.1 - loudest).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let max_x = spectrum.last().map_or(4.0, |&(x, _)| x);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([MIN_FREQ.log10(), max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-120", "-60", "0 dB"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
