//! blep - band-limited oscillator playground
//!
//! Run with: cargo run --bin blep [frequency_hz]
//!
//! Plays one oscillator through the default output device and shows its
//! waveform and spectrum. Switch between the naive and band-limited
//! waveforms to hear (and see) the aliasing go away.

mod app;
mod ui;

use app::Blep;
use blep_osc::graph::{OscillatorSettings, Waveform};
use color_eyre::eyre::{eyre, WrapErr};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let frequency = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<f32>()
            .wrap_err_with(|| format!("invalid frequency {arg:?}"))?,
        None => 220.0,
    };
    if !(frequency > 0.0) {
        return Err(eyre!("frequency must be positive, got {frequency}"));
    }

    Blep::new(OscillatorSettings {
        waveform: Waveform::BandLimitSawtooth,
        frequency,
        amplitude: 0.5,
        pulse_width: 0.25,
        ..OscillatorSettings::default()
    })
    .run()
}
