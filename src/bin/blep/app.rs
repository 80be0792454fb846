//! Audio device setup and the realtime render callback

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};

use blep_osc::{
    control::OscMessage,
    graph::{BlockSource, OscillatorSettings, OscillatorUnit},
    io::{converter, silent_block, AudioBlock},
    AUDIO_BLOCK_SAMPLES,
};

use super::ui::{UiApp, UiState};

/// Pending parameter changes from the UI
const CONTROL_RING_SIZE: usize = 64;
/// Samples buffered for the scope and spectrum
const SCOPE_RING_SIZE: usize = 16_384;

/// Application builder
pub struct Blep {
    settings: OscillatorSettings,
}

impl Blep {
    pub fn new(settings: OscillatorSettings) -> Self {
        Self { settings }
    }

    /// Open the default output device, start playing and hand the terminal
    /// to the UI until the user quits.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        println!("=== blep ===");
        println!("Sample rate: {} Hz", sample_rate);
        println!("Channels: {}", channels);
        println!("Waveform: {}", self.settings.waveform.name());
        println!();

        let (control_tx, control_rx) = RingBuffer::<OscMessage>::new(CONTROL_RING_SIZE);
        let (scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_RING_SIZE);

        let mut renderer = Renderer {
            osc: OscillatorUnit::with_settings(sample_rate, &self.settings),
            control_rx,
            scope_tx,
            block: silent_block(),
            mono: [0.0; AUDIO_BLOCK_SAMPLES],
        };

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| renderer.fill(data, channels),
                |err| eprintln!("Audio error: {}", err),
                None,
            )
            .wrap_err("failed to build output stream")?;
        stream.play().wrap_err("failed to start output stream")?;

        let mut terminal = ratatui::init();
        let mut ui = UiApp::new(
            scope_rx,
            control_tx,
            UiState::from_settings(&self.settings),
            sample_rate,
        );
        let result = ui.run(&mut terminal);
        ratatui::restore();

        drop(stream);
        result
    }
}

/// State owned by the audio callback
struct Renderer {
    osc: OscillatorUnit,
    control_rx: Consumer<OscMessage>,
    scope_tx: Producer<f32>,
    block: AudioBlock,
    mono: [f32; AUDIO_BLOCK_SAMPLES],
}

impl Renderer {
    fn fill(&mut self, data: &mut [f32], channels: usize) {
        // parameter changes land on block boundaries
        self.osc.drain(&mut self.control_rx);

        let channels = channels.max(1);
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames = (total_frames - frames_written).min(AUDIO_BLOCK_SAMPLES);
            let block = &mut self.block[..frames];
            let mono = &mut self.mono[..frames];

            self.osc.update(block);
            converter::block_to_f32(block, mono);
            converter::write_interleaved(mono, &mut data[frames_written * channels..], channels);

            // the scope just misses samples when the UI falls behind
            for &sample in mono.iter() {
                let _ = self.scope_tx.push(sample);
            }

            frames_written += frames;
        }
    }
}
