pub mod control; // Control messages from non-realtime threads
pub mod dsp;
pub mod graph; // Block-level oscillator units
pub mod io;

/// Samples per audio block handed over by the transport layer.
pub const AUDIO_BLOCK_SAMPLES: usize = 128;
/// Default sample rate (Hz) used when a unit is built without one.
pub const AUDIO_SAMPLE_RATE: f32 = 44_100.0;
