//! Transport-side helpers: fixed-size sample blocks and format conversion
//! for audio devices.

/// Sample format conversion (`i16` blocks to device `f32` frames).
pub mod converter;

use crate::AUDIO_BLOCK_SAMPLES;

/// One block of signed 16-bit samples, the unit every oscillator renders.
pub type AudioBlock = [i16; AUDIO_BLOCK_SAMPLES];

/// A block of digital silence.
pub fn silent_block() -> AudioBlock {
    [0; AUDIO_BLOCK_SAMPLES]
}
