//! Block-level oscillator units built on the `dsp` primitives.
//!
//! A unit owns its phase accumulator, its parameters and (for the
//! band-limited waveforms) a `BandLimitedWaveform`. Parameters arrive as
//! plain floats, are clamped at the setter and stored in fixed point; the
//! per-sample loop only does integer work.

/// Oscillator driven by external frequency/phase modulation input.
pub mod modulated;
/// Core trait shared by all block sources.
pub mod node;
/// Free-running oscillator with every waveform.
pub mod oscillator;

pub use modulated::{Modulation, ModulatedOscillator};
pub use node::BlockSource;
pub use oscillator::{OscillatorSettings, OscillatorUnit, Waveform};
