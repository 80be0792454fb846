//! Parameter changes sent to oscillators from outside the audio thread.
//!
//! Messages are plain `Copy` values so they can travel through a lock-free
//! ring (`rtrb`) and be applied at block boundaries without allocating.

/// Oscillator control messages and their receivers.
pub mod message;

pub use message::{MessageReceiver, OscMessage};
