//! Low-level DSP primitives used by the block-level oscillator units.
//!
//! Everything in here is fixed-point, allocation-free after construction and
//! realtime-safe. The band-limited core is split along its data flow:
//! `step_tracker` finds discontinuities, `accumulator` spreads their
//! corrections over neighbouring samples using the shared `step_table`, and
//! `bandlimited` ties the three together per waveform family.

/// Overlap-accumulation buffer and active step set.
pub mod accumulator;
/// Band-limited sawtooth / square / pulse generator.
pub mod bandlimited;
/// Phase accumulator and parameter-to-fixed-point conversions.
pub mod phase;
/// Fixed-capacity ring buffer shared by the core's queues.
pub mod ring;
/// Precomputed band-limited step residual.
pub mod step_table;
/// Discontinuity detection with sub-sample timing.
pub mod step_tracker;
/// Naive (non band-limited) waveform formulas.
pub mod waveform;

pub use bandlimited::BandLimitedWaveform;
pub use phase::PhaseAccumulator;
pub use step_tracker::{Polarity, SquarePolarity, StepEvent, StepEvents};

/// Samples over which one step correction is spread on each side of the
/// edge. Also the output latency of the band-limited generators.
pub const CORRECTION_WINDOW: usize = 16;

/// Concurrent step corrections one generator can hold.
pub const MAX_ACTIVE_STEPS: usize = 32;

/// Fractional bits of sub-sample offsets (Q16 samples).
pub const FRACTION_BITS: u32 = 16;

/// One sample in Q16.
pub const ONE_SAMPLE: u32 = 1 << FRACTION_BITS;

/// Peak of the naive band-limited waveforms.
///
/// A single corrected edge overshoots by about 9 % of the step height
/// (1.18 A). Narrow pulses at high frequency stack two overshoots and
/// reach about 1.44 A, which still stays below `i16::MAX` at this level.
pub const BLEP_AMPLITUDE: i32 = 0x5000;

/// Largest band-limited output relative to [`BLEP_AMPLITUDE`], in
/// sixteenths (1.5 A).
pub const PEAK_SIXTEENTHS: i32 = 24;

const _: () = assert!(BLEP_AMPLITUDE * PEAK_SIXTEENTHS / 16 <= i16::MAX as i32);

/// Saturate an accumulator value to the signed 16-bit sample range.
#[inline]
pub fn saturate_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}
