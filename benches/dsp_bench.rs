//! Benchmarks for the oscillator core and the block-level units.
//!
//! Run with: cargo bench
//!
//! Reference timing at 44.1kHz sample rate:
//!   - 64 samples  = 1.45ms deadline
//!   - 128 samples = 2.90ms deadline
//!   - 256 samples = 5.80ms deadline
//!   - 512 samples = 11.61ms deadline
//!
//! Benchmark groups:
//!   - dsp/bandlimited  Per-sample band-limited generators
//!   - dsp/oscillator   OscillatorUnit, naive vs band-limited waveforms
//!   - dsp/modulated    ModulatedOscillator with FM/PM input

use criterion::{criterion_group, criterion_main};

mod dsp;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    dsp::bench_bandlimited,
    dsp::bench_oscillator,
    dsp::bench_modulated,
);
criterion_main!(benches);
