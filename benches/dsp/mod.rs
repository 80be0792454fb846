//! Benchmarks for the oscillator primitives.

mod bandlimited;
mod modulated;
mod oscillator;

pub use bandlimited::bench_bandlimited;
pub use modulated::bench_modulated;
pub use oscillator::bench_oscillator;
