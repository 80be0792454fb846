//! Benchmarks for OscillatorUnit waveform generation.

use std::hint::black_box;

use blep_osc::graph::{BlockSource, OscillatorUnit, Waveform};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    let waveforms = [
        // table lookup + interpolation
        Waveform::Sine,
        // naive, one shift per sample
        Waveform::Sawtooth,
        Waveform::Square,
        Waveform::Triangle,
        // step tracking + overlap-accumulation
        Waveform::BandLimitSawtooth,
        Waveform::BandLimitSquare,
        Waveform::BandLimitPulse,
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0i16; size];

        for waveform in waveforms {
            let mut osc = OscillatorUnit::new(44_100.0);
            osc.set_pulse_width(0.3);
            osc.begin_with(0.8, 440.0, waveform);
            group.bench_with_input(
                BenchmarkId::new(waveform.name(), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        osc.update(black_box(&mut buffer));
                    })
                },
            );
        }
    }

    group.finish();
}
