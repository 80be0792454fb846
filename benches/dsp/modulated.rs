//! Benchmarks for ModulatedOscillator with audio-rate modulation input.

use std::hint::black_box;

use blep_osc::graph::{BlockSource, ModulatedOscillator, OscillatorUnit, Waveform};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_modulated(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/modulated");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0i16; size];

        // a 5 Hz sine as the modulation source
        let mut lfo = OscillatorUnit::new(44_100.0);
        lfo.begin_with(1.0, 5.0, Waveform::Sine);
        let mut modulation = vec![0i16; size];
        lfo.update(&mut modulation);

        let mut fm = ModulatedOscillator::new(44_100.0);
        fm.set_frequency_modulation(1.0);
        fm.begin_with(0.8, 440.0, Waveform::BandLimitSawtooth);
        group.bench_with_input(BenchmarkId::new("fm/band-limited sawtooth", size), &size, |b, _| {
            b.iter(|| {
                fm.update_modulated(black_box(&mut buffer), Some(&modulation), None);
            })
        });

        let mut pm = ModulatedOscillator::new(44_100.0);
        pm.set_phase_modulation(180.0);
        pm.begin_with(0.8, 440.0, Waveform::Sine);
        group.bench_with_input(BenchmarkId::new("pm/sine", size), &size, |b, _| {
            b.iter(|| {
                pm.update_modulated(black_box(&mut buffer), Some(&modulation), None);
            })
        });

        let mut pwm = ModulatedOscillator::new(44_100.0);
        pwm.begin_with(0.8, 440.0, Waveform::BandLimitPulse);
        group.bench_with_input(BenchmarkId::new("pwm/band-limited pulse", size), &size, |b, _| {
            b.iter(|| {
                pwm.update_modulated(black_box(&mut buffer), None, Some(&modulation));
            })
        });
    }

    group.finish();
}
