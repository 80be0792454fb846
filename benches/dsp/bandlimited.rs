//! Benchmarks for the band-limited step generators.

use std::hint::black_box;

use blep_osc::dsp::phase::{frequency_word, FREQ_WORD_CEILING};
use blep_osc::dsp::BandLimitedWaveform;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_bandlimited(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/bandlimited");

    // low pitch: almost every sample has no active step; the ceiling keeps
    // the active set as full as it gets
    let words = [
        ("110hz", frequency_word(110.0, 44_100.0)),
        ("5khz", frequency_word(5_000.0, 44_100.0)),
        ("ceiling", FREQ_WORD_CEILING),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0i16; size];

        for &(label, word) in &words {
            let mut saw = BandLimitedWaveform::new();
            saw.init_sawtooth(word);
            let mut phase = 0u32;
            group.bench_with_input(
                BenchmarkId::new(format!("sawtooth/{label}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        for sample in buffer.iter_mut() {
                            phase = phase.wrapping_add(word);
                            *sample = saw.generate_sawtooth(black_box(phase));
                        }
                    })
                },
            );

            let mut square = BandLimitedWaveform::new();
            square.init_square(word);
            let mut phase = 0u32;
            group.bench_with_input(
                BenchmarkId::new(format!("square/{label}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        for sample in buffer.iter_mut() {
                            phase = phase.wrapping_add(word);
                            *sample = square.generate_square(black_box(phase));
                        }
                    })
                },
            );
        }
    }

    group.finish();
}
