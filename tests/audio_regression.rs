use blep_osc::control::OscMessage;
use blep_osc::dsp::{BLEP_AMPLITUDE, PEAK_SIXTEENTHS};
use blep_osc::graph::{BlockSource, ModulatedOscillator, OscillatorSettings, OscillatorUnit, Waveform};
use blep_osc::io::converter::block_to_f32;
use blep_osc::AUDIO_BLOCK_SAMPLES;

const SAMPLE_RATE: f32 = 44_100.0;

fn unit(waveform: Waveform) -> OscillatorUnit {
    let settings = OscillatorSettings {
        waveform,
        frequency: 3_210.0,
        amplitude: 0.9,
        offset: 0.05,
        phase: 0.0,
        pulse_width: 0.3,
    };
    let mut unit = OscillatorUnit::with_settings(SAMPLE_RATE, &settings);
    unit.set_arbitrary_waveform(std::array::from_fn(|i| (i as i16 - 128) * 200));
    unit
}

fn render_in_blocks(source: &mut impl BlockSource, sizes: &[usize], total: usize) -> Vec<i16> {
    let mut out = vec![0i16; total];
    let mut start = 0;
    let mut sizes = sizes.iter().cycle();
    while start < total {
        let len = (*sizes.next().unwrap_or(&AUDIO_BLOCK_SAMPLES)).min(total - start);
        source.update(&mut out[start..start + len]);
        start += len;
    }
    out
}

#[test]
fn output_does_not_depend_on_block_size() {
    for waveform in Waveform::ALL {
        let mut fixed = unit(waveform);
        let mut ragged = unit(waveform);
        let a = render_in_blocks(&mut fixed, &[AUDIO_BLOCK_SAMPLES], 2_000);
        let b = render_in_blocks(&mut ragged, &[1, 7, 300, 64, 129], 2_000);
        assert_eq!(a, b, "{} differs between block sizes", waveform.name());
    }
}

#[test]
fn modulated_output_does_not_depend_on_block_size() {
    for waveform in [Waveform::Sine, Waveform::BandLimitSawtooth, Waveform::BandLimitPulse] {
        let make = || {
            let mut osc = ModulatedOscillator::new(SAMPLE_RATE);
            osc.begin_with(0.7, 880.0, waveform);
            osc
        };
        let mut fixed = make();
        let mut ragged = make();
        let a = render_in_blocks(&mut fixed, &[AUDIO_BLOCK_SAMPLES], 1_500);
        let b = render_in_blocks(&mut ragged, &[5, 200, 33], 1_500);
        assert_eq!(a, b, "{} differs between block sizes", waveform.name());
    }
}

#[test]
fn renders_bounded_audio_for_every_waveform() {
    for waveform in Waveform::ALL {
        let mut osc = unit(waveform);
        let block = render_in_blocks(&mut osc, &[AUDIO_BLOCK_SAMPLES], 4 * AUDIO_BLOCK_SAMPLES);
        let mut samples = vec![0.0f32; block.len()];
        block_to_f32(&block, &mut samples);
        assert!(
            samples.iter().any(|s| s.abs() > 0.0),
            "{} is silent",
            waveform.name()
        );
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }
}

#[test]
fn switching_waveforms_mid_stream_stays_bounded() {
    let mut osc = unit(Waveform::BandLimitSawtooth);
    let mut block = [0i16; AUDIO_BLOCK_SAMPLES];
    let mut peak = 0i32;
    for (i, waveform) in Waveform::ALL.iter().cycle().take(40).enumerate() {
        osc.apply(OscMessage::Frequency(200.0 + 500.0 * i as f32));
        osc.apply(OscMessage::Begin(*waveform));
        osc.update(&mut block);
        if waveform.is_band_limited() {
            let block_peak = block.iter().map(|&s| (s as i32).abs()).max().unwrap_or(0);
            peak = peak.max(block_peak);
        }
    }
    // worst-case overshoot at 0.9 gain plus the 5 % offset
    let limit = BLEP_AMPLITUDE * PEAK_SIXTEENTHS / 16 * 9 / 10 + (0.05 * i16::MAX as f32) as i32;
    assert!(peak > BLEP_AMPLITUDE * 9 / 10, "peak {peak}");
    assert!(peak < limit, "peak {peak} over {limit}");
}
