#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::control::message::{MessageReceiver, OscMessage};
use crate::dsp::phase::{
    clamp_freq_word, frequency_word, magnitude_word, offset_word, pulse_width_word, HALF_CYCLE,
    PHASE_WRAP,
};
use crate::dsp::waveform::{self, ArbitraryTable, SampleHold};
use crate::dsp::{saturate_i16, BandLimitedWaveform, PhaseAccumulator};
use crate::graph::node::BlockSource;
use crate::graph::oscillator::Waveform;
use crate::{AUDIO_BLOCK_SAMPLES, AUDIO_SAMPLE_RATE};

/*
Modulated Oscillator
====================

Like `OscillatorUnit`, but the phase of every sample can be bent by an
audio-rate input signal, and the pulse width by a second one.

Each block runs in two passes:

  1. Phase pass: one phase per sample, from the accumulator and the
     modulation input.
  2. Render pass: the waveform is evaluated at those phases.

Naive waveforms are evaluated at the phase a sample starts on, like
`OscillatorUnit`. Band-limited waveforms see the phase each sample ends
on, so the generator measures the increment it just travelled and a swept
sawtooth stays clean as long as the phase only moves forward.

Modulation input (Q15, full scale = ±32768)
-------------------------------------------

  Frequency   octaves = input / 32768 * range        range 0.1 ..= 12
              increment = base * 2^octaves  (capped at the ceiling)

  Phase       phase = accumulator + input / 32768 * range   range 30 ..= 9000 deg

Shape input
-----------

Replaces the pulse width per sample (Pulse, TriangleVariable,
BandLimitPulse): -32768 is 0 %, 0 is 50 %, 32767 is just under 100 %.
*/

/// How the modulation input bends the phase.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modulation {
    /// Full-scale input shifts the pitch by this many octaves.
    Frequency { octaves: f32 },
    /// Full-scale input shifts the phase by this many degrees.
    Phase { degrees: f32 },
}

impl Default for Modulation {
    fn default() -> Self {
        Modulation::Frequency { octaves: 8.0 }
    }
}

/// Pulse width encoded by a shape input sample.
#[inline]
pub fn shape_to_pulse_width(shape: i16) -> u32 {
    ((shape as i32 + 0x8000) as u32 & 0xFFFF) << 16
}

#[derive(Debug, Clone)]
pub struct ModulatedOscillator {
    sample_rate: f32,
    accumulator: PhaseAccumulator,
    modulation: Modulation,
    /// Degrees as a phase offset per unit (Q15) of input.
    phase_factor: u32,
    magnitude: i32,
    pulse_width: u32,
    tone_offset: i16,
    waveform: Waveform,
    arbitrary: Option<Box<ArbitraryTable>>,
    sample_hold: SampleHold,
    last_phase: u32,
    band_limited: BandLimitedWaveform,
    phases: [u32; AUDIO_BLOCK_SAMPLES],
}

impl ModulatedOscillator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            accumulator: PhaseAccumulator::new(0),
            modulation: Modulation::default(),
            phase_factor: 0,
            magnitude: 0,
            pulse_width: HALF_CYCLE,
            tone_offset: 0,
            waveform: Waveform::Sine,
            arbitrary: None,
            sample_hold: SampleHold::default(),
            last_phase: 0,
            band_limited: BandLimitedWaveform::new(),
            phases: [0; AUDIO_BLOCK_SAMPLES],
        }
    }

    pub fn frequency_word(&self) -> u32 {
        self.accumulator.increment()
    }

    pub fn modulation(&self) -> Modulation {
        self.modulation
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn set_frequency(&mut self, hz: f32) {
        self.accumulator
            .set_increment(frequency_word(hz, self.sample_rate));
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.magnitude = magnitude_word(amplitude);
    }

    pub fn set_offset(&mut self, offset: f32) {
        self.tone_offset = offset_word(offset);
    }

    /// Pulse width used when no shape input is connected.
    pub fn set_pulse_width(&mut self, width: f32) {
        self.pulse_width = pulse_width_word(width);
    }

    pub fn set_arbitrary_waveform(&mut self, table: ArbitraryTable) {
        self.arbitrary = Some(Box::new(table));
    }

    /// Treat the input as exponential pitch modulation.
    pub fn set_frequency_modulation(&mut self, octaves: f32) {
        let octaves = if octaves.is_nan() {
            0.1
        } else {
            octaves.clamp(0.1, 12.0)
        };
        self.modulation = Modulation::Frequency { octaves };
    }

    /// Treat the input as a phase offset.
    pub fn set_phase_modulation(&mut self, degrees: f32) {
        let degrees = if degrees.is_nan() {
            30.0
        } else {
            degrees.clamp(30.0, 9000.0)
        };
        self.modulation = Modulation::Phase { degrees };
        // degrees per full-scale input, as phase units per input step
        self.phase_factor = (degrees as f64 * PHASE_WRAP as f64 / 360.0 / 32768.0) as u32;
    }

    pub fn begin(&mut self, waveform: Waveform) {
        self.waveform = waveform;
        if waveform.is_band_limited() {
            self.accumulator.reset(0);
            self.last_phase = 0;
            waveform.init_band_limited(
                &mut self.band_limited,
                self.accumulator.increment(),
                self.pulse_width,
            );
        }
    }

    pub fn begin_with(&mut self, amplitude: f32, hz: f32, waveform: Waveform) {
        self.set_amplitude(amplitude);
        self.set_frequency(hz);
        self.begin(waveform);
    }

    /// Phase and pulse-width messages have no effect here: phase comes
    /// from the modulation input and width from the shape input (or
    /// `set_pulse_width`).
    pub fn apply(&mut self, message: OscMessage) {
        match message {
            OscMessage::Frequency(hz) => self.set_frequency(hz),
            OscMessage::Amplitude(amplitude) => self.set_amplitude(amplitude),
            OscMessage::Offset(offset) => self.set_offset(offset),
            OscMessage::PulseWidth(width) => self.set_pulse_width(width),
            OscMessage::Phase(_) => {}
            OscMessage::Begin(waveform) => self.begin(waveform),
        }
    }

    pub fn drain<R: MessageReceiver + ?Sized>(&mut self, receiver: &mut R) {
        while let Some(message) = receiver.pop() {
            self.apply(message);
        }
    }

    /// Fill `out`, bending the phase with `modulation` and the pulse width
    /// with `shape`. Missing inputs (or inputs shorter than `out`) count
    /// as zero modulation and the configured width.
    pub fn update_modulated(
        &mut self,
        out: &mut [i16],
        modulation: Option<&[i16]>,
        shape: Option<&[i16]>,
    ) {
        for (index, chunk) in out.chunks_mut(AUDIO_BLOCK_SAMPLES).enumerate() {
            let start = index * AUDIO_BLOCK_SAMPLES;
            self.fill_phases(chunk.len(), start, modulation);
            for (i, sample) in chunk.iter_mut().enumerate() {
                let width = shape
                    .and_then(|s| s.get(start + i))
                    .map_or(self.pulse_width, |&s| shape_to_pulse_width(s));
                let value = self.render(self.phases[i], width);
                let scaled = (value as i64 * self.magnitude as i64) >> 16;
                *sample = saturate_i16(scaled as i32 + self.tone_offset as i32);
            }
        }
    }

    /// Phase of every sample in the chunk. Naive waveforms are evaluated
    /// where the sample starts, band-limited ones where it ends.
    fn fill_phases(&mut self, len: usize, start: usize, modulation: Option<&[i16]>) {
        let ends = self.waveform.is_band_limited();
        let pick = |before: u32, after: u32| if ends { after } else { before };

        let Some(input) = modulation else {
            for phase in self.phases[..len].iter_mut() {
                let before = self.accumulator.phase();
                *phase = pick(before, self.accumulator.advance());
            }
            return;
        };

        match self.modulation {
            Modulation::Frequency { octaves } => {
                let base = self.accumulator.increment() as f64;
                let octaves = octaves as f64;
                let mut current = self.accumulator.phase();
                for (i, phase) in self.phases[..len].iter_mut().enumerate() {
                    let m = input.get(start + i).copied().unwrap_or(0);
                    let shift = m as f64 / 32768.0 * octaves;
                    // float -> int casts saturate
                    let increment = clamp_freq_word((base * shift.exp2()) as u32);
                    let before = current;
                    current = current.wrapping_add(increment);
                    *phase = pick(before, current);
                }
                self.accumulator.reset(current);
            }
            Modulation::Phase { .. } => {
                for (i, phase) in self.phases[..len].iter_mut().enumerate() {
                    let m = input.get(start + i).copied().unwrap_or(0);
                    let shift = (m as i32 as u32).wrapping_mul(self.phase_factor);
                    let before = self.accumulator.phase();
                    let after = self.accumulator.advance();
                    *phase = pick(before, after).wrapping_add(shift);
                }
            }
        }
    }

    #[inline]
    fn render(&mut self, phase: u32, width: u32) -> i32 {
        let previous = self.last_phase;
        self.last_phase = phase;
        match self.waveform {
            Waveform::Sine => waveform::sine(phase),
            Waveform::Sawtooth => waveform::sawtooth(phase),
            Waveform::SawtoothReverse => waveform::reverse_sawtooth(phase),
            Waveform::Square => waveform::square(phase),
            Waveform::Pulse => waveform::pulse(phase, width),
            Waveform::Triangle => waveform::triangle(phase),
            Waveform::TriangleVariable => waveform::variable_triangle(phase, width),
            Waveform::Arbitrary => self
                .arbitrary
                .as_deref()
                .map_or(0, |table| waveform::arbitrary(table, phase)),
            Waveform::SampleHold => self.sample_hold.next(previous, phase),
            Waveform::BandLimitSawtooth => self.band_limited.generate_sawtooth(phase) as i32,
            Waveform::BandLimitSawtoothReverse => {
                self.band_limited.generate_reverse_sawtooth(phase) as i32
            }
            Waveform::BandLimitSquare => self.band_limited.generate_square(phase) as i32,
            Waveform::BandLimitPulse => self.band_limited.generate_pulse(phase, width) as i32,
        }
    }
}

impl Default for ModulatedOscillator {
    fn default() -> Self {
        Self::new(AUDIO_SAMPLE_RATE)
    }
}

impl BlockSource for ModulatedOscillator {
    fn update(&mut self, out: &mut [i16]) {
        self.update_modulated(out, None, None);
    }
}
