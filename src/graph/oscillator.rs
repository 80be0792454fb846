#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::control::message::{MessageReceiver, OscMessage};
use crate::dsp::phase::{
    frequency_word, magnitude_word, offset_word, phase_word, pulse_width_word, HALF_CYCLE,
};
use crate::dsp::waveform::{self, ArbitraryTable, SampleHold};
use crate::dsp::{saturate_i16, BandLimitedWaveform, PhaseAccumulator};
use crate::graph::node::BlockSource;
use crate::AUDIO_SAMPLE_RATE;

/*
Oscillator Unit
===============

A free-running tone generator. Every block it fills the caller's buffer
with one waveform, scaled and shifted:

    out = saturate((waveform(phase) * magnitude) >> 16 + tone_offset)

Waveform families
-----------------

  Naive        Sine, Sawtooth, SawtoothReverse, Square, Pulse, Triangle,
               TriangleVariable, Arbitrary, SampleHold

               Computed straight from the phase. Sawtooth and square alias
               audibly above a few kHz.

  Band-limited BandLimitSawtooth, BandLimitSawtoothReverse,
               BandLimitSquare, BandLimitPulse

               Discontinuities are replaced by band-limited steps. Output
               is delayed by 16 samples and the peak is about 3/4 of full
               scale to leave room for the step overshoot.

`begin()` switches waveform. For band-limited waveforms it also restarts
the phase at 0 and re-initializes the generator, so the first samples
after a switch are already clean.

Parameters
----------

    frequency(hz)      0 ..= sample_rate / 2
    amplitude(a)       0.0 ..= 1.0
    offset(o)         -1.0 ..= 1.0
    phase(deg)         0 ..= 360     (reset to 0 by begin)
    pulse_width(w)     0.0 ..= 1.0   (Pulse, TriangleVariable, BandLimitPulse)

Values outside the range saturate to the nearest limit.

Example usage:
  let mut osc = OscillatorUnit::new(44_100.0);
  osc.set_frequency(220.0);
  osc.set_amplitude(0.8);
  osc.begin(Waveform::BandLimitSawtooth);
  osc.update(&mut block);
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Sawtooth,
    Square,
    Triangle,
    Arbitrary,
    Pulse,
    SawtoothReverse,
    SampleHold,
    TriangleVariable,
    BandLimitSawtooth,
    BandLimitSawtoothReverse,
    BandLimitSquare,
    BandLimitPulse,
}

impl Waveform {
    pub const ALL: [Waveform; 13] = [
        Waveform::Sine,
        Waveform::Sawtooth,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Arbitrary,
        Waveform::Pulse,
        Waveform::SawtoothReverse,
        Waveform::SampleHold,
        Waveform::TriangleVariable,
        Waveform::BandLimitSawtooth,
        Waveform::BandLimitSawtoothReverse,
        Waveform::BandLimitSquare,
        Waveform::BandLimitPulse,
    ];

    pub fn is_band_limited(self) -> bool {
        matches!(
            self,
            Waveform::BandLimitSawtooth
                | Waveform::BandLimitSawtoothReverse
                | Waveform::BandLimitSquare
                | Waveform::BandLimitPulse
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
            Waveform::Arbitrary => "arbitrary",
            Waveform::Pulse => "pulse",
            Waveform::SawtoothReverse => "reverse sawtooth",
            Waveform::SampleHold => "sample & hold",
            Waveform::TriangleVariable => "variable triangle",
            Waveform::BandLimitSawtooth => "band-limited sawtooth",
            Waveform::BandLimitSawtoothReverse => "band-limited reverse sawtooth",
            Waveform::BandLimitSquare => "band-limited square",
            Waveform::BandLimitPulse => "band-limited pulse",
        }
    }

    /// Restart band-limited state for this waveform. The pre-roll runs at
    /// `pulse_width` for `BandLimitPulse` so it lines up with the first
    /// real sample.
    pub(crate) fn init_band_limited(
        self,
        generator: &mut BandLimitedWaveform,
        freq_word: u32,
        pulse_width: u32,
    ) {
        match self {
            Waveform::BandLimitSawtooth | Waveform::BandLimitSawtoothReverse => {
                generator.init_sawtooth(freq_word)
            }
            Waveform::BandLimitSquare => {
                generator.set_pulse_width(HALF_CYCLE);
                generator.init_square(freq_word)
            }
            Waveform::BandLimitPulse => {
                generator.set_pulse_width(pulse_width);
                generator.init_square(freq_word)
            }
            _ => {}
        }
    }
}

/// Everything needed to configure a unit in one go.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorSettings {
    pub waveform: Waveform,
    pub frequency: f32,
    pub amplitude: f32,
    pub offset: f32,
    pub phase: f32,
    pub pulse_width: f32,
}

impl Default for OscillatorSettings {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            frequency: 440.0,
            amplitude: 1.0,
            offset: 0.0,
            phase: 0.0,
            pulse_width: 0.25,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OscillatorUnit {
    sample_rate: f32,
    frequency: f32,
    accumulator: PhaseAccumulator,
    phase_offset: u32,
    magnitude: i32,
    pulse_width: u32,
    tone_offset: i16,
    waveform: Waveform,
    arbitrary: Option<Box<ArbitraryTable>>,
    sample_hold: SampleHold,
    band_limited: BandLimitedWaveform,
}

impl OscillatorUnit {
    /// Silent sine; set an amplitude and frequency to hear it.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frequency: 0.0,
            accumulator: PhaseAccumulator::new(0),
            phase_offset: 0,
            magnitude: 0,
            pulse_width: 0x4000_0000,
            tone_offset: 0,
            waveform: Waveform::Sine,
            arbitrary: None,
            sample_hold: SampleHold::default(),
            band_limited: BandLimitedWaveform::new(),
        }
    }

    pub fn with_settings(sample_rate: f32, settings: &OscillatorSettings) -> Self {
        let mut unit = Self::new(sample_rate);
        unit.configure(settings);
        unit
    }

    /// Apply all settings, then `begin` the configured waveform.
    pub fn configure(&mut self, settings: &OscillatorSettings) {
        self.set_frequency(settings.frequency);
        self.set_amplitude(settings.amplitude);
        self.set_offset(settings.offset);
        self.set_pulse_width(settings.pulse_width);
        self.begin(settings.waveform);
        // begin clears the phase offset
        self.set_phase(settings.phase);
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Last requested frequency in Hz (before clamping).
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn frequency_word(&self) -> u32 {
        self.accumulator.increment()
    }

    pub fn magnitude(&self) -> i32 {
        self.magnitude
    }

    pub fn tone_offset(&self) -> i16 {
        self.tone_offset
    }

    pub fn phase_offset(&self) -> u32 {
        self.phase_offset
    }

    pub fn pulse_width(&self) -> u32 {
        self.pulse_width
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn set_frequency(&mut self, hz: f32) {
        self.frequency = hz;
        self.accumulator
            .set_increment(frequency_word(hz, self.sample_rate));
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.magnitude = magnitude_word(amplitude);
    }

    pub fn set_offset(&mut self, offset: f32) {
        self.tone_offset = offset_word(offset);
    }

    pub fn set_phase(&mut self, degrees: f32) {
        self.phase_offset = phase_word(degrees);
    }

    pub fn set_pulse_width(&mut self, width: f32) {
        self.pulse_width = pulse_width_word(width);
    }

    /// Table used by `Waveform::Arbitrary`; silent until one is set.
    pub fn set_arbitrary_waveform(&mut self, table: ArbitraryTable) {
        self.arbitrary = Some(Box::new(table));
    }

    /// Switch to `waveform`, clearing the phase offset.
    pub fn begin(&mut self, waveform: Waveform) {
        self.phase_offset = 0;
        self.waveform = waveform;
        if waveform.is_band_limited() {
            self.accumulator.reset(0);
            waveform.init_band_limited(
                &mut self.band_limited,
                self.accumulator.increment(),
                self.pulse_width,
            );
        }
    }

    /// Set amplitude and frequency, then `begin`.
    pub fn begin_with(&mut self, amplitude: f32, hz: f32, waveform: Waveform) {
        self.set_amplitude(amplitude);
        self.set_frequency(hz);
        self.begin(waveform);
    }

    pub fn apply(&mut self, message: OscMessage) {
        match message {
            OscMessage::Frequency(hz) => self.set_frequency(hz),
            OscMessage::Amplitude(amplitude) => self.set_amplitude(amplitude),
            OscMessage::Offset(offset) => self.set_offset(offset),
            OscMessage::Phase(degrees) => self.set_phase(degrees),
            OscMessage::PulseWidth(width) => self.set_pulse_width(width),
            OscMessage::Begin(waveform) => self.begin(waveform),
        }
    }

    /// Apply every queued message.
    pub fn drain<R: MessageReceiver + ?Sized>(&mut self, receiver: &mut R) {
        while let Some(message) = receiver.pop() {
            self.apply(message);
        }
    }

    /// Waveform value for the current sample, then advance the phase.
    #[inline]
    fn next_value(&mut self) -> i32 {
        let phase = self.accumulator.phase().wrapping_add(self.phase_offset);
        let next = phase.wrapping_add(self.accumulator.increment());
        let value = match self.waveform {
            Waveform::Sine => waveform::sine(phase),
            Waveform::Sawtooth => waveform::sawtooth(phase),
            Waveform::SawtoothReverse => waveform::reverse_sawtooth(phase),
            Waveform::Square => waveform::square(phase),
            Waveform::Pulse => waveform::pulse(phase, self.pulse_width),
            Waveform::Triangle => waveform::triangle(phase),
            Waveform::TriangleVariable => waveform::variable_triangle(phase, self.pulse_width),
            Waveform::Arbitrary => self
                .arbitrary
                .as_deref()
                .map_or(0, |table| waveform::arbitrary(table, phase)),
            Waveform::SampleHold => {
                let held = self.sample_hold.held() as i32;
                self.sample_hold.next(phase, next);
                held
            }
            // the generator wants the phase the sample ends on
            Waveform::BandLimitSawtooth => self.band_limited.generate_sawtooth(next) as i32,
            Waveform::BandLimitSawtoothReverse => {
                self.band_limited.generate_reverse_sawtooth(next) as i32
            }
            Waveform::BandLimitSquare => self.band_limited.generate_square(next) as i32,
            Waveform::BandLimitPulse => {
                self.band_limited.generate_pulse(next, self.pulse_width) as i32
            }
        };
        self.accumulator.advance();
        value
    }
}

impl Default for OscillatorUnit {
    fn default() -> Self {
        Self::new(AUDIO_SAMPLE_RATE)
    }
}

impl BlockSource for OscillatorUnit {
    fn update(&mut self, out: &mut [i16]) {
        // silent naive waveforms only need the phase kept moving; the
        // band-limited generator has to see every sample
        if self.magnitude == 0 && !self.waveform.is_band_limited() {
            self.accumulator.advance_by(out.len());
            out.fill(0);
            return;
        }
        for sample in out.iter_mut() {
            let value = self.next_value();
            let scaled = (value as i64 * self.magnitude as i64) >> 16;
            *sample = saturate_i16(scaled as i32 + self.tone_offset as i32);
        }
    }
}
