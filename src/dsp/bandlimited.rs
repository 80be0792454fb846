use crate::dsp::accumulator::{OverlapAccumulator, STEP_HEIGHT};
use crate::dsp::phase::{clamp_freq_word, FREQ_WORD_CEILING, HALF_CYCLE};
use crate::dsp::step_tracker::{SquarePolarity, StepTracker};
use crate::dsp::{BLEP_AMPLITUDE, CORRECTION_WINDOW};

/// Samples run through the generator by `init_*` before real output.
pub const PRE_ROLL: usize = 2 * CORRECTION_WINDOW;

/// Band-limited sawtooth and square/pulse generator.
///
/// The caller owns the phase accumulator and passes the phase of every new
/// sample; the generator works out the increment itself, so a varying
/// frequency is fine. Output is delayed by [`CORRECTION_WINDOW`] samples
/// and peaks at about [`BLEP_AMPLITUDE`].
///
/// # Example
/// ```
/// use blep_osc::dsp::{phase::frequency_word, BandLimitedWaveform};
///
/// let word = frequency_word(440.0, 44_100.0);
/// let mut saw = BandLimitedWaveform::new();
/// saw.init_sawtooth(word);
///
/// let mut phase = 0u32;
/// let block: Vec<i16> = (0..64)
///     .map(|_| {
///         phase = phase.wrapping_add(word);
///         saw.generate_sawtooth(phase)
///     })
///     .collect();
/// assert_eq!(block.len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandLimitedWaveform {
    tracker: StepTracker,
    accumulator: OverlapAccumulator,
    pulse_width: u32,
    polarity: SquarePolarity,
}

impl BandLimitedWaveform {
    pub fn new() -> Self {
        Self {
            tracker: StepTracker::new(),
            accumulator: OverlapAccumulator::new(),
            pulse_width: HALF_CYCLE,
            polarity: SquarePolarity::default(),
        }
    }

    pub fn pulse_width(&self) -> u32 {
        self.pulse_width
    }

    /// Phase threshold of the second square edge (`HALF_CYCLE` = 50 %).
    pub fn set_pulse_width(&mut self, pulse_width: u32) {
        self.pulse_width = pulse_width;
    }

    pub fn square_polarity(&self) -> SquarePolarity {
        self.polarity
    }

    pub fn set_square_polarity(&mut self, polarity: SquarePolarity) {
        self.polarity = polarity;
    }

    /// Phase of the most recent sample.
    pub fn phase(&self) -> u32 {
        self.tracker.phase()
    }

    /// Step corrections currently in flight.
    pub fn active_steps(&self) -> usize {
        self.accumulator.active_steps()
    }

    /// Restart as a sawtooth whose next phase will be `freq_word`.
    pub fn init_sawtooth(&mut self, freq_word: u32) {
        let freq_word = self.reseed(freq_word);
        for _ in 0..PRE_ROLL {
            let next = self.tracker.phase().wrapping_add(freq_word);
            self.generate_sawtooth(next);
        }
    }

    /// Restart as a square whose next phase will be `freq_word`.
    pub fn init_square(&mut self, freq_word: u32) {
        let freq_word = self.reseed(freq_word);
        for _ in 0..PRE_ROLL {
            let next = self.tracker.phase().wrapping_add(freq_word);
            self.generate_square(next);
        }
    }

    /// Clear all steps and rewind the tracker so the pre-roll ends at 0.
    fn reseed(&mut self, freq_word: u32) -> u32 {
        debug_assert!(
            freq_word <= FREQ_WORD_CEILING,
            "frequency word {freq_word:#x} above ceiling"
        );
        let freq_word = clamp_freq_word(freq_word);
        self.accumulator.reset(0);
        let rewind = freq_word.wrapping_mul(PRE_ROLL as u32);
        self.tracker.reset(0u32.wrapping_sub(rewind));
        freq_word
    }

    pub fn generate_sawtooth(&mut self, new_phase: u32) -> i16 {
        let events = self.tracker.advance_sawtooth(new_phase);
        self.accumulator.insert_all(&events);
        self.accumulator.advance(naive_sawtooth(new_phase))
    }

    /// Falling ramp; shares state (and `init_sawtooth`) with the sawtooth.
    pub fn generate_reverse_sawtooth(&mut self, new_phase: u32) -> i16 {
        self.generate_sawtooth(new_phase).saturating_neg()
    }

    pub fn generate_square(&mut self, new_phase: u32) -> i16 {
        let events = self
            .tracker
            .advance_square(new_phase, self.pulse_width, self.polarity);
        self.accumulator.insert_all(&events);
        self.accumulator
            .advance(naive_square(new_phase, self.pulse_width, self.polarity))
    }

    /// Square with a per-sample pulse width.
    pub fn generate_pulse(&mut self, new_phase: u32, pulse_width: u32) -> i16 {
        self.pulse_width = pulse_width;
        self.generate_square(new_phase)
    }
}

impl Default for BandLimitedWaveform {
    fn default() -> Self {
        Self::new()
    }
}

/// Rising ramp from -A at phase 0 to just under +A.
#[inline]
fn naive_sawtooth(phase: u32) -> i32 {
    ((phase as u64 * STEP_HEIGHT as u64) >> 32) as i32 - BLEP_AMPLITUDE
}

#[inline]
fn naive_square(phase: u32, pulse_width: u32, polarity: SquarePolarity) -> i32 {
    let first_half = phase < pulse_width;
    match (polarity, first_half) {
        (SquarePolarity::HighFirst, true) | (SquarePolarity::LowFirst, false) => BLEP_AMPLITUDE,
        _ => -BLEP_AMPLITUDE,
    }
}
