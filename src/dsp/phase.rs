//! Phase accumulator and fixed-point parameter conversions.

/*
Fixed-Point Phase
=================

One waveform cycle is mapped onto the full range of a `u32`:

    0x0000_0000   start of the cycle (0 degrees)
    0x4000_0000   quarter cycle (90 degrees)
    0x8000_0000   half cycle (180 degrees)
    0xFFFF_FFFF   just before the next cycle

The accumulator adds a per-sample increment (the "frequency word") and
relies on unsigned wraparound to start the next cycle. Wrapping is never an
error; it is exactly the event the sawtooth and square generators watch for.

    frequency_word = frequency_hz * 2^32 / sample_rate

Example: 1 kHz at 44.1 kHz
  - 2^32 / 44100 = 97391.55 per Hz
  - word = 97_391_548, one wrap every ~44.1 samples

The Ceiling
-----------

Frequencies are clamped to Nyquist and the word is clamped to
`FREQ_WORD_CEILING` (just under half the wrap range). Keeping the increment
below 2^31 means the wrapping difference between two consecutive phases is
always the forward distance travelled, and it bounds how many steps can be
in flight in the band-limited generators.


Other Parameters
----------------

    amplitude   0.0 ..= 1.0     -> magnitude   0 ..= 65536   (Q16 gain)
    offset     -1.0 ..= 1.0     -> offset      -32767 ..= 32767
    phase       0 ..= 360 deg   -> phase word  0 ..= 2^32
    pulse width 0.0 ..= 1.0     -> threshold   0 ..= 2^32 - 1

Out-of-range inputs saturate to the nearest limit.
*/

/// Size of one cycle in phase units.
pub const PHASE_WRAP: u64 = 1 << 32;

/// Half a cycle.
pub const HALF_CYCLE: u32 = 0x8000_0000;

/// Largest accepted frequency word.
pub const FREQ_WORD_CEILING: u32 = 0x7FFE_0000;

/// Unity gain in Q16.
pub const UNITY_MAGNITUDE: i32 = 1 << 16;

/// Wrapping fixed-point phase counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseAccumulator {
    phase: u32,
    increment: u32,
}

impl PhaseAccumulator {
    pub fn new(increment: u32) -> Self {
        Self {
            phase: 0,
            increment: clamp_freq_word(increment),
        }
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn increment(&self) -> u32 {
        self.increment
    }

    pub fn set_increment(&mut self, increment: u32) {
        self.increment = clamp_freq_word(increment);
    }

    /// Jump to an absolute phase.
    pub fn reset(&mut self, phase: u32) {
        self.phase = phase;
    }

    /// Advance by one sample and return the new phase.
    #[inline]
    pub fn advance(&mut self) -> u32 {
        self.phase = self.phase.wrapping_add(self.increment);
        self.phase
    }

    /// Advance by a whole number of samples at the current increment.
    pub fn advance_by(&mut self, samples: usize) {
        let travelled = (self.increment as u64).wrapping_mul(samples as u64);
        self.phase = self.phase.wrapping_add(travelled as u32);
    }
}

/// True when moving from `previous` to `current` crossed the end of a cycle.
#[inline]
pub fn wrapped(previous: u32, current: u32) -> bool {
    current < previous
}

/// Clamp a frequency word to the supported ceiling.
#[inline]
pub fn clamp_freq_word(word: u32) -> u32 {
    word.min(FREQ_WORD_CEILING)
}

/// Convert a frequency in Hz to a per-sample phase increment.
///
/// # Example
/// ```
/// use blep_osc::dsp::phase::{frequency_word, FREQ_WORD_CEILING};
/// assert_eq!(frequency_word(1000.0, 44_100.0), 97_391_548);
/// assert_eq!(frequency_word(1.0e9, 44_100.0), FREQ_WORD_CEILING);
/// ```
pub fn frequency_word(frequency_hz: f32, sample_rate: f32) -> u32 {
    if !(sample_rate > 0.0) || !(frequency_hz > 0.0) {
        return 0;
    }
    let frequency_hz = frequency_hz.min(sample_rate / 2.0);
    let word = frequency_hz as f64 * PHASE_WRAP as f64 / sample_rate as f64;
    // float -> int casts saturate
    clamp_freq_word(word as u32)
}

/// Convert an angle in degrees to a phase offset.
pub fn phase_word(degrees: f32) -> u32 {
    let degrees = if degrees.is_nan() {
        0.0
    } else {
        degrees.clamp(0.0, 360.0)
    };
    let word = (degrees as f64 * PHASE_WRAP as f64 / 360.0) as u64;
    (word % PHASE_WRAP) as u32
}

/// Convert a linear amplitude to a Q16 magnitude.
pub fn magnitude_word(amplitude: f32) -> i32 {
    let amplitude = if amplitude.is_nan() {
        0.0
    } else {
        amplitude.clamp(0.0, 1.0)
    };
    (amplitude * UNITY_MAGNITUDE as f32) as i32
}

/// Convert a DC offset in `[-1, 1]` to sample units.
pub fn offset_word(offset: f32) -> i16 {
    let offset = if offset.is_nan() {
        0.0
    } else {
        offset.clamp(-1.0, 1.0)
    };
    (offset * i16::MAX as f32) as i16
}

/// Convert a duty cycle in `[0, 1]` to a phase threshold.
pub fn pulse_width_word(width: f32) -> u32 {
    let width = if width.is_nan() {
        0.5
    } else {
        width.clamp(0.0, 1.0)
    };
    (width as f64 * PHASE_WRAP as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_wraps(increment: u32, samples: u64) -> u64 {
        let mut acc = PhaseAccumulator::new(increment);
        let mut wraps = 0;
        for _ in 0..samples {
            let previous = acc.phase();
            if wrapped(previous, acc.advance()) {
                wraps += 1;
            }
        }
        wraps
    }

    #[test]
    fn wrap_count_matches_travelled_cycles() {
        let samples = 20_000u64;
        for &hz in &[20.0, 440.0, 1000.0, 7_919.0, 15_000.0, 22_050.0] {
            let word = frequency_word(hz, 44_100.0);
            let expected = samples * word as u64 / PHASE_WRAP;
            let wraps = count_wraps(word, samples);
            assert!(
                wraps.abs_diff(expected) <= 1,
                "{hz} Hz: {wraps} wraps, expected {expected}"
            );
        }
    }

    #[test]
    fn frequency_is_clamped_to_nyquist_and_ceiling() {
        assert_eq!(frequency_word(-5.0, 44_100.0), 0);
        assert_eq!(frequency_word(f32::NAN, 44_100.0), 0);
        assert_eq!(frequency_word(22_050.0, 44_100.0), FREQ_WORD_CEILING);
        assert_eq!(frequency_word(440.0, 0.0), 0);
        assert!(frequency_word(440.0, 44_100.0) < FREQ_WORD_CEILING);
    }

    #[test]
    fn accumulator_clamps_increment() {
        let mut acc = PhaseAccumulator::new(u32::MAX);
        assert_eq!(acc.increment(), FREQ_WORD_CEILING);
        acc.set_increment(12);
        acc.advance_by(10);
        assert_eq!(acc.phase(), 120);
    }

    #[test]
    fn advance_by_matches_repeated_advance() {
        let mut stepped = PhaseAccumulator::new(0x1234_5678);
        let mut jumped = stepped;
        for _ in 0..1000 {
            stepped.advance();
        }
        jumped.advance_by(1000);
        assert_eq!(stepped, jumped);
    }

    #[test]
    fn parameter_words_saturate() {
        assert_eq!(phase_word(-10.0), 0);
        assert_eq!(phase_word(90.0), 0x4000_0000);
        assert_eq!(phase_word(360.0), 0);
        assert_eq!(magnitude_word(2.0), UNITY_MAGNITUDE);
        assert_eq!(magnitude_word(-1.0), 0);
        assert_eq!(offset_word(-3.0), -i16::MAX);
        assert_eq!(pulse_width_word(0.5), HALF_CYCLE);
        assert_eq!(pulse_width_word(1.5), u32::MAX);
    }
}
