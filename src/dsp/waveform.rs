use std::f64::consts::TAU;
use std::sync::OnceLock;

/*
Naive Waveforms
===============

Pure functions of the phase, each returning a Q15 sample in
[-32768, 32767]. None of them are band-limited: every sharp corner or jump
aliases once its harmonics pass Nyquist. They are cheap, exact at low
frequencies and fine as modulation sources.

    sine          interpolated 257-entry table
    sawtooth      phase >> 16 reinterpreted as signed (0 at phase 0)
    square        high for the first half cycle
    pulse         high while phase < pulse width
    triangle      0 → peak at 1/4 → trough at 3/4 → 0
    variable      triangle whose rising part lasts `width` of the cycle

Table lookup
------------

The top 8 bits of the phase pick a table entry, the next 16 bits
interpolate towards the following entry:

    phase:  [ index (8) | fraction (16) | unused (8) ]
*/

/// Entries in one cycle of a lookup table.
pub const TABLE_SIZE: usize = 256;

/// User-supplied single-cycle waveform.
pub type ArbitraryTable = [i16; TABLE_SIZE];

static SINE: OnceLock<[i16; TABLE_SIZE + 1]> = OnceLock::new();

/// One sine cycle plus a guard entry equal to the first.
pub fn sine_table() -> &'static [i16; TABLE_SIZE + 1] {
    SINE.get_or_init(|| {
        let mut table = [0i16; TABLE_SIZE + 1];
        for (i, entry) in table.iter_mut().enumerate() {
            let angle = TAU * i as f64 / TABLE_SIZE as f64;
            *entry = (angle.sin() * i16::MAX as f64).round() as i16;
        }
        table[TABLE_SIZE] = table[0];
        table
    })
}

#[inline]
fn interpolate(a: i16, b: i16, phase: u32) -> i32 {
    let scale = ((phase >> 8) & 0xFFFF) as i64;
    let mixed = a as i64 * (0x1_0000 - scale) + b as i64 * scale;
    (mixed >> 16) as i32
}

#[inline]
pub fn sine(phase: u32) -> i32 {
    let table = sine_table();
    let index = (phase >> 24) as usize;
    interpolate(table[index], table[index + 1], phase)
}

/// Interpolated lookup into a 256-entry cycle that wraps at the end.
#[inline]
pub fn arbitrary(table: &ArbitraryTable, phase: u32) -> i32 {
    let index = (phase >> 24) as usize;
    let next = (index + 1) % TABLE_SIZE;
    interpolate(table[index], table[next], phase)
}

#[inline]
pub fn sawtooth(phase: u32) -> i32 {
    (phase >> 16) as u16 as i16 as i32
}

#[inline]
pub fn reverse_sawtooth(phase: u32) -> i32 {
    -1 - sawtooth(phase)
}

#[inline]
pub fn square(phase: u32) -> i32 {
    pulse(phase, 0x8000_0000)
}

#[inline]
pub fn pulse(phase: u32, pulse_width: u32) -> i32 {
    if phase < pulse_width {
        i16::MAX as i32
    } else {
        -(i16::MAX as i32)
    }
}

#[inline]
pub fn triangle(phase: u32) -> i32 {
    match phase >> 30 {
        1 | 2 => 0xFFFF - (phase >> 15) as i32,
        _ => (phase as i32) >> 15,
    }
}

/// Triangle that rises for `width` of the cycle and falls for the rest.
///
/// `width = 0x8000_0000` is the symmetric triangle; narrow widths approach
/// a falling ramp, wide ones a rising ramp.
pub fn variable_triangle(phase: u32, width: u32) -> i32 {
    const SPAN: u64 = 1 << 32;
    let phase = phase as u64;
    let half = width as u64 / 2;
    let fall_start = half;
    let fall_end = SPAN - half;

    if phase < fall_start {
        (phase * i16::MAX as u64 / half) as i32
    } else if phase < fall_end {
        let fall_len = fall_end - fall_start;
        let fallen = (phase - fall_start) * 0xFFFF / fall_len;
        i16::MAX as i32 - fallen as i32
    } else {
        let risen = (phase - fall_end) * 0x8000 / half;
        i16::MIN as i32 + risen as i32
    }
}

/// Random level source for sample-and-hold (xorshift32).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleHold {
    state: u32,
    held: i16,
}

impl SampleHold {
    pub fn new(seed: u32) -> Self {
        Self {
            // xorshift never leaves zero
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
            held: 0,
        }
    }

    pub fn held(&self) -> i16 {
        self.held
    }

    /// Pick a new level when the phase wrapped, then return the held one.
    #[inline]
    pub fn next(&mut self, previous_phase: u32, phase: u32) -> i32 {
        if phase < previous_phase {
            let mut x = self.state;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.state = x;
            self.held = (x >> 16) as u16 as i16;
        }
        self.held as i32
    }
}

impl Default for SampleHold {
    fn default() -> Self {
        Self::new(0x1234_5678)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_hits_its_landmarks() {
        assert_eq!(sine(0), 0);
        assert_eq!(sine(0x4000_0000), i16::MAX as i32);
        assert_eq!(sine(0x8000_0000), 0);
        assert_eq!(sine(0xC000_0000), -(i16::MAX as i32));
        let table = sine_table();
        assert_eq!(table[0], table[TABLE_SIZE]);
    }

    #[test]
    fn sine_interpolation_is_smooth() {
        let mut previous = sine(0);
        for step in 1..4096u32 {
            let value = sine(step << 20);
            assert!((value - previous).abs() < 60, "jump at step {step}");
            previous = value;
        }
    }

    #[test]
    fn sawtooth_covers_the_signed_range() {
        assert_eq!(sawtooth(0), 0);
        assert_eq!(sawtooth(0x7FFF_FFFF), i16::MAX as i32);
        assert_eq!(sawtooth(0x8000_0000), i16::MIN as i32);
        assert_eq!(reverse_sawtooth(0), -1);
        assert_eq!(reverse_sawtooth(0x8000_0000), i16::MAX as i32);
    }

    #[test]
    fn pulse_follows_width() {
        assert!(square(0x7FFF_FFFF) > 0);
        assert!(square(0x8000_0000) < 0);
        assert!(pulse(0x1000_0000, 0x2000_0000) > 0);
        assert!(pulse(0x3000_0000, 0x2000_0000) < 0);
        assert!(pulse(0, 0) < 0);
    }

    #[test]
    fn triangle_peaks_at_quarters() {
        assert_eq!(triangle(0), 0);
        assert_eq!(triangle(0x4000_0000), 0x7FFF);
        assert!(triangle(0x8000_0000).abs() <= 1);
        assert_eq!(triangle(0xC000_0000), -0x8000);
    }

    #[test]
    fn variable_triangle_is_continuous() {
        for &width in &[0x1000_0000u32, 0x8000_0000, 0xF000_0000] {
            let mut previous = variable_triangle(0, width);
            assert_eq!(previous, 0);
            for step in 1..=4096u64 {
                let phase = ((step << 32) / 4096) as u32;
                let value = variable_triangle(phase, width);
                assert!(
                    (value - previous).abs() < 1100,
                    "width {width:#x}: jump {previous} -> {value} at step {step}"
                );
                previous = value;
            }
        }
    }

    #[test]
    fn symmetric_variable_triangle_matches_triangle_shape() {
        let width = 0x8000_0000;
        assert_eq!(variable_triangle(0x4000_0000, width), i16::MAX as i32);
        assert!((variable_triangle(0xC000_0000, width) - i16::MIN as i32).abs() <= 1);
    }

    #[test]
    fn arbitrary_table_wraps() {
        let mut table = [0i16; TABLE_SIZE];
        table[TABLE_SIZE - 1] = 1000;
        // halfway between the last entry and the first
        assert_eq!(arbitrary(&table, 0xFF80_0000), 500);
    }

    #[test]
    fn sample_hold_changes_only_on_wrap() {
        let mut sh = SampleHold::default();
        let first = sh.next(0xF000_0000, 0x0100_0000);
        assert_eq!(sh.next(0x0100_0000, 0x0200_0000), first);
        let second = sh.next(0xFF00_0000, 0x0000_1000);
        assert_ne!(first, second);
    }
}
