use std::f64::consts::PI;
use std::sync::OnceLock;

use crate::dsp::{CORRECTION_WINDOW, FRACTION_BITS, ONE_SAMPLE};

/*
Band-Limited Step Table
=======================

A naive sawtooth or square jumps from one level to another between two
samples. That instantaneous step has energy at every frequency, and the
part above Nyquist folds back into the audible band as aliasing.

The fix is to replace each hard step with a band-limited one: the integral
of a low-pass impulse (here a Blackman-windowed sinc). Rather than
synthesising the smooth step directly, the generators keep emitting the
naive waveform and add the *difference* between the smooth and the hard
step, the residual:

    residual(x) = band_limited_step(x) - hard_step(x)

  Value
    0.5 ┤      ╭╮
        │     ╱  ╲___                  x = time since the edge (samples)
    0.0 ┼────╯       ─────────────     residual is 0 outside ±WINDOW
        │  ───╮     ╭
   -0.5 ┤      ╰╮  ╱
        └───────┼────────→ x
       -W       0       +W

Properties we rely on:

  - residual(-x) = -residual(x). Only the x >= 0 half is stored; samples
    before the edge use the negated mirror.
  - residual(0) = -0.5 and residual(W) = 0 exactly, so a finished
    correction leaves the naive waveform untouched.
  - A falling step is the negated rising step.

Resolution
----------

    STEP_OVERSAMPLE   128 entries per sample
    entries           16 * 128 + 1 = 2049 (the last one is the zero end)
    format            Q20 (1 << 20 = unit step height)

Offsets come in as Q16 samples. The top bits pick the entry, the low
9 bits linearly interpolate towards the next one.
*/

/// Table entries per sample of offset.
pub const STEP_OVERSAMPLE: usize = 128;

/// Number of stored residual values.
pub const STEP_TABLE_LEN: usize = CORRECTION_WINDOW * STEP_OVERSAMPLE + 1;

/// Fixed-point bits of a table entry.
pub const STEP_ONE_BITS: u32 = 20;

/// First offset past the stored half of the kernel.
pub const WINDOW_END: u32 = CORRECTION_WINDOW as u32 * ONE_SAMPLE;

const INTERP_BITS: u32 = FRACTION_BITS - STEP_OVERSAMPLE.trailing_zeros();
const INTERP_MASK: u32 = (1 << INTERP_BITS) - 1;

/// Low-pass cutoff of the kernel, in cycles per sample.
const CUTOFF: f64 = 0.42;

/// Integration sub-steps per table entry while building.
const SUBSTEPS: usize = 16;

static SHARED: OnceLock<StepTable> = OnceLock::new();

/// Residual of the band-limited step, positive half.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTable {
    residual: [i32; STEP_TABLE_LEN],
}

impl StepTable {
    /// The process-wide table, built on first use.
    pub fn shared() -> &'static StepTable {
        SHARED.get_or_init(StepTable::build)
    }

    /// Integrate the windowed-sinc impulse into a residual table.
    pub fn build() -> Self {
        let dx = 1.0 / (STEP_OVERSAMPLE * SUBSTEPS) as f64;

        // running integral of the impulse from 0 to each table point
        let mut integral = [0.0f64; STEP_TABLE_LEN];
        let mut running = 0.0;
        let mut previous = impulse(0.0);
        for (entry, value) in integral.iter_mut().enumerate().skip(1) {
            for sub in 1..=SUBSTEPS {
                let x = ((entry - 1) * SUBSTEPS + sub) as f64 * dx;
                let current = impulse(x);
                running += 0.5 * (previous + current) * dx;
                previous = current;
            }
            *value = running;
        }

        // normalize so the step ends at exactly one
        let total = integral[STEP_TABLE_LEN - 1];
        let mut residual = [0i32; STEP_TABLE_LEN];
        for (out, area) in residual.iter_mut().zip(integral.iter()) {
            let step = 0.5 + 0.5 * area / total;
            *out = ((step - 1.0) * (1 << STEP_ONE_BITS) as f64).round() as i32;
        }
        residual[STEP_TABLE_LEN - 1] = 0;

        Self { residual }
    }

    /// Residual (Q20) `offset` Q16 samples after an edge.
    #[inline]
    pub fn lookup(&self, offset: u32) -> i32 {
        debug_assert!(offset < WINDOW_END, "step offset {offset:#x} outside the window");
        if offset >= WINDOW_END {
            return 0;
        }
        let index = (offset >> INTERP_BITS) as usize;
        let frac = (offset & INTERP_MASK) as i64;
        let a = self.residual[index] as i64;
        let b = self.residual[index + 1] as i64;
        let mixed = a + (((b - a) * frac + (1 << (INTERP_BITS - 1))) >> INTERP_BITS);
        mixed as i32
    }

    /// Correction in sample units for a step of signed `height`.
    #[inline]
    pub fn correction(&self, offset: u32, height: i32) -> i32 {
        let scaled = self.lookup(offset) as i64 * height as i64;
        let half = 1i64 << (STEP_ONE_BITS - 1);
        // round half away from zero so falling == -rising exactly
        let rounded = if scaled >= 0 {
            (scaled + half) >> STEP_ONE_BITS
        } else {
            -((half - scaled) >> STEP_ONE_BITS)
        };
        rounded as i32
    }
}

/// Blackman-windowed sinc low-pass impulse with unit area.
fn impulse(t: f64) -> f64 {
    let half = CORRECTION_WINDOW as f64;
    if t.abs() >= half {
        return 0.0;
    }
    let x = 2.0 * CUTOFF * t;
    let sinc = if x == 0.0 { 1.0 } else { (PI * x).sin() / (PI * x) };
    let window = 0.42 + 0.5 * (PI * t / half).cos() + 0.08 * (2.0 * PI * t / half).cos();
    2.0 * CUTOFF * sinc * window
}
