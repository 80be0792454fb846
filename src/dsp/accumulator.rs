use crate::dsp::ring::RingBuffer;
use crate::dsp::step_table::{StepTable, WINDOW_END};
use crate::dsp::step_tracker::{StepEvent, StepEvents};
use crate::dsp::{
    saturate_i16, BLEP_AMPLITUDE, CORRECTION_WINDOW, MAX_ACTIVE_STEPS, ONE_SAMPLE,
};
use crate::dsp::phase::{FREQ_WORD_CEILING, PHASE_WRAP};

/*
Overlap-Accumulation
====================

A step correction is spread over CORRECTION_WINDOW samples on each side of
the edge, but the edge is only discovered once the phase has already moved
past it. So output is delayed by CORRECTION_WINDOW samples: the most recent
samples wait in `pending` until every correction that touches them has
been added.

    pending (oldest → newest)          current sample
    [ n-16 | n-15 | ... | n-1 ]        [ n ]
      ▲                                  ▲
      emitted this call                  naive value + active corrections

Per sample:

  1. insert(event)   for each new edge: add the mirrored (pre-edge) half of
                     its correction to pending cells n-1 .. n-16, then
                     remember it as active.
  2. advance(naive)  value(n) = naive + Σ correction(active offsets);
                     every active offset moves one sample further; events
                     that have covered the full window are retired; the
                     oldest pending cell is emitted and value(n) appended.

Step (1) always precedes step (2) so a cell is complete before it leaves.

Events enter in time order and all live exactly CORRECTION_WINDOW samples,
so expired events are always at the front of the active ring.

Arithmetic saturates: overlapping large corrections clip at the i16 range
instead of wrapping around into the very discontinuity we are removing.
*/

/// Most steps that can be in flight for one threshold at the ceiling.
const fn steps_per_threshold() -> usize {
    (CORRECTION_WINDOW as u64 * FREQ_WORD_CEILING as u64 / PHASE_WRAP) as usize + 1
}

// square and pulse track two thresholds
const _: () = assert!(MAX_ACTIVE_STEPS >= 2 * steps_per_threshold());

/// Height of a full naive transition (-A to +A).
pub const STEP_HEIGHT: i32 = 2 * BLEP_AMPLITUDE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapAccumulator {
    pending: RingBuffer<i32, CORRECTION_WINDOW>,
    active: RingBuffer<StepEvent, MAX_ACTIVE_STEPS>,
    step_height: i32,
}

impl OverlapAccumulator {
    pub fn new() -> Self {
        Self::with_step_height(STEP_HEIGHT)
    }

    pub fn with_step_height(step_height: i32) -> Self {
        let mut pending = RingBuffer::new();
        pending.fill(0);
        Self {
            pending,
            active: RingBuffer::new(),
            step_height,
        }
    }

    /// Forget every step and set all pending output to `value`.
    pub fn reset(&mut self, value: i32) {
        self.pending.fill(value);
        self.active.clear();
    }

    /// Number of steps still being applied.
    pub fn active_steps(&self) -> usize {
        self.active.len()
    }

    pub fn step_height(&self) -> i32 {
        self.step_height
    }

    /// Register a new edge, applying its pre-edge half to pending output.
    pub fn insert(&mut self, event: StepEvent) {
        let table = StepTable::shared();
        let height = event.polarity.signed(self.step_height);

        // pending[WINDOW - k] is sample n - k
        for k in 1..=CORRECTION_WINDOW {
            let before = k as u32 * ONE_SAMPLE - event.offset;
            if before >= WINDOW_END {
                continue;
            }
            if let Some(cell) = self.pending.get_mut(CORRECTION_WINDOW - k) {
                *cell = cell.saturating_sub(table.correction(before, height));
            }
        }

        let pushed = self.active.push_back(event);
        debug_assert!(
            pushed.is_ok(),
            "more than {MAX_ACTIVE_STEPS} steps in flight; frequency above ceiling"
        );
    }

    /// Insert every event of one sample interval.
    pub fn insert_all(&mut self, events: &StepEvents) {
        for &event in events {
            self.insert(event);
        }
    }

    /// Finish the current sample and emit the oldest one.
    pub fn advance(&mut self, naive: i32) -> i16 {
        let table = StepTable::shared();
        let step_height = self.step_height;

        let mut value = naive;
        for event in self.active.iter_mut() {
            let height = event.polarity.signed(step_height);
            value = value.saturating_add(table.correction(event.offset, height));
            event.offset += ONE_SAMPLE;
        }

        while self
            .active
            .front()
            .is_some_and(|event| event.offset >= WINDOW_END)
        {
            self.active.pop_front();
        }

        let emitted = self.pending.pop_front().unwrap_or_default();
        let _ = self.pending.push_back(value);
        saturate_i16(emitted)
    }
}

impl Default for OverlapAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
