#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::phase::FREQ_WORD_CEILING;
use crate::dsp::FRACTION_BITS;

/*
Step Tracking
=============

Once per output sample the tracker compares the previous phase with the
new one and asks: did the naive waveform jump somewhere in between, and if
so, how long before the current sample instant?

    phase
      ▲          threshold T
      │  prev ●───────┼───────● new
      │       |<ahead>|<past >|
      │       |<--- increment --->|

    ahead  = T - prev            (wrapping)
    past   = increment - ahead
    offset = past / increment    (fraction of a sample since the edge)

A crossing happens when 1 <= ahead <= increment. `ahead == 0` means the
previous sample sat exactly on the threshold, so the edge was already
reported then (with offset 0).

Sawtooth: one threshold at phase 0 (the wrap), falling edge.
Square:   threshold 0 and threshold = pulse width. Which one rises depends
          on the configured polarity.

The increment is the wrapping difference between the two phases, so a
phase that was advanced at a varying rate (frequency modulation) is
tracked just as well as a fixed frequency. Differences above the
frequency ceiling can only come from a jump (phase reset, backwards
modulation); those produce no step and are left uncorrected.
*/

/// Direction of a step discontinuity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    #[default]
    Rising,
    Falling,
}

impl Polarity {
    /// Apply the direction to an unsigned step height.
    #[inline]
    pub fn signed(self, height: i32) -> i32 {
        match self {
            Polarity::Rising => height,
            Polarity::Falling => -height,
        }
    }

    pub fn inverted(self) -> Self {
        match self {
            Polarity::Rising => Polarity::Falling,
            Polarity::Falling => Polarity::Rising,
        }
    }
}

/// Which half of a square cycle is high.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SquarePolarity {
    /// High from the wrap until the pulse width, then low.
    #[default]
    HighFirst,
    /// Low from the wrap until the pulse width, then high.
    LowFirst,
}

impl SquarePolarity {
    /// Direction of the edge at the wrap (phase 0).
    pub fn wrap_edge(self) -> Polarity {
        match self {
            SquarePolarity::HighFirst => Polarity::Rising,
            SquarePolarity::LowFirst => Polarity::Falling,
        }
    }
}

/// A discontinuity being corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepEvent {
    /// Time since the edge in Q16 samples.
    pub offset: u32,
    pub polarity: Polarity,
}

/// Steps found in one sample interval (at most two).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepEvents {
    events: [StepEvent; 2],
    len: usize,
}

impl StepEvents {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, event: StepEvent) {
        debug_assert!(self.len < self.events.len());
        if let Some(slot) = self.events.get_mut(self.len) {
            *slot = event;
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[StepEvent] {
        &self.events[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepEvent> {
        self.as_slice().iter()
    }
}

impl<'a> IntoIterator for &'a StepEvents {
    type Item = &'a StepEvent;
    type IntoIter = std::slice::Iter<'a, StepEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// Offset (Q16 samples) since `threshold` was crossed on the way from
/// `previous` to `previous + increment`, if it was.
#[inline]
pub fn crossing(previous: u32, increment: u32, threshold: u32) -> Option<u32> {
    let ahead = threshold.wrapping_sub(previous);
    if ahead == 0 || ahead > increment {
        return None;
    }
    let past = (increment - ahead) as u64;
    Some(((past << FRACTION_BITS) / increment as u64) as u32)
}

/// Remembers the previous phase and reports discontinuities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepTracker {
    phase: u32,
}

impl StepTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase seen by the last call.
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Rebase without reporting any step.
    pub fn reset(&mut self, phase: u32) {
        self.phase = phase;
    }

    /// Advance to `new_phase`, returning the increment travelled if it is a
    /// plausible forward move.
    #[inline]
    fn step_to(&mut self, new_phase: u32) -> Option<(u32, u32)> {
        let previous = self.phase;
        self.phase = new_phase;
        let increment = new_phase.wrapping_sub(previous);
        (increment != 0 && increment <= FREQ_WORD_CEILING).then_some((previous, increment))
    }

    /// Sawtooth: falling edge at every wrap.
    pub fn advance_sawtooth(&mut self, new_phase: u32) -> StepEvents {
        let mut events = StepEvents::new();
        if let Some((previous, increment)) = self.step_to(new_phase) {
            if let Some(offset) = crossing(previous, increment, 0) {
                events.push(StepEvent {
                    offset,
                    polarity: Polarity::Falling,
                });
            }
        }
        events
    }

    /// Square / pulse: one edge at the wrap, one at `pulse_width`.
    pub fn advance_square(
        &mut self,
        new_phase: u32,
        pulse_width: u32,
        polarity: SquarePolarity,
    ) -> StepEvents {
        let mut events = StepEvents::new();
        let Some((previous, increment)) = self.step_to(new_phase) else {
            return events;
        };

        let wrap_edge = polarity.wrap_edge();
        let wrap = crossing(previous, increment, 0).map(|offset| StepEvent {
            offset,
            polarity: wrap_edge,
        });
        let width = crossing(previous, increment, pulse_width).map(|offset| StepEvent {
            offset,
            polarity: wrap_edge.inverted(),
        });

        // oldest edge first
        match (wrap, width) {
            (Some(a), Some(b)) if b.offset > a.offset => {
                events.push(b);
                events.push(a);
            }
            (a, b) => {
                for event in a.into_iter().chain(b) {
                    events.push(event);
                }
            }
        }
        events
    }
}
