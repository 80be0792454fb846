#[cfg(feature = "rtrb")]
use rtrb::Consumer;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::oscillator::Waveform;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum OscMessage {
    /// Hz, clamped to Nyquist.
    Frequency(f32),
    /// Linear gain, 0.0 to 1.0.
    Amplitude(f32),
    /// DC offset, -1.0 to 1.0.
    Offset(f32),
    /// Degrees, 0 to 360.
    Phase(f32),
    /// Duty cycle, 0.0 to 1.0.
    PulseWidth(f32),
    /// Switch waveform (re-initializes band-limited state).
    Begin(Waveform),
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<OscMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<OscMessage> {
    fn pop(&mut self) -> Option<OscMessage> {
        Consumer::pop(self).ok()
    }
}

/// Drains a prepared list in order (tests, offline rendering).
impl MessageReceiver for std::collections::VecDeque<OscMessage> {
    fn pop(&mut self) -> Option<OscMessage> {
        self.pop_front()
    }
}

#[cfg(all(test, feature = "rtrb"))]
mod tests {
    use super::*;
    use rtrb::RingBuffer;

    #[test]
    fn rtrb_consumer_delivers_in_order() {
        let (mut tx, mut rx) = RingBuffer::<OscMessage>::new(4);
        tx.push(OscMessage::Frequency(440.0)).unwrap();
        tx.push(OscMessage::Begin(Waveform::BandLimitSquare)).unwrap();

        assert_eq!(MessageReceiver::pop(&mut rx), Some(OscMessage::Frequency(440.0)));
        assert_eq!(
            MessageReceiver::pop(&mut rx),
            Some(OscMessage::Begin(Waveform::BandLimitSquare))
        );
        assert_eq!(MessageReceiver::pop(&mut rx), None);
    }
}
