//! Landmark frames and the duplicate-frame gate.

use std::time::Duration;

use crate::landmark::HandLandmarks;

/// What a hand tracker reports for one video frame.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkFrame {
    /// Video timestamp; strictly increasing for genuinely new frames.
    pub timestamp: Duration,
    /// `None` when no hand was found.
    pub hand:      Option<HandLandmarks>,
}

impl LandmarkFrame {
    pub fn new(timestamp: Duration, hand: Option<HandLandmarks>) -> Self {
        LandmarkFrame { timestamp, hand }
    }

    pub fn empty(timestamp: Duration) -> Self {
        LandmarkFrame { timestamp, hand: None }
    }
}

/// Lets a frame through only if its timestamp is newer than the last one
/// admitted.  A deduplication guard, not a rate limiter.
#[derive(Clone, Debug, Default)]
pub struct FrameGate {
    last: Option<Duration>,
}

impl FrameGate {
    pub fn new() -> Self { Self::default() }

    pub fn admit(&mut self, timestamp: Duration) -> bool {
        match self.last {
            Some(prev) if timestamp <= prev => false,
            _ => {
                self.last = Some(timestamp);
                true
            }
        }
    }

    pub fn last(&self) -> Option<Duration> { self.last }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration { Duration::from_millis(v) }

    #[test]
    fn first_frame_always_admitted() {
        assert!(FrameGate::new().admit(ms(0)));
    }

    #[test]
    fn repeated_timestamp_skipped() {
        let mut g = FrameGate::new();
        assert!(g.admit(ms(33)));
        assert!(!g.admit(ms(33)));
        assert!(g.admit(ms(66)));
        assert_eq!(g.last(), Some(ms(66)));
    }

    #[test]
    fn older_timestamp_skipped() {
        let mut g = FrameGate::new();
        assert!(g.admit(ms(100)));
        assert!(!g.admit(ms(50)));
        assert_eq!(g.last(), Some(ms(100)));
    }

    #[test]
    fn frames_arriving_quickly_are_not_throttled() {
        let mut g = FrameGate::new();
        for t in 1..100 {
            assert!(g.admit(Duration::from_micros(t)));
        }
    }
}
