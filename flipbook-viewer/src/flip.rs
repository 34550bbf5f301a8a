use std::time::Duration;

use flipbook_core::{FlipRenderer, FlipRequest, PendingFlip};

/// Timer-driven page-turn renderer.
///
/// The visual turn runs for the publication's flip duration; the host
/// schedules a sleep from the returned [`PendingFlip`] and drains the
/// animation when it fires. One flip at a time: requests arriving while an
/// animation runs are dropped, which keeps completion events in request
/// order.
#[derive(Debug)]
pub struct TimedFlip {
    duration: Duration,
    in_flight: Option<usize>,
}

impl TimedFlip {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            in_flight: None,
        }
    }
}

impl FlipRenderer for TimedFlip {
    fn begin(&mut self, flip: FlipRequest) -> Option<PendingFlip> {
        if self.in_flight.is_some() {
            return None;
        }
        self.in_flight = Some(flip.target);
        Some(PendingFlip {
            target: flip.target,
            duration: self.duration,
        })
    }

    fn complete(&mut self) -> Option<usize> {
        self.in_flight.take()
    }

    fn is_animating(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipbook_core::FlipKind;

    fn turn_to(target: usize) -> FlipRequest {
        FlipRequest {
            target,
            kind: FlipKind::Turn,
        }
    }

    #[test]
    fn accepted_flip_carries_the_configured_duration() {
        let mut renderer = TimedFlip::new(Duration::from_millis(800));
        let pending = renderer.begin(turn_to(1)).unwrap();
        assert_eq!(pending.target, 1);
        assert_eq!(pending.duration, Duration::from_millis(800));
    }

    #[test]
    fn second_request_during_animation_is_dropped() {
        let mut renderer = TimedFlip::new(Duration::from_millis(500));
        assert!(renderer.begin(turn_to(1)).is_some());
        assert!(renderer.begin(turn_to(2)).is_none());
        assert_eq!(renderer.complete(), Some(1));
        // Drained: the next request is accepted again.
        assert!(renderer.begin(turn_to(2)).is_some());
    }
}
