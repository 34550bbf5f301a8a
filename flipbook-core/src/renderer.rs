//! The page-turn animation seam.
//!
//! The visual flip effect is an injected dependency: the engine issues flip
//! requests against the [`FlipRenderer`] trait and commits the new page only
//! when the renderer reports the animation finished. Hosts provide the
//! concrete animation (timed, CSS-like, or [`InstantFlip`] for headless use)
//! and drive the completion edge from their own event loop.

use std::time::Duration;

/// How a flip was requested. A `Turn` is the animated single-page turn from
/// next/prev; a `Jump` is a direct goto that lands in one animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipKind {
    Turn,
    Jump,
}

/// A flip the engine asks the renderer to animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipRequest {
    pub target: usize,
    pub kind: FlipKind,
}

/// An accepted flip: the index the renderer will land on and how long the
/// animation runs. The host schedules the completion callback from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingFlip {
    pub target: usize,
    pub duration: Duration,
}

/// The injected page-turn animation primitive.
///
/// Renderers serialize animations: at most one flip is in flight, and a
/// request arriving mid-animation is dropped (`begin` returns `None`).
/// Completion events therefore fire in the order requests were accepted.
pub trait FlipRenderer {
    /// Start animating toward `flip.target`. Returns `None` when the request
    /// is dropped because an animation is already running.
    fn begin(&mut self, flip: FlipRequest) -> Option<PendingFlip>;

    /// Finish the in-flight animation, yielding the index it landed on.
    fn complete(&mut self) -> Option<usize>;

    fn is_animating(&self) -> bool;
}

/// A renderer with no animation: every flip lands as soon as the host drains
/// it. Useful for headless hosts and tests.
#[derive(Debug, Default)]
pub struct InstantFlip {
    in_flight: Option<usize>,
}

impl InstantFlip {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlipRenderer for InstantFlip {
    fn begin(&mut self, flip: FlipRequest) -> Option<PendingFlip> {
        if self.in_flight.is_some() {
            return None;
        }
        self.in_flight = Some(flip.target);
        Some(PendingFlip {
            target: flip.target,
            duration: Duration::ZERO,
        })
    }

    fn complete(&mut self) -> Option<usize> {
        self.in_flight.take()
    }

    fn is_animating(&self) -> bool {
        self.in_flight.is_some()
    }
}
