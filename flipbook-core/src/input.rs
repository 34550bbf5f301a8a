//! Input vocabulary.
//!
//! Keyboard and swipe events funnel into the same engine entry points as the
//! chrome buttons, so every transition has exactly one code path no matter
//! which modality triggered it.

use crate::renderer::PendingFlip;

/// Minimum horizontal travel, in logical pixels, for a drag to register as a
/// swipe.
pub const SWIPE_THRESHOLD: f32 = 30.0;

/// Keys the viewer reacts to. Everything else is ignored upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    /// Synonym for forward navigation.
    Space,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Dragging leftwards turns forward, like pulling the right-hand page
    /// across.
    Left,
    Right,
}

/// What the host must execute in response to an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    Flip(PendingFlip),
    Fullscreen(FullscreenRequest),
}

/// A request toward the platform fullscreen facility. The engine state only
/// changes once the platform reports the transition actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenRequest {
    Enter,
    Exit,
}
