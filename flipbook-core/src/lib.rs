//! Navigation engine for flipbook publications.
//!
//! A flipbook is an ordered sequence of pre-rendered page images shown with
//! a simulated page-turn between them. This crate owns everything about that
//! experience except the pixels: the current-page state machine, responsive
//! page sizing, zoom and fullscreen state, the thumbnail panel, and the
//! keyboard/swipe input funnel. The page-turn animation itself is an
//! injected [`FlipRenderer`], so any UI toolkit can supply its own.
//!
//! Navigation is eventually consistent by design: `next`/`prev`/`go_to`
//! request a flip, and the committed page only moves when the renderer
//! reports the animation finished.

mod engine;
mod error;
mod input;
mod layout;
mod page;
mod renderer;
mod settings;

pub use engine::PageFlipEngine;
pub use error::ViewerError;
pub use input::{EngineCommand, FullscreenRequest, Key, SwipeDirection, SWIPE_THRESHOLD};
pub use layout::{compute_render_dimensions, RenderDimensions, PAGE_ASPECT};
pub use page::Page;
pub use renderer::{FlipKind, FlipRenderer, FlipRequest, InstantFlip, PendingFlip};
pub use settings::ViewerSettings;
