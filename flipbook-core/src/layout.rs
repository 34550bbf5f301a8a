//! Responsive sizing of the page surface.
//!
//! The book is laid out for a two-page spread with chrome above and below,
//! so a single page targets a fraction of the container in each axis and is
//! clamped to the range the flip surface supports.

use serde::{Deserialize, Serialize};

/// Width/height ratio of an ISO A4 page (210mm x 297mm).
pub const PAGE_ASPECT: f32 = 0.707;

/// Fraction of the container width one page may occupy. Leaves room for the
/// facing page of a spread plus margins.
const SPREAD_WIDTH_FRACTION: f32 = 0.45;

/// Upper bound on the width derived from the container.
const MAX_TARGET_WIDTH: f32 = 500.0;

/// Fraction of the container height available to the page surface. The rest
/// is reserved for the toolbar and the page counter.
const CHROME_HEIGHT_FRACTION: f32 = 0.85;

const MIN_PAGE_WIDTH: u32 = 300;
const MAX_PAGE_WIDTH: u32 = 600;
const MIN_PAGE_HEIGHT: u32 = 424;
const MAX_PAGE_HEIGHT: u32 = 849;

/// Computed on-screen size of a single page surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderDimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderDimensions {
    /// Placeholder size used until the container has been measured.
    fn default() -> Self {
        Self {
            width: 400,
            height: 566,
        }
    }
}

/// Derive the page surface size from the container size.
///
/// Width-first: take [`SPREAD_WIDTH_FRACTION`] of the container capped at
/// [`MAX_TARGET_WIDTH`] and derive the height through [`PAGE_ASPECT`]. If
/// that height does not fit under [`CHROME_HEIGHT_FRACTION`] of the
/// container, fix the height there instead and derive the width. Both axes
/// are floored and clamped to the supported page range.
pub fn compute_render_dimensions(container_width: f32, container_height: f32) -> RenderDimensions {
    let mut width = (container_width * SPREAD_WIDTH_FRACTION).min(MAX_TARGET_WIDTH);
    let mut height = width / PAGE_ASPECT;

    let available_height = container_height * CHROME_HEIGHT_FRACTION;
    if height > available_height {
        height = available_height;
        width = height * PAGE_ASPECT;
    }

    RenderDimensions {
        width: (width.floor() as u32).clamp(MIN_PAGE_WIDTH, MAX_PAGE_WIDTH),
        height: (height.floor() as u32).clamp(MIN_PAGE_HEIGHT, MAX_PAGE_HEIGHT),
    }
}
