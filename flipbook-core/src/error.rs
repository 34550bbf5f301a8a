use thiserror::Error;

/// Errors raised while constructing a viewer.
///
/// Navigation itself never errors: out-of-range requests are clamped or
/// ignored by [`crate::PageFlipEngine`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewerError {
    #[error("publication has no pages")]
    NoPages,

    #[error("duplicate page number {0} in publication")]
    DuplicatePage(u32),
}
