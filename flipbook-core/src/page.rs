use serde::{Deserialize, Serialize};

/// One pre-rendered page of a publication.
///
/// Pages are supplied once when the viewer is constructed and never mutated
/// afterwards. `width` and `height` are the intrinsic pixel dimensions of the
/// rendered image and serve as aspect-ratio hints only; the on-screen size is
/// computed by [`crate::layout::compute_render_dimensions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// 1-based position within the publication.
    pub page_number: u32,
    /// Full-resolution raster image, as a file path or http(s) URL.
    pub image_url: String,
    /// Smaller preview used by the thumbnail grid.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl Page {
    /// The image to show in the thumbnail grid, falling back to the full
    /// page image when no dedicated thumbnail exists.
    pub fn thumbnail(&self) -> &str {
        self.thumbnail_url.as_deref().unwrap_or(&self.image_url)
    }
}
