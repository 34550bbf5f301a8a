use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-publication viewer configuration.
///
/// Every field is optional in the serialized form; missing fields take the
/// defaults below. Unknown fields are ignored, so a full publication
/// settings record (which also carries protection and SEO options this
/// component does not interpret) deserializes cleanly.
///
/// | field                        | default     |
/// |------------------------------|-------------|
/// | `showDownloadButton`         | `false`     |
/// | `showPrintButton`            | `false`     |
/// | `showShareButton`            | `true`      |
/// | `showFullscreenButton`       | `true`      |
/// | `showPageNumbers`            | `true`      |
/// | `showThumbnails`             | `true`      |
/// | `enableKeyboardNavigation`   | `true`      |
/// | `enableSwipeNavigation`      | `true`      |
/// | `backgroundColor`            | `"#f5f5f5"` |
/// | `flipDuration` (ms)          | `500`       |
///
/// Settings are read-only inputs; the viewer never writes them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerSettings {
    pub show_download_button: bool,
    pub show_print_button: bool,
    pub show_share_button: bool,
    pub show_fullscreen_button: bool,
    pub show_page_numbers: bool,
    pub show_thumbnails: bool,
    pub enable_keyboard_navigation: bool,
    pub enable_swipe_navigation: bool,
    pub background_color: String,
    #[serde(rename = "flipDuration")]
    pub flip_duration_ms: u64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            show_download_button: false,
            show_print_button: false,
            show_share_button: true,
            show_fullscreen_button: true,
            show_page_numbers: true,
            show_thumbnails: true,
            enable_keyboard_navigation: true,
            enable_swipe_navigation: true,
            background_color: "#f5f5f5".to_string(),
            flip_duration_ms: 500,
        }
    }
}

impl ViewerSettings {
    /// Duration of one page-turn animation.
    pub fn flip_duration(&self) -> Duration {
        Duration::from_millis(self.flip_duration_ms)
    }
}
