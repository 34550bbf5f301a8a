use std::collections::HashMap;

use anyhow::{Context, Result};
use iced::widget::image::Handle;

/// Fetch one page image and decode it into a GPU-ready handle.
///
/// Sources are either http(s) URLs or local file paths; both end up decoded
/// through the `image` crate so a corrupt file is caught here rather than in
/// the renderer.
pub async fn fetch(source: String) -> Result<Handle, String> {
    fetch_inner(&source).await.map_err(|e| format!("{e:#}"))
}

async fn fetch_inner(source: &str) -> Result<Handle> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        reqwest::get(source)
            .await
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("failed to fetch {source}"))?
            .bytes()
            .await
            .with_context(|| format!("failed to read image body of {source}"))?
            .to_vec()
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read {source}"))?
    };

    let decoded = image::load_from_memory(&bytes)
        .with_context(|| format!("failed to decode {source}"))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(Handle::from_rgba(width, height, decoded.into_raw()))
}

/// Bounded cache of decoded page images.
///
/// Full-resolution pages are large, so only a window of recently used pages
/// is kept; eviction spares the reader's current neighborhood since those
/// are the pages about to be shown.
pub struct PageCache {
    handles: HashMap<usize, Handle>,
}

impl PageCache {
    const MAX_ENTRIES: usize = 12;

    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Handle> {
        self.handles.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.handles.contains_key(&index)
    }

    pub fn insert(&mut self, index: usize, handle: Handle, current: usize) {
        self.handles.insert(index, handle);

        if self.handles.len() <= Self::MAX_ENTRIES {
            return;
        }
        // Simple eviction, not LRU: any page outside the visible
        // neighborhood is fair game.
        let keep = current.saturating_sub(1)..=current + 1;
        let excess = self.handles.len() - Self::MAX_ENTRIES;
        let evict: Vec<usize> = self
            .handles
            .keys()
            .copied()
            .filter(|index| !keep.contains(index))
            .take(excess)
            .collect();
        for index in evict {
            self.handles.remove(&index);
        }
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new()
    }
}
