use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use flipbook_core::{Page, ViewerSettings};

/// A published flipbook as handed to the viewer: display metadata, the
/// viewer settings, and the ordered page images.
///
/// `share_url` and `pdf_url` decide whether the share and download controls
/// get an action at all; without them the corresponding buttons are not
/// rendered, whatever the settings say.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationManifest {
    #[serde(default)]
    pub title: Option<String>,
    /// Public link of the publication, offered by the share control.
    #[serde(default)]
    pub share_url: Option<String>,
    /// Source document behind the download and print controls.
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub settings: ViewerSettings,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl PublicationManifest {
    /// Load a manifest from a JSON file.
    pub async fn load(path: PathBuf) -> Result<Self, String> {
        Self::read(&path).await.map_err(|e| format!("{e:#}"))
    }

    async fn read(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let manifest = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse manifest {}", path.display()))?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_manifest(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn loads_manifest_with_partial_settings() {
        let file = write_manifest(
            r#"{
                "title": "Product Catalog 2026",
                "pdfUrl": "https://cdn.example.com/catalog.pdf",
                "settings": {"showDownloadButton": true, "flipDuration": 350},
                "pages": [
                    {"pageNumber": 1, "imageUrl": "pages/1.png", "width": 1240, "height": 1754},
                    {"pageNumber": 2, "imageUrl": "pages/2.png", "thumbnailUrl": "thumbs/2.png", "width": 1240, "height": 1754}
                ]
            }"#,
        );

        let manifest = PublicationManifest::load(file.path().to_path_buf())
            .await
            .unwrap();
        assert_eq!(manifest.title.as_deref(), Some("Product Catalog 2026"));
        assert!(manifest.share_url.is_none());
        assert!(manifest.settings.show_download_button);
        assert_eq!(manifest.settings.flip_duration_ms, 350);
        // Untouched settings keep their defaults.
        assert!(manifest.settings.show_page_numbers);
        assert_eq!(manifest.pages.len(), 2);
        assert_eq!(manifest.pages[1].thumbnail(), "thumbs/2.png");
    }

    #[tokio::test]
    async fn empty_pages_deserialize_to_an_empty_list() {
        let file = write_manifest(r#"{"title": "Empty"}"#);
        let manifest = PublicationManifest::load(file.path().to_path_buf())
            .await
            .unwrap();
        assert!(manifest.pages.is_empty());
    }

    #[tokio::test]
    async fn malformed_manifest_reports_the_path() {
        let file = write_manifest("{not json");
        let err = PublicationManifest::load(file.path().to_path_buf())
            .await
            .unwrap_err();
        assert!(err.contains("failed to parse manifest"), "{err}");
    }

    #[tokio::test]
    async fn missing_file_reports_the_path() {
        let err = PublicationManifest::load(PathBuf::from("/nonexistent/manifest.json"))
            .await
            .unwrap_err();
        assert!(err.contains("failed to read manifest"), "{err}");
    }
}
