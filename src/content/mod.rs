//! Object-store content loading for the encyclopedia pages.
//!
//! Provides a trait-based interface over the content bucket plus a
//! process-lifetime memoizing cache.

mod cache;
mod s3;

pub use cache::ContentCache;
pub use s3::S3ContentStore;

use crate::error::Result;
use async_trait::async_trait;

/// An image object loaded from the content bucket.
#[derive(Debug, Clone)]
pub struct ContentImage {
    /// Object key within the bucket.
    pub key: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl ContentImage {
    /// File name portion of the key, for captions.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

/// The history page content: one text body and its ordered images.
///
/// Immutable once loaded; cached for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct ContentBundle {
    /// Decoded history text.
    pub text: String,
    /// Images in listing order.
    pub images: Vec<ContentImage>,
}

/// A browsable item within a section (a driver or a track).
#[derive(Debug, Clone)]
pub struct SectionItem {
    /// Item name, derived from its prefix.
    pub name: String,
    /// Wiki content, if present.
    pub content: Option<String>,
    /// Profile image bytes, if present.
    pub image: Option<Vec<u8>>,
}

/// Trait for content store implementations.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Load the history text and its images.
    async fn load_history(&self) -> Result<ContentBundle>;

    /// Load all items for a section (e.g. "Drivers", "Tracks").
    async fn load_section(&self, section: &str) -> Result<Vec<SectionItem>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_file_name() {
        let image = ContentImage {
            key: "History/images/monza_1950.jpg".to_string(),
            bytes: Vec::new(),
        };
        assert_eq!(image.file_name(), "monza_1950.jpg");

        let flat = ContentImage {
            key: "monza.jpg".to_string(),
            bytes: Vec::new(),
        };
        assert_eq!(flat.file_name(), "monza.jpg");
    }
}
