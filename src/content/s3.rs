//! S3-backed content store.

use super::{ContentBundle, ContentImage, ContentStore, SectionItem};
use crate::config::ContentSettings;
use crate::error::{PaddockError, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use tracing::{debug, instrument, warn};

/// Content store reading from the encyclopedia S3 bucket.
///
/// Credentials and region come from the environment (`AWS_ACCESS_KEY_ID`,
/// `AWS_SECRET_ACCESS_KEY`, `AWS_REGION`).
pub struct S3ContentStore {
    client: aws_sdk_s3::Client,
    settings: ContentSettings,
}

impl S3ContentStore {
    /// Create a store using credentials from the environment.
    pub async fn new(settings: ContentSettings) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self {
            client: aws_sdk_s3::Client::new(&config),
            settings,
        }
    }

    /// Create a store around an existing S3 client.
    pub fn with_client(client: aws_sdk_s3::Client, settings: ContentSettings) -> Self {
        Self { client, settings }
    }

    fn is_image_key(&self, key: &str) -> bool {
        let lower = key.to_lowercase();
        self.settings
            .image_extensions
            .iter()
            .any(|ext| lower.ends_with(&format!(".{}", ext)))
    }

    async fn get_bytes(&self, key: &str) -> Result<Vec<u8>> {
        let object = self
            .client
            .get_object()
            .bucket(&self.settings.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| PaddockError::Content(format!("get {}: {}", key, e)))?;

        let bytes = object
            .body
            .collect()
            .await
            .map_err(|e| PaddockError::Content(format!("read {}: {}", key, e)))?;

        Ok(bytes.to_vec())
    }

    async fn get_text(&self, key: &str) -> Result<String> {
        let bytes = self.get_bytes(key).await?;
        String::from_utf8(bytes)
            .map_err(|e| PaddockError::Content(format!("decode {}: {}", key, e)))
    }
}

#[async_trait]
impl ContentStore for S3ContentStore {
    #[instrument(skip(self))]
    async fn load_history(&self) -> Result<ContentBundle> {
        let text = self.get_text(&self.settings.history_key).await?;

        let listing = self
            .client
            .list_objects_v2()
            .bucket(&self.settings.bucket)
            .prefix(&self.settings.images_prefix)
            .send()
            .await
            .map_err(|e| {
                PaddockError::Content(format!("list {}: {}", self.settings.images_prefix, e))
            })?;

        let mut images = Vec::new();
        for object in listing.contents() {
            let Some(key) = object.key() else { continue };
            if !self.is_image_key(key) {
                continue;
            }
            let bytes = self.get_bytes(key).await?;
            images.push(ContentImage {
                key: key.to_string(),
                bytes,
            });
        }

        debug!("Loaded history text and {} images", images.len());
        Ok(ContentBundle { text, images })
    }

    #[instrument(skip(self))]
    async fn load_section(&self, section: &str) -> Result<Vec<SectionItem>> {
        let prefix = format!("{}/", section);
        let listing = self
            .client
            .list_objects_v2()
            .bucket(&self.settings.bucket)
            .prefix(&prefix)
            .delimiter("/")
            .send()
            .await
            .map_err(|e| PaddockError::Content(format!("list {}: {}", prefix, e)))?;

        let mut items = Vec::new();
        for common in listing.common_prefixes() {
            let Some(item_prefix) = common.prefix() else { continue };
            // "Drivers/Lewis_Hamilton/" -> "Lewis_Hamilton"
            let name = item_prefix
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or(item_prefix)
                .to_string();

            let content = match self.get_text(&format!("{}wiki_content.txt", item_prefix)).await {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("No content for {}: {}", name, e);
                    Some("No content available.".to_string())
                }
            };

            let image = match self.get_bytes(&format!("{}profile.jpg", item_prefix)).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!("No profile image for {}: {}", name, e);
                    None
                }
            };

            items.push(SectionItem {
                name,
                content,
                image,
            });
        }

        debug!("Loaded {} items from section {}", items.len(), section);
        Ok(items)
    }
}
