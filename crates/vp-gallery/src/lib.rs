use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;
use vp_api_types::GalleryItem;

pub const GENERATED_ITEM_TITLE: &str = "Your Generated Image";
pub const GALLERY_DOWNLOAD_FILE_NAME: &str = "vision-ai-gallery-image.jpg";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GalleryError {
    #[error("Please connect your wallet to like images")]
    WalletNotConnected,
    #[error("gallery item not found: {0}")]
    NotFound(String),
}

/// Builds the record pushed after a completed generation.
pub fn generated_item(image_url: &str, prompt: &str) -> GalleryItem {
    GalleryItem {
        id: Uuid::new_v4().to_string(),
        image_url: image_url.to_owned(),
        title: GENERATED_ITEM_TITLE.to_owned(),
        prompt: prompt.to_owned(),
        created_at: chrono::Utc::now().format("%Y-%m-%d").to_string(),
        likes: 0,
        liked: false,
    }
}

/// Owned list of generated images shared by the wizard and the gallery view.
#[derive(Default)]
pub struct GalleryStore {
    items: RwLock<Vec<GalleryItem>>,
}

impl GalleryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Vec<GalleryItem> {
        self.items.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<GalleryItem> {
        self.items.read().await.iter().find(|item| item.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    pub async fn append(&self, item: GalleryItem) {
        self.items.write().await.push(item);
    }

    pub async fn clear(&self) {
        self.items.write().await.clear();
    }

    /// Drops every prior item and keeps only `item`, under one write lock.
    pub async fn replace_with(&self, item: GalleryItem) {
        let mut guard = self.items.write().await;
        guard.clear();
        info!("gallery reset to single item {}", item.id);
        guard.push(item);
    }

    pub async fn like(&self, id: &str, wallet_connected: bool) -> Result<GalleryItem, GalleryError> {
        if !wallet_connected {
            return Err(GalleryError::WalletNotConnected);
        }

        let mut guard = self.items.write().await;
        let item = guard
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| GalleryError::NotFound(id.to_owned()))?;

        item.liked = !item.liked;
        item.likes = if item.liked {
            item.likes.saturating_add(1)
        } else {
            item.likes.saturating_sub(1)
        };

        Ok(item.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: &str = "https://example.invalid/icon.svg";

    #[tokio::test]
    async fn replace_with_keeps_only_latest() {
        let store = GalleryStore::new();
        let first = generated_item(IMAGE, "first prompt");
        let second = generated_item(IMAGE, "second prompt");

        store.replace_with(first).await;
        store.replace_with(second.clone()).await;

        let items = store.list().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0], second);
    }

    #[tokio::test]
    async fn append_and_clear() {
        let store = GalleryStore::new();
        store.append(generated_item(IMAGE, "a")).await;
        store.append(generated_item(IMAGE, "b")).await;
        assert_eq!(store.len().await, 2);

        store.clear().await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn like_toggles_and_counts() -> Result<(), GalleryError> {
        let store = GalleryStore::new();
        let item = generated_item(IMAGE, "prompt");
        let id = item.id.clone();
        store.append(item).await;

        let liked = store.like(&id, true).await?;
        assert!(liked.liked);
        assert_eq!(liked.likes, 1);

        let unliked = store.like(&id, true).await?;
        assert!(!unliked.liked);
        assert_eq!(unliked.likes, 0);
        assert_eq!(store.get(&id).await, Some(unliked));
        Ok(())
    }

    #[tokio::test]
    async fn like_never_goes_negative() -> Result<(), GalleryError> {
        let store = GalleryStore::new();
        let mut item = generated_item(IMAGE, "prompt");
        item.liked = true;
        item.likes = 0;
        let id = item.id.clone();
        store.append(item).await;

        let toggled = store.like(&id, true).await?;
        assert!(!toggled.liked);
        assert_eq!(toggled.likes, 0);
        Ok(())
    }

    #[tokio::test]
    async fn like_requires_wallet_and_known_id() {
        let store = GalleryStore::new();
        let item = generated_item(IMAGE, "prompt");
        let id = item.id.clone();
        store.append(item).await;

        assert_eq!(store.like(&id, false).await, Err(GalleryError::WalletNotConnected));
        assert_eq!(
            store.like("missing", true).await,
            Err(GalleryError::NotFound("missing".to_owned()))
        );
        let unchanged = store.get(&id).await;
        assert_eq!(unchanged.map(|item| item.likes), Some(0));
    }

    #[test]
    fn generated_item_defaults() {
        let item = generated_item(IMAGE, "a cat in space");
        assert_eq!(item.title, GENERATED_ITEM_TITLE);
        assert_eq!(item.prompt, "a cat in space");
        assert_eq!(item.likes, 0);
        assert!(!item.liked);
        assert_eq!(item.created_at.len(), 10);
        assert_ne!(item.id, generated_item(IMAGE, "a cat in space").id);
    }
}
