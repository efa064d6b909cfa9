// Background photo decoding with a small LRU cache

use crate::domain::PhotoAsset;
use crate::preview::{generate_photo_preview, PreviewContent};
use std::collections::HashMap;
use tokio::sync::oneshot;

/// Maximum number of cached previews
const CACHE_SIZE: usize = 10;

/// Represents a preview loading state
#[derive(Debug, Clone)]
pub enum PreviewState {
    /// Nothing requested yet, or still decoding
    Loading,
    /// Preview is ready with content
    Ready(PreviewContent),
    /// Preview failed with error
    Error(String),
}

/// LRU-like cache for previews, keyed by asset id
#[derive(Debug)]
struct PreviewCache {
    cache: HashMap<String, PreviewContent>,
    /// Most recent at end
    access_order: Vec<String>,
    max_size: usize,
}

impl PreviewCache {
    fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::new(),
            access_order: Vec::new(),
            max_size,
        }
    }

    fn get(&mut self, id: &str) -> Option<PreviewContent> {
        let preview = self.cache.get(id)?.clone();
        self.access_order.retain(|k| k != id);
        self.access_order.push(id.to_string());
        Some(preview)
    }

    fn insert(&mut self, id: String, preview: PreviewContent) {
        if self.cache.contains_key(&id) {
            self.access_order.retain(|k| k != &id);
        } else if self.cache.len() >= self.max_size && !self.access_order.is_empty() {
            let oldest = self.access_order.remove(0);
            self.cache.remove(&oldest);
        }

        self.cache.insert(id.clone(), preview);
        self.access_order.push(id);
    }

    fn contains(&self, id: &str) -> bool {
        self.cache.contains_key(id)
    }

    fn len(&self) -> usize {
        self.cache.len()
    }

    fn clear(&mut self) {
        self.cache.clear();
        self.access_order.clear();
    }
}

/// Tracks the preview of the photo on screen.
///
/// Decoding runs on the blocking pool; the render loop polls for the result
/// so a slow photo never stalls key handling. Requesting a different photo
/// drops the pending result of the previous one.
pub struct PreviewManager {
    cache: PreviewCache,
    current_id: Option<String>,
    current_state: PreviewState,
    receiver: Option<oneshot::Receiver<PreviewState>>,
}

impl PreviewManager {
    pub fn new() -> Self {
        Self {
            cache: PreviewCache::new(CACHE_SIZE),
            current_id: None,
            current_state: PreviewState::Loading,
            receiver: None,
        }
    }

    /// Starts loading `asset` if it is not the one already shown, then
    /// returns the current state without blocking. Must run inside a tokio
    /// runtime.
    pub fn request_preview(&mut self, asset: &PhotoAsset) -> &PreviewState {
        if self.current_id.as_deref() != Some(asset.id.as_str()) {
            self.current_id = Some(asset.id.clone());
            self.receiver = None;

            if let Some(cached) = self.cache.get(&asset.id) {
                self.current_state = PreviewState::Ready(cached);
                return &self.current_state;
            }

            self.current_state = PreviewState::Loading;
            let (tx, rx) = oneshot::channel();
            let asset = asset.clone();
            tokio::task::spawn_blocking(move || {
                let state = match generate_photo_preview(&asset) {
                    Ok(content) => PreviewState::Ready(content),
                    Err(e) => PreviewState::Error(e.to_string()),
                };
                // Receiver is gone when the user already moved on
                let _ = tx.send(state);
            });
            self.receiver = Some(rx);
        }

        self.poll();
        &self.current_state
    }

    /// Picks up a finished decode. Returns true when the state changed.
    pub fn poll(&mut self) -> bool {
        let rx = match self.receiver.as_mut() {
            Some(rx) => rx,
            None => return false,
        };

        match rx.try_recv() {
            Ok(state) => {
                self.finish(state);
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => false,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.receiver = None;
                self.current_state = PreviewState::Error("Preview task stopped".to_string());
                true
            }
        }
    }

    /// Waits for the pending decode, if any
    pub async fn settle(&mut self) -> &PreviewState {
        if let Some(rx) = self.receiver.take() {
            let state = rx
                .await
                .unwrap_or_else(|_| PreviewState::Error("Preview task stopped".to_string()));
            self.finish(state);
        }
        &self.current_state
    }

    fn finish(&mut self, state: PreviewState) {
        self.receiver = None;
        if let (PreviewState::Ready(content), Some(id)) = (&state, &self.current_id) {
            self.cache.insert(id.clone(), content.clone());
        }
        self.current_state = state;
    }

    pub fn current_state(&self) -> &PreviewState {
        &self.current_state
    }

    pub fn is_cached(&self, id: &str) -> bool {
        self.cache.contains(id)
    }

    /// Forgets the current photo, e.g. after it was deleted
    pub fn reset(&mut self) {
        self.current_id = None;
        self.current_state = PreviewState::Loading;
        self.receiver = None;
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl Default for PreviewManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::directory::asset_from_path;
    use tempfile::TempDir;

    fn text(s: &str) -> PreviewContent {
        PreviewContent::Text(vec![s.to_string()])
    }

    fn write_photo(dir: &TempDir, name: &str) -> PhotoAsset {
        let path = dir.path().join(name);
        image::RgbImage::from_fn(20, 20, |_, _| image::Rgb([10, 200, 30]))
            .save(&path)
            .unwrap();
        asset_from_path(&path).unwrap()
    }

    mod cache_tests {
        use super::*;

        #[test]
        fn test_cache_insert_and_get() {
            let mut cache = PreviewCache::new(5);
            cache.insert("a".to_string(), text("line1"));

            assert_eq!(cache.len(), 1);
            assert!(cache.contains("a"));
            match cache.get("a").unwrap() {
                PreviewContent::Text(lines) => assert_eq!(lines, vec!["line1".to_string()]),
                _ => panic!("Expected Text content"),
            }
        }

        #[test]
        fn test_cache_lru_eviction() {
            let mut cache = PreviewCache::new(3);
            for i in 0..3 {
                cache.insert(format!("photo-{}", i), text("x"));
            }

            // photo-0 becomes most recently used, so photo-1 is evicted
            let _ = cache.get("photo-0");
            cache.insert("photo-3".to_string(), text("x"));

            assert_eq!(cache.len(), 3);
            assert!(cache.contains("photo-0"));
            assert!(!cache.contains("photo-1"));
            assert!(cache.contains("photo-3"));
        }

        #[test]
        fn test_cache_update_existing() {
            let mut cache = PreviewCache::new(2);
            cache.insert("a".to_string(), text("old"));
            cache.insert("a".to_string(), text("new"));

            assert_eq!(cache.len(), 1);
            match cache.get("a").unwrap() {
                PreviewContent::Text(lines) => assert_eq!(lines, vec!["new".to_string()]),
                _ => panic!("Expected Text content"),
            }

            cache.clear();
            assert_eq!(cache.len(), 0);
        }
    }

    mod manager_tests {
        use super::*;

        #[tokio::test]
        async fn test_manager_loads_and_caches() {
            let temp_dir = TempDir::new().unwrap();
            let asset = write_photo(&temp_dir, "a.png");

            let mut manager = PreviewManager::new();
            manager.request_preview(&asset);
            assert!(matches!(manager.settle().await, PreviewState::Ready(_)));
            assert!(manager.is_cached(&asset.id));

            manager.reset();
            assert!(matches!(
                manager.request_preview(&asset),
                PreviewState::Ready(_)
            ));
        }

        #[tokio::test]
        async fn test_manager_reports_decode_errors() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("broken.jpg");
            std::fs::write(&path, b"nope").unwrap();
            let asset = asset_from_path(&path).unwrap();

            let mut manager = PreviewManager::new();
            manager.request_preview(&asset);
            assert!(matches!(manager.settle().await, PreviewState::Error(_)));
            assert_eq!(manager.cache_size(), 0);
        }

        #[tokio::test]
        async fn test_manager_switches_photos() {
            let temp_dir = TempDir::new().unwrap();
            let first = write_photo(&temp_dir, "first.png");
            let second = write_photo(&temp_dir, "second.png");

            let mut manager = PreviewManager::new();
            manager.request_preview(&first);
            manager.request_preview(&second);
            manager.settle().await;

            assert!(manager.is_cached(&second.id));
            // The first decode was abandoned
            assert!(!manager.is_cached(&first.id));
        }

        #[tokio::test]
        async fn test_poll_without_request_is_noop() {
            let mut manager = PreviewManager::new();
            assert!(!manager.poll());
            assert!(matches!(manager.current_state(), PreviewState::Loading));
        }
    }
}
