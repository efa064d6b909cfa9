//! In-memory photo library with cursor pagination

use super::{PermissionGate, PhotoLibrary};
use crate::domain::{AssetPage, MediaType, PageRequest, PermissionStatus, PhotoAsset, SortBy};
use crate::error::{PicPurgeError, Result};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Library backed by a `Vec`, in insertion order.
///
/// Cursors are stringified offsets into the sorted listing. Useful for
/// demos and for exercising the sampler without a real photo store.
#[derive(Debug, Default)]
pub struct MemoryLibrary {
    assets: Mutex<Vec<PhotoAsset>>,
    /// Overrides the count reported by `count`/`total_count`
    reported_count: Mutex<Option<usize>>,
    fail_listing: AtomicBool,
    page_requests: AtomicUsize,
    permission: Mutex<PermissionStatus>,
}

impl MemoryLibrary {
    pub fn new(assets: Vec<PhotoAsset>) -> Self {
        Self {
            assets: Mutex::new(assets),
            permission: Mutex::new(PermissionStatus::Granted),
            ..Self::default()
        }
    }

    /// Library of `count` photos named `photo-<n>` with increasing creation times
    pub fn with_photos(count: usize) -> Self {
        let base = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let assets = (0..count)
            .map(|i| PhotoAsset {
                id: format!("photo-{}", i),
                uri: format!("memory://photo-{}.jpg", i),
                filename: format!("photo-{}.jpg", i),
                creation_time: base + Duration::minutes(i as i64),
            })
            .collect();
        Self::new(assets)
    }

    /// Makes `count` report `count` regardless of the real contents
    pub async fn set_reported_count(&self, count: Option<usize>) {
        *self.reported_count.lock().await = count;
    }

    /// Makes every subsequent `list_page` call fail
    pub fn set_fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    pub async fn set_permission(&self, status: PermissionStatus) {
        *self.permission.lock().await = status;
    }

    /// Number of `list_page` calls served so far
    pub fn page_requests(&self) -> usize {
        self.page_requests.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.assets.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.assets.lock().await.is_empty()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.assets.lock().await.iter().any(|a| a.id == id)
    }

    async fn sorted(&self, sort_by: SortBy) -> Vec<PhotoAsset> {
        let mut assets = self.assets.lock().await.clone();
        if sort_by == SortBy::CreationTime {
            assets.sort_by(|a, b| a.creation_time.cmp(&b.creation_time));
        }
        assets
    }

    async fn check_access(&self) -> Result<()> {
        if *self.permission.lock().await == PermissionStatus::Denied {
            return Err(PicPurgeError::Permission(
                "photo library access denied".to_string(),
            ));
        }
        Ok(())
    }

    async fn total(&self, media_type: MediaType) -> usize {
        if media_type == MediaType::Video {
            return 0;
        }
        match *self.reported_count.lock().await {
            Some(count) => count,
            None => self.assets.lock().await.len(),
        }
    }
}

#[async_trait]
impl PhotoLibrary for MemoryLibrary {
    async fn count(&self, media_type: MediaType) -> Result<usize> {
        Ok(self.total(media_type).await)
    }

    async fn list_page(&self, request: PageRequest) -> Result<AssetPage> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(PicPurgeError::Library("listing unavailable".to_string()));
        }
        self.check_access().await?;

        let total_count = self.total(request.media_type).await;
        if request.media_type == MediaType::Video {
            return Ok(AssetPage::default());
        }

        let assets = self.sorted(request.sort_by).await;
        let start = match request.after.as_deref() {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| PicPurgeError::Library(format!("invalid cursor: {}", cursor)))?,
            None => 0,
        };
        let start = start.min(assets.len());
        let end = (start + request.first).min(assets.len());

        Ok(AssetPage {
            assets: assets[start..end].to_vec(),
            end_cursor: Some(end.to_string()),
            has_next_page: end < assets.len(),
            total_count,
        })
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<()> {
        self.check_access().await?;
        let mut assets = self.assets.lock().await;
        assets.retain(|a| !ids.contains(&a.id));
        Ok(())
    }
}

#[async_trait]
impl PermissionGate for MemoryLibrary {
    async fn status(&self) -> Result<PermissionStatus> {
        Ok(*self.permission.lock().await)
    }

    async fn request(&self) -> Result<PermissionStatus> {
        Ok(*self.permission.lock().await)
    }
}
