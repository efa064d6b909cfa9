// Core types shared by the sampler, the delete queue and the photo providers

pub mod delete_queue;
pub mod sampler;
pub mod swipe_session;
pub mod trash_review;

pub use delete_queue::{DeleteQueue, DELETE_QUEUE_KEY};
pub use sampler::{pick_at_index, AssetSampler, SamplerOptions, DEFAULT_QUEUE_SIZE, PAGE_SIZE};
pub use swipe_session::{SwipeSession, SwipeStatistics};
pub use trash_review::TrashReview;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single photo in the external library.
///
/// Two assets are equal when their ids match; the other fields are
/// descriptive and may differ between listings of the same photo.
#[derive(Debug, Clone)]
pub struct PhotoAsset {
    pub id: String,
    pub uri: String,
    pub filename: String,
    pub creation_time: DateTime<Utc>,
}

impl PhotoAsset {
    pub fn new(id: impl Into<String>, uri: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            filename: id.clone(),
            id,
            uri: uri.into(),
            creation_time: Utc::now(),
        }
    }

    /// The queue record that marks this asset for deletion
    pub fn to_queue_entry(&self) -> QueueEntry {
        QueueEntry {
            id: self.id.clone(),
            uri: self.uri.clone(),
        }
    }
}

impl PartialEq for PhotoAsset {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PhotoAsset {}

/// One photo marked for deletion. Persisted as `{"id": ..., "uri": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: String,
    pub uri: String,
}

impl QueueEntry {
    pub fn new(id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uri: uri.into(),
        }
    }
}

/// Media filter for library queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MediaType {
    #[default]
    Photo,
    Video,
    All,
}

/// Sort order for library listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Whatever order the provider returns natively
    #[default]
    Default,
    /// Oldest first, stable across repeated calls
    CreationTime,
}

/// Cursor-based page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of assets to return
    pub first: usize,
    /// Cursor returned as `end_cursor` by the previous page
    pub after: Option<String>,
    pub media_type: MediaType,
    pub sort_by: SortBy,
}

impl PageRequest {
    pub fn photos(first: usize) -> Self {
        Self {
            first,
            after: None,
            media_type: MediaType::Photo,
            sort_by: SortBy::Default,
        }
    }

    pub fn after(mut self, cursor: Option<String>) -> Self {
        self.after = cursor;
        self
    }

    pub fn sorted_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }
}

/// One page of a library listing
#[derive(Debug, Clone, Default)]
pub struct AssetPage {
    pub assets: Vec<PhotoAsset>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    /// Total number of assets matching the request's media filter
    pub total_count: usize,
}

/// Library access state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PermissionStatus {
    #[default]
    Pending,
    Granted,
    Denied,
}
