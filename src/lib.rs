//! PicPurge - swipe through a photo library and clear out what you don't want
//!
//! The core is a random [`AssetSampler`] that walks a cursor-paginated
//! library without loading it into memory, and a persistent
//! [`DeleteQueue`] of photos marked for deletion. The terminal app in
//! `main.rs` drives both through [`app::App`].

pub mod app;
pub mod async_preview;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod library;
pub mod logging;
pub mod preview;
pub mod review;
pub mod storage;
pub mod tui;
pub mod update;

// Re-export primary types for convenience
pub use config::UserConfig;
pub use domain::{
    AssetPage, AssetSampler, DeleteQueue, MediaType, PageRequest, PermissionStatus, PhotoAsset,
    QueueEntry, SamplerOptions, SortBy, SwipeSession, TrashReview,
};
pub use error::{PicPurgeError, Result};
pub use library::{DirectoryLibrary, MemoryLibrary, PermissionGate, PhotoLibrary};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
