//! Photo library providers
//!
//! The sampler and the trash review only see a library through the
//! [`PhotoLibrary`] trait: a count, cursor-based page listing and bulk
//! deletion. There is no random access by offset.

pub mod directory;
pub mod memory;

pub use directory::DirectoryLibrary;
pub use memory::MemoryLibrary;

use crate::domain::{AssetPage, MediaType, PageRequest, PermissionStatus};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PhotoLibrary: Send + Sync {
    /// Number of assets matching `media_type`
    async fn count(&self, media_type: MediaType) -> Result<usize>;

    /// Fetches the page that starts right after `request.after`
    async fn list_page(&self, request: PageRequest) -> Result<AssetPage>;

    /// Permanently removes the given assets from the library
    async fn delete_by_ids(&self, ids: &[String]) -> Result<()>;
}

/// Grants or refuses access to the photo library
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Current status without prompting
    async fn status(&self) -> Result<PermissionStatus>;

    /// Prompts for access; only called when `status` is not already granted
    async fn request(&self) -> Result<PermissionStatus>;
}

/// Returns the existing grant, or prompts for one
pub async fn request_permissions(gate: &dyn PermissionGate) -> Result<PermissionStatus> {
    let existing = gate.status().await?;
    if existing == PermissionStatus::Granted {
        return Ok(existing);
    }
    gate.request().await
}
