use super::{AssetSampler, DeleteQueue, PermissionStatus, PhotoAsset};
use crate::error::Result;
use crate::library::{request_permissions, PermissionGate};
use std::sync::Arc;

/// Counters for the current run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwipeStatistics {
    pub shown: usize,
    pub skipped: usize,
    pub marked: usize,
}

/// State behind the swipe screen: the photo on display, library access and
/// the number of photos waiting in the trash.
pub struct SwipeSession {
    sampler: AssetSampler,
    queue: Arc<DeleteQueue>,
    permission: PermissionStatus,
    current: Option<PhotoAsset>,
    is_empty: bool,
    queue_count: usize,
    stats: SwipeStatistics,
    /// Marks made in this run, most recent last
    marked_stack: Vec<PhotoAsset>,
    /// Photos pushed off screen by an undo, shown again before new samples
    pending: Vec<PhotoAsset>,
}

impl SwipeSession {
    pub fn new(sampler: AssetSampler, queue: Arc<DeleteQueue>) -> Self {
        Self {
            sampler,
            queue,
            permission: PermissionStatus::Pending,
            current: None,
            is_empty: false,
            queue_count: 0,
            stats: SwipeStatistics::default(),
            marked_stack: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn permission(&self) -> PermissionStatus {
        self.permission
    }

    pub fn current(&self) -> Option<&PhotoAsset> {
        self.current.as_ref()
    }

    /// True once the library had nothing left to show
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    pub fn queue_count(&self) -> usize {
        self.queue_count
    }

    pub fn statistics(&self) -> &SwipeStatistics {
        &self.stats
    }

    pub fn can_undo(&self) -> bool {
        !self.marked_stack.is_empty()
    }

    /// Asks for library access, then primes the sampler and shows the first
    /// photo. Any outcome other than a grant resets the sampler.
    pub async fn request_permission(
        &mut self,
        gate: &dyn PermissionGate,
    ) -> Result<PermissionStatus> {
        self.permission = PermissionStatus::Pending;

        let status = match request_permissions(gate).await {
            Ok(status) => status,
            Err(e) => {
                log::error!("Permission request failed: {}", e);
                self.sampler.reset().await;
                self.pending.clear();
                self.permission = PermissionStatus::Denied;
                return Err(e);
            }
        };

        if status == PermissionStatus::Granted {
            self.permission = PermissionStatus::Granted;
            self.sampler.apply_permission(PermissionStatus::Granted).await?;
            self.load_next().await?;
        } else {
            self.sampler.apply_permission(PermissionStatus::Denied).await?;
            self.current = None;
            self.pending.clear();
            self.permission = PermissionStatus::Denied;
        }

        Ok(self.permission)
    }

    /// Replaces the current photo with the next sampled one
    pub async fn load_next(&mut self) -> Result<Option<&PhotoAsset>> {
        if let Some(asset) = self.pending.pop() {
            log::debug!("Showing {} again", asset.id);
            self.current = Some(asset);
            self.is_empty = false;
            return Ok(self.current.as_ref());
        }

        match self.sampler.next().await? {
            Some(asset) => {
                log::debug!("Showing {}", asset.id);
                self.stats.shown += 1;
                self.current = Some(asset);
                self.is_empty = false;
            }
            None => {
                log::info!("No more photos to show");
                self.current = None;
                self.is_empty = true;
            }
        }
        Ok(self.current.as_ref())
    }

    /// Keeps the current photo and moves on
    pub async fn swipe_left(&mut self) -> Result<()> {
        if self.current.is_some() {
            self.stats.skipped += 1;
        }
        self.load_next().await?;
        Ok(())
    }

    /// Marks the current photo for deletion and moves on
    pub async fn swipe_right(&mut self) -> Result<()> {
        let asset = match self.current.take() {
            Some(asset) => asset,
            None => return Ok(()),
        };

        let queue = match self.queue.add(asset.to_queue_entry()).await {
            Ok(queue) => queue,
            Err(e) => {
                self.current = Some(asset);
                return Err(e);
            }
        };
        self.queue_count = queue.len();
        self.stats.marked += 1;
        self.marked_stack.push(asset);

        self.load_next().await?;
        Ok(())
    }

    /// Takes the most recent mark back out of the trash and shows that photo again
    pub async fn undo_last_mark(&mut self) -> Result<bool> {
        let asset = match self.marked_stack.pop() {
            Some(asset) => asset,
            None => return Ok(false),
        };

        if let Err(e) = self.queue.restore(&asset.id).await {
            self.marked_stack.push(asset);
            return Err(e);
        }

        self.stats.marked = self.stats.marked.saturating_sub(1);
        if let Some(displaced) = self.current.replace(asset) {
            self.pending.push(displaced);
        }
        self.is_empty = false;
        self.refresh_queue_count().await?;
        Ok(true)
    }

    /// Re-reads the trash size, e.g. after returning from the trash view
    pub async fn refresh_queue_count(&mut self) -> Result<usize> {
        let queued = self.queue.get_all().await?;
        self.queue_count = queued.len();
        // Entries restored or deleted elsewhere can no longer be undone here
        self.marked_stack
            .retain(|asset| queued.iter().any(|entry| entry.id == asset.id));
        Ok(self.queue_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QueueEntry, SamplerOptions};
    use crate::library::MemoryLibrary;
    use crate::storage::MemoryStore;

    fn session_over(library: Arc<MemoryLibrary>) -> (SwipeSession, Arc<DeleteQueue>) {
        let sampler = AssetSampler::with_options(
            library,
            SamplerOptions {
                seed: Some(42),
                ..SamplerOptions::default()
            },
        );
        let queue = Arc::new(DeleteQueue::new(Arc::new(MemoryStore::new())));
        (SwipeSession::new(sampler, Arc::clone(&queue)), queue)
    }

    #[tokio::test]
    async fn test_granted_permission_shows_first_photo() {
        let library = Arc::new(MemoryLibrary::with_photos(10));
        let (mut session, _) = session_over(library.clone());

        let status = session.request_permission(library.as_ref()).await.unwrap();
        assert_eq!(status, PermissionStatus::Granted);
        assert!(session.current().is_some());
        assert!(!session.is_empty());
    }

    #[tokio::test]
    async fn test_denied_permission_shows_nothing() {
        let library = Arc::new(MemoryLibrary::with_photos(10));
        library.set_permission(PermissionStatus::Denied).await;
        let (mut session, _) = session_over(library.clone());

        let status = session.request_permission(library.as_ref()).await.unwrap();
        assert_eq!(status, PermissionStatus::Denied);
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_swipe_right_marks_and_advances() {
        let library = Arc::new(MemoryLibrary::with_photos(10));
        let (mut session, queue) = session_over(library.clone());
        session.request_permission(library.as_ref()).await.unwrap();

        let marked = session.current().cloned().unwrap();
        session.swipe_right().await.unwrap();

        assert_eq!(session.queue_count(), 1);
        assert_eq!(queue.get_all().await.unwrap(), vec![marked.to_queue_entry()]);
        assert_ne!(session.current(), Some(&marked));
        assert_eq!(session.statistics().marked, 1);
    }

    #[tokio::test]
    async fn test_swipe_left_skips_without_marking() {
        let library = Arc::new(MemoryLibrary::with_photos(10));
        let (mut session, queue) = session_over(library.clone());
        session.request_permission(library.as_ref()).await.unwrap();

        session.swipe_left().await.unwrap();

        assert!(queue.get_all().await.unwrap().is_empty());
        assert_eq!(session.statistics().skipped, 1);
        assert_eq!(session.statistics().shown, 2);
    }

    #[tokio::test]
    async fn test_empty_library_sets_empty_flag() {
        let library = Arc::new(MemoryLibrary::with_photos(0));
        let (mut session, _) = session_over(library.clone());
        session.request_permission(library.as_ref()).await.unwrap();

        assert!(session.is_empty());
        assert!(session.current().is_none());

        // Nothing to mark
        session.swipe_right().await.unwrap();
        assert_eq!(session.queue_count(), 0);
    }

    #[tokio::test]
    async fn test_undo_last_mark_restores() {
        let library = Arc::new(MemoryLibrary::with_photos(10));
        let (mut session, queue) = session_over(library.clone());
        session.request_permission(library.as_ref()).await.unwrap();

        let marked = session.current().cloned().unwrap();
        session.swipe_right().await.unwrap();
        assert!(session.can_undo());

        assert!(session.undo_last_mark().await.unwrap());
        assert!(queue.get_all().await.unwrap().is_empty());
        assert_eq!(session.current(), Some(&marked));
        assert_eq!(session.queue_count(), 0);
        assert!(!session.undo_last_mark().await.unwrap());
    }

    #[tokio::test]
    async fn test_undo_keeps_displaced_photo() {
        let library = Arc::new(MemoryLibrary::with_photos(2));
        let (mut session, _) = session_over(library.clone());
        session.request_permission(library.as_ref()).await.unwrap();

        let marked = session.current().cloned().unwrap();
        session.swipe_right().await.unwrap();
        let displaced = session.current().cloned().unwrap();
        assert_ne!(marked, displaced);

        assert!(session.undo_last_mark().await.unwrap());
        assert_eq!(session.current(), Some(&marked));

        session.swipe_left().await.unwrap();
        assert_eq!(session.current(), Some(&displaced));
        assert!(!session.is_empty());

        session.swipe_left().await.unwrap();
        assert!(session.current().is_none());
        assert!(session.is_empty());
        assert_eq!(session.statistics().shown, 2);
    }

    #[tokio::test]
    async fn test_refresh_queue_count_drops_stale_undo() {
        let library = Arc::new(MemoryLibrary::with_photos(10));
        let (mut session, queue) = session_over(library.clone());
        session.request_permission(library.as_ref()).await.unwrap();
        session.swipe_right().await.unwrap();

        queue.set_queue(vec![QueueEntry::new("other", "u")]).await.unwrap();
        assert_eq!(session.refresh_queue_count().await.unwrap(), 1);
        assert!(!session.can_undo());
    }
}
