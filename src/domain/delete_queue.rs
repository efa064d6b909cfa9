use super::QueueEntry;
use crate::error::Result;
use crate::storage::KeyValueStore;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Storage key of the persisted queue
pub const DELETE_QUEUE_KEY: &str = "picpurge.deleteQueue";

/// Durable, deduplicated list of photos marked for deletion.
///
/// Storage is the only source of truth: every call reads the whole queue
/// and every mutation writes it back. Mutations hold `write_lock` so two
/// callers in this process cannot interleave their read-modify-write cycles.
pub struct DeleteQueue {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl DeleteQueue {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Every entry, in insertion order
    pub async fn get_all(&self) -> Result<Vec<QueueEntry>> {
        self.read().await
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.read().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.read().await?.is_empty())
    }

    /// Appends `entry` unless an entry with the same id exists.
    /// Returns the queue as stored afterwards.
    pub async fn add(&self, entry: QueueEntry) -> Result<Vec<QueueEntry>> {
        let _guard = self.write_lock.lock().await;
        let mut queue = self.read().await?;
        if queue.iter().any(|e| e.id == entry.id) {
            return Ok(queue);
        }
        queue.push(entry);
        self.write(&queue).await?;
        Ok(queue)
    }

    /// Drops every entry whose id is in `ids`, after the photos were deleted
    pub async fn remove_many(&self, ids: &[String]) -> Result<Vec<QueueEntry>> {
        let _guard = self.write_lock.lock().await;
        self.remove_locked(ids).await
    }

    /// Takes entries out of the queue without deleting the photos
    pub async fn restore_many(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let _guard = self.write_lock.lock().await;
        self.remove_locked(ids).await?;
        Ok(())
    }

    pub async fn restore(&self, id: &str) -> Result<()> {
        self.restore_many(&[id.to_string()]).await
    }

    /// Replaces the whole queue
    pub async fn set_queue(&self, queue: Vec<QueueEntry>) -> Result<Vec<QueueEntry>> {
        let _guard = self.write_lock.lock().await;
        self.write(&queue).await?;
        Ok(queue)
    }

    async fn remove_locked(&self, ids: &[String]) -> Result<Vec<QueueEntry>> {
        let id_set: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut queue = self.read().await?;
        queue.retain(|e| !id_set.contains(e.id.as_str()));
        self.write(&queue).await?;
        Ok(queue)
    }

    async fn read(&self) -> Result<Vec<QueueEntry>> {
        let raw = self.store.get(DELETE_QUEUE_KEY).await?;
        Ok(raw.as_deref().map(parse_queue).unwrap_or_default())
    }

    async fn write(&self, queue: &[QueueEntry]) -> Result<()> {
        let raw = serde_json::to_string(queue)?;
        self.store.set(DELETE_QUEUE_KEY, raw).await
    }
}

/// Parses a stored queue leniently.
///
/// Anything that is not a JSON array reads as an empty queue. Array
/// elements without a non-empty string `id` and `uri` are dropped.
pub fn parse_queue(raw: &str) -> Vec<QueueEntry> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            if !raw.is_empty() {
                log::warn!("Discarding unparsable delete queue: {}", e);
            }
            return Vec::new();
        }
    };

    let items = match value {
        serde_json::Value::Array(items) => items,
        _ => {
            log::warn!("Discarding delete queue that is not a list");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<QueueEntry>(item).ok())
        .filter(|entry| !entry.id.is_empty() && !entry.uri.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    async fn queue_with(raw: Option<&str>) -> (Arc<MemoryStore>, DeleteQueue) {
        let store = Arc::new(MemoryStore::new());
        if let Some(raw) = raw {
            store.set(DELETE_QUEUE_KEY, raw.to_string()).await.unwrap();
        }
        let queue = DeleteQueue::new(store.clone());
        (store, queue)
    }

    fn ids(queue: &[QueueEntry]) -> Vec<&str> {
        queue.iter().map(|e| e.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_store_is_empty_queue() {
        let (_, queue) = queue_with(None).await;
        assert!(queue.get_all().await.unwrap().is_empty());
        assert!(queue.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_add_dedups_by_id() {
        let (_, queue) = queue_with(Some(r#"[{"id":"a","uri":"u1"}]"#)).await;

        let after = queue.add(QueueEntry::new("a", "u1")).await.unwrap();
        assert_eq!(after.len(), 1);

        let after = queue.add(QueueEntry::new("b", "u2")).await.unwrap();
        assert_eq!(ids(&after), vec!["a", "b"]);

        let after = queue.remove_many(&["a".to_string()]).await.unwrap();
        assert_eq!(ids(&after), vec!["b"]);
        assert_eq!(queue.get_all().await.unwrap(), after);
    }

    #[tokio::test]
    async fn test_duplicate_add_with_other_uri_keeps_first() {
        let (_, queue) = queue_with(None).await;
        queue.add(QueueEntry::new("a", "u1")).await.unwrap();
        let after = queue.add(QueueEntry::new("a", "u2")).await.unwrap();
        assert_eq!(after, vec![QueueEntry::new("a", "u1")]);
    }

    #[tokio::test]
    async fn test_remove_many_keeps_relative_order() {
        let (_, queue) = queue_with(None).await;
        for id in ["a", "b", "c", "d"] {
            queue.add(QueueEntry::new(id, format!("u-{}", id))).await.unwrap();
        }
        let after = queue
            .remove_many(&["b".to_string(), "zzz".to_string()])
            .await
            .unwrap();
        assert_eq!(ids(&after), vec!["a", "c", "d"]);
    }

    #[tokio::test]
    async fn test_restore_matches_remove() {
        let (_, removed) = queue_with(None).await;
        let (_, restored) = queue_with(None).await;
        for q in [&removed, &restored] {
            for id in ["a", "b", "c"] {
                q.add(QueueEntry::new(id, "u")).await.unwrap();
            }
        }
        let selection = vec!["a".to_string(), "c".to_string()];

        let after_remove = removed.remove_many(&selection).await.unwrap();
        restored.restore_many(&selection).await.unwrap();

        assert_eq!(restored.get_all().await.unwrap(), after_remove);
    }

    #[tokio::test]
    async fn test_restore_single() {
        let (_, queue) = queue_with(Some(r#"[{"id":"a","uri":"u1"},{"id":"b","uri":"u2"}]"#)).await;
        queue.restore("a").await.unwrap();
        assert_eq!(ids(&queue.get_all().await.unwrap()), vec!["b"]);
    }

    #[tokio::test]
    async fn test_restore_many_empty_does_not_write() {
        let (store, queue) = queue_with(Some("garbage")).await;
        queue.restore_many(&[]).await.unwrap();
        assert_eq!(
            store.get(DELETE_QUEUE_KEY).await.unwrap().as_deref(),
            Some("garbage")
        );
    }

    #[tokio::test]
    async fn test_corrupt_payloads_read_as_empty() {
        for raw in ["", "not json", "{\"id\":\"a\",\"uri\":\"u\"}", "42", "null"] {
            let (_, queue) = queue_with(Some(raw)).await;
            assert!(queue.get_all().await.unwrap().is_empty(), "payload {:?}", raw);

            let after = queue.add(QueueEntry::new("x", "ux")).await.unwrap();
            assert_eq!(ids(&after), vec!["x"]);
        }
    }

    #[tokio::test]
    async fn test_malformed_items_are_dropped() {
        let raw = r#"[{"id":"a","uri":"u1"},{"id":"","uri":"u2"},{"uri":"u3"},7,{"id":"b","uri":"u4","extra":true}]"#;
        let (_, queue) = queue_with(Some(raw)).await;
        assert_eq!(ids(&queue.get_all().await.unwrap()), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_set_queue_overwrites() {
        let (_, queue) = queue_with(Some(r#"[{"id":"a","uri":"u1"}]"#)).await;
        queue
            .set_queue(vec![QueueEntry::new("z", "uz")])
            .await
            .unwrap();
        assert_eq!(ids(&queue.get_all().await.unwrap()), vec!["z"]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let (_, queue) = queue_with(None).await;
        let queue = Arc::new(queue);

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let queue = Arc::clone(&queue);
                tokio::spawn(async move {
                    queue
                        .add(QueueEntry::new(format!("p{}", i), "u"))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(queue.len().await.unwrap(), 20);
    }
}
