use super::{DeleteQueue, QueueEntry};
use crate::error::Result;
use crate::library::PhotoLibrary;
use std::collections::HashSet;
use std::sync::Arc;

/// State behind the trash view: the queued photos, a selection and a cursor
pub struct TrashReview {
    library: Arc<dyn PhotoLibrary>,
    queue: Arc<DeleteQueue>,
    entries: Vec<QueueEntry>,
    selected: HashSet<String>,
    cursor: usize,
}

impl TrashReview {
    pub fn new(library: Arc<dyn PhotoLibrary>, queue: Arc<DeleteQueue>) -> Self {
        Self {
            library,
            queue,
            entries: Vec::new(),
            selected: HashSet::new(),
            cursor: 0,
        }
    }

    /// Reloads the queue and clears the selection
    pub async fn refresh(&mut self) -> Result<()> {
        self.entries = self.queue.get_all().await?;
        self.selected.clear();
        self.clamp_cursor();
        Ok(())
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&QueueEntry> {
        self.entries.get(self.cursor)
    }

    pub fn next(&mut self) {
        if self.cursor < self.entries.len().saturating_sub(1) {
            self.cursor += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn toggle_current(&mut self) {
        if let Some(id) = self.current().map(|e| e.id.clone()) {
            self.toggle(&id);
        }
    }

    /// True when there is something in the trash and all of it is selected
    pub fn all_selected(&self) -> bool {
        !self.entries.is_empty() && self.selected.len() == self.entries.len()
    }

    pub fn toggle_select_all(&mut self) {
        if self.all_selected() {
            self.selected.clear();
        } else {
            self.selected = self.entries.iter().map(|e| e.id.clone()).collect();
        }
    }

    /// Selected ids in queue order
    pub fn selected_ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| self.selected.contains(&e.id))
            .map(|e| e.id.clone())
            .collect()
    }

    /// Deletes the selected photos from the library, then drops them from the
    /// queue. If the library refuses, the queue is left as it was.
    ///
    /// Returns how many photos were deleted.
    pub async fn confirm_delete(&mut self) -> Result<usize> {
        let ids = self.selected_ids();
        if ids.is_empty() {
            return Ok(0);
        }

        self.library.delete_by_ids(&ids).await?;
        self.entries = self.queue.remove_many(&ids).await?;
        self.selected.clear();
        self.clamp_cursor();

        log::info!("Deleted {} photos", ids.len());
        Ok(ids.len())
    }

    /// Takes the selected photos out of the trash without deleting them
    pub async fn restore_selected(&mut self) -> Result<usize> {
        let ids = self.selected_ids();
        if ids.is_empty() {
            return Ok(0);
        }

        self.queue.restore_many(&ids).await?;
        self.entries.retain(|e| !self.selected.contains(&e.id));
        self.selected.clear();
        self.clamp_cursor();

        log::info!("Restored {} photos", ids.len());
        Ok(ids.len())
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
    }
}
