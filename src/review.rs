//! Store-review prompt gating
//!
//! After a confirmed deletion the user may be asked to rate the app. The
//! prompt is shown at most until the user accepts once; that choice is
//! remembered in the key-value store.

use crate::error::Result;
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use std::sync::Arc;

pub const HAS_REVIEWED_KEY: &str = "picpurge.hasReviewed_new";

/// Where the review request is actually shown
#[async_trait]
pub trait ReviewPrompt: Send + Sync {
    /// Whether the platform can show a review request at all
    async fn is_available(&self) -> bool;

    /// Asks "Would you like to rate PicPurge?"; true for "Rate now"
    async fn ask(&self) -> bool;

    /// Opens the store review flow
    async fn request_review(&self) -> Result<()>;
}

/// Prompt answered through the terminal dialog; "Rate now" opens the store page
pub struct StorePagePrompt {
    store_url: String,
    accepted: bool,
}

impl StorePagePrompt {
    pub fn answered(store_url: impl Into<String>, accepted: bool) -> Self {
        Self {
            store_url: store_url.into(),
            accepted,
        }
    }
}

#[async_trait]
impl ReviewPrompt for StorePagePrompt {
    async fn is_available(&self) -> bool {
        !self.store_url.is_empty()
    }

    async fn ask(&self) -> bool {
        self.accepted
    }

    async fn request_review(&self) -> Result<()> {
        open::that(&self.store_url)?;
        Ok(())
    }
}

pub struct ReviewService {
    store: Arc<dyn KeyValueStore>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn has_reviewed(&self) -> Result<bool> {
        Ok(self.store.get(HAS_REVIEWED_KEY).await?.as_deref() == Some("true"))
    }

    pub async fn mark_reviewed(&self) -> Result<()> {
        self.store.set(HAS_REVIEWED_KEY, "true".to_string()).await
    }

    /// True when a prompt should be shown now
    pub async fn should_prompt(&self, available: bool) -> Result<bool> {
        if !available {
            return Ok(false);
        }
        Ok(!self.has_reviewed().await?)
    }

    /// Runs the whole prompt flow. Returns true if a review was requested.
    pub async fn maybe_request_review(&self, prompt: &dyn ReviewPrompt) -> Result<bool> {
        if !self.should_prompt(prompt.is_available().await).await? {
            return Ok(false);
        }

        if !prompt.ask().await {
            log::debug!("Review prompt postponed");
            return Ok(false);
        }

        prompt.request_review().await?;
        self.mark_reviewed().await?;
        Ok(true)
    }
}
