//! Random photo sampling over a cursor-paginated library.
//!
//! The library only supports "give me the page after this cursor", so a
//! random draw picks an index in `[0, count)` and walks pages from the start
//! of the creation-time order until it reaches that index. Each draw re-walks
//! from the beginning: O(count / page_size) page fetches per photo. A small
//! lookahead buffer hides that latency from the caller of [`AssetSampler::next`].

use super::{MediaType, PageRequest, PermissionStatus, PhotoAsset, SortBy};
use crate::error::{PicPurgeError, Result};
use crate::library::PhotoLibrary;
use futures::future::{BoxFuture, FutureExt, Shared};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Lookahead buffer size
pub const DEFAULT_QUEUE_SIZE: usize = 5;

/// Assets requested per page during a walk
pub const PAGE_SIZE: usize = 50;

/// Random draws that may land on an already-seen photo before falling back
/// to a linear scan for the first unseen one
const MAX_DRAW_ATTEMPTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerOptions {
    pub target_size: usize,
    pub page_size: usize,
    /// Fixed seed for reproducible index selection
    pub seed: Option<u64>,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_QUEUE_SIZE,
            page_size: PAGE_SIZE,
            seed: None,
        }
    }
}

/// Returns the asset at `target_index` of the creation-time order.
///
/// Walks pages of `page_size` from the start. An empty page yields `None`.
/// If the listing ends before the index is reached (the library shrank after
/// it was counted), the last asset of the final page is returned instead.
pub async fn pick_at_index(
    library: &dyn PhotoLibrary,
    target_index: usize,
    page_size: usize,
) -> Result<Option<PhotoAsset>> {
    let mut remaining = target_index;
    let mut after: Option<String> = None;

    loop {
        let request = PageRequest::photos(page_size.max(1))
            .after(after.take())
            .sorted_by(SortBy::CreationTime);
        let page = library.list_page(request).await?;

        if page.assets.is_empty() {
            return Ok(None);
        }

        let len = page.assets.len();
        if remaining < len {
            return Ok(page.assets.into_iter().nth(remaining));
        }
        remaining -= len;

        match page.end_cursor {
            Some(cursor) if page.has_next_page => after = Some(cursor),
            _ => return Ok(page.assets.into_iter().last()),
        }
    }
}

type FillFuture = Shared<BoxFuture<'static, std::result::Result<(), Arc<PicPurgeError>>>>;

#[derive(Default)]
struct SamplerState {
    buffer: VecDeque<PhotoAsset>,
    /// Ids handed out or buffered since the last reset
    seen: HashSet<String>,
    in_flight: Option<FillFuture>,
    /// Bumped by `reset`; fills started under an older value drop their results
    generation: u64,
}

struct SamplerInner {
    library: Arc<dyn PhotoLibrary>,
    options: SamplerOptions,
    rng: std::sync::Mutex<StdRng>,
    state: Mutex<SamplerState>,
}

/// Hands out random, not-yet-seen photos one at a time.
///
/// Cloning is cheap; clones share the buffer and the in-flight refill.
#[derive(Clone)]
pub struct AssetSampler {
    inner: Arc<SamplerInner>,
}

impl AssetSampler {
    pub fn new(library: Arc<dyn PhotoLibrary>) -> Self {
        Self::with_options(library, SamplerOptions::default())
    }

    pub fn with_options(library: Arc<dyn PhotoLibrary>, options: SamplerOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            inner: Arc::new(SamplerInner {
                library,
                options,
                rng: std::sync::Mutex::new(rng),
                state: Mutex::new(SamplerState::default()),
            }),
        }
    }

    pub fn options(&self) -> &SamplerOptions {
        &self.inner.options
    }

    /// Next photo to show, or `None` once the library is exhausted.
    ///
    /// Starts a background refill so the following call finds the buffer
    /// full. A refill failure is only returned when nothing is buffered.
    pub async fn next(&self) -> Result<Option<PhotoAsset>> {
        let filled = self.fill(self.inner.options.target_size).await;

        let next = self.inner.state.lock().await.buffer.pop_front();
        match (filled, &next) {
            (Err(e), None) => return Err(e),
            (Err(e), Some(_)) => log::warn!("Refill failed, serving buffered photo: {}", e),
            (Ok(()), _) => {}
        }

        self.spawn_refill();
        Ok(next)
    }

    /// Waits until `target_size` photos are buffered or the library runs out
    pub async fn prime(&self, target_size: usize) -> Result<()> {
        self.fill(target_size).await
    }

    /// Empties the buffer and forgets seen photos. An in-flight refill keeps
    /// running but its results are discarded.
    pub async fn reset(&self) {
        let mut state = self.inner.state.lock().await;
        state.buffer.clear();
        state.seen.clear();
        state.in_flight = None;
        state.generation = state.generation.wrapping_add(1);
        log::debug!("Sampler reset (generation {})", state.generation);
    }

    /// Reacts to a change of library access
    pub async fn apply_permission(&self, status: PermissionStatus) -> Result<()> {
        match status {
            PermissionStatus::Denied => {
                self.reset().await;
                Ok(())
            }
            PermissionStatus::Granted => self.prime(self.inner.options.target_size).await,
            PermissionStatus::Pending => Ok(()),
        }
    }

    /// Number of photos waiting in the buffer
    pub async fn buffered(&self) -> usize {
        self.inner.state.lock().await.buffer.len()
    }

    fn spawn_refill(&self) {
        let sampler = self.clone();
        tokio::spawn(async move {
            if let Err(e) = sampler.fill(sampler.inner.options.target_size).await {
                log::warn!("Background refill failed: {}", e);
            }
        });
    }

    /// Joins the in-flight refill, or starts one toward `target_size`
    async fn fill(&self, target_size: usize) -> Result<()> {
        let fill = {
            let mut state = self.inner.state.lock().await;
            if let Some(existing) = state.in_flight.clone() {
                existing
            } else {
                let fill = Self::run_fill(Arc::clone(&self.inner), target_size, state.generation)
                    .boxed()
                    .shared();
                state.in_flight = Some(fill.clone());
                fill
            }
        };
        fill.await.map_err(PicPurgeError::Sampling)
    }

    async fn run_fill(
        inner: Arc<SamplerInner>,
        target_size: usize,
        generation: u64,
    ) -> std::result::Result<(), Arc<PicPurgeError>> {
        let result = inner.fill_until(target_size, generation).await;

        let mut state = inner.state.lock().await;
        if state.generation == generation {
            state.in_flight = None;
        }
        result.map_err(Arc::new)
    }
}

impl SamplerInner {
    async fn fill_until(&self, target_size: usize, generation: u64) -> Result<()> {
        loop {
            {
                let state = self.state.lock().await;
                if state.generation != generation || state.buffer.len() >= target_size {
                    return Ok(());
                }
            }

            let asset = match self.draw().await? {
                Some(asset) => asset,
                None => {
                    log::debug!("Library exhausted");
                    return Ok(());
                }
            };

            let mut state = self.state.lock().await;
            if state.generation != generation || state.buffer.len() >= target_size {
                return Ok(());
            }
            if state.seen.insert(asset.id.clone()) {
                state.buffer.push_back(asset);
            }
        }
    }

    /// One uniformly random photo that has not been seen yet
    async fn draw(&self) -> Result<Option<PhotoAsset>> {
        for _ in 0..MAX_DRAW_ATTEMPTS {
            let count = self.library.count(MediaType::Photo).await?;
            if count == 0 {
                return Ok(None);
            }
            if self.seen_len().await >= count {
                break;
            }

            let target_index = self.random_index(count);
            let picked =
                pick_at_index(self.library.as_ref(), target_index, self.options.page_size).await?;
            let asset = match picked {
                Some(asset) => asset,
                None => return Ok(None),
            };

            if !self.state.lock().await.seen.contains(&asset.id) {
                return Ok(Some(asset));
            }
            log::trace!("Draw hit seen photo {}, retrying", asset.id);
        }

        self.first_unseen().await
    }

    /// Walks the whole listing for the first photo not seen yet
    async fn first_unseen(&self) -> Result<Option<PhotoAsset>> {
        let seen = self.state.lock().await.seen.clone();
        let mut after: Option<String> = None;

        loop {
            let request = PageRequest::photos(self.options.page_size.max(1))
                .after(after.take())
                .sorted_by(SortBy::CreationTime);
            let page = self.library.list_page(request).await?;

            if let Some(asset) = page.assets.iter().find(|a| !seen.contains(&a.id)) {
                return Ok(Some(asset.clone()));
            }

            match page.end_cursor {
                Some(cursor) if page.has_next_page && !page.assets.is_empty() => {
                    after = Some(cursor)
                }
                _ => return Ok(None),
            }
        }
    }

    async fn seen_len(&self) -> usize {
        self.state.lock().await.seen.len()
    }

    fn random_index(&self, count: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..count)
    }
}
