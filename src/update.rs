//! "Is an update available" check
//!
//! A versions document names the current release per platform. The check
//! runs once per process; every later call answers `false`.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionsDoc {
    #[serde(default)]
    pub ios: Option<String>,
    #[serde(default)]
    pub android: Option<String>,
    #[serde(default)]
    pub desktop: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    Desktop,
}

impl Platform {
    pub fn store_url(self) -> &'static str {
        match self {
            Platform::Android => {
                "https://play.google.com/store/apps/details?id=com.deltaapps.PicPurge"
            }
            Platform::Ios => "https://apps.apple.com/de/app/picpurge/id6476457013",
            Platform::Desktop => "https://crates.io/crates/picpurge",
        }
    }
}

impl VersionsDoc {
    pub fn version_for(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Ios => self.ios.as_deref(),
            Platform::Android => self.android.as_deref(),
            Platform::Desktop => self.desktop.as_deref(),
        }
    }
}

/// Source of the versions document
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// `None` when no document is published
    async fn fetch(&self) -> Result<Option<VersionsDoc>>;
}

/// Versions document stored as a JSON file
pub struct JsonFileVersionSource {
    path: PathBuf,
}

impl JsonFileVersionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl VersionSource for JsonFileVersionSource {
    async fn fetch(&self) -> Result<Option<VersionsDoc>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

pub struct UpdateChecker {
    installed_version: Option<String>,
    platform: Platform,
    has_checked: AtomicBool,
}

impl UpdateChecker {
    pub fn new(installed_version: Option<String>, platform: Platform) -> Self {
        Self {
            installed_version,
            platform,
            has_checked: AtomicBool::new(false),
        }
    }

    /// Checker for this build on the desktop
    pub fn for_current_build() -> Self {
        Self::new(
            Some(env!("CARGO_PKG_VERSION").to_string()),
            Platform::Desktop,
        )
    }

    pub fn store_url(&self) -> &'static str {
        self.platform.store_url()
    }

    /// True when the published version differs from the installed one.
    ///
    /// Missing data and fetch failures both answer `false`.
    pub async fn check_for_update(&self, source: &dyn VersionSource) -> bool {
        if self.has_checked.swap(true, Ordering::SeqCst) {
            return false;
        }

        match self.compare(source).await {
            Ok(outdated) => outdated,
            Err(e) => {
                log::warn!("Update check failed: {}", e);
                false
            }
        }
    }

    async fn compare(&self, source: &dyn VersionSource) -> Result<bool> {
        let doc = match source.fetch().await? {
            Some(doc) => doc,
            None => return Ok(false),
        };
        let installed = match self.installed_version.as_deref() {
            Some(version) => version,
            None => return Ok(false),
        };
        let target = match doc.version_for(self.platform) {
            Some(version) => version,
            None => return Ok(false),
        };

        let outdated = installed != target;
        if outdated {
            log::info!("Update available: {} -> {}", installed, target);
        }
        Ok(outdated)
    }

    /// Opens the store page for this platform
    pub fn open_store(&self) -> Result<()> {
        open::that(self.store_url())?;
        Ok(())
    }
}
