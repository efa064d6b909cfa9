//! Photo library backed by a directory of image files

use super::{PermissionGate, PhotoLibrary};
use crate::domain::{AssetPage, MediaType, PageRequest, PermissionStatus, PhotoAsset};
use crate::error::{PicPurgeError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Returns true for file extensions treated as photos
pub fn is_photo_extension(ext: &str) -> bool {
    matches!(
        ext.to_lowercase().as_str(),
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "tif" | "tiff" | "heic"
    )
}

/// Builds a photo asset from a file on disk. The absolute path is the id.
pub fn asset_from_path(path: &Path) -> io::Result<PhotoAsset> {
    let metadata = fs::metadata(path)?;
    // Not every filesystem records a birth time
    let created = metadata.created().or_else(|_| metadata.modified())?;
    let creation_time: DateTime<Utc> = created.into();

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(PhotoAsset {
        id: path.to_string_lossy().into_owned(),
        uri: format!("file://{}", path.display()),
        filename,
        creation_time,
    })
}

/// Lists the photos directly inside `dir_path`, oldest first.
///
/// Hidden files, directories and non-image extensions are skipped, and so
/// are entries that cannot be read. Subdirectories are not visited.
pub fn scan_photos(dir_path: &Path) -> io::Result<Vec<PhotoAsset>> {
    let mut photos = Vec::new();

    for entry_result in fs::read_dir(dir_path)? {
        let entry = match entry_result {
            Ok(e) => e,
            Err(_) => continue,
        };
        let path = entry.path();

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if file_name.starts_with('.') {
            continue;
        }

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !is_photo_extension(extension) {
            continue;
        }

        match fs::metadata(&path) {
            Ok(m) if m.is_file() => {}
            _ => continue,
        }

        match asset_from_path(&path) {
            Ok(asset) => photos.push(asset),
            Err(_) => continue,
        }
    }

    // Ties broken by name so repeated scans agree on the order
    photos.sort_by(|a, b| {
        a.creation_time
            .cmp(&b.creation_time)
            .then_with(|| a.filename.cmp(&b.filename))
    });

    Ok(photos)
}

/// Filesystem photo library. Deletion moves files to the OS trash.
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    root: PathBuf,
    dry_run: bool,
}

impl DirectoryLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
        }
    }

    /// In dry-run mode deletions are logged but no file is touched
    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.dry_run = dry_run;
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn scan(&self) -> Result<Vec<PhotoAsset>> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || scan_photos(&root))
            .await
            .map_err(|e| PicPurgeError::Library(format!("Scan task panicked: {}", e)))?
            .map_err(|e| match e.kind() {
                io::ErrorKind::PermissionDenied => PicPurgeError::Permission(format!(
                    "No access to {}",
                    self.root.display()
                )),
                _ => PicPurgeError::Library(format!(
                    "Failed to read {}: {}",
                    self.root.display(),
                    e
                )),
            })
    }

    /// Resolves ids to paths that still exist inside the library root
    fn resolve(&self, ids: &[String]) -> Vec<PathBuf> {
        ids.iter()
            .map(PathBuf::from)
            .filter(|p| p.parent() == Some(self.root.as_path()) && p.is_file())
            .collect()
    }
}

#[async_trait]
impl PhotoLibrary for DirectoryLibrary {
    async fn count(&self, media_type: MediaType) -> Result<usize> {
        if media_type == MediaType::Video {
            return Ok(0);
        }
        Ok(self.scan().await?.len())
    }

    async fn list_page(&self, request: PageRequest) -> Result<AssetPage> {
        if request.media_type == MediaType::Video {
            return Ok(AssetPage::default());
        }

        // Scans come back oldest first, which also serves SortBy::Default
        let photos = self.scan().await?;

        let start = match request.after.as_deref() {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| PicPurgeError::Library(format!("invalid cursor: {}", cursor)))?,
            None => 0,
        };
        let start = start.min(photos.len());
        let end = (start + request.first).min(photos.len());
        let total_count = photos.len();

        Ok(AssetPage {
            assets: photos[start..end].to_vec(),
            end_cursor: Some(end.to_string()),
            has_next_page: end < total_count,
            total_count,
        })
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let paths = self.resolve(ids);
        if paths.len() < ids.len() {
            log::warn!(
                "{} of {} photos are no longer in {}",
                ids.len() - paths.len(),
                ids.len(),
                self.root.display()
            );
        }

        if paths.is_empty() {
            return Ok(());
        }

        if self.dry_run {
            for path in &paths {
                log::info!("[dry run] would trash {}", path.display());
            }
            return Ok(());
        }

        tokio::task::spawn_blocking(move || trash::delete_all(&paths))
            .await
            .map_err(|e| PicPurgeError::Library(format!("Delete task panicked: {}", e)))?
            .map_err(|e| PicPurgeError::Library(format!("Failed to move photos to trash: {}", e)))
    }
}

#[async_trait]
impl PermissionGate for DirectoryLibrary {
    async fn status(&self) -> Result<PermissionStatus> {
        match tokio::fs::read_dir(&self.root).await {
            Ok(_) => Ok(PermissionStatus::Granted),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Ok(PermissionStatus::Denied),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PermissionStatus::Denied),
            Err(e) => Err(e.into()),
        }
    }

    async fn request(&self) -> Result<PermissionStatus> {
        // Directory access cannot be granted interactively
        self.status().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_photos(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"not really an image").unwrap();
        }
    }

    #[test]
    fn test_is_photo_extension() {
        assert!(is_photo_extension("jpg"));
        assert!(is_photo_extension("JPEG"));
        assert!(is_photo_extension("heic"));
        assert!(!is_photo_extension("txt"));
        assert!(!is_photo_extension(""));
    }

    #[test]
    fn test_scan_filters_non_photos() {
        let temp_dir = TempDir::new().unwrap();
        write_photos(temp_dir.path(), &["a.jpg", "b.png", "notes.txt", ".hidden.jpg"]);
        fs::create_dir(temp_dir.path().join("album.jpg")).unwrap();

        let photos = scan_photos(temp_dir.path()).unwrap();
        let mut names: Vec<_> = photos.iter().map(|p| p.filename.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }

    #[test]
    fn test_scan_nonexistent_directory() {
        assert!(scan_photos(Path::new("/nonexistent/photos")).is_err());
    }

    #[test]
    fn test_asset_from_path() {
        let temp_dir = TempDir::new().unwrap();
        write_photos(temp_dir.path(), &["cat.jpg"]);
        let path = temp_dir.path().join("cat.jpg");

        let asset = asset_from_path(&path).unwrap();
        assert_eq!(asset.filename, "cat.jpg");
        assert_eq!(asset.id, path.to_string_lossy());
        assert!(asset.uri.starts_with("file://"));
    }

    #[tokio::test]
    async fn test_count_and_pages() {
        let temp_dir = TempDir::new().unwrap();
        write_photos(temp_dir.path(), &["1.jpg", "2.jpg", "3.jpg"]);
        let library = DirectoryLibrary::new(temp_dir.path());

        assert_eq!(library.count(MediaType::Photo).await.unwrap(), 3);

        let first = library.list_page(PageRequest::photos(2)).await.unwrap();
        assert_eq!(first.assets.len(), 2);
        assert!(first.has_next_page);

        let second = library
            .list_page(PageRequest::photos(2).after(first.end_cursor))
            .await
            .unwrap();
        assert_eq!(second.assets.len(), 1);
        assert!(!second.has_next_page);
    }

    #[tokio::test]
    async fn test_dry_run_delete_keeps_files() {
        let temp_dir = TempDir::new().unwrap();
        write_photos(temp_dir.path(), &["keep.jpg"]);
        let mut library = DirectoryLibrary::new(temp_dir.path());
        library.set_dry_run(true);

        let id = temp_dir.path().join("keep.jpg").to_string_lossy().into_owned();
        library.delete_by_ids(&[id]).await.unwrap();
        assert!(temp_dir.path().join("keep.jpg").exists());
    }

    #[tokio::test]
    async fn test_delete_ignores_paths_outside_root() {
        let temp_dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        write_photos(outside.path(), &["other.jpg"]);
        let library = DirectoryLibrary::new(temp_dir.path());

        let id = outside.path().join("other.jpg").to_string_lossy().into_owned();
        library.delete_by_ids(&[id]).await.unwrap();
        assert!(outside.path().join("other.jpg").exists());
    }

    #[tokio::test]
    async fn test_permission_for_missing_directory() {
        let library = DirectoryLibrary::new("/nonexistent/photos");
        assert_eq!(library.status().await.unwrap(), PermissionStatus::Denied);
    }

    #[tokio::test]
    async fn test_permission_for_readable_directory() {
        let temp_dir = TempDir::new().unwrap();
        let library = DirectoryLibrary::new(temp_dir.path());
        assert_eq!(library.request().await.unwrap(), PermissionStatus::Granted);
    }
}
