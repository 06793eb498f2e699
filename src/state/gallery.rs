use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::data::SourceTile;
use super::interaction::DragPayload;
use crate::error::{Error, Result};
use crate::imaging::ImageCache;

/// File extensions shown in the gallery, matched exactly as the
/// filesystem reports them
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Result of a gallery reload
#[derive(Debug, Default)]
pub struct ReloadReport {
    pub loaded: usize,
    /// Files that matched an extension but failed to decode
    pub failed: Vec<Error>,
}

/// The source gallery: one thumbnail tile per image in a folder
#[derive(Debug, Default)]
pub struct SourceGallery {
    directory: PathBuf,
    tiles: Vec<SourceTile>,
}

impl SourceGallery {
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            tiles: Vec::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn tiles(&self) -> &[SourceTile] {
        &self.tiles
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Rebuild the gallery from `directory`.
    ///
    /// A missing folder or a folder without images is an error and leaves the
    /// current tiles in place. Otherwise every tile is rebuilt; files that
    /// fail to decode are skipped and listed in the report.
    pub fn reload(&mut self, directory: &Path, cache: &mut ImageCache) -> Result<ReloadReport> {
        let files = list_image_files(directory)?;

        self.directory = directory.to_path_buf();
        self.tiles.clear();

        let mut report = ReloadReport::default();
        for path in files {
            match cache.get(&path) {
                Ok(image) => {
                    self.tiles.push(SourceTile {
                        label: display_label(&path),
                        path,
                        thumbnail: image.thumbnail,
                    });
                    report.loaded += 1;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skipping gallery image");
                    report.failed.push(err);
                }
            }
        }

        tracing::info!(
            directory = %directory.display(),
            loaded = report.loaded,
            failed = report.failed.len(),
            "gallery reloaded"
        );
        Ok(report)
    }

    /// Start a drag from the tile at `index`.
    ///
    /// Returns `None` if the index is stale or the file has since vanished.
    pub fn begin_drag(&self, index: usize) -> Option<DragPayload> {
        let tile = self.tiles.get(index)?;
        tile.path
            .is_file()
            .then(|| DragPayload::ImagePath(tile.path.clone()))
    }
}

/// Whether `path` carries one of the supported image extensions
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// List the supported image files directly inside `directory`, sorted by name
pub fn list_image_files(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(Error::MissingDirectory(directory.to_path_buf()));
    }

    let files: Vec<PathBuf> = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported_image(path))
        .collect();

    if files.is_empty() {
        return Err(Error::NoImages(directory.to_path_buf()));
    }
    Ok(files)
}

/// File name without its extension
fn display_label(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
