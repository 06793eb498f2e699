/// Decoded image cache
///
/// Maps a file path to its decoded pixels. Each file is decoded once and then
/// served from memory until it falls out of the LRU window. Failures are never
/// cached, so a file that is fixed on disk can be loaded on the next attempt.
use iced::widget::image::Handle;
use image::{DynamicImage, ImageError, ImageReader};
use lru::LruCache;
use std::fs::File;
use std::io::BufReader;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use super::thumbnail;
use crate::error::{Error, Result};
use crate::state::data::TileSize;

/// Fallback capacity when the configured one is zero
const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(64) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// A decoded image ready for display
#[derive(Debug, Clone)]
pub struct CachedImage {
    /// Pixel dimensions of the source file
    pub dimensions: TileSize,
    /// Full-resolution pixels for the canvas
    pub handle: Handle,
    /// Square thumbnail for the gallery
    pub thumbnail: Handle,
}

pub struct ImageCache {
    entries: LruCache<PathBuf, CachedImage>,
    thumbnail_size: u32,
}

impl ImageCache {
    pub fn new(capacity: usize, thumbnail_size: u32) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY);
        Self {
            entries: LruCache::new(capacity),
            thumbnail_size,
        }
    }

    /// Get the decoded image for `path`, decoding it on a miss
    pub fn get(&mut self, path: &Path) -> Result<CachedImage> {
        if let Some(cached) = self.entries.get(path) {
            return Ok(cached.clone());
        }

        let decoded = decode_file(path)?;
        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(Error::EmptyImage {
                path: path.to_path_buf(),
            });
        }

        let cached = CachedImage {
            dimensions: TileSize::new(decoded.width(), decoded.height()),
            handle: thumbnail::to_handle(&decoded),
            thumbnail: thumbnail::render_thumbnail(&decoded, self.thumbnail_size),
        };

        tracing::debug!(path = %path.display(), "decoded image");
        self.entries.put(path.to_path_buf(), cached.clone());
        Ok(cached)
    }

    #[cfg(test)]
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains(path)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Decode through a buffered reader so the file is only held open while
/// reading, never locked for the lifetime of the image.
fn decode_file(path: &Path) -> Result<DynamicImage> {
    let to_error = |source: ImageError| Error::Decode {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| to_error(ImageError::IoError(e)))?;
    ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|e| to_error(ImageError::IoError(e)))?
        .decode()
        .map_err(to_error)
}
