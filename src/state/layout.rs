/// Layout persistence
///
/// A layout is the ordered snapshot of every canvas tile plus the gallery
/// folder. It is stored as CBOR in a single file that is replaced atomically:
/// the record is written to a sibling temp file which is then renamed over
/// the target, so a failed save never truncates the previous layout.
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::adaptive::AdaptiveAnimator;
use super::canvas::TargetCanvas;
use super::data::{TilePosition, TileSize};
use crate::error::{Error, Result};
use crate::imaging::ImageCache;

/// One tile as stored on disk
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TileRecord {
    pub path: PathBuf,
    pub width: i32,
    pub height: i32,
    pub x: i32,
    pub y: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LayoutRecord {
    pub image_directory: PathBuf,
    pub tiles: Vec<TileRecord>,
    /// Unix timestamp of the save
    #[serde(default)]
    pub saved_at: Option<i64>,
}

/// Result of rebuilding the canvas from a layout
#[derive(Debug, Default)]
pub struct RestoreReport {
    pub restored: usize,
    /// Entries whose image no longer exists, dropped silently
    pub missing: usize,
    /// Entries that exist but could not be shown
    pub failed: Vec<Error>,
}

impl LayoutRecord {
    /// Capture the current canvas
    pub fn snapshot(image_directory: &Path, canvas: &TargetCanvas) -> Self {
        let tiles = canvas
            .tiles()
            .iter()
            .map(|tile| TileRecord {
                path: tile.path.clone(),
                width: saturating_i32(tile.size.width),
                height: saturating_i32(tile.size.height),
                x: tile.position.x,
                y: tile.position.y,
            })
            .collect();

        Self {
            image_directory: image_directory.to_path_buf(),
            tiles,
            saved_at: Some(Utc::now().timestamp()),
        }
    }

    /// Write the layout to `path`, replacing any previous file
    pub fn save(&self, path: &Path) -> Result<()> {
        let encode_error = |reason: String| Error::LayoutEncode {
            path: path.to_path_buf(),
            reason,
        };
        let io_error = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let temp = temp_path(path);
        let written = File::create(&temp).map_err(io_error).and_then(|file| {
            let mut writer = BufWriter::new(file);
            ciborium::into_writer(self, &mut writer).map_err(|e| encode_error(format!("{e:?}")))?;
            writer.flush().map_err(io_error)?;
            writer
                .into_inner()
                .map_err(|e| io_error(e.into_error()))?
                .sync_all()
                .map_err(io_error)
        });

        if let Err(err) = written.and_then(|()| fs::rename(&temp, path).map_err(io_error)) {
            let _ = fs::remove_file(&temp);
            return Err(err);
        }

        tracing::info!(path = %path.display(), tiles = self.tiles.len(), "layout saved");
        Ok(())
    }

    /// Read the layout at `path`.
    ///
    /// A missing file is not an error: it is the first run.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let record: Self = ciborium::from_reader(BufReader::new(file)).map_err(|e| {
            Error::LayoutDecode {
                path: path.to_path_buf(),
                reason: format!("{e:?}"),
            }
        })?;

        tracing::info!(path = %path.display(), tiles = record.tiles.len(), "layout loaded");
        Ok(Some(record))
    }

    /// Recreate every stored tile on `canvas`.
    ///
    /// Entries whose file is gone are skipped without complaint. Each restored
    /// tile keeps its stored size as its free-form size.
    pub fn restore_into(
        &self,
        canvas: &mut TargetCanvas,
        cache: &mut ImageCache,
        animator: &mut AdaptiveAnimator,
    ) -> RestoreReport {
        let mut report = RestoreReport::default();

        for entry in &self.tiles {
            if !entry.path.is_file() {
                report.missing += 1;
                continue;
            }

            let Some(size) = entry.size() else {
                report.failed.push(Error::EmptyImage {
                    path: entry.path.clone(),
                });
                continue;
            };

            match cache.get(&entry.path) {
                Ok(image) => {
                    let position = TilePosition::new(entry.x, entry.y);
                    let id = canvas.insert(&entry.path, size, position, image.handle);
                    animator.track(id, size);
                    report.restored += 1;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skipping layout entry");
                    report.failed.push(err);
                }
            }
        }

        if report.missing > 0 {
            tracing::debug!(missing = report.missing, "dropped stale layout entries");
        }
        report
    }

    /// Local time of the save, for display
    pub fn saved_at_local(&self) -> Option<DateTime<Local>> {
        self.saved_at
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .map(|utc| utc.with_timezone(&Local))
    }
}

impl TileRecord {
    fn size(&self) -> Option<TileSize> {
        let width = u32::try_from(self.width).ok()?;
        let height = u32::try_from(self.height).ok()?;
        let size = TileSize::new(width, height);
        (!size.is_empty()).then_some(size)
    }
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// `layout.dat` -> `layout.dat.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::TileId;
    use image::RgbaImage;
    use std::time::Duration;

    struct Fixture {
        dir: tempfile::TempDir,
        canvas: TargetCanvas,
        cache: ImageCache,
        animator: AdaptiveAnimator,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
                canvas: TargetCanvas::new(TileSize::new(780, 300)),
                cache: ImageCache::new(16, 120),
                animator: AdaptiveAnimator::new(
                    TileSize::new(120, 120),
                    Duration::from_millis(100),
                ),
            }
        }

        fn image(&self, name: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            RgbaImage::new(64, 48).save(&path).unwrap();
            path
        }

        fn layout_file(&self) -> PathBuf {
            self.dir.path().join("layout.dat")
        }

        fn place(&mut self, path: &Path, w: u32, h: u32, x: i32, y: i32) -> TileId {
            let handle = self.cache.get(path).unwrap().handle;
            let id = self.canvas.insert(path, TileSize::new(w, h), TilePosition::new(x, y), handle);
            self.animator.track(id, TileSize::new(w, h));
            id
        }

        fn fresh_canvas(&self) -> (TargetCanvas, AdaptiveAnimator) {
            (
                TargetCanvas::new(TileSize::new(780, 300)),
                AdaptiveAnimator::new(TileSize::new(120, 120), Duration::from_millis(100)),
            )
        }
    }

    fn summary(canvas: &TargetCanvas) -> Vec<(PathBuf, u32, u32, i32, i32)> {
        canvas
            .tiles()
            .iter()
            .map(|t| (t.path.clone(), t.size.width, t.size.height, t.position.x, t.position.y))
            .collect()
    }

    #[test]
    fn test_round_trip_restores_every_tile() {
        let mut fx = Fixture::new();
        let a = fx.image("a.png");
        let b = fx.image("b.png");
        fx.place(&a, 100, 100, 5, 5);
        fx.place(&b, 50, 60, 200, 10);

        LayoutRecord::snapshot(fx.dir.path(), &fx.canvas)
            .save(&fx.layout_file())
            .unwrap();

        let record = LayoutRecord::load(&fx.layout_file()).unwrap().unwrap();
        assert_eq!(record.image_directory, fx.dir.path());

        let (mut canvas, mut animator) = fx.fresh_canvas();
        let report = record.restore_into(&mut canvas, &mut fx.cache, &mut animator);

        assert_eq!(report.restored, 2);
        assert_eq!(
            summary(&canvas),
            vec![(a, 100, 100, 5, 5), (b, 50, 60, 200, 10)]
        );
        let first = canvas.tiles()[0].id;
        assert_eq!(animator.reference_size(first), Some(TileSize::new(100, 100)));
    }

    #[test]
    fn test_missing_image_is_skipped_silently() {
        let mut fx = Fixture::new();
        let a = fx.image("a.png");
        let b = fx.image("b.png");
        fx.place(&a, 100, 100, 5, 5);
        fx.place(&b, 50, 60, 200, 10);
        LayoutRecord::snapshot(fx.dir.path(), &fx.canvas)
            .save(&fx.layout_file())
            .unwrap();

        fs::remove_file(&b).unwrap();

        let record = LayoutRecord::load(&fx.layout_file()).unwrap().unwrap();
        let (mut canvas, mut animator) = fx.fresh_canvas();
        let report = record.restore_into(&mut canvas, &mut fx.cache, &mut animator);

        assert_eq!(report.restored, 1);
        assert_eq!(report.missing, 1);
        assert!(report.failed.is_empty());
        assert_eq!(summary(&canvas), vec![(a, 100, 100, 5, 5)]);
    }

    #[test]
    fn test_absent_file_loads_nothing() {
        let fx = Fixture::new();
        assert_eq!(LayoutRecord::load(&fx.layout_file()).unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_a_decode_error() {
        let fx = Fixture::new();
        fs::write(fx.layout_file(), b"\xff\x00 not cbor at all").unwrap();

        let err = LayoutRecord::load(&fx.layout_file()).unwrap_err();
        assert!(matches!(err, Error::LayoutDecode { .. }));
    }

    #[test]
    fn test_deleted_tile_is_not_saved() {
        let mut fx = Fixture::new();
        let a = fx.image("a.png");
        let b = fx.image("b.png");
        fx.place(&a, 100, 100, 5, 5);
        let doomed = fx.place(&b, 50, 60, 200, 10);

        fx.canvas.delete(doomed, &mut fx.animator);
        LayoutRecord::snapshot(fx.dir.path(), &fx.canvas)
            .save(&fx.layout_file())
            .unwrap();

        let record = LayoutRecord::load(&fx.layout_file()).unwrap().unwrap();
        assert_eq!(record.tiles.len(), 1);
        assert!(record.tiles.iter().all(|t| t.path != b));
    }

    #[test]
    fn test_save_overwrites_and_leaves_no_temp_file() {
        let mut fx = Fixture::new();
        let a = fx.image("a.png");
        fx.place(&a, 10, 10, 0, 0);
        let file = fx.layout_file();

        LayoutRecord::snapshot(fx.dir.path(), &fx.canvas).save(&file).unwrap();
        fx.canvas.clear(&mut fx.animator);
        LayoutRecord::snapshot(fx.dir.path(), &fx.canvas).save(&file).unwrap();

        let record = LayoutRecord::load(&file).unwrap().unwrap();
        assert!(record.tiles.is_empty());
        assert!(record.saved_at_local().is_some());
        assert!(!temp_path(&file).exists());
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let mut fx = Fixture::new();
        let a = fx.image("a.png");
        fx.place(&a, 10, 10, 0, 0);
        let file = fx.layout_file();
        LayoutRecord::snapshot(fx.dir.path(), &fx.canvas).save(&file).unwrap();

        // A directory squatting on the temp path makes the next write fail
        fs::create_dir(temp_path(&file)).unwrap();
        fx.canvas.clear(&mut fx.animator);
        let err = LayoutRecord::snapshot(fx.dir.path(), &fx.canvas)
            .save(&file)
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));

        let record = LayoutRecord::load(&file).unwrap().unwrap();
        assert_eq!(record.tiles.len(), 1);
    }

    #[test]
    fn test_non_positive_sizes_are_rejected() {
        let mut fx = Fixture::new();
        let a = fx.image("a.png");
        let record = LayoutRecord {
            image_directory: fx.dir.path().to_path_buf(),
            tiles: vec![TileRecord {
                path: a,
                width: 0,
                height: -3,
                x: 0,
                y: 0,
            }],
            saved_at: None,
        };

        let (mut canvas, mut animator) = fx.fresh_canvas();
        let report = record.restore_into(&mut canvas, &mut fx.cache, &mut animator);
        assert_eq!(report.restored, 0);
        assert_eq!(report.failed.len(), 1);
        assert!(canvas.is_empty());
    }
}
