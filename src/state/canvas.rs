/// The target canvas: the ordered list of tiles dropped by the user
use iced::widget::image::Handle;
use std::path::{Path, PathBuf};

use super::adaptive::AdaptiveAnimator;
use super::data::{TargetTile, TileId, TilePosition, TileSize, MIN_TILE_EDGE};
use super::gallery::is_supported_image;
use super::interaction::{DragPayload, DropEffect};
use crate::error::{Error, Result};
use crate::imaging::{compute_display_size, ImageCache};

/// Painted in the middle of an empty canvas
pub const DROP_HINT: &str = "Drop images here";

#[derive(Debug)]
pub struct TargetCanvas {
    tiles: Vec<TargetTile>,
    next_id: u64,
    /// Visible area, used to fit dropped images
    size: TileSize,
}

impl TargetCanvas {
    pub fn new(size: TileSize) -> Self {
        Self {
            tiles: Vec::new(),
            next_id: 1,
            size,
        }
    }

    #[cfg(test)]
    pub fn size(&self) -> TileSize {
        self.size
    }

    pub fn set_size(&mut self, size: TileSize) {
        self.size = size;
    }

    pub fn tiles(&self) -> &[TargetTile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [TargetTile] {
        &mut self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&TargetTile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Topmost tile under a canvas-relative point
    pub fn tile_at(&self, x: f32, y: f32) -> Option<&TargetTile> {
        self.tiles.iter().rev().find(|t| t.contains(x, y))
    }

    /// Answer a drag hovering over the canvas
    pub fn accepts(&self, payload: &DragPayload) -> DropEffect {
        match payload {
            DragPayload::ImagePath(path) if is_supported_image(path) => DropEffect::Copy,
            DragPayload::ImagePath(_) => DropEffect::None,
        }
    }

    /// Drop a payload at a canvas-relative position.
    ///
    /// Returns `Ok(None)` when the payload is refused or its file no longer
    /// exists. In uniform mode the tile appears at the uniform size while its
    /// fitted size is kept as the size to return to.
    pub fn drop_payload(
        &mut self,
        payload: &DragPayload,
        at: TilePosition,
        cache: &mut ImageCache,
        animator: &mut AdaptiveAnimator,
    ) -> Result<Option<TileId>> {
        if self.accepts(payload) == DropEffect::None {
            return Ok(None);
        }
        let DragPayload::ImagePath(path) = payload;
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "dropped file vanished");
            return Ok(None);
        }

        let image = cache.get(path)?;
        let fitted = compute_display_size(image.dimensions, self.size).ok_or_else(|| {
            Error::EmptyImage {
                path: path.to_path_buf(),
            }
        })?;
        let size = if animator.is_uniform() {
            animator.uniform_size()
        } else {
            fitted
        };

        let id = self.insert(path, size, fit_inside(at, size, self.size), image.handle);
        animator.track(id, fitted);
        tracing::info!(?id, path = %path.display(), ?size, "tile dropped");
        Ok(Some(id))
    }

    /// Append a tile exactly as given
    pub fn insert(
        &mut self,
        path: &Path,
        size: TileSize,
        position: TilePosition,
        image: Handle,
    ) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        self.tiles.push(TargetTile {
            id,
            path: PathBuf::from(path),
            size,
            position,
            image,
        });
        id
    }

    /// Remove one tile and its tracked size
    pub fn delete(&mut self, id: TileId, animator: &mut AdaptiveAnimator) -> bool {
        let before = self.tiles.len();
        self.tiles.retain(|t| t.id != id);
        animator.forget(id);

        let removed = self.tiles.len() != before;
        if removed {
            tracing::info!(?id, "tile deleted");
        }
        removed
    }

    /// Remove every tile
    pub fn clear(&mut self, animator: &mut AdaptiveAnimator) {
        tracing::info!(count = self.tiles.len(), "canvas reset");
        self.tiles.clear();
        animator.clear();
    }

    /// Shift a tile, keeping it inside the canvas
    pub fn move_by(&mut self, id: TileId, dx: i32, dy: i32) {
        let area = self.size;
        if let Some(tile) = self.tiles.iter_mut().find(|t| t.id == id) {
            let wanted = TilePosition::new(tile.position.x + dx, tile.position.y + dy);
            tile.position = fit_inside(wanted, tile.size, area);
        }
    }

    /// Grow or shrink a tile from its bottom-right corner.
    ///
    /// The tile never shrinks below `MIN_TILE_EDGE` and never grows past the
    /// canvas edge.
    pub fn resize_by(&mut self, id: TileId, dx: i32, dy: i32) -> Option<TileSize> {
        let area = self.size;
        let tile = self.tiles.iter_mut().find(|t| t.id == id)?;

        let grow = |edge: u32, delta: i32, room: i64| {
            let wanted = edge as i64 + delta as i64;
            wanted.min(room).max(MIN_TILE_EDGE as i64) as u32
        };
        let room_x = area.width as i64 - tile.position.x as i64;
        let room_y = area.height as i64 - tile.position.y as i64;

        tile.size = TileSize::new(
            grow(tile.size.width, dx, room_x),
            grow(tile.size.height, dy, room_y),
        );
        Some(tile.size)
    }
}

/// Clamp a tile's corner so the whole tile lies inside `area`
fn fit_inside(at: TilePosition, size: TileSize, area: TileSize) -> TilePosition {
    let max_x = area.width.saturating_sub(size.width) as i32;
    let max_y = area.height.saturating_sub(size.height) as i32;
    TilePosition::new(at.x.clamp(0, max_x), at.y.clamp(0, max_y))
}
