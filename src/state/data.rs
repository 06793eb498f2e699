/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the domain layer and the UI layer.
use iced::widget::image::Handle;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Edge length of the resize grip in the bottom-right corner of a tile
pub const RESIZE_GRIP: f32 = 12.0;

/// Smallest size a tile can be resized to
pub const MIN_TILE_EDGE: u32 = 16;

/// Identity of a tile on the target canvas
///
/// Generated by the canvas, never reused during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

/// Width and height of a tile, in logical pixels
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSize {
    pub width: u32,
    pub height: u32,
}

impl TileSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Top-left corner of a tile relative to the canvas origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TilePosition {
    pub x: i32,
    pub y: i32,
}

impl TilePosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A positioned, sized image on the target canvas
#[derive(Debug, Clone)]
pub struct TargetTile {
    pub id: TileId,
    /// Absolute path of the image file
    pub path: PathBuf,
    pub size: TileSize,
    pub position: TilePosition,
    /// Decoded pixels, shared with the image cache
    pub image: Handle,
}

impl TargetTile {
    /// Whether a canvas-relative point falls inside the tile
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let left = self.position.x as f32;
        let top = self.position.y as f32;
        x >= left
            && y >= top
            && x < left + self.size.width as f32
            && y < top + self.size.height as f32
    }

    /// Whether a canvas-relative point falls on the resize grip
    pub fn grip_contains(&self, x: f32, y: f32) -> bool {
        let right = (self.position.x + self.size.width as i32) as f32;
        let bottom = (self.position.y + self.size.height as i32) as f32;
        self.contains(x, y) && x >= right - RESIZE_GRIP && y >= bottom - RESIZE_GRIP
    }
}

/// A thumbnail in the source gallery
#[derive(Debug, Clone)]
pub struct SourceTile {
    /// Absolute path of the image file, carried as the drag payload
    pub path: PathBuf,
    /// File name without extension
    pub label: String,
    pub thumbnail: Handle,
}
