/// Pointer gestures
///
/// Tracks the one gesture that can be in flight at a time: an image dragged
/// from the gallery, or a canvas tile being moved or resized. Positions are in
/// window coordinates; the drop point is converted to canvas coordinates.
use iced::{Point, Rectangle, Vector};
use std::path::PathBuf;

use super::data::TileId;

/// What a gallery drag carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPayload {
    /// Absolute path of an image file
    ImagePath(PathBuf),
}

/// How a drop target answers a drag hovering over it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Copy,
    None,
}

/// What a press on a canvas tile started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileGesture {
    Move,
    Resize,
}

/// Tile change requested by a pointer move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerUpdate {
    Idle,
    MoveTile { id: TileId, dx: i32, dy: i32 },
    ResizeTile { id: TileId, dx: i32, dy: i32 },
}

/// Outcome of releasing the primary button
#[derive(Debug, Clone, PartialEq)]
pub enum PointerRelease {
    Idle,
    /// A gallery drag ended over the drop zone; `at` is relative to the zone
    Dropped { payload: DragPayload, at: Point },
    /// A gallery drag ended outside the drop zone
    Cancelled,
    /// A tile move or resize ended
    TileReleased { id: TileId, gesture: TileGesture },
}

#[derive(Debug, Clone, PartialEq)]
enum Session {
    Idle,
    Dragging(DragPayload),
    Tile {
        id: TileId,
        gesture: TileGesture,
        anchor: Point,
    },
}

#[derive(Debug, Clone)]
pub struct PointerTracker {
    position: Option<Point>,
    session: Session,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerTracker {
    pub fn new() -> Self {
        Self {
            position: None,
            session: Session::Idle,
        }
    }

    /// Payload of the gallery drag in flight, if any
    pub fn payload(&self) -> Option<&DragPayload> {
        match &self.session {
            Session::Dragging(payload) => Some(payload),
            _ => None,
        }
    }

    /// Whether a gallery drag is hovering over `zone`
    pub fn is_dragging_over(&self, zone: Rectangle) -> bool {
        self.payload().is_some() && self.position.is_some_and(|p| zone.contains(p))
    }

    pub fn begin_drag(&mut self, payload: DragPayload) {
        self.session = Session::Dragging(payload);
    }

    /// Start moving or resizing a tile from the current pointer position
    pub fn begin_tile_gesture(&mut self, id: TileId, gesture: TileGesture) {
        if let Some(anchor) = self.position {
            self.session = Session::Tile { id, gesture, anchor };
        }
    }

    /// Record a pointer move and report the tile change it implies.
    ///
    /// Deltas are whole pixels; the fractional remainder stays in the anchor
    /// so slow moves still add up.
    pub fn moved(&mut self, position: Point) -> PointerUpdate {
        self.position = Some(position);

        let Session::Tile { id, gesture, anchor } = &mut self.session else {
            return PointerUpdate::Idle;
        };

        let delta: Vector = position - *anchor;
        let (dx, dy) = (delta.x.trunc() as i32, delta.y.trunc() as i32);
        if dx == 0 && dy == 0 {
            return PointerUpdate::Idle;
        }
        anchor.x += dx as f32;
        anchor.y += dy as f32;

        match gesture {
            TileGesture::Move => PointerUpdate::MoveTile { id: *id, dx, dy },
            TileGesture::Resize => PointerUpdate::ResizeTile { id: *id, dx, dy },
        }
    }

    /// End the current gesture
    pub fn released(&mut self, drop_zone: Rectangle) -> PointerRelease {
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Idle => PointerRelease::Idle,
            Session::Dragging(payload) => match self.position {
                Some(p) if drop_zone.contains(p) => PointerRelease::Dropped {
                    payload,
                    at: Point::new(p.x - drop_zone.x, p.y - drop_zone.y),
                },
                _ => PointerRelease::Cancelled,
            },
            Session::Tile { id, gesture, .. } => PointerRelease::TileReleased { id, gesture },
        }
    }
}
