/// Window geometry
///
/// Every panel and control has a fixed place derived from the window size.
/// The canvas spans the full width at the top, the action buttons are pinned
/// to the right edge below it, and the gallery fills what is left.
use iced::{Point, Rectangle, Size};

use crate::state::data::TileSize;

pub const MARGIN: f32 = 10.0;
pub const CANVAS_HEIGHT: f32 = 300.0;
pub const CONTROLS_TOP: f32 = 315.0;
pub const GALLERY_TOP: f32 = 350.0;

pub const PATH_FIELD: Size = Size::new(200.0, 25.0);
pub const BROWSE_BUTTON: Size = Size::new(75.0, 25.0);
pub const ACTION_BUTTON: Size = Size::new(80.0, 30.0);

pub const DEFAULT_WINDOW: Size = Size::new(1000.0, 700.0);
pub const MIN_WINDOW: Size = Size::new(600.0, 600.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowGeometry {
    pub canvas: Rectangle,
    pub path_field: Rectangle,
    pub browse: Rectangle,
    pub save: Rectangle,
    pub reset: Rectangle,
    pub adaptive: Rectangle,
    pub gallery: Rectangle,
}

impl WindowGeometry {
    pub fn compute(window: Size) -> Self {
        let width = window.width.max(MIN_WINDOW.width);
        let height = window.height.max(MIN_WINDOW.height);

        let pinned = |offset: f32| {
            Rectangle::new(Point::new(width - offset, CONTROLS_TOP), ACTION_BUTTON)
        };

        Self {
            canvas: Rectangle::new(
                Point::new(MARGIN, MARGIN),
                Size::new(width - 2.0 * MARGIN, CANVAS_HEIGHT),
            ),
            path_field: Rectangle::new(Point::new(MARGIN, CONTROLS_TOP), PATH_FIELD),
            browse: Rectangle::new(Point::new(220.0, CONTROLS_TOP), BROWSE_BUTTON),
            save: pinned(280.0),
            reset: pinned(190.0),
            adaptive: pinned(100.0),
            gallery: Rectangle::new(
                Point::new(MARGIN, GALLERY_TOP),
                Size::new(width - 2.0 * MARGIN, height - GALLERY_TOP - MARGIN),
            ),
        }
    }

    /// Canvas area in whole pixels, for fitting dropped images
    pub fn canvas_size(&self) -> TileSize {
        TileSize::new(self.canvas.width as u32, self.canvas.height as u32)
    }

    /// Free space between the browse button and the first pinned button
    pub fn status_width(&self) -> f32 {
        (self.save.x - (self.browse.x + self.browse.width)).max(0.0)
    }
}

/// Horizontal gap between two controls on the same row
pub fn gap(left: Rectangle, right: Rectangle) -> f32 {
    (right.x - (left.x + left.width)).max(0.0)
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self::compute(DEFAULT_WINDOW)
    }
}
