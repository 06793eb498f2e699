use iced::alignment;
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::state::canvas::{TargetCanvas, DROP_HINT};
use crate::state::data::{TileId, RESIZE_GRIP};
use crate::state::interaction::{DropEffect, TileGesture};
use crate::Message;

/// Size of the one-item context menu
pub const MENU_SIZE: Size = Size::new(90.0, 26.0);
const MENU_LABEL: &str = "Delete";

const HINT_COLOR: Color = Color::from_rgb(0.5, 0.5, 0.5);
const TILE_BORDER: Color = Color::from_rgb(0.2, 0.2, 0.2);
const ACCEPT_BORDER: Color = Color::from_rgb(0.2, 0.5, 0.9);
const REJECT_BORDER: Color = Color::from_rgb(0.8, 0.3, 0.3);

/// An open context menu: the tile it acts on and its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    pub tile: TileId,
    pub at: Point,
}

impl ContextMenu {
    fn bounds(&self) -> Rectangle {
        Rectangle::new(self.at, MENU_SIZE)
    }
}

/// Top-left corner for a menu opened at `at`, pulled back so the whole menu
/// stays inside `area`
fn menu_origin(at: Point, area: Size) -> Point {
    let max_x = (area.width - MENU_SIZE.width).max(0.0);
    let max_y = (area.height - MENU_SIZE.height).max(0.0);
    Point::new(at.x.clamp(0.0, max_x), at.y.clamp(0.0, max_y))
}

/// Overlay drawn above the canvas tiles.
///
/// Paints tile borders, resize grips, the empty-canvas hint, drag feedback and
/// the context menu, and turns presses into tile commands. The images
/// themselves are widgets underneath.
pub struct TargetSurface<'a> {
    pub canvas: &'a TargetCanvas,
    /// Answer to a gallery drag currently over the canvas
    pub hovering_drag: Option<DropEffect>,
    pub context_menu: Option<ContextMenu>,
}

impl Program<Message> for TargetSurface<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        if self.canvas.is_empty() {
            frame.fill_text(canvas::Text {
                content: DROP_HINT.to_string(),
                position: frame.center(),
                color: HINT_COLOR,
                size: 18.0.into(),
                horizontal_alignment: alignment::Horizontal::Center,
                vertical_alignment: alignment::Vertical::Center,
                ..canvas::Text::default()
            });
        }

        for tile in self.canvas.tiles() {
            let origin = Point::new(tile.position.x as f32, tile.position.y as f32);
            let size = Size::new(tile.size.width as f32, tile.size.height as f32);

            frame.stroke(
                &Path::rectangle(origin, size),
                Stroke::default().with_color(TILE_BORDER).with_width(1.0),
            );

            // Grip: a small filled triangle in the bottom-right corner
            let corner = Point::new(origin.x + size.width, origin.y + size.height);
            let grip = RESIZE_GRIP.min(size.width).min(size.height);
            let triangle = Path::new(|p| {
                p.move_to(corner);
                p.line_to(Point::new(corner.x - grip, corner.y));
                p.line_to(Point::new(corner.x, corner.y - grip));
                p.close();
            });
            frame.fill(&triangle, Color::from_rgba(0.2, 0.2, 0.2, 0.6));
        }

        if let Some(effect) = self.hovering_drag {
            let color = match effect {
                DropEffect::Copy => ACCEPT_BORDER,
                DropEffect::None => REJECT_BORDER,
            };
            frame.stroke(
                &Path::rectangle(Point::ORIGIN, bounds.size()),
                Stroke::default().with_color(color).with_width(3.0),
            );
        }

        if let Some(menu) = self.context_menu {
            let area = menu.bounds();
            let hovered = cursor
                .position_in(bounds)
                .is_some_and(|p| area.contains(p));
            let fill = if hovered {
                Color::from_rgb(0.85, 0.9, 1.0)
            } else {
                Color::WHITE
            };

            frame.fill_rectangle(area.position(), area.size(), fill);
            frame.stroke(
                &Path::rectangle(area.position(), area.size()),
                Stroke::default().with_color(TILE_BORDER).with_width(1.0),
            );
            frame.fill_text(canvas::Text {
                content: MENU_LABEL.to_string(),
                position: Point::new(area.x + 10.0, area.center_y()),
                color: Color::BLACK,
                size: 14.0.into(),
                vertical_alignment: alignment::Vertical::Center,
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let Some(position) = cursor.position_in(bounds) else {
            return (canvas::event::Status::Ignored, None);
        };

        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(menu) = self.context_menu {
                    let message = if menu.bounds().contains(position) {
                        Message::DeleteTile(menu.tile)
                    } else {
                        Message::DismissContextMenu
                    };
                    return (canvas::event::Status::Captured, Some(message));
                }

                if let Some(tile) = self.canvas.tile_at(position.x, position.y) {
                    let gesture = if tile.grip_contains(position.x, position.y) {
                        TileGesture::Resize
                    } else {
                        TileGesture::Move
                    };
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::TileGrabbed(tile.id, gesture)),
                    );
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Right)) => {
                let message = match self.canvas.tile_at(position.x, position.y) {
                    Some(tile) => {
                        Message::ContextMenuRequested(tile.id, menu_origin(position, bounds.size()))
                    }
                    None => Message::DismissContextMenu,
                };
                return (canvas::event::Status::Captured, Some(message));
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        let Some(position) = cursor.position_in(bounds) else {
            return mouse::Interaction::default();
        };

        if self.context_menu.is_some_and(|m| m.bounds().contains(position)) {
            return mouse::Interaction::Pointer;
        }

        match self.canvas.tile_at(position.x, position.y) {
            Some(tile) if tile.grip_contains(position.x, position.y) => {
                mouse::Interaction::Crosshair
            }
            Some(_) => mouse::Interaction::Grab,
            None => mouse::Interaction::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::blank_handle;
    use crate::state::data::{TilePosition, TileSize};
    use std::path::Path as FilePath;

    fn bounds() -> Rectangle {
        Rectangle::new(Point::new(10.0, 10.0), Size::new(780.0, 300.0))
    }

    /// A canvas holding one 100x100 tile at `at`
    fn canvas_with_tile(at: TilePosition) -> (TargetCanvas, TileId) {
        let mut canvas = TargetCanvas::new(TileSize::new(780, 300));
        let id = canvas.insert(
            FilePath::new("/images/a.png"),
            TileSize::new(100, 100),
            at,
            blank_handle(),
        );
        (canvas, id)
    }

    fn surface(canvas: &TargetCanvas, context_menu: Option<ContextMenu>) -> TargetSurface<'_> {
        TargetSurface {
            canvas,
            hovering_drag: None,
            context_menu,
        }
    }

    fn press(surface: &TargetSurface<'_>, button: mouse::Button, at: Point) -> Option<Message> {
        let event = canvas::Event::Mouse(mouse::Event::ButtonPressed(button));
        surface
            .update(&mut (), event, bounds(), Cursor::Available(at))
            .1
    }

    #[test]
    fn test_press_on_tile_starts_move_or_resize() {
        let (canvas, id) = canvas_with_tile(TilePosition::new(0, 0));
        let surface = surface(&canvas, None);

        assert!(matches!(
            press(&surface, mouse::Button::Left, Point::new(30.0, 30.0)),
            Some(Message::TileGrabbed(grabbed, TileGesture::Move)) if grabbed == id
        ));
        assert!(matches!(
            press(&surface, mouse::Button::Left, Point::new(105.0, 105.0)),
            Some(Message::TileGrabbed(grabbed, TileGesture::Resize)) if grabbed == id
        ));
        assert!(press(&surface, mouse::Button::Left, Point::new(500.0, 30.0)).is_none());
    }

    #[test]
    fn test_right_press_opens_menu_and_menu_click_deletes() {
        let (canvas, tile) = canvas_with_tile(TilePosition::new(0, 0));
        let closed = surface(&canvas, None);
        let Some(Message::ContextMenuRequested(id, at)) =
            press(&closed, mouse::Button::Right, Point::new(60.0, 40.0))
        else {
            panic!("expected a context menu request");
        };
        assert_eq!(id, tile);
        assert_eq!(at, Point::new(50.0, 30.0));

        let open = surface(&canvas, Some(ContextMenu { tile: id, at }));
        assert!(matches!(
            press(&open, mouse::Button::Left, Point::new(70.0, 45.0)),
            Some(Message::DeleteTile(deleted)) if deleted == tile
        ));
        assert!(matches!(
            press(&open, mouse::Button::Left, Point::new(15.0, 15.0)),
            Some(Message::DismissContextMenu)
        ));
    }

    #[test]
    fn test_menu_near_the_edge_stays_inside() {
        let (canvas, _) = canvas_with_tile(TilePosition::new(680, 200));
        let closed = surface(&canvas, None);

        // Canvas-relative (775, 295): bottom-right corner of the tile
        let Some(Message::ContextMenuRequested(id, at)) =
            press(&closed, mouse::Button::Right, Point::new(785.0, 305.0))
        else {
            panic!("expected a context menu request");
        };
        assert_eq!(at, Point::new(780.0 - MENU_SIZE.width, 300.0 - MENU_SIZE.height));

        // The whole menu is reachable, down to its far corner
        let open = surface(&canvas, Some(ContextMenu { tile: id, at }));
        assert!(matches!(
            press(&open, mouse::Button::Left, Point::new(788.0, 308.0)),
            Some(Message::DeleteTile(_))
        ));
    }
}
