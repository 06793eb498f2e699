/// Source gallery grid
use iced::widget::{column, container, image, mouse_area, scrollable, text};
use iced::{ContentFit, Element, Length, Pixels};
use iced_aw::Wrap;

use crate::state::gallery::SourceGallery;
use crate::Message;

/// Height reserved for the file name under each thumbnail
const LABEL_HEIGHT: f32 = 20.0;

/// Thumbnails in a wrapping grid; pressing one starts a drag
pub fn view(gallery: &SourceGallery, thumbnail_size: u32) -> Element<'_, Message> {
    if gallery.is_empty() {
        return container(text("No images loaded. Choose a folder with Browse...").size(14))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into();
    }

    let edge = Length::Fixed(thumbnail_size as f32);

    let tiles: Vec<Element<'_, Message>> = gallery
        .tiles()
        .iter()
        .enumerate()
        .map(|(index, tile)| {
            let thumbnail = image(tile.thumbnail.clone())
                .width(edge)
                .height(edge)
                .content_fit(ContentFit::Fill);

            let label = container(text(&tile.label).size(12))
                .width(edge)
                .height(Length::Fixed(LABEL_HEIGHT))
                .center_x(edge);

            mouse_area(column![thumbnail, label].spacing(5))
                .on_press(Message::DragStarted(index))
                .into()
        })
        .collect();

    let grid = Wrap::with_elements(tiles)
        .spacing(Pixels(10.0))
        .line_spacing(Pixels(10.0));

    scrollable(container(grid).padding(10))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
