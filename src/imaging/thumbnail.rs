use iced::widget::image::Handle;
use image::{imageops::FilterType, DynamicImage};

/// Render a square gallery thumbnail.
///
/// The image is stretched to `edge` x `edge` like the gallery tiles show it,
/// so thumbnails line up in a uniform grid whatever the source aspect.
pub fn render_thumbnail(image: &DynamicImage, edge: u32) -> Handle {
    let edge = edge.max(1);
    let thumbnail = image.resize_exact(edge, edge, FilterType::Triangle).to_rgba8();
    Handle::from_rgba(edge, edge, thumbnail.into_raw())
}

/// Wrap a full-resolution image for display on the canvas
pub fn to_handle(image: &DynamicImage) -> Handle {
    let rgba = image.to_rgba8();
    Handle::from_rgba(rgba.width(), rgba.height(), rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::widget::image::Handle;
    use image::RgbaImage;

    #[test]
    fn test_thumbnail_is_square() {
        let wide = DynamicImage::ImageRgba8(RgbaImage::new(300, 100));
        match render_thumbnail(&wide, 120) {
            Handle::Rgba { width, height, pixels, .. } => {
                assert_eq!((width, height), (120, 120));
                assert_eq!(pixels.len(), 120 * 120 * 4);
            }
            other => panic!("unexpected handle {other:?}"),
        }
    }
}
