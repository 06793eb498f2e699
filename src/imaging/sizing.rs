/// Display-size computation for dropped images
use crate::state::data::TileSize;

/// Share of the container a dropped image may occupy along its tighter axis
pub const MAX_CONTAINER_SHARE: f64 = 0.5;

/// Scale an image down to fit its container, preserving the aspect ratio.
///
/// The scale is the lesser of the width and height ratios, halved so a
/// single tile never fills more than half the canvas in either direction.
/// Returns `None` when either size has a zero dimension.
pub fn compute_display_size(original: TileSize, container: TileSize) -> Option<TileSize> {
    if original.is_empty() || container.is_empty() {
        return None;
    }

    let width_ratio = container.width as f64 / original.width as f64;
    let height_ratio = container.height as f64 / original.height as f64;
    let ratio = width_ratio.min(height_ratio) * MAX_CONTAINER_SHARE;

    // Nudge before flooring so exact products are not lost to float error
    let scale = |edge: u32| ((edge as f64 * ratio + 1e-9).floor() as u32).max(1);

    Some(TileSize::new(scale(original.width), scale(original.height)))
}
