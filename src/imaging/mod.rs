/// Image handling module
///
/// This module handles:
/// - Decoding image files once and serving them from a bounded cache
/// - Rendering the square gallery thumbnails
/// - Fitting dropped images to the target canvas

pub mod cache;
pub mod sizing;
pub mod thumbnail;

pub use cache::ImageCache;
pub use sizing::compute_display_size;
