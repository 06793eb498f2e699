/// User interface module
///
/// Rendering adapters over the state module:
/// - The target canvas overlay (canvas.rs)
/// - The source gallery grid (gallery.rs)
/// - Window geometry recomputed on resize (geometry.rs)
/// - Native dialogs (dialog.rs)

pub mod canvas;
pub mod dialog;
pub mod gallery;
pub mod geometry;
