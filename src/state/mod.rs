/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The source gallery built from an image folder (gallery.rs)
/// - The target canvas and its tiles (canvas.rs)
/// - Adaptive-mode sizing and its transition (adaptive.rs)
/// - Saving and restoring the canvas layout (layout.rs)
/// - Pointer gestures: gallery drags, tile moves and resizes (interaction.rs)

pub mod adaptive;
pub mod canvas;
pub mod data;
pub mod gallery;
pub mod interaction;
pub mod layout;
