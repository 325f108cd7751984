/// User interface module
///
/// This module handles everything drawn on screen, including:
/// - Tween helpers for panel, cancel button and delete target (anim.rs)
/// - Bottom-sheet panel state machine (panel.rs)
/// - Result grid and search row (grid.rs)
/// - The GIF picker component tying search, grid and panel together (picker.rs)
/// - Pointer/touch gesture recognition (gestures.rs)
/// - The overlay canvas program (canvas.rs)

pub mod anim;
pub mod canvas;
pub mod gestures;
pub mod grid;
pub mod panel;
pub mod picker;

pub use canvas::{BasePicture, OverlayLayer};
pub use picker::GifPicker;
