/// GIPHY sticker search and a gesture-driven GIF overlay canvas for iced
///
/// - GIPHY endpoints, client and response decoding (giphy)
/// - Debounced search with stale-result filtering (search)
/// - GIF decoding and frame timing (media)
/// - Overlay canvas model, transform records and saved layouts (state)
/// - Picker panel, result grid, gestures and the canvas program (ui)
/// - The demo host application (app)

pub mod app;
pub mod config;
pub mod error;
pub mod giphy;
pub mod media;
pub mod search;
pub mod state;
pub mod ui;

pub use error::{LayerError, Result};
