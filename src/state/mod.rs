/// State management module
///
/// This module handles the overlay editing state, including:
/// - Persisted per-overlay placement (record.rs)
/// - Scale/rotation transform math (transform.rs)
/// - The overlay canvas model and its gestures (overlay.rs)
/// - Saved layouts on disk (layout.rs)

pub mod layout;
pub mod overlay;
pub mod record;
pub mod transform;

pub use layout::LayoutDocument;
pub use overlay::{OverlayCanvas, PanFeedback};
pub use record::TransformRecord;
pub use transform::Transform2D;
