/// Debounced search pipeline
///
/// - Single-slot debounce with generation tickets (debounce.rs)
/// - Query/result state and stale-result filtering (controller.rs)

pub mod controller;
pub mod debounce;

pub use controller::{Applied, SearchController};
pub use debounce::Ticket;
