/// Media decoding module
///
/// This module handles:
/// - Decoding downloaded GIFs into displayable frames
/// - Frame timing for looping playback

pub mod gif;

pub use gif::AnimatedGif;
