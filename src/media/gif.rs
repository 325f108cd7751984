/// Animated GIF decoding and frame timing
///
/// GIFs are decoded once into RGBA frames wrapped in iced image handles.
/// Views pick the frame to show from the time elapsed since the app started,
/// so every copy of the same GIF animates in lockstep.

use std::io::Cursor;
use std::time::Duration;

use iced::widget::image::Handle;
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageFormat};
use tokio::task;

use crate::error::{LayerError, Result};

/// Browsers clamp tiny GIF delays to 100ms; without it many stickers spin
const MIN_FRAME_DELAY: Duration = Duration::from_millis(20);
const CLAMPED_FRAME_DELAY: Duration = Duration::from_millis(100);

/// A single decoded frame
#[derive(Debug, Clone)]
pub struct GifFrame {
    pub handle: Handle,
    pub delay: Duration,
}

/// A decoded (possibly single-frame) image ready for display
#[derive(Debug, Clone)]
pub struct AnimatedGif {
    frames: Vec<GifFrame>,
    width: u32,
    height: u32,
    total: Duration,
}

impl AnimatedGif {
    /// Decode on a blocking thread; GIF decoding is CPU-bound
    pub async fn decode(bytes: Vec<u8>) -> Result<Self> {
        task::spawn_blocking(move || Self::decode_blocking(&bytes))
            .await
            .map_err(|e| LayerError::Image(format!("Task join error: {}", e)))?
    }

    /// Decode GIF bytes, falling back to any still format the image crate knows
    pub fn decode_blocking(bytes: &[u8]) -> Result<Self> {
        if image::guess_format(bytes).ok() != Some(ImageFormat::Gif) {
            let still = image::load_from_memory(bytes)?.to_rgba8();
            let (width, height) = still.dimensions();
            let frame = GifFrame {
                handle: Handle::from_rgba(width, height, still.into_raw()),
                delay: Duration::ZERO,
            };
            return Ok(Self::from_frames(vec![frame], width, height));
        }

        let decoder = GifDecoder::new(Cursor::new(bytes))?;
        let raw_frames = decoder.into_frames().collect_frames()?;

        let mut width = 0;
        let mut height = 0;
        let mut frames = Vec::with_capacity(raw_frames.len());

        for frame in raw_frames {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay = if denom == 0 {
                Duration::ZERO
            } else {
                Duration::from_micros(u64::from(numer) * 1000 / u64::from(denom))
            };

            let buffer = frame.into_buffer();
            let (w, h) = buffer.dimensions();
            width = width.max(w);
            height = height.max(h);

            frames.push(GifFrame {
                handle: Handle::from_rgba(w, h, buffer.into_raw()),
                delay: normalize_delay(delay),
            });
        }

        if frames.is_empty() {
            return Err(LayerError::Image("GIF contains no frames".to_string()));
        }

        Ok(Self::from_frames(frames, width, height))
    }

    fn from_frames(frames: Vec<GifFrame>, width: u32, height: u32) -> Self {
        let total = frames.iter().map(|f| f.delay).sum();
        Self {
            frames,
            width,
            height,
            total,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1 && !self.total.is_zero()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Index of the frame visible `elapsed` into a looping playback
    pub fn frame_index_at(&self, elapsed: Duration) -> usize {
        if !self.is_animated() {
            return 0;
        }

        let mut position = Duration::from_nanos(
            (elapsed.as_nanos() % self.total.as_nanos()) as u64,
        );

        for (index, frame) in self.frames.iter().enumerate() {
            if position < frame.delay {
                return index;
            }
            position -= frame.delay;
        }

        self.frames.len() - 1
    }

    /// Image handle to draw `elapsed` into playback
    pub fn frame_at(&self, elapsed: Duration) -> &Handle {
        &self.frames[self.frame_index_at(elapsed)].handle
    }
}

fn normalize_delay(delay: Duration) -> Duration {
    if delay < MIN_FRAME_DELAY {
        CLAMPED_FRAME_DELAY
    } else {
        delay
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::codecs::gif::{GifEncoder, Repeat};
    use image::{Delay, Frame, Rgba, RgbaImage};

    /// Encode a small looping GIF with the given frame delays (ms)
    pub(crate) fn sample_gif(delays_ms: &[u32]) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut bytes);
            encoder.set_repeat(Repeat::Infinite).unwrap();
            let frames = delays_ms.iter().enumerate().map(|(i, &ms)| {
                let shade = (i as u8).wrapping_mul(60);
                let buffer = RgbaImage::from_pixel(4, 3, Rgba([shade, 0, 255 - shade, 255]));
                Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(ms, 1))
            });
            encoder.encode_frames(frames).unwrap();
        }
        bytes
    }

    #[test]
    fn test_decode_frames_and_dimensions() {
        let gif = AnimatedGif::decode_blocking(&sample_gif(&[100, 200, 100])).unwrap();
        assert_eq!(gif.frame_count(), 3);
        assert_eq!(gif.dimensions(), (4, 3));
        assert!(gif.is_animated());
    }

    #[test]
    fn test_frame_timing_loops() {
        let gif = AnimatedGif::decode_blocking(&sample_gif(&[100, 200, 100])).unwrap();
        assert_eq!(gif.frame_index_at(Duration::from_millis(0)), 0);
        assert_eq!(gif.frame_index_at(Duration::from_millis(150)), 1);
        assert_eq!(gif.frame_index_at(Duration::from_millis(350)), 2);
        // Second loop
        assert_eq!(gif.frame_index_at(Duration::from_millis(450)), 0);
    }

    #[test]
    fn test_tiny_delays_are_clamped() {
        assert_eq!(normalize_delay(Duration::from_millis(0)), CLAMPED_FRAME_DELAY);
        assert_eq!(normalize_delay(Duration::from_millis(10)), CLAMPED_FRAME_DELAY);
        assert_eq!(normalize_delay(Duration::from_millis(40)), Duration::from_millis(40));
    }

    #[test]
    fn test_garbage_bytes_fail() {
        assert!(AnimatedGif::decode_blocking(b"definitely not an image").is_err());
    }

    #[tokio::test]
    async fn test_async_decode() {
        let gif = AnimatedGif::decode(sample_gif(&[50])).await.unwrap();
        assert_eq!(gif.frame_count(), 1);
        assert!(!gif.is_animated());
        assert_eq!(gif.frame_index_at(Duration::from_secs(3)), 0);
    }
}
