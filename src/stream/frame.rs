//! Decoded frame type handed from the decoder to the rasterizer.

use std::fmt;
use std::time::Instant;

/// Byte order of each 3-byte pixel in a [`Frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// Red, green, blue
    #[default]
    Rgb24,
    /// Blue, green, red (OpenCV's native order)
    Bgr24,
}

impl PixelFormat {
    /// Name understood by ffmpeg's `-pix_fmt`.
    pub fn ffmpeg_name(self) -> &'static str {
        match self {
            PixelFormat::Rgb24 => "rgb24",
            PixelFormat::Bgr24 => "bgr24",
        }
    }

    /// Reorder raw pixel bytes into red, green, blue.
    pub fn to_rgb(self, px: [u8; 3]) -> [u8; 3] {
        match self {
            PixelFormat::Rgb24 => px,
            PixelFormat::Bgr24 => [px[2], px[1], px[0]],
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ffmpeg_name())
    }
}

/// A decoded video frame.
///
/// Pixels are stored row-major, 3 bytes each, in the order named by `format`.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel byte order
    pub format: PixelFormat,
    /// When the frame was read from the decoder
    pub timestamp: Instant,
}

impl Frame {
    pub const BYTES_PER_PIXEL: usize = 3;

    /// Create a frame, stamping it with the current time.
    pub fn new(data: Vec<u8>, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            data,
            width,
            height,
            format,
            timestamp: Instant::now(),
        }
    }

    /// Number of bytes a `width` x `height` frame occupies.
    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * Self::BYTES_PER_PIXEL
    }

    /// True when there is nothing to sample.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.len() < Self::byte_len(self.width, self.height)
    }

    /// Raw bytes of the pixel at `(row, col)`, in the frame's own byte order.
    ///
    /// Callers must keep `row < height` and `col < width`.
    pub fn pixel(&self, row: u32, col: u32) -> [u8; 3] {
        let idx = (row as usize * self.width as usize + col as usize) * Self::BYTES_PER_PIXEL;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_row_major() {
        // 2x2: A B / C D
        let frame = Frame::new(
            vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4],
            2,
            2,
            PixelFormat::Rgb24,
        );
        assert_eq!(frame.pixel(0, 1), [2, 2, 2]);
        assert_eq!(frame.pixel(1, 0), [3, 3, 3]);
        assert_eq!(frame.pixel(1, 1), [4, 4, 4]);
    }

    #[test]
    fn test_is_empty() {
        assert!(Frame::new(Vec::new(), 0, 0, PixelFormat::Rgb24).is_empty());
        // Declared 2x1 but only one pixel of data
        assert!(Frame::new(vec![0; 3], 2, 1, PixelFormat::Rgb24).is_empty());
        assert!(!Frame::new(vec![0; 6], 2, 1, PixelFormat::Rgb24).is_empty());
    }

    #[test]
    fn test_bgr_to_rgb() {
        assert_eq!(PixelFormat::Bgr24.to_rgb([1, 2, 3]), [3, 2, 1]);
        assert_eq!(PixelFormat::Rgb24.to_rgb([1, 2, 3]), [1, 2, 3]);
    }

    #[test]
    fn test_byte_len() {
        assert_eq!(Frame::byte_len(640, 360), 640 * 360 * 3);
    }
}
