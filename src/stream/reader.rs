//! Acquisition interface between the pull loop and a frame producer.

use std::time::Duration;

use super::frame::Frame;
use crate::error::{Error, Result};
use crate::input::QuitWatcher;

/// Quit key honoured by the fallback preview.
const DEFAULT_QUIT_KEY: char = 'q';

/// Something that yields decoded frames one at a time.
pub trait FrameReader {
    /// Block until the next frame is decoded.
    ///
    /// Returns `Ok(None)` once the stream is exhausted; every later call
    /// must keep returning `Ok(None)`.
    fn read_frame(&mut self) -> Result<Option<Frame>>;

    /// Display-only fallback used when no frame callback is bound.
    ///
    /// Returns `false` to stop the pull loop. The default logs the frame
    /// and stops on Ctrl+C or, when the terminal is in raw mode, on
    /// `q`/Esc.
    fn preview(&mut self, frame: &Frame) -> Result<bool> {
        log::debug!(
            "Frame {}x{} ({}) with no renderer bound",
            frame.width,
            frame.height,
            frame.format
        );
        let keyboard = crossterm::terminal::is_raw_mode_enabled().unwrap_or(false);
        let quit = QuitWatcher::new(DEFAULT_QUIT_KEY, Duration::ZERO, keyboard)
            .quit_requested()
            .map_err(|e| Error::Terminal(format!("keyboard poll failed: {}", e)))?;
        Ok(!quit)
    }
}

impl<R: FrameReader + ?Sized> FrameReader for Box<R> {
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        (**self).read_frame()
    }

    fn preview(&mut self, frame: &Frame) -> Result<bool> {
        (**self).preview(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::PixelFormat;

    struct Empty;

    impl FrameReader for Empty {
        fn read_frame(&mut self) -> Result<Option<Frame>> {
            Ok(None)
        }
    }

    #[test]
    fn test_default_preview_keeps_going_without_quit_request() {
        let frame = Frame::new(vec![0; 3], 1, 1, PixelFormat::Rgb24);
        assert!(Empty.preview(&frame).unwrap());
        // Boxed readers forward to the same default
        let mut boxed: Box<dyn FrameReader> = Box::new(Empty);
        assert!(boxed.preview(&frame).unwrap());
    }
}
