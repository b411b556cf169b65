//! Playback wiring: FrameSource -> FrameRasterizer -> TerminalSurface.

use std::io::{self, Write};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::input::{setup_ctrlc_handler, QuitWatcher};
use crate::raster::{FrameRasterizer, RasterOptions, RESET};
use crate::stream::{Frame, FrameSource, StopReason, StreamSettings};
use crate::terminal::{platform_notifier, RawModeGuard, TerminalSurface};

/// Everything a playback run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackOptions {
    pub url: String,
    pub stream: StreamSettings,
    pub raster: RasterOptions,
    pub quit_key: char,
    pub poll: Duration,
}

impl PlaybackOptions {
    pub fn from_config(url: impl Into<String>, config: &Config) -> Self {
        Self {
            url: url.into(),
            stream: config.stream_settings(),
            raster: config.raster_options(),
            quit_key: config.input.quit_key,
            poll: Duration::from_millis(config.input.poll_ms),
        }
    }
}

/// Per-frame renderer bound into the [`FrameSource`].
///
/// `quit` runs after each frame is written; returning `true` ends playback.
pub struct Player<'s, W: Write, Q> {
    surface: &'s mut TerminalSurface<W>,
    rasterizer: FrameRasterizer,
    buffer: String,
    quit: Q,
    rendered: u64,
}

impl<'s, W, Q> Player<'s, W, Q>
where
    W: Write,
    Q: FnMut() -> io::Result<bool>,
{
    pub fn new(surface: &'s mut TerminalSurface<W>, rasterizer: FrameRasterizer, quit: Q) -> Self {
        Self {
            surface,
            rasterizer,
            buffer: String::new(),
            quit,
            rendered: 0,
        }
    }

    /// Apply pending resizes, draw `frame`, then check for the exit key.
    pub fn on_frame(&mut self, frame: &Frame) -> Result<bool> {
        self.surface.process_events()?;

        let dims = self.surface.size();
        if self.rasterizer.rasterize_into(frame, dims, &mut self.buffer) > 0 {
            self.surface.write_frame(&self.buffer)?;
            self.rendered += 1;
        }

        let quit = (self.quit)()
            .map_err(|e| Error::Terminal(format!("keyboard poll failed: {}", e)))?;
        Ok(!quit)
    }

    pub fn rendered(&self) -> u64 {
        self.rendered
    }
}

/// The terminal video player.
pub struct Application {
    options: PlaybackOptions,
}

impl Application {
    pub fn new(options: PlaybackOptions) -> Self {
        Self { options }
    }

    /// Play the stream until it ends or the user quits.
    ///
    /// The terminal is restored (cursor shown, colors reset, cooked mode)
    /// on every exit path.
    pub fn execute(&self) -> Result<StopReason> {
        if let Err(e) = setup_ctrlc_handler() {
            log::warn!("Failed to install Ctrl+C handler: {}", e);
        }

        let mut notifier = platform_notifier();
        let mut surface = TerminalSurface::new(io::stdout(), notifier.as_mut())?;

        let mut source = FrameSource::new(self.options.stream.clone());
        source.open(&self.options.url)?;

        let raw_mode = match RawModeGuard::enter() {
            Ok(guard) => Some(guard),
            Err(e) => {
                log::warn!("Raw mode unavailable, quit key disabled: {}", e);
                None
            }
        };

        let raster = RasterOptions {
            line_ending: if raw_mode.is_some() { "\r\n" } else { "\n" },
            ..self.options.raster.clone()
        };
        let watcher = QuitWatcher::new(self.options.quit_key, self.options.poll, raw_mode.is_some());

        surface.hide_cursor()?;

        let result = {
            let surface = &mut surface;
            let mut player = Player::new(surface, FrameRasterizer::new(raster), move || {
                watcher.quit_requested()
            });
            source.bind(Box::new(move |frame: &Frame| player.on_frame(frame)));
            let result = source.start();
            drop(source);
            result
        };

        let restored = restore(&mut surface);
        drop(raw_mode);

        let reason = result?;
        restored?;
        Ok(reason)
    }
}

fn restore<W: Write>(surface: &mut TerminalSurface<W>) -> Result<()> {
    surface.show_cursor()?;
    surface.write_frame(RESET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::PixelFormat;
    use crate::terminal::{ManualResizeNotifier, TerminalDimensions};

    fn four_by_two() -> io::Result<TerminalDimensions> {
        Ok(TerminalDimensions::new(4, 2))
    }

    #[test]
    fn test_options_from_default_config() {
        let opts = PlaybackOptions::from_config("https://example.com/v.mp4", &Config::default());
        assert_eq!(opts.quit_key, 'q');
        assert_eq!(opts.poll, Duration::from_millis(5));
        assert_eq!(opts.raster, RasterOptions::default());
        assert_eq!(opts.stream, StreamSettings::default());
    }

    #[test]
    fn test_player_draws_and_honours_quit() {
        let mut notifier = ManualResizeNotifier::new();
        let mut surface =
            TerminalSurface::with_probe(Vec::new(), &mut notifier, four_by_two).unwrap();
        let frame = Frame::new(vec![7; Frame::byte_len(8, 4)], 8, 4, PixelFormat::Rgb24);

        let mut calls = 0;
        let mut player = Player::new(&mut surface, FrameRasterizer::default(), || {
            calls += 1;
            Ok(calls >= 2)
        });

        assert!(player.on_frame(&frame).unwrap());
        assert!(!player.on_frame(&frame).unwrap());
        assert_eq!(player.rendered(), 2);
        drop(player);

        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(out.matches('\u{2588}').count(), 16);
    }
}
