//! ANSI output surface.
//!
//! Owns the terminal size and every escape sequence the player writes.
//! Resize notifications arrive on an mpsc channel and are applied on the
//! thread that owns the surface, inside [`TerminalSurface::process_events`].

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use super::dimensions::TerminalDimensions;
use super::resize::ResizeNotifier;
use crate::color::ColorSample;
use crate::error::{Error, Result};
use crate::raster::{push_colored, BLOCK_GLYPH};

pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";
/// RIS: full reset, clears the screen and scrollback position.
pub const CLEAR_SCREEN: &str = "\x1bc";
pub const CURSOR_HOME: &str = "\x1b[H";

/// Messages delivered to the surface from other execution contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Terminal size may have changed
    Refresh,
}

/// Function used to learn the current terminal size.
pub type SizeProbe = fn() -> io::Result<TerminalDimensions>;

/// Terminal output with resize tracking.
pub struct TerminalSurface<W: Write> {
    out: W,
    size: TerminalDimensions,
    probe: SizeProbe,
    glyph: char,
    cursor_hidden: bool,
    events_tx: Sender<SurfaceEvent>,
    events_rx: Receiver<SurfaceEvent>,
}

impl<W: Write> TerminalSurface<W> {
    /// Create a surface that queries the real terminal for its size.
    pub fn new(out: W, notifier: &mut dyn ResizeNotifier) -> Result<Self> {
        Self::with_probe(out, notifier, TerminalDimensions::query)
    }

    /// Create a surface with a custom size probe.
    ///
    /// Registers with `notifier` and queues one refresh so the first
    /// [`process_events`](Self::process_events) picks up the initial size.
    pub fn with_probe(out: W, notifier: &mut dyn ResizeNotifier, probe: SizeProbe) -> Result<Self> {
        let (events_tx, events_rx) = mpsc::channel();

        let tx = events_tx.clone();
        notifier.on_resize(Box::new(move || {
            // Receiver gone means the surface was dropped; nothing to refresh
            let _ = tx.send(SurfaceEvent::Refresh);
        }))?;

        let _ = events_tx.send(SurfaceEvent::Refresh);

        Ok(Self {
            out,
            size: TerminalDimensions::default(),
            probe,
            glyph: BLOCK_GLYPH,
            cursor_hidden: false,
            events_tx,
            events_rx,
        })
    }

    /// Current terminal size as of the last processed refresh.
    pub fn size(&self) -> TerminalDimensions {
        self.size
    }

    /// Glyph used by [`draw_pixel`](Self::draw_pixel).
    pub fn set_glyph(&mut self, glyph: char) {
        self.glyph = glyph;
    }

    /// Sender other contexts can use to queue events for this surface.
    pub fn events(&self) -> Sender<SurfaceEvent> {
        self.events_tx.clone()
    }

    /// Apply every queued event. Returns how many were handled.
    pub fn process_events(&mut self) -> Result<usize> {
        let mut handled = 0;
        loop {
            match self.events_rx.try_recv() {
                Ok(SurfaceEvent::Refresh) => {
                    self.refresh_size()?;
                    handled += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        Ok(handled)
    }

    /// Re-read the terminal size and clear the screen.
    ///
    /// If the probe fails the previous size is kept.
    pub fn refresh_size(&mut self) -> Result<()> {
        match (self.probe)() {
            Ok(dims) => {
                if dims != self.size {
                    log::info!("Terminal resized: {} -> {}", self.size, dims);
                }
                self.size.apply(dims);
            }
            Err(e) => log::warn!("Failed to query terminal size: {}", e),
        }
        self.clear()
    }

    /// Draw one colored glyph at column `x`, row `y` (1-based).
    pub fn draw_pixel(&mut self, x: u16, y: u16, color: ColorSample) -> Result<()> {
        let mut cell = format!("\x1b[{};{}H", y, x);
        push_colored(&mut cell, color, self.glyph);
        self.write_raw(cell.as_bytes())
    }

    pub fn hide_cursor(&mut self) -> Result<()> {
        self.cursor_hidden = true;
        self.write_raw(HIDE_CURSOR.as_bytes())
    }

    pub fn show_cursor(&mut self) -> Result<()> {
        self.cursor_hidden = false;
        self.write_raw(SHOW_CURSOR.as_bytes())
    }

    /// Full-screen clear, flushed immediately.
    ///
    /// `ESC c` resets cursor visibility, so a hidden cursor is hidden again.
    pub fn clear(&mut self) -> Result<()> {
        self.out
            .write_all(CLEAR_SCREEN.as_bytes())
            .map_err(Error::OutputFailure)?;
        if self.cursor_hidden {
            self.out
                .write_all(HIDE_CURSOR.as_bytes())
                .map_err(Error::OutputFailure)?;
        }
        self.out.flush().map_err(Error::OutputFailure)
    }

    pub fn cursor_home(&mut self) -> Result<()> {
        self.write_raw(CURSOR_HOME.as_bytes())
    }

    /// Write a rasterized frame from the top-left corner in one write.
    pub fn write_frame(&mut self, frame: &str) -> Result<()> {
        let mut buf = Vec::with_capacity(CURSOR_HOME.len() + frame.len());
        buf.extend_from_slice(CURSOR_HOME.as_bytes());
        buf.extend_from_slice(frame.as_bytes());
        self.write_raw(&buf)
    }

    /// Underlying writer (for inspection in tests).
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes).map_err(Error::OutputFailure)?;
        self.out.flush().map_err(Error::OutputFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::ManualResizeNotifier;

    fn fixed_80x24() -> io::Result<TerminalDimensions> {
        Ok(TerminalDimensions::new(80, 24))
    }

    fn output(surface: &TerminalSurface<Vec<u8>>) -> String {
        String::from_utf8_lossy(surface.get_ref()).into_owned()
    }

    #[test]
    fn test_initial_refresh_is_queued() {
        let mut notifier = ManualResizeNotifier::new();
        let mut surface = TerminalSurface::with_probe(Vec::new(), &mut notifier, fixed_80x24).unwrap();
        assert_eq!(surface.size(), TerminalDimensions::default());

        assert_eq!(surface.process_events().unwrap(), 1);
        assert_eq!(surface.size(), TerminalDimensions::new(80, 24));
        assert_eq!(output(&surface), CLEAR_SCREEN);
    }

    #[test]
    fn test_draw_pixel_sequence() {
        let mut notifier = ManualResizeNotifier::new();
        let mut surface = TerminalSurface::with_probe(Vec::new(), &mut notifier, fixed_80x24).unwrap();
        surface.draw_pixel(5, 3, ColorSample::new(1, 2, 3)).unwrap();
        assert_eq!(output(&surface), "\x1b[3;5H\x1b[38;2;1;2;3m\u{2588}\x1b[0m");
    }

    #[test]
    fn test_clear_rehides_cursor() {
        let mut notifier = ManualResizeNotifier::new();
        let mut surface = TerminalSurface::with_probe(Vec::new(), &mut notifier, fixed_80x24).unwrap();
        surface.hide_cursor().unwrap();
        surface.clear().unwrap();
        assert_eq!(
            output(&surface),
            format!("{}{}{}", HIDE_CURSOR, CLEAR_SCREEN, HIDE_CURSOR)
        );
    }

    #[test]
    fn test_write_frame_homes_cursor() {
        let mut notifier = ManualResizeNotifier::new();
        let mut surface = TerminalSurface::with_probe(Vec::new(), &mut notifier, fixed_80x24).unwrap();
        surface.write_frame("abc\n").unwrap();
        assert_eq!(output(&surface), "\x1b[Habc\n");
    }

    #[test]
    fn test_failed_probe_keeps_size() {
        fn broken() -> io::Result<TerminalDimensions> {
            Err(io::Error::new(io::ErrorKind::Other, "not a tty"))
        }
        let mut notifier = ManualResizeNotifier::new();
        let mut surface = TerminalSurface::with_probe(Vec::new(), &mut notifier, broken).unwrap();
        surface.process_events().unwrap();
        assert_eq!(surface.size(), TerminalDimensions::default());
        // Screen is still cleared
        assert_eq!(output(&surface), CLEAR_SCREEN);
    }
}
