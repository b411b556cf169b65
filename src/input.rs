//! Exit-key handling.
//!
//! Playback stops on the configured quit key (case-insensitive), Esc, or
//! Ctrl+C. In raw mode Ctrl+C arrives as a key event rather than SIGINT;
//! outside raw mode the Ctrl+C handler sets a global flag instead.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Set by the Ctrl+C handler.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Check if Ctrl+C has been received.
pub fn ctrlc_received() -> bool {
    CTRLC_RECEIVED.load(Ordering::SeqCst)
}

/// Install the Ctrl+C handler. Call once at startup.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        CTRLC_RECEIVED.store(true, Ordering::SeqCst);
    })
}

/// True when `event` should end playback.
pub fn is_quit_event(event: &KeyEvent, quit_key: char) -> bool {
    // Ignore release/repeat reports from terminals with the kitty protocol
    if event.kind != KeyEventKind::Press {
        return false;
    }

    match event.code {
        KeyCode::Esc => true,
        KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::CONTROL) => {
            c.eq_ignore_ascii_case(&'c')
        }
        KeyCode::Char(c) => c.to_lowercase().eq(quit_key.to_lowercase()),
        _ => false,
    }
}

/// Polls the keyboard between frames.
#[derive(Debug, Clone, Copy)]
pub struct QuitWatcher {
    quit_key: char,
    timeout: Duration,
    keyboard: bool,
}

impl QuitWatcher {
    /// `keyboard` is false when stdin is not a raw-mode terminal; only the
    /// Ctrl+C flag is checked then.
    pub fn new(quit_key: char, timeout: Duration, keyboard: bool) -> Self {
        Self {
            quit_key,
            timeout,
            keyboard,
        }
    }

    /// Drain pending input; true if any of it asks to quit.
    ///
    /// Waits at most `timeout` for the first event, then takes whatever
    /// else is already queued without waiting.
    pub fn quit_requested(&self) -> io::Result<bool> {
        if ctrlc_received() {
            return Ok(true);
        }
        if !self.keyboard {
            return Ok(false);
        }

        let mut wait = self.timeout;
        while event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if is_quit_event(&key, self.quit_key) {
                    log::info!("Quit key pressed: {:?}", key.code);
                    return Ok(true);
                }
            }
            wait = Duration::ZERO;
        }
        Ok(false)
    }
}
