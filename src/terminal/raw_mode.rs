//! Raw terminal mode with panic-safe restore.
//!
//! Raw mode lets the player see single key presses (the quit key) without
//! waiting for Enter. While it is active, output needs `\r\n` line endings.

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use super::surface::SHOW_CURSOR;
use crate::raster::RESET;

/// Set while a [`RawModeGuard`] is live; read by the panic hook.
pub(crate) static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Restores cooked mode on drop.
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    /// Enable raw mode.
    ///
    /// # Errors
    /// Fails when stdin is not a terminal.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);
        log::debug!("Raw mode enabled");

        Ok(Self { active: true })
    }

    /// Leave raw mode early. Later drops are no-ops.
    pub fn exit(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);
            disable_raw_mode()?;
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.active {
            RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);
            let _ = disable_raw_mode();
        }
    }
}

/// Chain a panic hook that gives the terminal back (cooked mode, visible
/// cursor, default colors) before the panic message is printed.
pub(crate) fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
            let mut stdout = io::stdout();
            let _ = write!(stdout, "{}{}\r\n", RESET, SHOW_CURSOR);
            let _ = stdout.flush();
            let _ = disable_raw_mode();
        }

        original_hook(panic_info);
    }));
}
