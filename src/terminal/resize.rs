//! Resize notification sources.
//!
//! A notifier only ever invokes the registered callback; the callback the
//! surface registers just enqueues a refresh message, so nothing here
//! touches the terminal from a signal thread.

use std::sync::{Arc, Mutex};

use crate::error::Result;

/// Callback run whenever the terminal reports a new size.
pub type ResizeCallback = Box<dyn Fn() + Send + 'static>;

/// Subscription interface for terminal size changes.
pub trait ResizeNotifier {
    /// Register `callback` to run on every resize notification.
    fn on_resize(&mut self, callback: ResizeCallback) -> Result<()>;
}

/// SIGWINCH-driven notifier.
///
/// Each registration owns a `signal-hook` iterator drained on a named
/// helper thread. Dropping the notifier closes the iterators and joins
/// the threads.
#[cfg(unix)]
#[derive(Default)]
pub struct SignalResizeNotifier {
    listeners: Vec<(signal_hook::iterator::Handle, std::thread::JoinHandle<()>)>,
}

#[cfg(unix)]
impl SignalResizeNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(unix)]
impl ResizeNotifier for SignalResizeNotifier {
    fn on_resize(&mut self, callback: ResizeCallback) -> Result<()> {
        use crate::error::Error;
        use signal_hook::consts::SIGWINCH;
        use signal_hook::iterator::Signals;

        let mut signals = Signals::new([SIGWINCH])
            .map_err(|e| Error::Terminal(format!("failed to register SIGWINCH: {}", e)))?;
        let handle = signals.handle();

        let thread = std::thread::Builder::new()
            .name("resize-signal".to_string())
            .spawn(move || {
                for _ in signals.forever() {
                    log::debug!("SIGWINCH received");
                    callback();
                }
            })
            .map_err(|e| Error::Terminal(format!("failed to spawn resize listener: {}", e)))?;

        self.listeners.push((handle, thread));
        Ok(())
    }
}

#[cfg(unix)]
impl Drop for SignalResizeNotifier {
    fn drop(&mut self) {
        for (handle, thread) in self.listeners.drain(..) {
            handle.close();
            let _ = thread.join();
        }
    }
}

/// Notifier fired by hand.
///
/// Used on platforms without SIGWINCH and in tests. Clones share the same
/// callback list, so a clone kept by the host can trigger callbacks that
/// were registered through another clone.
#[derive(Clone, Default)]
pub struct ManualResizeNotifier {
    callbacks: Arc<Mutex<Vec<ResizeCallback>>>,
}

impl ManualResizeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every registered callback once.
    pub fn trigger(&self) {
        if let Ok(callbacks) = self.callbacks.lock() {
            for callback in callbacks.iter() {
                callback();
            }
        }
    }

    /// Number of registered callbacks.
    pub fn subscribers(&self) -> usize {
        self.callbacks.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl ResizeNotifier for ManualResizeNotifier {
    fn on_resize(&mut self, callback: ResizeCallback) -> Result<()> {
        if let Ok(mut callbacks) = self.callbacks.lock() {
            callbacks.push(callback);
        }
        Ok(())
    }
}

/// The notifier appropriate for the current platform.
#[cfg(unix)]
pub fn platform_notifier() -> Box<dyn ResizeNotifier> {
    Box::new(SignalResizeNotifier::new())
}

/// The notifier appropriate for the current platform.
#[cfg(not(unix))]
pub fn platform_notifier() -> Box<dyn ResizeNotifier> {
    Box::new(ManualResizeNotifier::new())
}
