//! Terminal output, size tracking and resize notification.

mod dimensions;
mod raw_mode;
mod resize;
mod surface;

pub use dimensions::TerminalDimensions;
pub use raw_mode::RawModeGuard;
#[cfg(unix)]
pub use resize::SignalResizeNotifier;
pub use resize::{platform_notifier, ManualResizeNotifier, ResizeCallback, ResizeNotifier};
pub use surface::{
    SizeProbe, SurfaceEvent, TerminalSurface, CLEAR_SCREEN, CURSOR_HOME, HIDE_CURSOR, SHOW_CURSOR,
};
