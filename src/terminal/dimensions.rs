//! Terminal character-grid size.

use std::fmt;
use std::io;

/// Current terminal size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalDimensions {
    /// Columns
    pub width: u16,
    /// Rows
    pub height: u16,
}

impl TerminalDimensions {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Ask the controlling terminal for its size.
    pub fn query() -> io::Result<Self> {
        let (cols, rows) = crossterm::terminal::size()?;
        Ok(Self::new(cols, rows))
    }

    /// Overwrite with a freshly reported size.
    pub fn apply(&mut self, other: TerminalDimensions) {
        self.width = other.width;
        self.height = other.height;
    }

    /// True when either axis is zero and nothing can be drawn.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u16, u16)> for TerminalDimensions {
    fn from((cols, rows): (u16, u16)) -> Self {
        Self::new(cols, rows)
    }
}

impl fmt::Display for TerminalDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Width: {} Height: {}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let dims = TerminalDimensions::default();
        assert_eq!(dims.width, 0);
        assert_eq!(dims.height, 0);
        assert!(dims.is_empty());
    }

    #[test]
    fn test_apply_overwrites_in_place() {
        let mut dims = TerminalDimensions::new(80, 24);
        dims.apply(TerminalDimensions::new(120, 40));
        assert_eq!(dims, TerminalDimensions::new(120, 40));
        assert!(!dims.is_empty());
    }

    #[test]
    fn test_from_crossterm_tuple() {
        // crossterm reports (cols, rows)
        let dims: TerminalDimensions = (100, 30).into();
        assert_eq!(dims.width, 100);
        assert_eq!(dims.height, 30);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TerminalDimensions::new(80, 24).to_string(),
            "Width: 80 Height: 24"
        );
    }
}
