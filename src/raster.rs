//! Frame-to-terminal rasterizer.
//!
//! Maps every terminal cell to a source pixel (or a block of pixels) and
//! emits one 24-bit colored glyph per cell:
//!
//! ```text
//! ESC[38;2;{r};{g};{b}m█ESC[0m
//! ```
//!
//! Work per frame is proportional to the terminal size, not the video
//! resolution, when nearest sampling is used.

use std::fmt::Write as _;

use crate::color::ColorSample;
use crate::stream::Frame;
use crate::terminal::TerminalDimensions;

/// Solid block glyph (U+2588).
pub const BLOCK_GLYPH: char = '\u{2588}';

/// Reset all SGR attributes.
pub const RESET: &str = "\x1b[0m";

/// How a terminal cell picks its color from the source frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sampling {
    /// Single pixel at the cell's anchor
    #[default]
    Nearest,
    /// Mean of the stride-sized block starting at the anchor
    Average,
}

/// Which frame axis is treated as horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Columns map to terminal columns, rows to terminal rows
    #[default]
    RowMajor,
    /// Legacy indexing: the frame's row count is used as its width and
    /// the sampled pixel is `(row = x-derived, col = y-derived)`
    Transposed,
}

/// How pixel bytes become the escape sequence's r, g, b fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMapping {
    /// Honour [`Frame::format`], so the escape always carries true RGB
    #[default]
    Decoded,
    /// Byte 0 is written as red whatever the frame format says
    Raw,
}

/// Rasterizer knobs. The defaults produce the plain block renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterOptions {
    pub glyph: char,
    pub line_ending: &'static str,
    pub sampling: Sampling,
    pub orientation: Orientation,
    pub channels: ChannelMapping,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            glyph: BLOCK_GLYPH,
            line_ending: "\n",
            sampling: Sampling::default(),
            orientation: Orientation::default(),
            channels: ChannelMapping::default(),
        }
    }
}

/// Source-pixel lookup for one terminal cell.
///
/// Returned by [`FrameRasterizer::sample_grid`]; `row`/`col` always lie
/// inside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSample {
    pub row: u32,
    pub col: u32,
}

/// Strides and extents after orientation has been applied.
struct Geometry {
    /// Extent walked by terminal columns
    across: u32,
    /// Extent walked by terminal rows
    down: u32,
    ax: u32,
    ay: u32,
}

/// Downsamples decoded frames into ANSI-colored text.
#[derive(Debug, Clone, Default)]
pub struct FrameRasterizer {
    options: RasterOptions,
}

impl FrameRasterizer {
    pub fn new(options: RasterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    /// Render `frame` at `dims` into a fresh buffer.
    ///
    /// Returns an empty string when either terminal axis is zero or the
    /// frame carries no pixels.
    pub fn rasterize(&self, frame: &Frame, dims: TerminalDimensions) -> String {
        let mut out = String::new();
        self.rasterize_into(frame, dims, &mut out);
        out
    }

    /// Render into an existing buffer to avoid per-frame allocation.
    ///
    /// The buffer is cleared first. Returns the number of glyphs written.
    pub fn rasterize_into(&self, frame: &Frame, dims: TerminalDimensions, out: &mut String) -> usize {
        out.clear();

        let Some(geo) = self.geometry(frame, dims) else {
            return 0;
        };

        // Escape sequence + glyph is at most 24 bytes per cell
        out.reserve(dims.width as usize * dims.height as usize * 24 + dims.height as usize * 2);

        for y in 0..dims.height as u32 {
            let i = y.saturating_mul(geo.ay).min(geo.down - 1);
            for x in 0..dims.width as u32 {
                let j = x.saturating_mul(geo.ax).min(geo.across - 1);
                let color = self.cell_color(frame, &geo, i, j);
                self.push_glyph(out, color);
            }
            out.push_str(self.options.line_ending);
        }

        dims.width as usize * dims.height as usize
    }

    /// Source coordinates every cell samples, row-major by terminal cell.
    ///
    /// Empty under the same conditions as [`rasterize`](Self::rasterize).
    pub fn sample_grid(&self, frame: &Frame, dims: TerminalDimensions) -> Vec<CellSample> {
        let Some(geo) = self.geometry(frame, dims) else {
            return Vec::new();
        };

        let mut cells = Vec::with_capacity(dims.width as usize * dims.height as usize);
        for y in 0..dims.height as u32 {
            let i = y.saturating_mul(geo.ay).min(geo.down - 1);
            for x in 0..dims.width as u32 {
                let j = x.saturating_mul(geo.ax).min(geo.across - 1);
                cells.push(self.locate(i, j));
            }
        }
        cells
    }

    fn geometry(&self, frame: &Frame, dims: TerminalDimensions) -> Option<Geometry> {
        if dims.is_empty() || frame.is_empty() {
            return None;
        }

        let (across, down) = match self.options.orientation {
            Orientation::RowMajor => (frame.width, frame.height),
            Orientation::Transposed => (frame.height, frame.width),
        };

        Some(Geometry {
            across,
            down,
            ax: across / dims.width as u32,
            ay: down / dims.height as u32,
        })
    }

    /// Translate (terminal-row index, terminal-column index) into a frame pixel.
    fn locate(&self, i: u32, j: u32) -> CellSample {
        match self.options.orientation {
            Orientation::RowMajor => CellSample { row: i, col: j },
            Orientation::Transposed => CellSample { row: j, col: i },
        }
    }

    fn cell_color(&self, frame: &Frame, geo: &Geometry, i: u32, j: u32) -> ColorSample {
        match self.options.sampling {
            Sampling::Nearest => self.read(frame, self.locate(i, j)),
            Sampling::Average => {
                let i_end = (i + geo.ay.max(1)).min(geo.down);
                let j_end = (j + geo.ax.max(1)).min(geo.across);

                let mut sum = ColorSample::default();
                let mut count = 0;
                for ii in i..i_end {
                    for jj in j..j_end {
                        sum = sum + self.read(frame, self.locate(ii, jj));
                        count += 1;
                    }
                }
                sum / count
            }
        }
    }

    fn read(&self, frame: &Frame, cell: CellSample) -> ColorSample {
        let px = frame.pixel(cell.row, cell.col);
        match self.options.channels {
            ChannelMapping::Decoded => ColorSample::from_rgb(frame.format.to_rgb(px)),
            ChannelMapping::Raw => ColorSample::from_rgb(px),
        }
    }

    fn push_glyph(&self, out: &mut String, color: ColorSample) {
        push_colored(out, color, self.options.glyph);
    }
}

/// Append `ESC[38;2;r;g;bm{glyph}ESC[0m` to `out`.
pub fn push_colored(out: &mut String, color: ColorSample, glyph: char) {
    let [r, g, b] = color.to_bytes();
    // Writing to a String cannot fail
    let _ = write!(out, "\x1b[38;2;{};{};{}m{}{}", r, g, b, glyph, RESET);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::PixelFormat;

    fn solid(width: u32, height: u32, px: [u8; 3]) -> Frame {
        let data = px.iter().copied().cycle().take(Frame::byte_len(width, height)).collect();
        Frame::new(data, width, height, PixelFormat::Rgb24)
    }

    #[test]
    fn test_zero_dimensions_produce_nothing() {
        let r = FrameRasterizer::default();
        let frame = solid(4, 4, [1, 2, 3]);
        assert!(r.rasterize(&frame, TerminalDimensions::new(0, 10)).is_empty());
        assert!(r.rasterize(&frame, TerminalDimensions::new(10, 0)).is_empty());
    }

    #[test]
    fn test_empty_frame_produces_nothing() {
        let r = FrameRasterizer::default();
        let frame = Frame::new(Vec::new(), 0, 0, PixelFormat::Rgb24);
        assert!(r.rasterize(&frame, TerminalDimensions::new(10, 10)).is_empty());
    }

    #[test]
    fn test_single_glyph_bytes() {
        let r = FrameRasterizer::default();
        let frame = solid(1, 1, [10, 20, 30]);
        assert_eq!(
            r.rasterize(&frame, TerminalDimensions::new(1, 1)),
            "\x1b[38;2;10;20;30m\u{2588}\x1b[0m\n"
        );
    }

    #[test]
    fn test_rasterize_into_reuses_buffer() {
        let r = FrameRasterizer::default();
        let frame = solid(2, 2, [0, 0, 0]);
        let mut buf = String::from("stale");
        let n = r.rasterize_into(&frame, TerminalDimensions::new(2, 2), &mut buf);
        assert_eq!(n, 4);
        assert!(!buf.contains("stale"));
        assert_eq!(buf.matches('\n').count(), 2);
    }

    #[test]
    fn test_bgr_frame_decoded_to_rgb() {
        let r = FrameRasterizer::default();
        let frame = Frame::new(vec![1, 2, 3], 1, 1, PixelFormat::Bgr24);
        assert!(r
            .rasterize(&frame, TerminalDimensions::new(1, 1))
            .starts_with("\x1b[38;2;3;2;1m"));
    }

    #[test]
    fn test_raw_channels_keep_byte_order() {
        let r = FrameRasterizer::new(RasterOptions {
            channels: ChannelMapping::Raw,
            ..RasterOptions::default()
        });
        let frame = Frame::new(vec![1, 2, 3], 1, 1, PixelFormat::Bgr24);
        assert!(r
            .rasterize(&frame, TerminalDimensions::new(1, 1))
            .starts_with("\x1b[38;2;1;2;3m"));
    }

    #[test]
    fn test_average_sampling_blends_block() {
        let r = FrameRasterizer::new(RasterOptions {
            sampling: Sampling::Average,
            ..RasterOptions::default()
        });
        // 2x1 frame averaged into one cell: (0 + 100) / 2 = 50
        let frame = Frame::new(vec![0, 0, 0, 100, 100, 100], 2, 1, PixelFormat::Rgb24);
        assert!(r
            .rasterize(&frame, TerminalDimensions::new(1, 1))
            .starts_with("\x1b[38;2;50;50;50m"));
    }

    #[test]
    fn test_transposed_sample_grid_stays_in_bounds() {
        let r = FrameRasterizer::new(RasterOptions {
            orientation: Orientation::Transposed,
            ..RasterOptions::default()
        });
        // Wide frame: 8 columns, 2 rows
        let frame = solid(8, 2, [9, 9, 9]);
        let grid = r.sample_grid(&frame, TerminalDimensions::new(4, 4));
        assert_eq!(grid.len(), 16);
        assert!(grid.iter().all(|c| c.row < 2 && c.col < 8));
    }

    #[test]
    fn test_custom_glyph_and_line_ending() {
        let r = FrameRasterizer::new(RasterOptions {
            glyph: '#',
            line_ending: "\r\n",
            ..RasterOptions::default()
        });
        let frame = solid(1, 1, [0, 0, 0]);
        assert_eq!(
            r.rasterize(&frame, TerminalDimensions::new(1, 1)),
            "\x1b[38;2;0;0;0m#\x1b[0m\r\n"
        );
    }
}
