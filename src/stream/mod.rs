//! Video acquisition: decoded frames, the ffmpeg decoder and the pull loop.
//!
//! - [`Frame`] / [`PixelFormat`]: raw decoded pixels
//! - [`FrameReader`]: anything that yields frames; [`FfmpegReader`] is the real one
//! - [`resolve_media_url`]: page URL to media URL via yt-dlp
//! - [`FrameSource`]: blocking pull loop driving a per-frame callback

mod ffmpeg;
mod frame;
mod reader;
mod resolve;
mod settings;
mod source;

pub use ffmpeg::{decoder_args, FfmpegReader};
pub use frame::{Frame, PixelFormat};
pub use reader::FrameReader;
pub use resolve::{needs_resolution, resolve_media_url};
pub use settings::StreamSettings;
pub use source::{FrameCallback, FrameSource, StopReason};
