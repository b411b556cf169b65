//! Decoder and resolver settings.

use super::frame::PixelFormat;

/// How the stream is fetched and decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSettings {
    /// ffmpeg executable
    pub ffmpeg: String,
    /// Page-URL resolver executable (yt-dlp); `None` disables resolution
    pub resolver: Option<String>,
    /// Format selector passed to the resolver's `-f`
    pub resolver_format: String,
    /// Decoded frame width in pixels
    pub width: u32,
    /// Decoded frame height in pixels
    pub height: u32,
    /// Byte order requested from the decoder
    pub pixel_format: PixelFormat,
    /// Read input at its native frame rate (`-re`)
    pub realtime: bool,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            resolver: Some("yt-dlp".to_string()),
            resolver_format: "best[height<=480]/best".to_string(),
            width: 640,
            height: 360,
            pixel_format: PixelFormat::Rgb24,
            realtime: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = StreamSettings::default();
        assert_eq!(s.ffmpeg, "ffmpeg");
        assert_eq!(s.resolver.as_deref(), Some("yt-dlp"));
        assert_eq!((s.width, s.height), (640, 360));
        assert_eq!(s.pixel_format, PixelFormat::Rgb24);
        assert!(s.realtime);
    }
}
