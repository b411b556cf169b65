//! Configuration file handling for tubeterm.
//!
//! Loads configuration from `<config dir>/tubeterm/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::raster::{ChannelMapping, Orientation, RasterOptions, Sampling, BLOCK_GLYPH};
use crate::stream::{PixelFormat, StreamSettings};

/// Configuration file structure for tubeterm.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StreamConfig {
    pub ffmpeg: String,
    /// Empty string disables page-URL resolution
    pub resolver: String,
    pub resolver_format: String,
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormatName,
    pub realtime: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        let s = StreamSettings::default();
        Self {
            ffmpeg: s.ffmpeg,
            resolver: s.resolver.unwrap_or_default(),
            resolver_format: s.resolver_format,
            width: s.width,
            height: s.height,
            pixel_format: PixelFormatName::Rgb24,
            realtime: s.realtime,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormatName {
    #[default]
    Rgb24,
    Bgr24,
}

impl From<PixelFormatName> for PixelFormat {
    fn from(p: PixelFormatName) -> Self {
        match p {
            PixelFormatName::Rgb24 => PixelFormat::Rgb24,
            PixelFormatName::Bgr24 => PixelFormat::Bgr24,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub glyph: char,
    pub sampling: SamplingName,
    pub orientation: OrientationName,
    pub channels: ChannelsName,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            glyph: BLOCK_GLYPH,
            sampling: SamplingName::Nearest,
            orientation: OrientationName::RowMajor,
            channels: ChannelsName::Decoded,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SamplingName {
    #[default]
    Nearest,
    Average,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrientationName {
    #[default]
    RowMajor,
    Transposed,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelsName {
    #[default]
    Decoded,
    Raw,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub quit_key: char,
    /// Key poll timeout after each frame, in milliseconds
    pub poll_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            quit_key: 'q',
            poll_ms: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed or holds
    /// invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            log::debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let cfg = Self::parse(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            cfg.validate()
                .map_err(|reason| ConfigError::Invalid { path, reason })?;
            Ok(cfg)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from a path the user named explicitly; a missing file is an error.
    pub fn load_explicit(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::load(Some(path))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check values serde cannot rule out on its own.
    pub fn validate(&self) -> Result<(), String> {
        if self.stream.width == 0 || self.stream.height == 0 {
            return Err(format!(
                "stream width and height must be non-zero (got {}x{})",
                self.stream.width, self.stream.height
            ));
        }
        Ok(())
    }

    pub fn stream_settings(&self) -> StreamSettings {
        let s = &self.stream;
        StreamSettings {
            ffmpeg: s.ffmpeg.clone(),
            resolver: if s.resolver.trim().is_empty() {
                None
            } else {
                Some(s.resolver.clone())
            },
            resolver_format: s.resolver_format.clone(),
            width: s.width,
            height: s.height,
            pixel_format: s.pixel_format.into(),
            realtime: s.realtime,
        }
    }

    /// Raster options; the line ending is chosen by the caller.
    pub fn raster_options(&self) -> RasterOptions {
        let r = &self.render;
        RasterOptions {
            glyph: r.glyph,
            sampling: match r.sampling {
                SamplingName::Nearest => Sampling::Nearest,
                SamplingName::Average => Sampling::Average,
            },
            orientation: match r.orientation {
                OrientationName::RowMajor => Orientation::RowMajor,
                OrientationName::Transposed => Orientation::Transposed,
            },
            channels: match r.channels {
                ChannelsName::Decoded => ChannelMapping::Decoded,
                ChannelsName::Raw => ChannelMapping::Raw,
            },
            ..RasterOptions::default()
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: '{}'", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid config file '{}': {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("tubeterm").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/tubeterm/config.toml")
        })
}

/// Commented default config written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# tubeterm configuration

[stream]
# ffmpeg executable used to decode the stream
ffmpeg = "ffmpeg"
# Resolver for YouTube page URLs ("" to disable)
resolver = "yt-dlp"
resolver_format = "best[height<=480]/best"
# Decoded frame size (larger = sharper average sampling, more CPU)
width = 640
height = 360
# rgb24 or bgr24
pixel_format = "rgb24"
# Play files at their native frame rate
realtime = true

[render]
glyph = "█"
# nearest or average
sampling = "nearest"
# row-major or transposed
orientation = "row-major"
# decoded or raw
channels = "decoded"

[input]
quit_key = "q"
poll_ms = 5

[log]
level = "warn"
# file = "/tmp/tubeterm.log"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let parsed = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg = Config::parse("[render]\nsampling = \"average\"\n").unwrap();
        assert_eq!(cfg.render.sampling, SamplingName::Average);
        assert_eq!(cfg.render.glyph, BLOCK_GLYPH);
        assert_eq!(cfg.input.quit_key, 'q');
        assert_eq!(cfg.stream.width, 640);
    }

    #[test]
    fn test_empty_resolver_disables_resolution() {
        let cfg = Config::parse("[stream]\nresolver = \"\"\n").unwrap();
        assert!(cfg.stream_settings().resolver.is_none());
    }

    #[test]
    fn test_raster_options_mapping() {
        let cfg = Config::parse(
            "[render]\norientation = \"transposed\"\nchannels = \"raw\"\nglyph = \"#\"\n",
        )
        .unwrap();
        let opts = cfg.raster_options();
        assert_eq!(opts.orientation, Orientation::Transposed);
        assert_eq!(opts.channels, ChannelMapping::Raw);
        assert_eq!(opts.glyph, '#');
    }

    #[test]
    fn test_invalid_enum_rejected() {
        assert!(Config::parse("[render]\nsampling = \"bilinear\"\n").is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_load_explicit_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_explicit(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_zero_frame_size_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[stream]\nwidth = 0").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let cfg = Config::parse("[stream]\nheight = 0\n").unwrap();
        assert!(cfg.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_load_bad_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[stream\nwidth = ").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(format!("{}", err).contains(&file.path().display().to_string()));
    }
}
