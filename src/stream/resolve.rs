//! Page-URL resolution.
//!
//! Video sites serve an HTML page, not media. For those hosts the
//! configured resolver (yt-dlp) is asked for a direct media URL that
//! ffmpeg can open.

use std::io;
use std::process::Command;

use super::settings::StreamSettings;
use crate::error::{Error, Result};

const PAGE_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtu.be",
];

/// Host part of `url`, lowercased. `None` for scheme-less input.
fn host(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit('@').next()?;
    let host = host.split(':').next()?;
    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}

/// True when `url` points at a page that must be resolved first.
pub fn needs_resolution(url: &str) -> bool {
    host(url).is_some_and(|h| PAGE_HOSTS.contains(&h.as_str()))
}

/// Turn `url` into something ffmpeg can open.
///
/// URLs that need no resolution, or any URL when no resolver is
/// configured, come back unchanged.
pub fn resolve_media_url(url: &str, settings: &StreamSettings) -> Result<String> {
    let Some(resolver) = settings.resolver.as_deref() else {
        return Ok(url.to_string());
    };
    if !needs_resolution(url) {
        return Ok(url.to_string());
    }

    log::info!("Resolving {} with {}", url, resolver);
    let output = Command::new(resolver)
        .args(["-g", "-f", settings.resolver_format.as_str(), url])
        .output()
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::unavailable(
                    url,
                    format!("'{}' not found. Install yt-dlp to play page URLs.", resolver),
                )
            } else {
                Error::unavailable(url, format!("failed to run {}: {}", resolver, e))
            }
        })?;

    if !output.status.success() {
        return Err(Error::unavailable(
            url,
            format!(
                "{} exited with code {:?}\n{}",
                resolver,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }

    first_media_line(&String::from_utf8_lossy(&output.stdout))
        .map(|media| {
            log::debug!("Resolved media URL: {}", media);
            media
        })
        .ok_or_else(|| Error::unavailable(url, format!("{} returned no media URL", resolver)))
}

/// First non-empty line of resolver output.
fn first_media_line(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_extraction() {
        assert_eq!(host("https://www.YouTube.com/watch?v=x").as_deref(), Some("www.youtube.com"));
        assert_eq!(host("http://user@youtu.be:443/abc").as_deref(), Some("youtu.be"));
        assert_eq!(host("rtsp://10.0.0.2/stream").as_deref(), Some("10.0.0.2"));
        assert_eq!(host("/local/file.mp4"), None);
    }

    #[test]
    fn test_needs_resolution() {
        assert!(needs_resolution("https://www.youtube.com/watch?v=MyydQHomlQc"));
        assert!(needs_resolution("https://youtu.be/MyydQHomlQc"));
        assert!(!needs_resolution("https://example.com/video.mp4"));
        assert!(!needs_resolution("https://notyoutube.com/watch"));
        assert!(!needs_resolution("video.mkv"));
    }

    #[test]
    fn test_direct_urls_pass_through() {
        let settings = StreamSettings::default();
        assert_eq!(
            resolve_media_url("https://example.com/v.mp4", &settings).unwrap(),
            "https://example.com/v.mp4"
        );
    }

    #[test]
    fn test_disabled_resolver_passes_through() {
        let settings = StreamSettings {
            resolver: None,
            ..StreamSettings::default()
        };
        let url = "https://youtu.be/abc";
        assert_eq!(resolve_media_url(url, &settings).unwrap(), url);
    }

    #[test]
    fn test_missing_resolver_is_unavailable() {
        let settings = StreamSettings {
            resolver: Some("/nonexistent/yt-dlp-xyz".to_string()),
            ..StreamSettings::default()
        };
        let err = resolve_media_url("https://youtu.be/abc", &settings).unwrap_err();
        assert!(matches!(err, Error::StreamUnavailable { .. }));
    }

    #[test]
    fn test_first_media_line() {
        assert_eq!(
            first_media_line("\n  https://cdn/a.mp4\nhttps://cdn/audio\n").as_deref(),
            Some("https://cdn/a.mp4")
        );
        assert_eq!(first_media_line("   \n"), None);
    }
}
