//! Error type shared by the stream, terminal and application layers.
//!
//! End of stream is deliberately absent: readers report it as `Ok(None)`
//! and the pull loop turns it into [`crate::stream::StopReason::EndOfStream`].

use crate::config::ConfigError;

/// Errors that terminate a playback run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The stream could not be opened, resolved or decoded before its first frame.
    #[error("Stream unavailable: {url}\n{reason}")]
    StreamUnavailable { url: String, reason: String },

    /// Writing to the terminal failed.
    #[error("Terminal output failed: {0}")]
    OutputFailure(#[source] std::io::Error),

    /// Reading from the decoder pipe failed mid-stream.
    #[error("Decoder read failed: {0}")]
    Decoder(#[source] std::io::Error),

    /// Configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Terminal setup (signal registration, size query) failed.
    #[error("Terminal setup failed: {0}")]
    Terminal(String),
}

impl Error {
    pub(crate) fn unavailable(url: &str, reason: impl Into<String>) -> Self {
        Error::StreamUnavailable {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
