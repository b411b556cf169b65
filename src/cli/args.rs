//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::SamplingArg;
use crate::config::{ChannelsName, Config, ConfigError, OrientationName};

/// Watch a video stream as colored blocks in the terminal
#[derive(Parser, Debug)]
#[command(name = "tubeterm")]
#[command(version, about = "Watch video from a URL in the console", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Video URL (YouTube page, direct media URL, or local file)
    #[arg(short, long)]
    pub link: Option<String>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Cell sampling strategy
    #[arg(long)]
    pub sampling: Option<SamplingArg>,

    /// Use legacy transposed frame indexing
    #[arg(long)]
    pub transposed: bool,

    /// Write pixel bytes as-is instead of decoding the channel order
    #[arg(long)]
    pub raw_channels: bool,

    /// Glyph drawn for every cell
    #[arg(long)]
    pub glyph: Option<char>,

    /// Key that stops playback
    #[arg(short, long)]
    pub quit_key: Option<char>,

    /// Log level filter (e.g. warn, info, tubeterm=debug)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,
    /// Create default config file
    Init,
}

impl Args {
    /// Load the configuration this invocation asks for.
    ///
    /// A `--config` path must exist, except under the `config`
    /// subcommand, where `init` is what creates it.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        match (&self.config, &self.command) {
            (Some(path), Some(Command::Config { .. })) => Config::load(Some(path.as_path())),
            (Some(path), None) => Config::load_explicit(path),
            (None, _) => Config::load(None),
        }
    }

    /// Overlay command-line options on a loaded config (CLI wins).
    pub fn apply(&self, config: &mut Config) {
        if let Some(sampling) = self.sampling {
            config.render.sampling = sampling.into();
        }
        if self.transposed {
            config.render.orientation = OrientationName::Transposed;
        }
        if self.raw_channels {
            config.render.channels = ChannelsName::Raw;
        }
        if let Some(glyph) = self.glyph {
            config.render.glyph = glyph;
        }
        if let Some(key) = self.quit_key {
            config.input.quit_key = key;
        }
        if let Some(ref level) = self.log_level {
            config.log.level = level.clone();
        }
        if let Some(ref file) = self.log_file {
            config.log.file = Some(file.clone());
        }
    }
}
