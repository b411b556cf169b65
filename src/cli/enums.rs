//! CLI enum types for rasterizer options.

use clap::ValueEnum;

use crate::config::SamplingName;

/// Cell sampling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SamplingArg {
    /// One pixel per cell (fastest)
    #[default]
    Nearest,
    /// Mean color of the pixels each cell covers
    Average,
}

impl From<SamplingArg> for SamplingName {
    fn from(s: SamplingArg) -> Self {
        match s {
            SamplingArg::Nearest => SamplingName::Nearest,
            SamplingArg::Average => SamplingName::Average,
        }
    }
}
