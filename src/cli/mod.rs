//! Command-line interface definitions and helpers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction};
pub use commands::{describe, handle_config_action, init_config};
pub use enums::SamplingArg;
