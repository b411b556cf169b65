//! Subcommand handlers for config actions.

use std::io;
use std::path::Path;

use super::args::ConfigAction;
use crate::config::{Config, DEFAULT_CONFIG};

/// Handle a `config` subcommand.
///
/// `config` is the effective configuration and `path` the file it was
/// (or would be) loaded from.
pub fn handle_config_action(action: ConfigAction, config: &Config, path: &Path) -> io::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", describe(config, path));
            Ok(())
        }
        ConfigAction::Init => {
            init_config(path)?;
            println!("Created config file: {}", path.display());
            Ok(())
        }
    }
}

/// Human-readable summary of the effective settings.
pub fn describe(config: &Config, path: &Path) -> String {
    let s = &config.stream;
    let r = &config.render;
    let mut out = String::from("Current configuration:\n");
    out.push_str(&format!("  Decoder: {}\n", s.ffmpeg));
    out.push_str(&format!(
        "  Resolver: {}\n",
        if s.resolver.is_empty() { "disabled" } else { s.resolver.as_str() }
    ));
    out.push_str(&format!("  Frame size: {}x{}\n", s.width, s.height));
    out.push_str(&format!("  Pixel format: {:?}\n", s.pixel_format));
    out.push_str(&format!("  Realtime: {}\n", if s.realtime { "yes" } else { "no" }));
    out.push_str(&format!("  Glyph: {}\n", r.glyph));
    out.push_str(&format!("  Sampling: {:?}\n", r.sampling));
    out.push_str(&format!("  Orientation: {:?}\n", r.orientation));
    out.push_str(&format!("  Channels: {:?}\n", r.channels));
    out.push_str(&format!("  Quit key: {}\n", config.input.quit_key));
    out.push_str(&format!("  Log level: {}\n", config.log.level));
    out.push('\n');
    if path.exists() {
        out.push_str(&format!("Config file: {} (exists)", path.display()));
    } else {
        out.push_str(&format!("Config file: {} (not found)", path.display()));
    }
    out
}

/// Write the commented default config, refusing to overwrite.
pub fn init_config(path: &Path) -> io::Result<()> {
    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "Config file already exists: {}\nUse 'tubeterm config show' to view current settings.",
                path.display()
            ),
        ));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG)
}
