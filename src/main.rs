use clap::Parser;

use tubeterm::app::{Application, PlaybackOptions};
use tubeterm::cli::{handle_config_action, Args, Command};
use tubeterm::config;
use tubeterm::stream::StopReason;
use tubeterm::telemetry;

fn main() {
    let args = Args::parse();

    let mut cfg = match args.load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    args.apply(&mut cfg);

    let _telemetry = telemetry::init(&cfg.log.level, cfg.log.file.as_deref());

    if let Some(Command::Config { action }) = args.command {
        let path = args.config.clone().unwrap_or_else(config::default_path);
        if let Err(e) = handle_config_action(action, &cfg, &path) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let Some(link) = args.link.clone() else {
        eprintln!("Error: no video given. Pass one with --link <URL>.");
        std::process::exit(1);
    };

    let app = Application::new(PlaybackOptions::from_config(link, &cfg));
    match app.execute() {
        Ok(StopReason::EndOfStream) => log::info!("Stream finished"),
        Ok(StopReason::Stopped) => log::info!("Playback stopped by user"),
        Ok(StopReason::NotOpened) => log::warn!("Nothing to play"),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
