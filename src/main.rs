//! storymap - Main Entry Point

use log::{debug, error};
use storymap::cli;
use storymap::config::{load_config, APP_NAME};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    debug!("Starting {}", APP_NAME);

    let settings = load_config();

    if let Err(e) = cli::run_from_env(settings) {
        error!("{}", e);
        eprintln!("{}: {}", APP_NAME, e);
        std::process::exit(1);
    }
}
