//! Gallery viewer
//!
//! Walks a first-person camera through the gallery model. Settings are read
//! from `gallery.toml` in the working directory when present.
//!
//! Controls: mouse to look, scroll to zoom, W/A/S/D to move, M/N/B for
//! wireframe/filled/point rendering, Escape to quit.

use std::process::ExitCode;

use gallery_engine::foundation::logging;
use gallery_engine::prelude::*;

const CONFIG_PATH: &str = "gallery.toml";

fn run() -> ViewerResult<()> {
    let config = ViewerConfig::load_or_default(CONFIG_PATH)?;
    let mut viewer = Viewer::start(&config)?;
    viewer.run()
}

fn main() -> ExitCode {
    // Set up panic hook for better error reporting
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC occurred: {panic_info}");

        if let Some(location) = panic_info.location() {
            eprintln!("Panic location: {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    logging::init();

    log::info!("Starting gallery viewer");

    match run() {
        Ok(()) => {
            log::info!("Gallery viewer finished successfully");
            ExitCode::SUCCESS
        }
        Err(error) => {
            log::error!("Gallery viewer failed: {error}");
            ExitCode::FAILURE
        }
    }
}
