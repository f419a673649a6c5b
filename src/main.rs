mod config;
mod covers;
mod library;
mod ui;

use anyhow::Result;
use eframe::NativeOptions;
use log::{info, LevelFilter};

use config::Config;
use library::{LibraryStore, Preferences};
use ui::app::GameShelfApp;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .init();

    info!("Starting Game Shelf");

    // Load configuration
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            // Create default configuration if it doesn't exist
            let config = Config::default();
            config.save()?;
            config
        }
    };

    config.ensure_directories()?;

    // Load persisted state
    let mut store = LibraryStore::new(config.paths.data_dir.clone())?;
    store.load()?;

    let prefs = Preferences::load(&config.paths.data_dir)?;

    // GUI Options
    let options = NativeOptions {
        initial_window_size: Some(egui::vec2(1120.0, 780.0)),
        ..Default::default()
    };

    // Run application
    eframe::run_native(
        "Game Shelf",
        options,
        Box::new(|cc| Box::new(GameShelfApp::new(cc, config, store, prefs))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}
