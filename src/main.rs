pub mod config;
pub mod input;
pub mod ui;

use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::AppConfig;
use crate::input::{DeviceRegistry, GilrsBackend};
use crate::ui::JoyCheckApp;

fn main() -> Result<()> {
    setup()?;

    let config = AppConfig::load_or_default();
    info!("Starting JoyCheck with config: {:?}", config);

    // Failure to bring up the input subsystem is the one fatal error path
    let backend =
        GilrsBackend::new().map_err(|e| eyre!("Failed to open input subsystem: {}", e))?;

    let mut registry = DeviceRegistry::new(backend);
    registry.scan_attached();

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = if config.display.fullscreen {
        egui::ViewportBuilder::default().with_fullscreen(true)
    } else {
        egui::ViewportBuilder::default()
            .with_inner_size(egui::vec2(config.display.width, config.display.height))
    };

    eframe::run_native(
        "JoyCheck",
        native_options,
        Box::new(move |_cc| Ok(Box::new(JoyCheckApp::new(registry, config)))),
    )
    .map_err(|e| eyre!("UI loop failed: {}", e))?;

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
