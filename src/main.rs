//! Entry point for the robolabel annotation UI.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use eframe::egui;
use robolabel::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use robolabel::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_path = match logging::init() {
        Ok(path) => path,
        Err(err) => {
            eprintln!("Logging disabled: {err}");
            None
        }
    };

    let viewport = egui::ViewportBuilder::default()
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_maximized(true);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "robolabel",
        native_options,
        Box::new(move |_cc| Ok(Box::new(EguiApp::new(log_path)))),
    )?;
    Ok(())
}
