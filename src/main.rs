mod app;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::SheetSeekApp;
use data::registry::FileRegistry;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let registry = FileRegistry::new(base_dir()).context("initialising the file registry")?;
    log::info!("Upload directory: {}", registry.upload_dir().display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SheetSeek – Spreadsheet Search",
        options,
        Box::new(move |_cc| Ok(Box::new(SheetSeekApp::new(registry)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start UI: {e}"))?;

    Ok(())
}

/// Directory holding the bundled workbook and the upload directory: next to
/// the executable when resolvable, the working directory otherwise.
fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}
