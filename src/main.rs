mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::DashboardApp;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Dataset path from the first CLI argument, defaulting to the bundled
    // name of the Madrid listings export. A bad file is fatal at startup.
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("analisis.csv"));

    let dataset = data::loader::load_file(&path)
        .with_context(|| format!("loading listings from {}", path.display()))?;
    log::info!(
        "Loaded {} listings ({} neighborhoods) from {}",
        dataset.len(),
        dataset.neighborhoods.len(),
        path.display()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 840.0])
            .with_min_inner_size([700.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Vivienda – Madrid Property Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(dataset, path)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))?;

    Ok(())
}
