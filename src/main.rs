mod annotation;
mod app;
mod capture;
mod config;
mod error;
mod export;
mod labels;
mod render;
mod session;
mod store;
mod transform;

use std::path::PathBuf;

use color_eyre::eyre::Result;
use eframe::egui;

use crate::config::Settings;

const TITLE: &str = "Polygon Label";

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional image to open right away
    let initial_image = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title(TITLE),
        ..Default::default()
    };

    eframe::run_native(
        TITLE,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(app::PolygonLabelApp::new(
                Settings::default(),
                initial_image,
            )))
        }),
    )
    .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    Ok(())
}
