//! GUI entry point for Routebill

mod app;
mod billing_panel;
mod import_panel;
mod items_panel;
mod session;
mod settings_panel;
mod summary_panel;
mod vendors_panel;

use app::RoutebillApp;
use eframe::egui;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 750.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Routebill",
        options,
        Box::new(|cc| Ok(Box::new(RoutebillApp::new(cc)))),
    )
}
