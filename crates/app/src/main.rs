mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use eframe::egui;
use pledgemap_core::RenderConfig;
use state::AppState;

struct PledgeMapApp {
    state: AppState,
}

impl PledgeMapApp {
    fn new(_cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PledgeMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::draw(&mut self.state, ctx);
    }
}

fn main() -> anyhow::Result<()> {
    pledgemap_core::logging::init("pledgemap=info");

    // Optional first argument: a TOML render configuration.
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => RenderConfig::load(&path).with_context(|| format!("loading {}", path.display()))?,
        None => RenderConfig::default(),
    };
    let mut state = AppState::new(config)?;
    state.start_load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1320.0, 900.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Pledge Map",
        options,
        Box::new(move |cc| Ok(Box::new(PledgeMapApp::new(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
