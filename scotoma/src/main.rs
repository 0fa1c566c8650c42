//! scotoma — fading paint streaks over the whole screen
//!
//! A click-through, always-on-top overlay. Streaks follow the pointer, the
//! screen fills with them when the pointer idles, and every so often the
//! cursor is dragged into the opposite corner.

mod app;

use app::ScotomaApp;
use scotomacore::{Error, OverlayConfig};

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = OverlayConfig::load()?;
    let app = ScotomaApp::new(config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("scotoma")
            .with_decorations(false)
            .with_transparent(true)
            .with_fullscreen(true)
            .with_window_level(egui::viewport::WindowLevel::AlwaysOnTop)
            .with_mouse_passthrough(true)
            .with_taskbar(false),
        ..Default::default()
    };

    log::info!("starting overlay");
    eframe::run_native("scotoma", options, Box::new(move |_cc| Box::new(app)))
        .map_err(|e| Error::Window(e.to_string()))
}
