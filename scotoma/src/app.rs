//! The overlay window
//!
//! Glue between eframe and the engine: read the pointer and screen size,
//! advance the engine, warp the cursor when asked, paint the streaks.

use egui::{Context, LayerId, ViewportCommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scotomacore::listener::{DevicePointer, PointerListener, PointerSource};
use scotomacore::geometry::DisplayScale;
use scotomacore::paint::{paint_streaks, StreakStyle};
use scotomacore::repaint::RepaintReason;
use scotomacore::sampler::sample_channel;
use scotomacore::{Engine, OverlayConfig, RepaintController, Result, ScreenSize};
use std::time::Instant;

pub struct ScotomaApp {
    engine: Engine,
    /// Kept alive for the lifetime of the window; stops on drop.
    _listener: PointerListener,
    pointer: DevicePointer,
    /// Native scale, shared with the listener thread
    scale: DisplayScale,
    style: StreakStyle,
    repaint: RepaintController,
}

impl ScotomaApp {
    pub fn new(config: OverlayConfig) -> Result<Self> {
        let scale = DisplayScale::default();
        let (tx, rx) = sample_channel(config.queue_capacity);
        let listener = PointerListener::spawn_device(tx, config.listener_poll_interval(), scale.clone())?;
        let engine = Engine::new(&config, rx, Instant::now(), StdRng::from_entropy());

        Ok(Self {
            engine,
            _listener: listener,
            pointer: DevicePointer::new(scale.clone()),
            scale,
            style: StreakStyle::from_config(&config),
            repaint: RepaintController::new(config.tick_interval()),
        })
    }

    /// Primary screen size in physical pixels. Falls back to the window
    /// size until the monitor size is known.
    fn screen_size(ctx: &Context) -> ScreenSize {
        let ppp = ctx.pixels_per_point();
        let size = ctx
            .input(|i| i.viewport().monitor_size)
            .unwrap_or_else(|| ctx.screen_rect().size());
        ScreenSize::from_points(size, ppp)
    }
}

impl eframe::App for ScotomaApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        if self.repaint.begin_frame(now) == RepaintReason::Late {
            log::warn!("overlay frame loop stalled, timers coalesced");
        }

        let ppp = ctx.pixels_per_point();
        let native_ppp = ctx.input(|i| i.viewport().native_pixels_per_point).unwrap_or(ppp);
        self.scale.set(native_ppp);
        let screen = Self::screen_size(ctx);
        let pointer = self.pointer.position();

        let frame = self.engine.advance(now, Some(pointer), screen);
        if let Some(target) = frame.warp_to {
            ctx.send_viewport_cmd(ViewportCommand::CursorPosition(target.to_pos2(ppp)));
        }
        if frame.burst {
            log::debug!("{} streaks live", self.engine.streaks().len());
        }

        let painter = ctx.layer_painter(LayerId::background());
        paint_streaks(&painter, &self.style, ppp, self.engine.streaks().visible());

        self.repaint.end_frame(ctx, self.engine.until_next_deadline(Instant::now()));
    }
}

impl Drop for ScotomaApp {
    fn drop(&mut self) {
        let stats = self.engine.stats();
        log::info!(
            "overlay closed after {} frames, {} ticks: {} streaks promoted, {} bursts, {} samples dropped",
            self.repaint.frame(),
            stats.ticks,
            stats.promoted,
            stats.bursts,
            self.engine.dropped_samples()
        );
    }
}
