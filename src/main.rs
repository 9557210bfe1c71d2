use log::Level::{Debug, Error, Warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, watch};

use theme_switcher::command::{self, CommandContext};
use theme_switcher::config::Config;
use theme_switcher::controller::ThemeController;
use theme_switcher::decor::particles::ParticleField;
use theme_switcher::decor::reveal::{self, RevealRegistry};
use theme_switcher::decor::showcase::{Globe, Showcase};
use theme_switcher::decor::{
    ChartRenderer, DonutChart, Renderer3D, ScrollRevealer, THEME_USAGE, Viewport,
};
use theme_switcher::surface::{SharedStyleSurface, StyleProperty, StyleSurface};
use theme_switcher::theme::ColorTriad;
use theme_switcher::{command_log, decor_log, logging, theme_log};

#[tokio::main]
async fn main() {
    // Initialize logging
    logging::init_logging();

    let config_path = Config::resolve_path();
    let config = match Config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            theme_log!(Warn, "{e}; falling back to built-in defaults");
            Config::default()
        }
    };

    let presets = Arc::new(config.preset_table());
    let surface = StyleSurface::new(presets.clone(), config.page.cards).shared();
    let initial_colors = surface.lock().await.triad();

    let controller = ThemeController::new(&config, presets, surface.clone());
    let (color_tx, color_rx) = watch::channel(initial_colors.clone());
    controller.add_renderer(Box::new(color_tx)).await;

    // Drawn once; the chart keeps the start-up colors.
    let mut chart = DonutChart::new(f64::from(config.page.canvas_width) / 3.0, 300.0);
    chart.render(&THEME_USAGE, &initial_colors);

    let mut reveals = RevealRegistry::default();
    reveals.observe(&reveal::page_targets());

    let (viewport_tx, viewport_rx) = watch::channel(Viewport::new(
        config.page.canvas_width,
        config.page.canvas_height,
    ));
    let showcase = Arc::new(Mutex::new(Showcase::new(&initial_colors)));
    start_frame_loop(surface, showcase.clone(), color_rx, viewport_rx);

    theme_switcher::maybe_start_autoplay(controller.clone()).await;

    let listener = match TcpListener::bind(&config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            command_log!(Error, "Failed to bind {}: {e}", config.listen_addr);
            return;
        }
    };
    let context = Arc::new(CommandContext::new(
        controller,
        showcase,
        viewport_tx,
        Arc::new(Mutex::new(reveals)),
    ));
    if let Err(e) = command::serve(listener, context).await {
        command_log!(Error, "Command listener stopped: {e}");
    }
}

/// Drives the decorative scene at ~60 FPS.
fn start_frame_loop(
    surface: SharedStyleSurface,
    showcase: Arc<Mutex<Showcase>>,
    mut colors: watch::Receiver<ColorTriad>,
    mut viewport: watch::Receiver<Viewport>,
) {
    tokio::spawn(async move {
        let mut rng = SmallRng::from_entropy();
        let initial = *viewport.borrow_and_update();
        let mut globe = Globe::new(&mut rng, colors.borrow().clone());
        globe.resize(initial.width, initial.height);
        let mut particles = ParticleField::new(&mut rng, initial.width, initial.height);
        let mut size = (initial.width, initial.height);
        let started = Instant::now();
        let mut frames = tokio::time::interval(Duration::from_millis(16));
        let mut particle_fill = String::new();

        loop {
            frames.tick().await;

            if colors.has_changed().unwrap_or(false) {
                globe.set_colors(&colors.borrow_and_update());
            }
            if viewport.has_changed().unwrap_or(false) {
                let Viewport { width, height, .. } = *viewport.borrow_and_update();
                // Scrolling also bumps the channel; only a new size matters here
                if (width, height) != size {
                    size = (width, height);
                    globe.resize(width, height);
                    particles.resize(width, height);
                    decor_log!(Debug, "scene resized to {width}x{height}");
                }
            }
            globe.tick(started.elapsed().as_secs_f64() * 1000.0);
            showcase.lock().await.tick();
            particles.step();

            // Skip the fill lookup while a transition holds the surface
            if let Ok(surface) = surface.try_lock() {
                let primary = surface.computed(StyleProperty::PrimaryColor);
                if primary != particle_fill {
                    decor_log!(Debug, "particles now painted {primary}");
                    particle_fill = primary;
                }
            }
        }
    });
}
