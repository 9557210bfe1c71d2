//! Page theme switcher: named presets, a light/dark toggle and a randomized
//! "AI" palette, applied to an in-memory style surface behind a timed overlay.

pub mod cancellation;
pub mod command;
pub mod config;
pub mod controller;
pub mod decor;
pub mod logging;
pub mod surface;
pub mod theme;

#[cfg(feature = "autoplay")]
pub mod autoplay;

pub use controller::{Outcome, Phase, ThemeController};

#[cfg(feature = "autoplay")]
pub async fn maybe_start_autoplay(controller: ThemeController) {
    autoplay::start_autoplay(controller).await;
}

#[cfg(not(feature = "autoplay"))]
pub async fn maybe_start_autoplay(_controller: ThemeController) {
    // No-op without the autoplay feature
}
