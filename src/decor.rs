//! Decorative collaborators.
//!
//! The controller only talks to these through the capability traits below and
//! never reads anything back. The submodules hold the page's own data models
//! for the decorative pieces (cube, globe, particles, donut chart, reveals).

pub mod chart;
pub mod particles;
pub mod reveal;
pub mod showcase;

use log::Level::Debug;
use tokio::sync::watch;

use crate::decor_log;
use crate::theme::ColorTriad;

pub use chart::{DonutChart, THEME_USAGE, UsageSlice};
pub use reveal::{RevealRegistry, RevealTarget};

/// Visible page area and scroll position, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }
}

/// Anything painting with the theme's brand colors.
pub trait Renderer3D: Send + Sync {
    fn set_colors(&mut self, colors: &ColorTriad);

    /// Viewport changed; renderers must survive being resized at any time.
    fn resize(&mut self, _width: f32, _height: f32) {}
}

pub trait ChartRenderer: Send + Sync {
    fn render(&mut self, dataset: &[UsageSlice], colors: &ColorTriad);
}

pub trait ScrollRevealer: Send + Sync {
    fn observe(&mut self, targets: &[RevealTarget]);
}

/// Forwards colors to a frame loop running elsewhere.
impl Renderer3D for watch::Sender<ColorTriad> {
    fn set_colors(&mut self, colors: &ColorTriad) {
        decor_log!(
            Debug,
            "forwarding colors {} / {} / {}",
            colors.primary,
            colors.secondary,
            colors.accent
        );
        self.send_replace(colors.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_sender_publishes_latest_colors() {
        let initial = ColorTriad {
            primary: "#000000".to_string(),
            secondary: "#000000".to_string(),
            accent: "#000000".to_string(),
        };
        let (mut tx, mut rx) = watch::channel(initial);
        let next = ColorTriad {
            primary: "#00f5ff".to_string(),
            secondary: "#ff00e4".to_string(),
            accent: "#f6ff00".to_string(),
        };
        tx.set_colors(&next);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), next);
    }
}
