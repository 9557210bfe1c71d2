use log::Level::{Debug, Info};
use std::time::Duration;

use super::ScrollRevealer;
use crate::decor_log;

pub const REVEAL_DURATION: Duration = Duration::from_millis(700);

/// Fraction of the viewport an element's top must pass before it plays.
const TRIGGER_LINE: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealKind {
    FadeIn,
    SlideRight,
    SlideLeft,
    FadeUp,
    ScaleIn,
    SlideUp,
}

/// Starting state an element animates from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealFrom {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub alpha: f32,
}

impl RevealKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "fade-in" => Some(RevealKind::FadeIn),
            "slide-right" => Some(RevealKind::SlideRight),
            "slide-left" => Some(RevealKind::SlideLeft),
            "fade-up" => Some(RevealKind::FadeUp),
            "scale-in" => Some(RevealKind::ScaleIn),
            "slide-up" => Some(RevealKind::SlideUp),
            _ => None,
        }
    }

    pub fn start_state(self) -> RevealFrom {
        let hidden = RevealFrom {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            alpha: 0.0,
        };
        match self {
            RevealKind::FadeIn => RevealFrom { y: 20.0, ..hidden },
            RevealKind::SlideRight => RevealFrom { x: -50.0, ..hidden },
            RevealKind::SlideLeft => RevealFrom { x: 50.0, ..hidden },
            RevealKind::FadeUp => RevealFrom { y: 50.0, ..hidden },
            RevealKind::ScaleIn => RevealFrom { scale: 0.9, ..hidden },
            RevealKind::SlideUp => RevealFrom { y: 30.0, ..hidden },
        }
    }

    pub fn easing(self) -> &'static str {
        match self {
            RevealKind::ScaleIn => "back.out(1.7)",
            _ => "power2.out",
        }
    }
}

/// An element marked for reveal on scroll.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealTarget {
    pub element: String,
    pub kind: RevealKind,
    pub delay: Duration,
    /// Distance from the top of the document, in px.
    pub offset_top: f32,
}

impl RevealTarget {
    /// Builds a target from `data-scroll` / `data-scroll-delay` attribute values.
    /// Unknown kinds are skipped; a missing or malformed delay means none.
    pub fn from_attributes(
        element: &str,
        kind: &str,
        delay: Option<&str>,
        offset_top: f32,
    ) -> Option<Self> {
        let kind = RevealKind::parse(kind)?;
        let delay = delay
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64)
            .unwrap_or(Duration::ZERO);
        Some(Self {
            element: element.to_string(),
            kind,
            delay,
            offset_top,
        })
    }

    /// When the animation has fully played, counted from the trigger.
    pub fn settled_after(&self) -> Duration {
        self.delay + REVEAL_DURATION
    }
}

/// `(element, data-scroll, data-scroll-delay, offset_top)` of the page's
/// marked elements.
pub const PAGE_MARKUP: [(&str, &str, Option<&str>, f32); 6] = [
    (".hero-content h2", "fade-in", None, 180.0),
    (".hero-content p", "fade-in", Some("0.2"), 260.0),
    (".theme-controls", "slide-up", Some("0.4"), 380.0),
    (".features .card", "fade-up", None, 900.0),
    (".showcase", "slide-right", None, 1600.0),
    (".usage-chart", "scale-in", Some("0.3"), 2300.0),
];

pub fn page_targets() -> Vec<RevealTarget> {
    PAGE_MARKUP
        .iter()
        .filter_map(|(element, kind, delay, top)| {
            RevealTarget::from_attributes(element, kind, *delay, *top)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbTransform {
    pub translate_y: f32,
    pub scale: f32,
}

/// Parallax applied to the hero orb as the page scrolls.
pub fn orb_parallax(scroll_y: f32) -> OrbTransform {
    let translate_y = scroll_y * 0.1;
    OrbTransform {
        translate_y,
        scale: 1.0 - translate_y / 1000.0,
    }
}

/// Observed targets and whether each has played. Reveals play once.
#[derive(Debug, Clone, Default)]
pub struct RevealRegistry {
    targets: Vec<RevealTarget>,
    played: Vec<bool>,
}

impl RevealRegistry {
    pub fn targets(&self) -> &[RevealTarget] {
        &self.targets
    }

    /// Returns the targets whose top crossed the trigger line at this
    /// scroll position and had not played yet.
    pub fn on_scroll(&mut self, scroll_y: f32, viewport_height: f32) -> Vec<&RevealTarget> {
        let line = viewport_height * TRIGGER_LINE;
        let mut started = Vec::new();
        for (i, target) in self.targets.iter().enumerate() {
            if !self.played[i] && target.offset_top - scroll_y < line {
                decor_log!(
                    Debug,
                    "revealing {} ({:?}, settles after {:?})",
                    target.element,
                    target.kind,
                    target.settled_after()
                );
                self.played[i] = true;
                started.push(i);
            }
        }
        started.into_iter().map(|i| &self.targets[i]).collect()
    }
}

impl ScrollRevealer for RevealRegistry {
    fn observe(&mut self, targets: &[RevealTarget]) {
        for target in targets {
            decor_log!(Debug, "observing {} ({:?})", target.element, target.kind);
        }
        self.targets.extend_from_slice(targets);
        self.played.resize(self.targets.len(), false);
        decor_log!(Info, "Scroll reveal observing {} elements", self.targets.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds_only() {
        assert_eq!(RevealKind::parse("scale-in"), Some(RevealKind::ScaleIn));
        assert_eq!(RevealKind::parse("spin"), None);
        assert!(RevealTarget::from_attributes(".x", "spin", None, 0.0).is_none());
    }

    #[test]
    fn delay_attribute_is_seconds() {
        let target = RevealTarget::from_attributes(".x", "fade-up", Some("0.4"), 0.0).unwrap();
        assert_eq!(target.delay, Duration::from_millis(400));
        assert_eq!(target.settled_after(), Duration::from_millis(1100));
        let target = RevealTarget::from_attributes(".x", "fade-up", Some("soon"), 0.0).unwrap();
        assert_eq!(target.delay, Duration::ZERO);
        assert_eq!(target.settled_after(), REVEAL_DURATION);
    }

    #[test]
    fn start_offsets_and_easing() {
        assert_eq!(RevealKind::SlideRight.start_state().x, -50.0);
        assert_eq!(RevealKind::FadeUp.start_state().y, 50.0);
        assert_eq!(RevealKind::ScaleIn.start_state().scale, 0.9);
        assert_eq!(RevealKind::ScaleIn.easing(), "back.out(1.7)");
        assert_eq!(RevealKind::SlideUp.easing(), "power2.out");
        assert!(page_targets().iter().all(|t| t.kind.start_state().alpha == 0.0));
    }

    #[test]
    fn orb_follows_scroll() {
        let orb = orb_parallax(500.0);
        assert_eq!(orb.translate_y, 50.0);
        assert!((orb.scale - 0.95).abs() < 1e-6);
        assert_eq!(orb_parallax(0.0), OrbTransform { translate_y: 0.0, scale: 1.0 });
    }

    #[test]
    fn reveals_play_once() {
        let mut registry = RevealRegistry::default();
        registry.observe(&page_targets());
        assert_eq!(registry.targets().len(), 6);

        // Trigger line sits at 800px of a 1000px viewport.
        let started: Vec<String> = registry
            .on_scroll(0.0, 1000.0)
            .into_iter()
            .map(|t| t.element.clone())
            .collect();
        assert_eq!(started, vec![".hero-content h2", ".hero-content p", ".theme-controls"]);

        let started = registry.on_scroll(150.0, 1000.0);
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].element, ".features .card");
        assert!(registry.on_scroll(0.0, 1000.0).is_empty());
        assert_eq!(registry.on_scroll(5000.0, 1000.0).len(), 2);
    }
}
