//! The theme controller: the only path by which the style surface changes.
//!
//! Every theme change runs the same sequence: raise the transition overlay,
//! wait, swap the theme in one step, wait, fade the overlay out. The "AI"
//! flow prefixes that with a fixed-rate progress placebo.

pub mod mode;

use log::Level::{Debug, Info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cancellation::{CancellationToken, sleep_or_cancel};
use crate::config::{Config, OverlapPolicy, Timings};
use crate::decor::Renderer3D;
use crate::surface::{SharedStyleSurface, StyleSurface, announce};
use crate::theme::{ActiveTheme, DynamicAnimations, GeneratedTheme, PresetId, PresetTable};
use crate::theme_log;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Progress placebo of the AI flow.
    Analyzing,
    /// Overlay raised, waiting to swap.
    Transitioning,
    /// Theme swapped, waiting to drop the overlay.
    Applying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Input was not a known preset, or the toggle had no mapping.
    Ignored,
    /// A newer request cancelled this sequence before it completed.
    Superseded,
}

enum PendingTheme {
    Preset(PresetId),
    Generated(Box<GeneratedTheme>, DynamicAnimations),
}

struct ControllerState {
    active: ActiveTheme,
    phase: Phase,
    generation: u64,
    pending: Option<CancellationToken>,
    rng: SmallRng,
    renderers: Vec<Box<dyn Renderer3D>>,
}

struct Inner {
    state: Mutex<ControllerState>,
    surface: SharedStyleSurface,
    presets: Arc<PresetTable>,
    timings: Timings,
    overlap: OverlapPolicy,
}

struct Ticket {
    generation: u64,
    token: CancellationToken,
}

#[derive(Clone)]
pub struct ThemeController {
    inner: Arc<Inner>,
}

impl ThemeController {
    pub fn new(config: &Config, presets: Arc<PresetTable>, surface: SharedStyleSurface) -> Self {
        Self::with_rng(config, presets, surface, SmallRng::from_entropy())
    }

    pub fn with_rng(
        config: &Config,
        presets: Arc<PresetTable>,
        surface: SharedStyleSurface,
        rng: SmallRng,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(ControllerState {
                    active: ActiveTheme::Unset,
                    phase: Phase::Idle,
                    generation: 0,
                    pending: None,
                    rng,
                    renderers: Vec::new(),
                }),
                surface,
                presets,
                timings: config.timings.clone(),
                overlap: config.overlap,
            }),
        }
    }

    /// Registers a renderer to be told the new colors after every apply.
    pub async fn add_renderer(&self, renderer: Box<dyn Renderer3D>) {
        self.inner.state.lock().await.renderers.push(renderer);
    }

    pub fn surface(&self) -> &SharedStyleSurface {
        &self.inner.surface
    }

    pub fn timings(&self) -> &Timings {
        &self.inner.timings
    }

    pub async fn active_theme(&self) -> ActiveTheme {
        self.inner.state.lock().await.active.clone()
    }

    pub async fn phase(&self) -> Phase {
        self.inner.state.lock().await.phase
    }

    pub async fn switch_to_preset(&self, id: &str) -> Outcome {
        let Some(preset) = PresetId::parse(id) else {
            theme_log!(Debug, "Ignoring unknown preset {id:?}");
            return Outcome::Ignored;
        };
        self.inner.surface.lock().await.set_active_button(preset);
        self.apply_preset(preset).await
    }

    pub async fn generate_and_apply_ai_theme(&self) -> Outcome {
        let ticket = self.begin().await;
        let timings = &self.inner.timings;
        theme_log!(
            Info,
            "Analyzing page for AI theme (request #{}, {:?})",
            ticket.generation,
            timings.analysis_duration()
        );

        let shown = self
            .write_surface(&ticket, Some(Phase::Analyzing), StyleSurface::show_ai_modal)
            .await;
        if !shown {
            return Outcome::Superseded;
        }

        let mut progress: u8 = 0;
        while progress < 100 {
            if sleep_or_cancel(&ticket.token, timings.progress_tick()).await {
                return Outcome::Superseded;
            }
            progress = progress.saturating_add(timings.progress_step).min(100);
            let written = self
                .write_surface(&ticket, None, |surface| surface.set_ai_progress(progress))
                .await;
            if !written {
                return Outcome::Superseded;
            }
        }
        if sleep_or_cancel(&ticket.token, timings.analysis_pause()).await {
            return Outcome::Superseded;
        }

        let (theme, animations) = {
            let mut state = self.inner.state.lock().await;
            if ticket.token.is_cancelled() {
                return Outcome::Superseded;
            }
            let mut surface = self.inner.surface.lock().await;
            surface.hide_ai_modal();
            let card_count = surface.card_animations().len();
            let theme = GeneratedTheme::generate(&mut state.rng);
            let animations = DynamicAnimations::roll(&mut state.rng, card_count);
            (theme, animations)
        };
        theme_log!(
            Debug,
            "Synthesized palette {} / {} / {} with {}",
            theme.primary,
            theme.secondary,
            theme.accent,
            theme.font_primary
        );

        self.run_transition(&ticket, PendingTheme::Generated(Box::new(theme), animations))
            .await
    }

    pub async fn toggle_light_dark_mode(&self) -> Outcome {
        let active = self.active_theme().await;
        let step = mode::toggle_step(&active);
        {
            let mut surface = self.inner.surface.lock().await;
            surface.set_mode_icon(step.icon);
            if let Some(target) = step.target {
                surface.set_active_button(target);
            }
        }
        match step.target {
            Some(target) => {
                theme_log!(Info, "Mode toggle: {} -> {}", active.label(), target.class_name());
                self.apply_preset(target).await
            }
            None => {
                theme_log!(Debug, "Mode toggle has no mapping for {}", active.label());
                Outcome::Ignored
            }
        }
    }

    async fn apply_preset(&self, preset: PresetId) -> Outcome {
        let ticket = self.begin().await;
        theme_log!(Info, "Switching to {} (request #{})", preset.class_name(), ticket.generation);
        self.run_transition(&ticket, PendingTheme::Preset(preset)).await
    }

    /// Opens a new request. Under [`OverlapPolicy::Supersede`] the pending
    /// sequence is cancelled and its AI modal reset.
    async fn begin(&self) -> Ticket {
        let mut state = self.inner.state.lock().await;
        state.generation += 1;
        let token = CancellationToken::new();
        let previous = state.pending.replace(token.clone());
        if self.inner.overlap == OverlapPolicy::Supersede {
            if let Some(previous) = previous {
                previous.cancel();
                self.inner.surface.lock().await.hide_ai_modal();
                theme_log!(Debug, "Request #{} supersedes the pending sequence", state.generation);
            }
        }
        Ticket {
            generation: state.generation,
            token,
        }
    }

    /// Applies `write` to the surface, and `phase` to the controller, unless
    /// the ticket was cancelled. Cancellation happens under the state lock,
    /// so a `false` here is final.
    async fn write_surface(
        &self,
        ticket: &Ticket,
        phase: Option<Phase>,
        write: impl FnOnce(&mut StyleSurface),
    ) -> bool {
        let mut state = self.inner.state.lock().await;
        if ticket.token.is_cancelled() {
            return false;
        }
        if let Some(phase) = phase {
            if state.generation == ticket.generation {
                state.phase = phase;
            }
        }
        let mut surface = self.inner.surface.lock().await;
        write(&mut *surface);
        true
    }

    async fn finish(&self, ticket: &Ticket) {
        let mut state = self.inner.state.lock().await;
        if state.generation == ticket.generation {
            state.phase = Phase::Idle;
            state.pending = None;
        }
    }

    async fn run_transition(&self, ticket: &Ticket, theme: PendingTheme) -> Outcome {
        let timings = &self.inner.timings;

        let opacity = timings.overlay_opacity;
        let shown = self
            .write_surface(ticket, Some(Phase::Transitioning), |surface| {
                surface.show_overlay(opacity)
            })
            .await;
        if !shown {
            return Outcome::Superseded;
        }

        if sleep_or_cancel(&ticket.token, timings.apply_delay()).await {
            return Outcome::Superseded;
        }

        let toast = {
            let mut state = self.inner.state.lock().await;
            // Cancellation happens under this lock, so the check is final.
            if ticket.token.is_cancelled() {
                return Outcome::Superseded;
            }
            if state.generation == ticket.generation {
                state.phase = Phase::Applying;
            }

            let mut surface = self.inner.surface.lock().await;
            let (active, toast) = match theme {
                PendingTheme::Preset(id) => {
                    surface.apply_preset(id, self.inner.presets.get(id));
                    (ActiveTheme::Preset(id), None)
                }
                PendingTheme::Generated(theme, animations) => {
                    surface.apply_generated(&theme, &animations);
                    let name = theme.name();
                    (ActiveTheme::Generated(*theme), Some(name))
                }
            };
            let triad = surface.triad();
            drop(surface);

            for renderer in state.renderers.iter_mut() {
                renderer.set_colors(&triad);
            }
            theme_log!(Info, "Applied {}", active.label());
            state.active = active;
            toast
        };

        if let Some(name) = toast {
            announce(&self.inner.surface, name, timings).await;
        }

        if sleep_or_cancel(&ticket.token, timings.hide_delay()).await {
            return Outcome::Superseded;
        }
        if !self.write_surface(ticket, None, StyleSurface::hide_overlay).await {
            return Outcome::Superseded;
        }
        self.finish(ticket).await;
        Outcome::Applied
    }
}
