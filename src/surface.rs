//! In-memory model of the page-wide style surface.
//!
//! Values resolve through a small cascade: inline custom properties win over
//! the active preset class, which wins over the root (default preset) values.

use log::Level::{Debug, Info};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::config::Timings;
use crate::surface_log;
use crate::theme::{
    ColorTriad, DynamicAnimations, GeneratedTheme, PresetConfig, PresetId, PresetTable,
};

pub const TRANSITIONING_CLASS: &str = "theme-transitioning";

/// Custom properties the controller writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleProperty {
    PrimaryColor,
    SecondaryColor,
    AccentColor,
    BackgroundColor,
    SecondaryBackground,
    TextColor,
    SecondaryText,
    FontPrimary,
    FontSecondary,
    CardShadow,
    AnimationDuration,
}

impl StyleProperty {
    pub const ALL: [StyleProperty; 11] = [
        StyleProperty::PrimaryColor,
        StyleProperty::SecondaryColor,
        StyleProperty::AccentColor,
        StyleProperty::BackgroundColor,
        StyleProperty::SecondaryBackground,
        StyleProperty::TextColor,
        StyleProperty::SecondaryText,
        StyleProperty::FontPrimary,
        StyleProperty::FontSecondary,
        StyleProperty::CardShadow,
        StyleProperty::AnimationDuration,
    ];

    pub fn css_name(self) -> &'static str {
        match self {
            StyleProperty::PrimaryColor => "--primary-color",
            StyleProperty::SecondaryColor => "--secondary-color",
            StyleProperty::AccentColor => "--accent-color",
            StyleProperty::BackgroundColor => "--background-color",
            StyleProperty::SecondaryBackground => "--secondary-background",
            StyleProperty::TextColor => "--text-color",
            StyleProperty::SecondaryText => "--secondary-text",
            StyleProperty::FontPrimary => "--font-primary",
            StyleProperty::FontSecondary => "--font-secondary",
            StyleProperty::CardShadow => "--card-shadow",
            StyleProperty::AnimationDuration => "--animation-duration",
        }
    }
}

/// Formats a duration the way the stylesheet expects it (`1.8s`, `2s`).
pub fn css_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis % 1000 == 0 {
        format!("{}s", millis / 1000)
    } else {
        format!("{}s", millis as f64 / 1000.0)
    }
}

/// Per-element animation started by a generated theme.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementAnimation {
    GradientShift {
        cycle: Duration,
        background_size: &'static str,
    },
    Pulse {
        cycle: Duration,
        delay: Duration,
    },
}

impl ElementAnimation {
    pub fn css(&self) -> String {
        match self {
            ElementAnimation::GradientShift { cycle, .. } => {
                format!("gradient-shift {} ease infinite", css_duration(*cycle))
            }
            ElementAnimation::Pulse { cycle, .. } => {
                format!("pulse {} infinite", css_duration(*cycle))
            }
        }
    }
}

/// Glyph on the light/dark toggle hinting the mode it last switched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeIcon {
    Moon,
    Sun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Entering,
    Shown,
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub phase: ToastPhase,
}

/// The "AI is thinking" modal and its progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AiModal {
    pub visible: bool,
    pub progress: u8,
}

/// Readout for the debug swatch display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swatches {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

#[derive(Debug)]
pub struct StyleSurface {
    stylesheet: Arc<PresetTable>,
    properties: BTreeMap<StyleProperty, String>,
    body_classes: BTreeSet<String>,
    overlay_opacity: f32,
    hero_animation: Option<ElementAnimation>,
    card_animations: Vec<Option<ElementAnimation>>,
    ai_modal: AiModal,
    mode_icon: ModeIcon,
    active_button: Option<PresetId>,
    toasts: Vec<Toast>,
    next_toast_id: u64,
}

pub type SharedStyleSurface = Arc<Mutex<StyleSurface>>;

impl StyleSurface {
    pub fn new(stylesheet: Arc<PresetTable>, card_count: usize) -> Self {
        Self {
            stylesheet,
            properties: BTreeMap::new(),
            body_classes: BTreeSet::new(),
            overlay_opacity: 0.0,
            hero_animation: None,
            card_animations: vec![None; card_count],
            ai_modal: AiModal::default(),
            mode_icon: ModeIcon::Moon,
            active_button: None,
            toasts: Vec::new(),
            next_toast_id: 0,
        }
    }

    pub fn shared(self) -> SharedStyleSurface {
        Arc::new(Mutex::new(self))
    }

    /// Inline value only, as written by the controller.
    pub fn property(&self, property: StyleProperty) -> Option<&str> {
        self.properties.get(&property).map(String::as_str)
    }

    /// Resolved value after the cascade.
    pub fn computed(&self, property: StyleProperty) -> String {
        if let Some(value) = self.properties.get(&property) {
            return value.clone();
        }
        let class_value = self
            .theme_classes()
            .first()
            .and_then(|id| stylesheet_value(self.stylesheet.get(*id), property));
        class_value
            .or_else(|| stylesheet_value(self.stylesheet.get(PresetId::Default), property))
            .unwrap_or_default()
    }

    pub fn theme_classes(&self) -> Vec<PresetId> {
        self.body_classes
            .iter()
            .filter_map(|class| PresetId::from_class(class))
            .collect()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.body_classes.contains(class)
    }

    pub fn body_classes(&self) -> impl Iterator<Item = &str> {
        self.body_classes.iter().map(String::as_str)
    }

    pub fn overlay_opacity(&self) -> f32 {
        self.overlay_opacity
    }

    pub fn is_transitioning(&self) -> bool {
        self.has_class(TRANSITIONING_CLASS)
    }

    pub fn hero_animation(&self) -> Option<&ElementAnimation> {
        self.hero_animation.as_ref()
    }

    pub fn card_animations(&self) -> &[Option<ElementAnimation>] {
        &self.card_animations
    }

    pub fn ai_modal(&self) -> AiModal {
        self.ai_modal
    }

    pub fn mode_icon(&self) -> ModeIcon {
        self.mode_icon
    }

    pub fn active_button(&self) -> Option<PresetId> {
        self.active_button
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn triad(&self) -> ColorTriad {
        ColorTriad {
            primary: self.computed(StyleProperty::PrimaryColor),
            secondary: self.computed(StyleProperty::SecondaryColor),
            accent: self.computed(StyleProperty::AccentColor),
        }
    }

    pub fn swatches(&self) -> Swatches {
        Swatches {
            primary: self.computed(StyleProperty::PrimaryColor),
            secondary: self.computed(StyleProperty::SecondaryColor),
            accent: self.computed(StyleProperty::AccentColor),
            background: self.computed(StyleProperty::BackgroundColor),
            text: self.computed(StyleProperty::TextColor),
        }
    }

    pub fn show_overlay(&mut self, opacity: f32) {
        self.body_classes.insert(TRANSITIONING_CLASS.to_string());
        self.overlay_opacity = opacity;
    }

    pub fn hide_overlay(&mut self) {
        self.overlay_opacity = 0.0;
        self.body_classes.remove(TRANSITIONING_CLASS);
    }

    /// Drops every trace of the previous theme: preset classes, inline
    /// properties and the generated theme's element animations.
    pub fn clear_theme_styling(&mut self) {
        self.body_classes.retain(|class| PresetId::from_class(class).is_none());
        self.properties.clear();
        self.hero_animation = None;
        self.card_animations.iter_mut().for_each(|card| *card = None);
    }

    pub fn apply_preset(&mut self, id: PresetId, config: &PresetConfig) {
        self.clear_theme_styling();
        self.body_classes.insert(id.class_name().to_string());
        self.properties
            .insert(StyleProperty::FontPrimary, config.font_primary.clone());
        self.properties
            .insert(StyleProperty::FontSecondary, config.font_secondary.clone());
        self.properties.insert(
            StyleProperty::AnimationDuration,
            css_duration(config.animation_duration()),
        );
        surface_log!(Debug, "applied preset class {}", id.class_name());
    }

    pub fn apply_generated(&mut self, theme: &GeneratedTheme, animations: &DynamicAnimations) {
        self.clear_theme_styling();
        self.properties.extend(theme.style_properties());
        self.hero_animation = Some(animations.hero.clone());
        for (card, animation) in self.card_animations.iter_mut().zip(&animations.cards) {
            *card = Some(animation.clone());
        }
        surface_log!(
            Debug,
            "applied generated palette {} / {} / {}",
            theme.primary,
            theme.secondary,
            theme.accent
        );
    }

    pub fn show_ai_modal(&mut self) {
        self.ai_modal = AiModal { visible: true, progress: 0 };
    }

    pub fn set_ai_progress(&mut self, progress: u8) {
        self.ai_modal.progress = progress.min(100);
    }

    pub fn hide_ai_modal(&mut self) {
        self.ai_modal.visible = false;
    }

    pub fn set_mode_icon(&mut self, icon: ModeIcon) {
        self.mode_icon = icon;
    }

    pub fn set_active_button(&mut self, id: PresetId) {
        self.active_button = Some(id);
    }

    pub fn push_toast(&mut self, message: String) -> u64 {
        let id = self.next_toast_id;
        self.next_toast_id += 1;
        surface_log!(Info, "toast #{id}: {message}");
        self.toasts.push(Toast {
            id,
            message,
            phase: ToastPhase::Entering,
        });
        id
    }

    pub fn set_toast_phase(&mut self, id: u64, phase: ToastPhase) {
        if let Some(toast) = self.toasts.iter_mut().find(|toast| toast.id == id) {
            toast.phase = phase;
        }
    }

    pub fn remove_toast(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }
}

fn stylesheet_value(config: &PresetConfig, property: StyleProperty) -> Option<String> {
    match property {
        StyleProperty::FontPrimary => Some(config.font_primary.clone()),
        StyleProperty::FontSecondary => Some(config.font_secondary.clone()),
        StyleProperty::AnimationDuration => Some(css_duration(config.animation_duration())),
        other => config.palette.value(other),
    }
}

/// Shows `"<name> applied successfully!"` and retires it on the toast timers.
pub async fn announce(
    surface: &SharedStyleSurface,
    name: &str,
    timings: &Timings,
) -> JoinHandle<()> {
    let id = surface
        .lock()
        .await
        .push_toast(format!("{name} applied successfully!"));
    let surface = surface.clone();
    let enter = timings.toast_enter();
    let visible = timings.toast_visible();
    let fade = timings.toast_fade();
    tokio::spawn(async move {
        sleep(enter).await;
        surface.lock().await.set_toast_phase(id, ToastPhase::Shown);
        sleep(visible.saturating_sub(enter)).await;
        surface.lock().await.set_toast_phase(id, ToastPhase::Leaving);
        sleep(fade).await;
        surface.lock().await.remove_toast(id);
    })
}
