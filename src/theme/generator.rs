//! Pseudo-random palette synthesis behind the "AI theme" button.
//!
//! Hues are spread toward complementary positions: the secondary hue sits
//! 120..240 degrees past the primary and the accent 60..180 past the
//! secondary, both wrapped modulo 360.

use rand::Rng;
use rand::seq::SliceRandom;
use std::time::Duration;

use super::{CardShadow, ColorTriad, CssColor, Hsl};
use crate::surface::{ElementAnimation, StyleProperty};

pub const GENERATED_THEME_NAME: &str = "AI Generated Theme";

pub const FONT_CHOICES: [&str; 5] = ["Poppins", "Montserrat", "Roboto", "Open Sans", "Lato"];

/// (saturation, lightness) per channel.
pub const PRIMARY_TONE: (u8, u8) = (80, 55);
pub const SECONDARY_TONE: (u8, u8) = (80, 60);
pub const ACCENT_TONE: (u8, u8) = (80, 65);

const LIGHT_BACKGROUND: CssColor = CssColor::Hex([0xff, 0xff, 0xff]);
const DARK_BACKGROUND: CssColor = CssColor::Hex([0x12, 0x12, 0x12]);
const LIGHT_SECONDARY_BACKGROUND: CssColor = CssColor::Hex([0xf5, 0xf7, 0xfa]);
const DARK_SECONDARY_BACKGROUND: CssColor = CssColor::Hex([0x1e, 0x1e, 0x1e]);
const LIGHT_TEXT: CssColor = CssColor::Hex([0x33, 0x33, 0x33]);
const DARK_TEXT: CssColor = CssColor::Hex([0xf1, 0xf1, 0xf1]);
const LIGHT_SECONDARY_TEXT: CssColor = CssColor::Hex([0x66, 0x66, 0x66]);
const DARK_SECONDARY_TEXT: CssColor = CssColor::Hex([0xaa, 0xaa, 0xaa]);

const HERO_GRADIENT_CYCLE: Duration = Duration::from_secs(4);
const CARD_PULSE_CYCLE: Duration = Duration::from_secs(3);
const CARD_PULSE_MAX_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTheme {
    pub primary: Hsl,
    pub secondary: Hsl,
    pub accent: Hsl,
    pub background: CssColor,
    pub secondary_background: CssColor,
    pub text: CssColor,
    pub secondary_text: CssColor,
    pub font_primary: String,
    pub card_shadow: CardShadow,
}

fn pick<R: Rng + ?Sized>(rng: &mut R, light: CssColor, dark: CssColor) -> CssColor {
    if rng.gen_bool(0.5) { light } else { dark }
}

impl GeneratedTheme {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let hue1: u16 = rng.gen_range(0..360);
        let hue2 = (hue1 + rng.gen_range(120..240)) % 360;
        let hue3 = (hue2 + rng.gen_range(60..180)) % 360;

        let background = pick(rng, LIGHT_BACKGROUND, DARK_BACKGROUND);
        let secondary_background = pick(rng, LIGHT_SECONDARY_BACKGROUND, DARK_SECONDARY_BACKGROUND);
        let text = pick(rng, LIGHT_TEXT, DARK_TEXT);
        let secondary_text = pick(rng, LIGHT_SECONDARY_TEXT, DARK_SECONDARY_TEXT);
        let font = FONT_CHOICES.choose(rng).copied().unwrap_or(FONT_CHOICES[0]);
        let card_shadow = if rng.gen_bool(0.5) {
            CardShadow::Light
        } else {
            CardShadow::Dark
        };

        Self {
            primary: Hsl::new(hue1, PRIMARY_TONE.0, PRIMARY_TONE.1),
            secondary: Hsl::new(hue2, SECONDARY_TONE.0, SECONDARY_TONE.1),
            accent: Hsl::new(hue3, ACCENT_TONE.0, ACCENT_TONE.1),
            background,
            secondary_background,
            text,
            secondary_text,
            font_primary: format!("{font}, sans-serif"),
            card_shadow,
        }
    }

    pub fn name(&self) -> &'static str {
        GENERATED_THEME_NAME
    }

    pub fn triad(&self) -> ColorTriad {
        ColorTriad::from_hsl(self.primary, self.secondary, self.accent)
    }

    /// Inline properties written when this theme is applied.
    pub fn style_properties(&self) -> Vec<(StyleProperty, String)> {
        vec![
            (StyleProperty::PrimaryColor, self.primary.to_string()),
            (StyleProperty::SecondaryColor, self.secondary.to_string()),
            (StyleProperty::AccentColor, self.accent.to_string()),
            (StyleProperty::BackgroundColor, self.background.to_string()),
            (StyleProperty::SecondaryBackground, self.secondary_background.to_string()),
            (StyleProperty::TextColor, self.text.to_string()),
            (StyleProperty::SecondaryText, self.secondary_text.to_string()),
            (StyleProperty::FontPrimary, self.font_primary.clone()),
            (StyleProperty::CardShadow, self.card_shadow.css().to_string()),
        ]
    }
}

/// One-shot animations started alongside a generated theme.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicAnimations {
    pub hero: ElementAnimation,
    pub cards: Vec<ElementAnimation>,
}

impl DynamicAnimations {
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, card_count: usize) -> Self {
        let cards = (0..card_count)
            .map(|_| ElementAnimation::Pulse {
                cycle: CARD_PULSE_CYCLE,
                delay: Duration::from_millis(rng.gen_range(0..CARD_PULSE_MAX_DELAY_MS)),
            })
            .collect();
        Self {
            hero: ElementAnimation::GradientShift {
                cycle: HERO_GRADIENT_CYCLE,
                background_size: "300% 100%",
            },
            cards,
        }
    }
}
