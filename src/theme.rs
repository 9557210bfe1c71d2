pub mod generator;
pub mod preset;

use std::fmt;

use crate::surface::StyleProperty;

pub use generator::{DynamicAnimations, GeneratedTheme};
pub use preset::{PresetConfig, PresetId, PresetOverride, PresetTable};

/// A hue-based color, written to the surface as `hsl(h, s%, l%)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    pub const fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self { hue, saturation, lightness }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssColor {
    Hex([u8; 3]),
    Hsl(Hsl),
}

impl fmt::Display for CssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssColor::Hex([r, g, b]) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            CssColor::Hsl(hsl) => hsl.fmt(f),
        }
    }
}

impl From<Hsl> for CssColor {
    fn from(hsl: Hsl) -> Self {
        CssColor::Hsl(hsl)
    }
}

/// Card shadow presets, one tuned for light backgrounds and one for dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardShadow {
    Light,
    Dark,
}

impl CardShadow {
    pub fn css(self) -> &'static str {
        match self {
            CardShadow::Light => "0 10px 30px rgba(0, 0, 0, 0.1)",
            CardShadow::Dark => "0 10px 30px rgba(255, 255, 255, 0.05)",
        }
    }
}

/// The color half of a preset's class stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub primary: CssColor,
    pub secondary: CssColor,
    pub accent: CssColor,
    pub background: CssColor,
    pub secondary_background: CssColor,
    pub text: CssColor,
    pub secondary_text: CssColor,
    pub card_shadow: CardShadow,
}

impl Palette {
    /// Value this palette contributes for `property`, if it styles it at all.
    pub fn value(&self, property: StyleProperty) -> Option<String> {
        let color = match property {
            StyleProperty::PrimaryColor => self.primary,
            StyleProperty::SecondaryColor => self.secondary,
            StyleProperty::AccentColor => self.accent,
            StyleProperty::BackgroundColor => self.background,
            StyleProperty::SecondaryBackground => self.secondary_background,
            StyleProperty::TextColor => self.text,
            StyleProperty::SecondaryText => self.secondary_text,
            StyleProperty::CardShadow => return Some(self.card_shadow.css().to_string()),
            _ => return None,
        };
        Some(color.to_string())
    }
}

/// The three brand colors handed to decorative renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTriad {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl ColorTriad {
    pub fn from_hsl(primary: Hsl, secondary: Hsl, accent: Hsl) -> Self {
        Self {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            accent: accent.to_string(),
        }
    }
}

/// Which theme currently owns the style surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActiveTheme {
    /// Fresh page, nothing applied yet.
    #[default]
    Unset,
    Preset(PresetId),
    Generated(GeneratedTheme),
}

impl ActiveTheme {
    pub fn label(&self) -> String {
        match self {
            ActiveTheme::Unset => "unset".to_string(),
            ActiveTheme::Preset(id) => id.class_name().to_string(),
            ActiveTheme::Generated(theme) => theme.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_colors_render_like_the_stylesheet() {
        assert_eq!(CssColor::Hex([0x12, 0x12, 0x12]).to_string(), "#121212");
        assert_eq!(CssColor::Hex([0xf5, 0xf7, 0xfa]).to_string(), "#f5f7fa");
        assert_eq!(
            CssColor::from(Hsl::new(210, 80, 55)).to_string(),
            "hsl(210, 80%, 55%)"
        );
    }

    #[test]
    fn palette_only_answers_for_color_properties() {
        let palette = PresetTable::builtin().get(PresetId::Dark).palette.clone();
        assert_eq!(
            palette.value(StyleProperty::BackgroundColor).as_deref(),
            Some("#121212")
        );
        assert_eq!(
            palette.value(StyleProperty::CardShadow).as_deref(),
            Some(CardShadow::Dark.css())
        );
        assert_eq!(palette.value(StyleProperty::FontPrimary), None);
        assert_eq!(palette.value(StyleProperty::AnimationDuration), None);
    }
}
