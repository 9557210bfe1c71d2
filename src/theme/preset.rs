use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use super::{CardShadow, CssColor, Palette};

/// The closed set of named presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetId {
    Default,
    Dark,
    Neon,
    Pastel,
    Forest,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown preset: {0}")]
pub struct UnknownPreset(pub String);

impl PresetId {
    pub const ALL: [PresetId; 5] = [
        PresetId::Default,
        PresetId::Dark,
        PresetId::Neon,
        PresetId::Pastel,
        PresetId::Forest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PresetId::Default => "default",
            PresetId::Dark => "dark",
            PresetId::Neon => "neon",
            PresetId::Pastel => "pastel",
            PresetId::Forest => "forest",
        }
    }

    /// Body class carried while this preset is active.
    pub fn class_name(self) -> &'static str {
        match self {
            PresetId::Default => "theme-default",
            PresetId::Dark => "theme-dark",
            PresetId::Neon => "theme-neon",
            PresetId::Pastel => "theme-pastel",
            PresetId::Forest => "theme-forest",
        }
    }

    /// Accepts both the bare name (`dark`) and the class form (`theme-dark`).
    pub fn parse(id: &str) -> Option<Self> {
        let name = id.strip_prefix("theme-").unwrap_or(id);
        Self::ALL.into_iter().find(|preset| preset.name() == name)
    }

    pub fn from_class(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.class_name() == class)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for PresetId {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresetConfig {
    pub font_primary: String,
    pub font_secondary: String,
    /// Multiplier on the base two-second animation cycle.
    pub animation_speed: f64,
    pub palette: Palette,
}

impl PresetConfig {
    fn new(
        font_primary: &str,
        font_secondary: &str,
        animation_speed: f64,
        palette: Palette,
    ) -> Self {
        Self {
            font_primary: font_primary.to_string(),
            font_secondary: font_secondary.to_string(),
            animation_speed,
            palette,
        }
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis((self.animation_speed * 2000.0).round() as u64)
    }
}

/// Partial per-preset overrides read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PresetOverride {
    pub font_primary: Option<String>,
    pub font_secondary: Option<String>,
    pub animation_speed: Option<f64>,
}

/// Immutable lookup of preset configurations, built once at start.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetTable {
    entries: [PresetConfig; 5],
}

const fn hex(rgb: u32) -> CssColor {
    CssColor::Hex([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8])
}

impl PresetTable {
    pub fn builtin() -> Self {
        Self {
            entries: [
                PresetConfig::new(
                    "Poppins, sans-serif",
                    "Montserrat, sans-serif",
                    1.0,
                    Palette {
                        primary: hex(0x6c63ff),
                        secondary: hex(0xff6584),
                        accent: hex(0x43e97b),
                        background: hex(0xffffff),
                        secondary_background: hex(0xf5f7fa),
                        text: hex(0x333333),
                        secondary_text: hex(0x666666),
                        card_shadow: CardShadow::Light,
                    },
                ),
                PresetConfig::new(
                    "Poppins, sans-serif",
                    "Montserrat, sans-serif",
                    0.9,
                    Palette {
                        primary: hex(0xbb86fc),
                        secondary: hex(0x03dac6),
                        accent: hex(0xcf6679),
                        background: hex(0x121212),
                        secondary_background: hex(0x1e1e1e),
                        text: hex(0xf1f1f1),
                        secondary_text: hex(0xaaaaaa),
                        card_shadow: CardShadow::Dark,
                    },
                ),
                PresetConfig::new(
                    "Montserrat, sans-serif",
                    "Poppins, sans-serif",
                    1.2,
                    Palette {
                        primary: hex(0x00f5ff),
                        secondary: hex(0xff00e4),
                        accent: hex(0xf6ff00),
                        background: hex(0x0a0a0f),
                        secondary_background: hex(0x15151f),
                        text: hex(0xffffff),
                        secondary_text: hex(0xb0b0c0),
                        card_shadow: CardShadow::Dark,
                    },
                ),
                PresetConfig::new(
                    "Roboto, sans-serif",
                    "Poppins, sans-serif",
                    0.8,
                    Palette {
                        primary: hex(0xa8d8ea),
                        secondary: hex(0xaa96da),
                        accent: hex(0xfcbad3),
                        background: hex(0xfffdf7),
                        secondary_background: hex(0xf6f1e9),
                        text: hex(0x4a4a4a),
                        secondary_text: hex(0x7a7a7a),
                        card_shadow: CardShadow::Light,
                    },
                ),
                PresetConfig::new(
                    "Montserrat, sans-serif",
                    "Roboto, sans-serif",
                    0.95,
                    Palette {
                        primary: hex(0x2d6a4f),
                        secondary: hex(0x40916c),
                        accent: hex(0xd4a373),
                        background: hex(0xf1faee),
                        secondary_background: hex(0xe9f5db),
                        text: hex(0x1b4332),
                        secondary_text: hex(0x52796f),
                        card_shadow: CardShadow::Light,
                    },
                ),
            ],
        }
    }

    pub fn with_overrides(overrides: &BTreeMap<PresetId, PresetOverride>) -> Self {
        let mut table = Self::builtin();
        for (id, patch) in overrides {
            let entry = &mut table.entries[id.index()];
            if let Some(font) = &patch.font_primary {
                entry.font_primary = font.clone();
            }
            if let Some(font) = &patch.font_secondary {
                entry.font_secondary = font.clone();
            }
            if let Some(speed) = patch.animation_speed {
                entry.animation_speed = speed;
            }
        }
        table
    }

    pub fn get(&self, id: PresetId) -> &PresetConfig {
        &self.entries[id.index()]
    }
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_bare_and_class_names() {
        assert_eq!(PresetId::parse("dark"), Some(PresetId::Dark));
        assert_eq!(PresetId::parse("theme-forest"), Some(PresetId::Forest));
        assert_eq!(PresetId::parse("theme-"), None);
        assert_eq!(PresetId::parse("Dark"), None);
        assert_eq!(PresetId::parse("theme-solarized"), None);
        assert!("midnight".parse::<PresetId>().is_err());
    }

    #[test]
    fn class_names_round_trip() {
        for id in PresetId::ALL {
            assert_eq!(PresetId::from_class(id.class_name()), Some(id));
        }
        assert_eq!(PresetId::from_class("theme-transitioning"), None);
    }

    #[test]
    fn builtin_fonts_and_speeds() {
        let table = PresetTable::builtin();
        let neon = table.get(PresetId::Neon);
        assert_eq!(neon.font_primary, "Montserrat, sans-serif");
        assert_eq!(neon.font_secondary, "Poppins, sans-serif");
        assert_eq!(neon.animation_duration(), Duration::from_millis(2400));
        assert_eq!(
            table.get(PresetId::Forest).animation_duration(),
            Duration::from_millis(1900)
        );
        assert_eq!(
            table.get(PresetId::Pastel).animation_duration(),
            Duration::from_millis(1600)
        );
    }

    #[test]
    fn overrides_patch_only_named_fields() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            PresetId::Pastel,
            PresetOverride {
                font_primary: Some("Lato, sans-serif".to_string()),
                font_secondary: None,
                animation_speed: Some(0.5),
            },
        );
        let table = PresetTable::with_overrides(&overrides);
        let pastel = table.get(PresetId::Pastel);
        assert_eq!(pastel.font_primary, "Lato, sans-serif");
        assert_eq!(pastel.font_secondary, "Poppins, sans-serif");
        assert_eq!(pastel.animation_duration(), Duration::from_secs(1));
        assert_eq!(table.get(PresetId::Dark), PresetTable::builtin().get(PresetId::Dark));
    }
}
