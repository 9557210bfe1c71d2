//! Light/dark toggle lookup.
//!
//! This is a partial mapping, not a boolean flip: dark-family presets map to a
//! specific light counterpart and the light presets to a dark one. `forest`
//! has no way back to `default` or `dark` through the toggle.

use crate::surface::ModeIcon;
use crate::theme::{ActiveTheme, PresetId};

/// (from, to) pairs consulted by the mode toggle.
pub const LIGHT_DARK_TABLE: [(PresetId, PresetId); 5] = [
    (PresetId::Dark, PresetId::Default),
    (PresetId::Neon, PresetId::Pastel),
    (PresetId::Default, PresetId::Dark),
    (PresetId::Pastel, PresetId::Neon),
    (PresetId::Forest, PresetId::Neon),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleStep {
    pub target: Option<PresetId>,
    pub icon: ModeIcon,
}

fn is_dark_family(id: PresetId) -> bool {
    matches!(id, PresetId::Dark | PresetId::Neon)
}

fn step_to(target: PresetId) -> ToggleStep {
    ToggleStep {
        target: Some(target),
        icon: if is_dark_family(target) {
            ModeIcon::Sun
        } else {
            ModeIcon::Moon
        },
    }
}

pub fn toggle_step(active: &ActiveTheme) -> ToggleStep {
    let unmapped = ToggleStep {
        target: None,
        icon: ModeIcon::Sun,
    };
    match active {
        // A fresh page carries no theme class and reads as the light default.
        ActiveTheme::Unset => step_to(PresetId::Dark),
        ActiveTheme::Preset(id) => LIGHT_DARK_TABLE
            .iter()
            .find(|(from, _)| from == id)
            .map(|(_, to)| step_to(*to))
            .unwrap_or(unmapped),
        ActiveTheme::Generated(_) => unmapped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::GeneratedTheme;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn target_of(id: PresetId) -> Option<PresetId> {
        toggle_step(&ActiveTheme::Preset(id)).target
    }

    #[test]
    fn table_matches_expected_pairs() {
        assert_eq!(target_of(PresetId::Dark), Some(PresetId::Default));
        assert_eq!(target_of(PresetId::Neon), Some(PresetId::Pastel));
        assert_eq!(target_of(PresetId::Default), Some(PresetId::Dark));
        assert_eq!(target_of(PresetId::Pastel), Some(PresetId::Neon));
        assert_eq!(target_of(PresetId::Forest), Some(PresetId::Neon));
    }

    #[test]
    fn icon_hints_the_resulting_mode() {
        assert_eq!(toggle_step(&ActiveTheme::Preset(PresetId::Dark)).icon, ModeIcon::Moon);
        assert_eq!(toggle_step(&ActiveTheme::Preset(PresetId::Forest)).icon, ModeIcon::Sun);
        assert_eq!(toggle_step(&ActiveTheme::Unset), step_to(PresetId::Dark));
    }

    #[test]
    fn generated_theme_only_swaps_the_icon() {
        let theme = GeneratedTheme::generate(&mut SmallRng::seed_from_u64(1));
        let step = toggle_step(&ActiveTheme::Generated(theme));
        assert_eq!(step.target, None);
        assert_eq!(step.icon, ModeIcon::Sun);
    }

    #[test]
    fn forest_cannot_reach_the_default_pair() {
        // Walk the toggle from forest; default and dark are never visited.
        let mut current = PresetId::Forest;
        for _ in 0..8 {
            current = target_of(current).unwrap();
            assert!(!matches!(current, PresetId::Default | PresetId::Dark));
        }
    }
}
