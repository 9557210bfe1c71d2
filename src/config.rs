use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::theme::{PresetId, PresetOverride, PresetTable};

pub const CONFIG_ENV: &str = "THEME_SWITCHER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "assets/switcher.yml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// How overlapping theme requests interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// A new request cancels whatever sequence is still pending.
    #[default]
    Supersede,
    /// Sequences run side by side; the last timer to fire wins.
    Interleave,
}

/// Fixed delays of the transition and "AI" sequences.
///
/// Example YAML:
///
/// timings:
///   overlay_opacity: 0.8
///   apply_delay_ms: 400
///   hide_delay_ms: 400
///   progress_step: 2
///   progress_tick_ms: 30
///   analysis_pause_ms: 500
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub overlay_opacity: f32,
    pub apply_delay_ms: u64,
    pub hide_delay_ms: u64,
    pub progress_step: u8,
    pub progress_tick_ms: u64,
    pub analysis_pause_ms: u64,
    pub toast_enter_ms: u64,
    pub toast_visible_ms: u64,
    pub toast_fade_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            overlay_opacity: 0.8,
            apply_delay_ms: 400,
            hide_delay_ms: 400,
            progress_step: 2,
            progress_tick_ms: 30,
            analysis_pause_ms: 500,
            toast_enter_ms: 100,
            toast_visible_ms: 3000,
            toast_fade_ms: 300,
        }
    }
}

impl Timings {
    pub fn apply_delay(&self) -> Duration {
        Duration::from_millis(self.apply_delay_ms)
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }

    pub fn analysis_pause(&self) -> Duration {
        Duration::from_millis(self.analysis_pause_ms)
    }

    pub fn toast_enter(&self) -> Duration {
        Duration::from_millis(self.toast_enter_ms)
    }

    pub fn toast_visible(&self) -> Duration {
        Duration::from_millis(self.toast_visible_ms)
    }

    pub fn toast_fade(&self) -> Duration {
        Duration::from_millis(self.toast_fade_ms)
    }

    /// Wall-clock length of the progress placebo.
    pub fn analysis_duration(&self) -> Duration {
        let ticks = 100u64.div_ceil(u64::from(self.progress_step.max(1)));
        self.progress_tick() * ticks as u32 + self.analysis_pause()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub cards: usize,
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            cards: 6,
            canvas_width: 1280.0,
            canvas_height: 720.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timings: Timings,
    pub overlap: OverlapPolicy,
    pub page: PageConfig,
    pub presets: BTreeMap<PresetId, PresetOverride>,
    pub listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            overlap: OverlapPolicy::default(),
            page: PageConfig::default(),
            presets: BTreeMap::new(),
            listen_addr: "127.0.0.1:7878".to_string(),
        }
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.into(),
        reason: reason.into(),
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Path from `THEME_SWITCHER_CONFIG`, or the default asset path.
    pub fn resolve_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Loads `path` if it exists; a missing file means built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_yaml_file(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timings;
        if !(0.0..=1.0).contains(&t.overlay_opacity) {
            return Err(invalid("timings.overlay_opacity", "must be within 0..=1"));
        }
        if t.progress_step == 0 || t.progress_step > 100 {
            return Err(invalid("timings.progress_step", "must be within 1..=100"));
        }
        for (id, patch) in &self.presets {
            if let Some(speed) = patch.animation_speed {
                if !(speed.is_finite() && speed > 0.0) {
                    return Err(invalid(
                        format!("presets.{id}.animation_speed"),
                        "must be a positive number",
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn preset_table(&self) -> PresetTable {
        PresetTable::with_overrides(&self.presets)
    }
}
