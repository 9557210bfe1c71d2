//! Log targets and the `env_logger` setup.
//!
//! Each subsystem logs under its own `switcher::*` target, so
//! `RUST_LOG=switcher::theme=debug` isolates the controller's sequences.

use env_logger::{Builder, Env};
use log::LevelFilter;

pub const THEME_NAMESPACE: &str = "switcher::theme";
pub const SURFACE_NAMESPACE: &str = "switcher::surface";
pub const DECOR_NAMESPACE: &str = "switcher::decor";
pub const COMMAND_NAMESPACE: &str = "switcher::command";

#[macro_export]
macro_rules! theme_log {
    ($($arg:tt)*) => {
        log::log!(target: $crate::logging::THEME_NAMESPACE, $($arg)*)
    };
}

#[macro_export]
macro_rules! surface_log {
    ($($arg:tt)*) => {
        log::log!(target: $crate::logging::SURFACE_NAMESPACE, $($arg)*)
    };
}

#[macro_export]
macro_rules! decor_log {
    ($($arg:tt)*) => {
        log::log!(target: $crate::logging::DECOR_NAMESPACE, $($arg)*)
    };
}

#[macro_export]
macro_rules! command_log {
    ($($arg:tt)*) => {
        log::log!(target: $crate::logging::COMMAND_NAMESPACE, $($arg)*)
    };
}

/// Baseline level per target. Directives from `RUST_LOG` are parsed after
/// these and take precedence.
const TARGET_LEVELS: [(&str, LevelFilter); 4] = [
    (THEME_NAMESPACE, LevelFilter::Debug),
    (SURFACE_NAMESPACE, LevelFilter::Info),
    (DECOR_NAMESPACE, LevelFilter::Info),
    (COMMAND_NAMESPACE, LevelFilter::Debug),
];

fn builder() -> Builder {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Info);
    for (target, level) in TARGET_LEVELS {
        builder.filter_module(target, level);
    }
    builder
        .parse_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .format_target(true);
    builder
}

pub fn init_logging() {
    builder().init();
    theme_log!(log::Level::Info, "Logging initialized");
}

/// Captured by the test harness; safe to call from every test.
pub fn init_test_logging() {
    let _ = builder().is_test(true).try_init();
}
