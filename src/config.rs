//! Explorer configuration, loaded from environment variables.
//!
//! Every key is optional. A key that is present but does not parse is an
//! error rather than a silent fallback, so a typo in `.env` is reported at
//! startup.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use viewport::coordinator::CoordinatorConfig;
use viewport::view::{ViewState, ViewportSize};
use worker::kernel::DEFAULT_MAX_ITERATIONS;
use worker::render::{DEFAULT_DELIVERY_CAPACITY, WorkerConfig};

pub const DEFAULT_WIDTH: u32 = 550;
pub const DEFAULT_HEIGHT: u32 = 400;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{key}={value:?} is not a valid {expected}")]
    Invalid { key: &'static str, value: String, expected: &'static str },
    #[error("MANDELVIEW_SCALE must be finite and positive, got {0}")]
    BadScale(f64),
    #[error("{key} must be a finite number, got {value}")]
    NotFinite { key: &'static str, value: f64 },
}

/// Startup settings for one explorer session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplorerConfig {
    pub view: ViewState,
    pub viewport: ViewportSize,
    pub max_iterations: u32,
    pub delivery_capacity: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            view: ViewState::default(),
            viewport: ViewportSize::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            delivery_capacity: DEFAULT_DELIVERY_CAPACITY,
        }
    }
}

impl ExplorerConfig {
    /// Read `MANDELVIEW_*` variables from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let center_x = finite_coordinate(&lookup, "MANDELVIEW_CENTER_X", defaults.view.center_x)?;
        let center_y = finite_coordinate(&lookup, "MANDELVIEW_CENTER_Y", defaults.view.center_y)?;
        let scale = env_parse(&lookup, "MANDELVIEW_SCALE", "number", defaults.view.scale)?;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::BadScale(scale));
        }

        Ok(Self {
            view: ViewState::new(center_x, center_y, scale),
            viewport: ViewportSize::new(
                env_parse(&lookup, "MANDELVIEW_WIDTH", "pixel count", defaults.viewport.width)?,
                env_parse(&lookup, "MANDELVIEW_HEIGHT", "pixel count", defaults.viewport.height)?,
            ),
            max_iterations: env_parse(&lookup, "MANDELVIEW_MAX_ITERATIONS", "iteration count", defaults.max_iterations)?,
            delivery_capacity: env_parse(
                &lookup,
                "MANDELVIEW_DELIVERY_CAPACITY",
                "channel capacity",
                defaults.delivery_capacity,
            )?,
        })
    }

    #[must_use]
    pub fn coordinator(&self) -> CoordinatorConfig {
        CoordinatorConfig { initial: self.view, ..CoordinatorConfig::default() }
    }

    #[must_use]
    pub fn worker(&self) -> WorkerConfig {
        WorkerConfig { delivery_capacity: self.delivery_capacity }
    }
}

fn env_parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => {
            let trimmed = raw.trim();
            trimmed
                .parse::<T>()
                .map_err(|_| ConfigError::Invalid { key, value: trimmed.to_owned(), expected })
        }
    }
}

fn finite_coordinate(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: f64,
) -> Result<f64, ConfigError> {
    let value = env_parse(lookup, key, "number", default)?;
    if value.is_finite() { Ok(value) } else { Err(ConfigError::NotFinite { key, value }) }
}
