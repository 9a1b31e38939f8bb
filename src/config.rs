//! Page configuration.
//!
//! SYSTEM CONTEXT
//! ==============
//! The wasm entry point boots with [`PageConfig::default`]; pages that need
//! different thresholds or tooltip text call `init_with_config` with a JSON
//! object instead. Every field is optional and falls back to the default.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::error::PageError;
use crate::theme::Theme;

pub const DEFAULT_STORAGE_KEY: &str = "theme";
pub const DEFAULT_BACK_TO_TOP_THRESHOLD: f64 = 500.0;
pub const DEFAULT_MOBILE_BREAKPOINT: f64 = 1024.0;
pub const DEFAULT_PARALLAX_SPEED: f64 = 0.5;

/// Tooltips shown on the theme toggle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeLabels {
    /// Shown while the page is dark: offers switching to light.
    pub to_light: String,
    /// Shown while the page is light: offers switching to dark.
    pub to_dark: String,
}

impl Default for ThemeLabels {
    fn default() -> Self {
        Self { to_light: "切换到白天模式".to_owned(), to_dark: "切换到黑夜模式".to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    /// `localStorage` key holding the theme preference.
    pub storage_key: String,
    /// Theme used when nothing valid is stored.
    pub default_theme: Theme,
    /// Scroll offset above which the back-to-top control is shown.
    pub back_to_top_threshold: f64,
    /// Viewport widths at or below this get the collapsible navigation.
    pub mobile_breakpoint: f64,
    /// Background offset per unit of page scroll.
    pub parallax_speed: f64,
    pub labels: ThemeLabels,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            default_theme: Theme::Dark,
            back_to_top_threshold: DEFAULT_BACK_TO_TOP_THRESHOLD,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            parallax_speed: DEFAULT_PARALLAX_SPEED,
            labels: ThemeLabels::default(),
        }
    }
}

impl PageConfig {
    /// Parse a JSON configuration object and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Config`] when the JSON is malformed or a value is
    /// out of range.
    pub fn from_json(raw: &str) -> Result<Self, PageError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| PageError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that numeric fields are usable.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), PageError> {
        if self.storage_key.trim().is_empty() {
            return Err(PageError::Config("storageKey must not be empty".into()));
        }
        if !self.back_to_top_threshold.is_finite() || self.back_to_top_threshold < 0.0 {
            return Err(PageError::Config("backToTopThreshold must be a non-negative number".into()));
        }
        if !self.mobile_breakpoint.is_finite() || self.mobile_breakpoint <= 0.0 {
            return Err(PageError::Config("mobileBreakpoint must be a positive number".into()));
        }
        if !self.parallax_speed.is_finite() {
            return Err(PageError::Config("parallaxSpeed must be finite".into()));
        }
        Ok(())
    }
}
