//! Light/dark theme preference and toggle.
//!
//! Reads the preference from local storage and applies a `dark-mode` or
//! `light-mode` class to `<body>`. The toggle writes back to storage, swaps
//! the icon and tooltip, and spins the control once.
//!
//! TRADE-OFFS
//! ==========
//! Persistence is best-effort: without storage the theme still toggles for
//! the current page view and simply resets to the default on reload.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::{PageConfig, ThemeLabels};
use crate::consts::{GLYPH_MOON, GLYPH_SUN, THEME_ICON_SELECTOR, THEME_SPIN_MS, THEME_TOGGLE_ID};
use crate::error::PageError;
use crate::host::{Element, Event, EventKind, Host, PreferenceStore};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Value written to storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parse a stored value; anything unrecognized is `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Class applied to `<body>`.
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Dark => "dark-mode",
            Self::Light => "light-mode",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Dark => GLYPH_MOON,
            Self::Light => GLYPH_SUN,
        }
    }

    /// Tooltip offering the other theme.
    #[must_use]
    pub fn tooltip(self, labels: &ThemeLabels) -> &str {
        match self {
            Self::Dark => &labels.to_light,
            Self::Light => &labels.to_dark,
        }
    }
}

/// Owns the theme toggle and the current theme.
pub struct ThemeManager<E> {
    body: E,
    toggle: E,
    icon: E,
    store: Option<Rc<dyn PreferenceStore>>,
    storage_key: String,
    fallback: Theme,
    labels: ThemeLabels,
    current: Theme,
}

impl<E: Element> ThemeManager<E> {
    pub fn new(
        body: E,
        toggle: E,
        icon: E,
        store: Option<Rc<dyn PreferenceStore>>,
        config: &PageConfig,
    ) -> Self {
        Self {
            body,
            toggle,
            icon,
            store,
            storage_key: config.storage_key.clone(),
            fallback: config.default_theme,
            labels: config.labels.clone(),
            current: config.default_theme,
        }
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    /// The stored preference, or the default when absent or invalid.
    #[must_use]
    pub fn preference(&self) -> Theme {
        let Some(store) = &self.store else {
            return self.fallback;
        };
        match store.get(&self.storage_key) {
            Ok(Some(raw)) => Theme::parse(&raw).unwrap_or(self.fallback),
            Ok(None) => self.fallback,
            Err(e) => {
                log::debug!("theme preference unreadable: {e}");
                self.fallback
            }
        }
    }

    /// Show `theme` on the page without touching storage.
    pub fn show(&mut self, theme: Theme) {
        self.body.remove_class(theme.toggled().class_name());
        self.body.add_class(theme.class_name());
        self.icon.set_text(theme.icon());
        self.toggle.set_attr("title", theme.tooltip(&self.labels));
        self.current = theme;
    }

    /// Show `theme` and record it as the visitor's choice.
    pub fn apply(&mut self, theme: Theme) {
        self.show(theme);
        self.persist(theme);
    }

    /// Flip the theme and return the new one.
    pub fn toggle(&mut self) -> Theme {
        let next = self.current.toggled();
        self.apply(next);
        next
    }

    fn persist(&self, theme: Theme) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.set(&self.storage_key, theme.as_str()) {
            log::warn!("theme preference not saved: {e}");
        }
    }
}

/// Wire `#themeToggle` and show the stored theme.
///
/// # Errors
///
/// Returns [`PageError::MissingElement`] when the toggle, its icon, or
/// `<body>` is absent.
pub fn install<H: Host>(host: &Rc<H>, config: &PageConfig) -> Result<Rc<RefCell<ThemeManager<H::El>>>, PageError> {
    let toggle = host.element_by_id(THEME_TOGGLE_ID).ok_or(PageError::MissingElement("#themeToggle"))?;
    let icon = toggle.query(THEME_ICON_SELECTOR).ok_or(PageError::MissingElement(THEME_ICON_SELECTOR))?;
    let body = host.body().ok_or(PageError::MissingElement("body"))?;
    let store = match host.storage() {
        Ok(store) => Some(store),
        Err(e) => {
            log::debug!("theme will not persist: {e}");
            None
        }
    };

    // Only the toggle writes storage.
    let mut manager = ThemeManager::new(body, toggle.clone(), icon, store, config);
    let initial = manager.preference();
    manager.show(initial);
    let manager = Rc::new(RefCell::new(manager));

    let handler = {
        let host = Rc::clone(host);
        let manager = Rc::clone(&manager);
        let toggle = toggle.clone();
        move |_: &Event| {
            manager.borrow_mut().toggle();
            toggle.set_style("transform", "rotate(360deg)");
            let toggle = toggle.clone();
            host.set_timeout(
                THEME_SPIN_MS,
                Box::new(move || toggle.set_style("transform", "rotate(0deg)")),
            );
        }
    };
    toggle.listen(EventKind::Click, Box::new(handler));
    Ok(manager)
}
