//! Page controller: installs every feature against one host.
//!
//! Features are independent. A feature whose markup is missing, or whose
//! installation fails, is recorded as skipped and the rest still install.
//!
//! Features inject controls and attach listeners that are never removed, so
//! a page is started at most once. [`Boot`] holds the configuration until
//! then and refuses every later start or reconfiguration.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::fmt;
use std::rc::Rc;

use crate::config::PageConfig;
use crate::error::PageError;
use crate::host::Host;
use crate::visibility::VisibilityTracker;
use crate::{back_to_top, copy, images, mobile_nav, modal, nav, parallax, reveal, theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Theme,
    Navigation,
    CodeCopy,
    BackToTop,
    ImageFade,
    MobileNav,
    Parallax,
    Reveal,
    ImageModal,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Theme => "theme",
            Self::Navigation => "navigation",
            Self::CodeCopy => "code copy",
            Self::BackToTop => "back to top",
            Self::ImageFade => "image fade",
            Self::MobileNav => "mobile navigation",
            Self::Parallax => "parallax",
            Self::Reveal => "reveal",
            Self::ImageModal => "image modal",
        };
        f.write_str(name)
    }
}

/// Which features are running and why the others are not.
#[derive(Debug, Default)]
pub struct InitReport {
    pub installed: Vec<Feature>,
    pub skipped: Vec<(Feature, PageError)>,
}

impl InitReport {
    #[must_use]
    pub fn is_installed(&self, feature: Feature) -> bool {
        self.installed.contains(&feature)
    }

    #[must_use]
    pub fn skip_reason(&self, feature: Feature) -> Option<&PageError> {
        self.skipped.iter().find(|(f, _)| *f == feature).map(|(_, e)| e)
    }

    fn record<T>(&mut self, feature: Feature, result: Result<T, PageError>) -> Option<T> {
        match result {
            Ok(value) => {
                log::debug!("{feature} installed");
                self.installed.push(feature);
                Some(value)
            }
            Err(e) => {
                if e.is_skip() {
                    log::debug!("{feature} skipped: {e}");
                } else {
                    log::warn!("{feature} failed to install: {e}");
                }
                self.skipped.push((feature, e));
                None
            }
        }
    }
}

/// The running page behaviors.
///
/// Keeps the visibility trackers so they can be stopped together.
pub struct PageController {
    report: InitReport,
    trackers: Vec<Box<dyn VisibilityTracker>>,
}

impl PageController {
    #[must_use]
    pub fn report(&self) -> &InitReport {
        &self.report
    }

    #[must_use]
    pub fn tracker_count(&self) -> usize {
        self.trackers.len()
    }

    /// Stop every visibility tracker. Listeners already attached to
    /// elements stay in place.
    pub fn disconnect(&mut self) {
        for tracker in &mut self.trackers {
            tracker.disconnect();
        }
    }
}

/// Install every feature on `host`.
pub fn init<H: Host>(host: &Rc<H>, config: &PageConfig) -> PageController {
    let mut report = InitReport::default();
    let mut trackers = Vec::new();

    report.record(Feature::Theme, theme::install(host, config));
    if let Some((_, tracker)) = report.record(Feature::Navigation, nav::install(host)) {
        trackers.push(tracker);
    }
    report.record(Feature::CodeCopy, copy::install(host));
    report.record(Feature::BackToTop, back_to_top::install(host, config));
    report.record(Feature::ImageFade, images::install(host));
    report.record(Feature::MobileNav, mobile_nav::install(host, config));
    report.record(Feature::Parallax, parallax::install(host, config));
    if let Some((_, tracker)) = report.record(Feature::Reveal, reveal::install(host)) {
        trackers.push(tracker);
    }
    report.record(Feature::ImageModal, modal::install(host));

    log::info!(
        "page behaviors ready: {} installed, {} skipped",
        report.installed.len(),
        report.skipped.len()
    );
    PageController { report, trackers }
}

/// Start-once gate around [`init`].
pub enum Boot {
    /// Not started; holds the configuration the start will use.
    Pending(PageConfig),
    Started(PageController),
}

impl Default for Boot {
    fn default() -> Self {
        Self::Pending(PageConfig::default())
    }
}

impl Boot {
    #[must_use]
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }

    #[must_use]
    pub fn controller(&self) -> Option<&PageController> {
        match self {
            Self::Started(controller) => Some(controller),
            Self::Pending(_) => None,
        }
    }

    /// Replace the configuration the page will start with.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::AlreadyStarted`] once the page has started.
    pub fn configure(&mut self, config: PageConfig) -> Result<(), PageError> {
        match self {
            Self::Pending(pending) => {
                *pending = config;
                Ok(())
            }
            Self::Started(_) => Err(PageError::AlreadyStarted),
        }
    }

    /// Install every feature on `host` with the pending configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::AlreadyStarted`] on every call after the first.
    pub fn start<H: Host>(&mut self, host: &Rc<H>) -> Result<(), PageError> {
        let Self::Pending(config) = self else {
            return Err(PageError::AlreadyStarted);
        };
        let controller = init(host, config);
        *self = Self::Started(controller);
        Ok(())
    }
}
