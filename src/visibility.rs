//! Visibility tracking: which targets currently sit inside a viewport band.
//!
//! Two implementations share the [`VisibilityTracker`] capability. The
//! browser uses a native `IntersectionObserver` when it can (see `web`);
//! [`PollTracker`] computes the same answer from bounding rects and is driven
//! by scroll events, both as the fallback for hosts without the observer and
//! as the layout-free implementation used in tests.
//!
//! Entries are reported only when a target's state changes, plus one initial
//! report for every target, matching the native observer's behavior.

#[cfg(test)]
#[path = "visibility_test.rs"]
mod visibility_test;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::host::{Element, Host, Rect};

/// Listener receiving one batch of visibility changes.
pub type VisibilityListener = Box<dyn FnMut(&[VisibilityEntry])>;

/// One target's visibility change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEntry {
    /// Position of the target in the tracked list.
    pub index: usize,
    pub intersecting: bool,
    /// Fraction of the target's height inside the band.
    pub ratio: f64,
}

/// Which implementation backs a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerKind {
    Native,
    Poll,
}

/// A running tracker. Dropping the handle does not stop delivery; call
/// [`VisibilityTracker::disconnect`] for that.
pub trait VisibilityTracker {
    fn kind(&self) -> TrackerKind;
    fn disconnect(&mut self);
}

/// Offset applied to one edge of the viewport. Negative values shrink it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inset {
    Px(f64),
    /// Percent of the viewport height.
    Percent(f64),
}

impl Inset {
    /// Resolve to pixels for a viewport of `extent` pixels.
    #[must_use]
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => extent * pct / 100.0,
        }
    }
}

impl fmt::Display for Inset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Vertical root margin. Horizontal margins are always zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: Inset,
    pub bottom: Inset,
}

impl RootMargin {
    /// CSS `rootMargin` string for the native observer.
    #[must_use]
    pub fn css(&self) -> String {
        format!("{} 0px {} 0px", self.top, self.bottom)
    }

    /// The band `[top, bottom]` in viewport coordinates.
    #[must_use]
    pub fn band(&self, viewport_height: f64) -> (f64, f64) {
        let top = -self.top.resolve(viewport_height);
        let bottom = viewport_height + self.bottom.resolve(viewport_height);
        (top, bottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerOptions {
    pub margin: RootMargin,
    /// Minimum visible fraction of a target for it to count as visible.
    pub threshold: f64,
}

impl TrackerOptions {
    /// Band used to pick the active navigation section: a line 20% below
    /// the viewport top.
    #[must_use]
    pub fn active_section() -> Self {
        Self {
            margin: RootMargin { top: Inset::Percent(-20.0), bottom: Inset::Percent(-80.0) },
            threshold: 0.0,
        }
    }

    /// Band used for the entrance animation: the viewport minus its bottom
    /// 50px, with 10% of the section visible.
    #[must_use]
    pub fn reveal() -> Self {
        Self { margin: RootMargin { top: Inset::Px(0.0), bottom: Inset::Px(-50.0) }, threshold: 0.1 }
    }

    /// Evaluate one target rect against the band.
    ///
    /// Edges touching the band count as intersecting, so a zero-height band
    /// still catches the section that spans it.
    #[must_use]
    pub fn evaluate(&self, rect: Rect, viewport_height: f64) -> (bool, f64) {
        let (band_top, band_bottom) = self.margin.band(viewport_height);
        let overlap = rect.bottom.min(band_bottom) - rect.top.max(band_top);
        if overlap < 0.0 {
            return (false, 0.0);
        }
        let height = rect.height();
        let ratio = if height > 0.0 { (overlap / height).min(1.0) } else { 1.0 };
        (ratio >= self.threshold, ratio)
    }
}

/// Rect-based tracker. Call [`PollTracker::poll`] whenever layout may have
/// moved (scroll) to get the targets whose state changed.
pub struct PollTracker<E> {
    targets: Vec<E>,
    options: TrackerOptions,
    last: Vec<Option<bool>>,
}

impl<E: Element> PollTracker<E> {
    #[must_use]
    pub fn new(options: TrackerOptions, targets: Vec<E>) -> Self {
        let last = vec![None; targets.len()];
        Self { targets, options, last }
    }

    /// Entries for every target whose visibility differs from the last poll.
    pub fn poll(&mut self, viewport_height: f64) -> Vec<VisibilityEntry> {
        let mut changed = Vec::new();
        for (index, target) in self.targets.iter().enumerate() {
            let (intersecting, ratio) = self.options.evaluate(target.rect(), viewport_height);
            if self.last[index] != Some(intersecting) {
                self.last[index] = Some(intersecting);
                changed.push(VisibilityEntry { index, intersecting, ratio });
            }
        }
        changed
    }
}

struct PollState<E> {
    tracker: PollTracker<E>,
    listener: VisibilityListener,
}

/// Handle for a [`PollTracker`] driven by the host's scroll events.
pub struct PollHandle {
    active: Rc<Cell<bool>>,
}

impl VisibilityTracker for PollHandle {
    fn kind(&self) -> TrackerKind {
        TrackerKind::Poll
    }

    fn disconnect(&mut self) {
        self.active.set(false);
    }
}

/// Drive `tracker` from scroll events, delivering the initial report now.
pub fn poll_on_scroll<H: Host>(
    host: &Rc<H>,
    tracker: PollTracker<H::El>,
    listener: VisibilityListener,
) -> Box<dyn VisibilityTracker> {
    let state = Rc::new(RefCell::new(PollState { tracker, listener }));
    let active = Rc::new(Cell::new(true));

    let run = {
        let host = Rc::clone(host);
        let active = Rc::clone(&active);
        move || {
            if !active.get() {
                return;
            }
            let mut state = state.borrow_mut();
            let entries = state.tracker.poll(host.viewport().height);
            if !entries.is_empty() {
                (state.listener)(&entries);
            }
        }
    };

    run();
    host.on_scroll(Box::new(run));
    Box::new(PollHandle { active })
}
