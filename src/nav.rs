//! Sidebar navigation: smooth in-page scrolling and active-link tracking.
//!
//! Clicking a `.nav-item` marks it active and scrolls its section into
//! view. Independently, a visibility tracker watches every
//! `.content-section`; when one crosses the line 20% below the viewport top
//! its link becomes the active one. Whichever event arrives last wins.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use std::rc::Rc;

use crate::consts::{ACTIVE_CLASS, NAV_LINK_SELECTOR, SECTION_SELECTOR};
use crate::error::PageError;
use crate::host::{Element, Event, EventKind, Host};
use crate::visibility::{TrackerOptions, VisibilityEntry, VisibilityTracker};

/// Section id referenced by an in-page link, without the `#`.
#[must_use]
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// A navigation link and the section id it points at.
#[derive(Clone)]
pub struct NavLink<E> {
    pub element: E,
    pub target: Option<String>,
}

impl<E: Element> NavLink<E> {
    #[must_use]
    pub fn from_element(element: E) -> Self {
        let target = element.attr("href").as_deref().and_then(fragment_target).map(str::to_owned);
        Self { element, target }
    }
}

pub struct NavController<E> {
    links: Vec<NavLink<E>>,
    sections: Vec<E>,
}

impl<E: Element> NavController<E> {
    #[must_use]
    pub fn new(links: Vec<E>, sections: Vec<E>) -> Self {
        let links = links.into_iter().map(NavLink::from_element).collect();
        Self { links, sections }
    }

    #[must_use]
    pub fn links(&self) -> &[NavLink<E>] {
        &self.links
    }

    /// Index of the link currently marked active.
    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.links.iter().position(|link| link.element.has_class(ACTIVE_CLASS))
    }

    /// Make `index` the only active link; `None` clears them all.
    pub fn set_active(&self, index: Option<usize>) {
        for link in &self.links {
            link.element.remove_class(ACTIVE_CLASS);
        }
        if let Some(link) = index.and_then(|i| self.links.get(i)) {
            link.element.add_class(ACTIVE_CLASS);
        }
    }

    /// Link pointing at section `id`.
    #[must_use]
    pub fn link_for(&self, id: &str) -> Option<usize> {
        self.links.iter().position(|link| link.target.as_deref() == Some(id))
    }

    /// Handle a click on link `index`: activate it and scroll to its
    /// section. Returns the section scrolled to, if any.
    pub fn on_link_click<H: Host<El = E>>(&self, host: &H, index: usize, event: &Event) -> Option<E> {
        event.prevent_default();
        self.set_active(Some(index));
        let target = self.links.get(index)?.target.as_deref()?;
        let section = host.element_by_id(target)?;
        section.scroll_into_view();
        Some(section)
    }

    /// Handle a batch of section visibility changes.
    ///
    /// Each section that entered the band replaces the active link; a
    /// section with no matching link leaves none active.
    pub fn on_visibility(&self, entries: &[VisibilityEntry]) {
        for entry in entries.iter().filter(|e| e.intersecting) {
            let Some(section) = self.sections.get(entry.index) else {
                continue;
            };
            self.set_active(self.link_for(&section.id()));
        }
    }
}

/// Wire every `.nav-item` and start tracking `.content-section`s.
///
/// # Errors
///
/// Returns [`PageError::MissingElement`] when the page has no navigation
/// links, or the tracker error when visibility tracking cannot start.
pub fn install<H: Host>(host: &Rc<H>) -> Result<(Rc<NavController<H::El>>, Box<dyn VisibilityTracker>), PageError> {
    let links = host.query_all(NAV_LINK_SELECTOR);
    if links.is_empty() {
        return Err(PageError::MissingElement(NAV_LINK_SELECTOR));
    }
    let sections = host.query_all(SECTION_SELECTOR);
    let controller = Rc::new(NavController::new(links, sections.clone()));

    for (index, link) in controller.links().iter().enumerate() {
        let host = Rc::clone(host);
        let controller = Rc::clone(&controller);
        link.element.listen(
            EventKind::Click,
            Box::new(move |event: &Event| {
                controller.on_link_click(&*host, index, event);
            }),
        );
    }

    let tracker = {
        let controller = Rc::clone(&controller);
        host.track_visibility(
            TrackerOptions::active_section(),
            sections,
            Box::new(move |entries: &[VisibilityEntry]| controller.on_visibility(entries)),
        )?
    };
    Ok((controller, tracker))
}
