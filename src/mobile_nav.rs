//! Collapsible sidebar navigation for narrow viewports.
//!
//! Only installed when the viewport is at most the mobile breakpoint wide
//! at load time; resizing afterwards does not add or remove it.

#[cfg(test)]
#[path = "mobile_nav_test.rs"]
mod mobile_nav_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::PageConfig;
use crate::consts::{GLYPH_CLOSE, GLYPH_MENU, MOBILE_TOGGLE_CLASS, NAV_LINK_SELECTOR, SIDEBAR_NAV_SELECTOR};
use crate::error::PageError;
use crate::host::{Element, Event, EventKind, Host};

const TOGGLE_STYLE: &[(&str, &str)] = &[
    ("display", "block"),
    ("background", "rgba(255, 255, 255, 0.1)"),
    ("border", "1px solid rgba(255, 255, 255, 0.2)"),
    ("border-radius", "6px"),
    ("color", "white"),
    ("padding", "0.5rem"),
    ("margin-bottom", "1rem"),
    ("cursor", "pointer"),
    ("width", "100%"),
    ("font-size", "1rem"),
];

/// Whether a viewport this wide gets the collapsible menu.
#[must_use]
pub fn is_narrow(width: f64, breakpoint: f64) -> bool {
    width <= breakpoint
}

pub struct MobileNav<E> {
    list: E,
    toggle: E,
    expanded: bool,
}

impl<E: Element> MobileNav<E> {
    /// Collapse `list` and take over `toggle`.
    #[must_use]
    pub fn new(list: E, toggle: E) -> Self {
        list.set_styles(&[("max-height", "0"), ("overflow", "hidden"), ("transition", "max-height 0.3s ease")]);
        toggle.set_text(GLYPH_MENU);
        Self { list, toggle, expanded: false }
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle(&mut self) {
        if self.expanded {
            self.collapse();
        } else {
            self.expand();
        }
    }

    pub fn expand(&mut self) {
        self.list.set_style("max-height", &format!("{}px", self.list.scroll_height()));
        self.toggle.set_text(GLYPH_CLOSE);
        self.expanded = true;
    }

    pub fn collapse(&mut self) {
        self.list.set_style("max-height", "0");
        self.toggle.set_text(GLYPH_MENU);
        self.expanded = false;
    }

    /// A navigation link was followed while the viewport is `width` wide.
    pub fn on_link_click(&mut self, width: f64, breakpoint: f64) {
        if self.expanded && is_narrow(width, breakpoint) {
            self.collapse();
        }
    }
}

/// Insert the menu toggle above `.sidebar-nav` on narrow viewports.
///
/// # Errors
///
/// Returns [`PageError::NotApplicable`] on wide viewports,
/// [`PageError::MissingElement`] without a `.sidebar-nav`, or
/// [`PageError::Dom`] when the toggle cannot be inserted.
pub fn install<H: Host>(host: &Rc<H>, config: &PageConfig) -> Result<Rc<RefCell<MobileNav<H::El>>>, PageError> {
    let breakpoint = config.mobile_breakpoint;
    if !is_narrow(host.viewport().width, breakpoint) {
        return Err(PageError::NotApplicable("wide viewport"));
    }
    let list = host.query(SIDEBAR_NAV_SELECTOR).ok_or(PageError::MissingElement(SIDEBAR_NAV_SELECTOR))?;
    let toggle = host.create_element("button")?;
    toggle.add_class(MOBILE_TOGGLE_CLASS);
    toggle.set_styles(TOGGLE_STYLE);
    list.insert_before(&toggle)?;

    let menu = Rc::new(RefCell::new(MobileNav::new(list, toggle.clone())));
    {
        let menu = Rc::clone(&menu);
        toggle.listen(EventKind::Click, Box::new(move |_: &Event| menu.borrow_mut().toggle()));
    }
    for link in host.query_all(NAV_LINK_SELECTOR) {
        let host = Rc::clone(host);
        let menu = Rc::clone(&menu);
        link.listen(
            EventKind::Click,
            Box::new(move |_: &Event| menu.borrow_mut().on_link_click(host.viewport().width, breakpoint)),
        );
    }
    Ok(menu)
}
