//! Click-to-enlarge image overlay.
//!
//! One overlay (`#imageModal`) with one image (`#modalImage`) and one close
//! control serves every `.clickable-image`. Opening locks background
//! scrolling; every way of closing releases it, so the overlay is never
//! visible while the page behind it scrolls.

#[cfg(test)]
#[path = "modal_test.rs"]
mod modal_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::consts::{CLICKABLE_IMAGE_SELECTOR, KEY_ESCAPE, MODAL_CLOSE_SELECTOR, MODAL_ID, MODAL_IMAGE_ID};
use crate::error::PageError;
use crate::host::{Element, Event, EventKind, Host, KeyEvent};

/// The image reference currently shown in the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownImage {
    pub src: String,
    pub alt: String,
}

pub struct ImageModal<E> {
    overlay: E,
    image: E,
    body: E,
    shown: Option<ShownImage>,
}

impl<E: Element> ImageModal<E> {
    #[must_use]
    pub fn new(overlay: E, image: E, body: E) -> Self {
        Self { overlay, image, body, shown: None }
    }

    /// Visible exactly when the overlay is displayed as a block.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.overlay.style("display") == "block"
    }

    #[must_use]
    pub fn shown(&self) -> Option<&ShownImage> {
        self.shown.as_ref()
    }

    /// Show `source` enlarged, replacing whatever was shown before.
    pub fn open(&mut self, source: &E) {
        let shown = ShownImage {
            src: source.attr("src").unwrap_or_default(),
            alt: source.attr("alt").unwrap_or_default(),
        };
        self.overlay.set_style("display", "block");
        self.image.set_attr("src", &shown.src);
        self.image.set_attr("alt", &shown.alt);
        self.body.set_style("overflow", "hidden");
        self.shown = Some(shown);
    }

    pub fn close(&mut self) {
        self.overlay.set_style("display", "none");
        self.body.set_style("overflow", "auto");
        self.shown = None;
    }

    /// Clicks inside the image bubble up to the overlay; only a click on
    /// the backdrop itself closes.
    pub fn on_backdrop_click(&mut self, event: &Event) {
        if event.on_self() {
            self.close();
        }
    }

    pub fn on_key(&mut self, event: &KeyEvent) {
        if event.key == KEY_ESCAPE && self.is_open() {
            self.close();
        }
    }
}

/// Wire every `.clickable-image` to the shared overlay.
///
/// # Errors
///
/// Returns [`PageError::MissingElement`] when the overlay, its image, its
/// close control, or `<body>` is absent.
pub fn install<H: Host>(host: &Rc<H>) -> Result<Rc<RefCell<ImageModal<H::El>>>, PageError> {
    let overlay = host.element_by_id(MODAL_ID).ok_or(PageError::MissingElement("#imageModal"))?;
    let image = host.element_by_id(MODAL_IMAGE_ID).ok_or(PageError::MissingElement("#modalImage"))?;
    let close = host.query(MODAL_CLOSE_SELECTOR).ok_or(PageError::MissingElement(MODAL_CLOSE_SELECTOR))?;
    let body = host.body().ok_or(PageError::MissingElement("body"))?;

    let modal = Rc::new(RefCell::new(ImageModal::new(overlay.clone(), image, body)));

    for source in host.query_all(CLICKABLE_IMAGE_SELECTOR) {
        let modal = Rc::clone(&modal);
        let target = source.clone();
        source.listen(EventKind::Click, Box::new(move |_: &Event| modal.borrow_mut().open(&target)));
    }
    {
        let modal = Rc::clone(&modal);
        close.listen(EventKind::Click, Box::new(move |_: &Event| modal.borrow_mut().close()));
    }
    {
        let modal = Rc::clone(&modal);
        overlay.listen(EventKind::Click, Box::new(move |event: &Event| modal.borrow_mut().on_backdrop_click(event)));
    }
    {
        let modal = Rc::clone(&modal);
        host.on_key_down(Box::new(move |event: &KeyEvent| modal.borrow_mut().on_key(event)));
    }
    Ok(modal)
}
