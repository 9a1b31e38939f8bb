//! Fade images in once they have loaded.

#[cfg(test)]
#[path = "images_test.rs"]
mod images_test;

use std::rc::Rc;

use crate::consts::IMAGE_SELECTOR;
use crate::error::PageError;
use crate::host::{Element, Event, EventKind, Host};

/// Hide `image` until it loads; images already loaded show immediately.
pub fn fade_in<E: Element>(image: &E) {
    image.set_style("opacity", "0");
    image.set_style("transition", "opacity 0.3s");
    let target = image.clone();
    image.listen(EventKind::Load, Box::new(move |_: &Event| target.set_style("opacity", "1")));
    if image.is_loaded() {
        image.set_style("opacity", "1");
    }
}

/// Apply [`fade_in`] to every `img` on the page.
///
/// # Errors
///
/// Returns [`PageError::MissingElement`] when the page has no images.
pub fn install<H: Host>(host: &Rc<H>) -> Result<usize, PageError> {
    let images = host.query_all(IMAGE_SELECTOR);
    if images.is_empty() {
        return Err(PageError::MissingElement(IMAGE_SELECTOR));
    }
    images.iter().for_each(fade_in);
    Ok(images.len())
}
