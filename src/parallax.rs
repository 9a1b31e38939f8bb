//! Background parallax: the body background drifts at a fraction of the
//! scroll speed. Updates are coalesced to one per animation frame.

#[cfg(test)]
#[path = "parallax_test.rs"]
mod parallax_test;

use std::cell::Cell;
use std::rc::Rc;

use crate::config::PageConfig;
use crate::error::PageError;
use crate::host::{Element, Host};

/// CSS `background-position` for a page scrolled by `offset`.
#[must_use]
pub fn background_position(offset: f64, speed: f64) -> String {
    format!("0 {}px", offset * speed)
}

/// Start the parallax effect on `<body>`.
///
/// # Errors
///
/// Returns [`PageError::MissingElement`] without a `<body>`.
pub fn install<H: Host>(host: &Rc<H>, config: &PageConfig) -> Result<(), PageError> {
    let body = host.body().ok_or(PageError::MissingElement("body"))?;
    let speed = config.parallax_speed;
    let ticking = Rc::new(Cell::new(false));

    let on_scroll = {
        let host = Rc::clone(host);
        move || {
            if ticking.replace(true) {
                return;
            }
            let reader = Rc::clone(&host);
            let body = body.clone();
            let ticking = Rc::clone(&ticking);
            host.request_frame(Box::new(move || {
                body.set_style("background-position", &background_position(reader.scroll_offset(), speed));
                ticking.set(false);
            }));
        }
    };
    host.on_scroll(Box::new(on_scroll));
    Ok(())
}
