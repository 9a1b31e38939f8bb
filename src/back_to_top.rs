//! Floating back-to-top control.

#[cfg(test)]
#[path = "back_to_top_test.rs"]
mod back_to_top_test;

use std::rc::Rc;

use crate::config::PageConfig;
use crate::consts::{BACK_TO_TOP_CLASS, GLYPH_UP};
use crate::error::PageError;
use crate::host::{Element, Event, EventKind, Host};

const BUTTON_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("bottom", "2rem"),
    ("right", "2rem"),
    ("width", "50px"),
    ("height", "50px"),
    ("background", "linear-gradient(135deg, #3b82f6 0%, #8b5cf6 100%)"),
    ("border", "none"),
    ("border-radius", "50%"),
    ("color", "white"),
    ("font-size", "1.25rem"),
    ("cursor", "pointer"),
    ("opacity", "0"),
    ("transform", "translateY(20px)"),
    ("transition", "all 0.3s"),
    ("z-index", "1000"),
    ("box-shadow", "0 4px 15px rgba(59, 130, 246, 0.3)"),
];

/// Shown strictly above the threshold.
#[must_use]
pub fn should_show(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

/// Match the control's visibility to the scroll offset.
pub fn update<E: Element>(button: &E, offset: f64, threshold: f64) {
    if should_show(offset, threshold) {
        button.set_style("opacity", "1");
        button.set_style("transform", "translateY(0)");
    } else {
        button.set_style("opacity", "0");
        button.set_style("transform", "translateY(20px)");
    }
}

/// Inject the control into `<body>` and track scrolling.
///
/// # Errors
///
/// Returns [`PageError::MissingElement`] without a `<body>`, or
/// [`PageError::Dom`] when the control cannot be inserted.
pub fn install<H: Host>(host: &Rc<H>, config: &PageConfig) -> Result<H::El, PageError> {
    let body = host.body().ok_or(PageError::MissingElement("body"))?;
    let button = host.create_element("button")?;
    button.set_text(GLYPH_UP);
    button.add_class(BACK_TO_TOP_CLASS);
    button.set_styles(BUTTON_STYLE);
    body.append_child(&button)?;

    let threshold = config.back_to_top_threshold;
    {
        let reader = Rc::clone(host);
        let button = button.clone();
        host.on_scroll(Box::new(move || update(&button, reader.scroll_offset(), threshold)));
    }
    {
        let host = Rc::clone(host);
        button.listen(EventKind::Click, Box::new(move |_: &Event| host.scroll_to_origin()));
    }
    Ok(button)
}
