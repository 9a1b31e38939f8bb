//! Copy-to-clipboard buttons for code blocks.
//!
//! Each `.code-block` gets a button that appears while the pointer is over
//! the block. Clicking copies the block's `code` text through the async
//! clipboard API, falling back to the legacy selection copy, and flashes a
//! checkmark for two seconds.

#[cfg(test)]
#[path = "copy_test.rs"]
mod copy_test;

use std::rc::Rc;

use futures::FutureExt;

use crate::consts::{
    CODE_BLOCK_SELECTOR, CODE_SELECTOR, COPY_BUTTON_CLASS, COPY_FEEDBACK_MS, COPY_IDLE_BACKGROUND,
    COPY_SUCCESS_BACKGROUND, GLYPH_COPIED, GLYPH_COPY,
};
use crate::error::PageError;
use crate::host::{Clipboard, Element, Event, EventKind, Host};

const BUTTON_STYLE: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("top", "0.75rem"),
    ("right", "0.75rem"),
    ("background", COPY_IDLE_BACKGROUND),
    ("border", "none"),
    ("border-radius", "4px"),
    ("color", "white"),
    ("padding", "0.5rem"),
    ("cursor", "pointer"),
    ("font-size", "0.875rem"),
    ("opacity", "0"),
    ("transition", "opacity 0.3s"),
];

/// Which path delivered the text to the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Clipboard,
    Fallback,
    Failed,
}

impl CopyOutcome {
    #[must_use]
    pub fn copied(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// Copy `text`, trying the async API first and the selection copy second.
/// Failures are logged, never returned.
pub async fn copy_text(clipboard: &dyn Clipboard, text: &str) -> CopyOutcome {
    let Err(e) = clipboard.write_text(text).await else {
        return CopyOutcome::Clipboard;
    };
    log::error!("failed to copy text: {e}");
    match clipboard.copy_via_selection(text) {
        Ok(()) => CopyOutcome::Fallback,
        Err(e) => {
            log::error!("fallback copy failed: {e}");
            CopyOutcome::Failed
        }
    }
}

/// Show the checkmark on `button`.
pub fn show_copied<E: Element>(button: &E) {
    button.set_text(GLYPH_COPIED);
    button.set_style("background", COPY_SUCCESS_BACKGROUND);
}

/// Put `button` back to its idle look.
pub fn show_idle<E: Element>(button: &E) {
    button.set_text(GLYPH_COPY);
    button.set_style("background", COPY_IDLE_BACKGROUND);
}

/// Attach a copy button to `block` and return it.
///
/// # Errors
///
/// Returns [`PageError::Dom`] when the button cannot be created or
/// inserted.
pub fn attach<H: Host>(host: &Rc<H>, block: &H::El) -> Result<H::El, PageError> {
    let button = host.create_element("button")?;
    button.set_text(GLYPH_COPY);
    button.add_class(COPY_BUTTON_CLASS);
    button.set_styles(BUTTON_STYLE);
    block.set_style("position", "relative");
    block.append_child(&button)?;

    {
        let button = button.clone();
        block.listen(EventKind::PointerEnter, Box::new(move |_: &Event| button.set_style("opacity", "1")));
    }
    {
        let button = button.clone();
        block.listen(EventKind::PointerLeave, Box::new(move |_: &Event| button.set_style("opacity", "0")));
    }

    let handler = {
        let host = Rc::clone(host);
        let block = block.clone();
        let button = button.clone();
        move |_: &Event| {
            let Some(code) = block.query(CODE_SELECTOR) else {
                return;
            };
            let text = code.text();
            let clipboard = host.clipboard();
            let host_for_task = Rc::clone(&host);
            let button = button.clone();
            let task = async move {
                if copy_text(clipboard.as_ref(), &text).await.copied() {
                    show_copied(&button);
                    host_for_task.set_timeout(COPY_FEEDBACK_MS, Box::new(move || show_idle(&button)));
                }
            };
            host.spawn_local(task.boxed_local());
        }
    };
    button.listen(EventKind::Click, Box::new(handler));
    Ok(button)
}

/// Attach copy buttons to every `.code-block`.
///
/// # Errors
///
/// Returns [`PageError::MissingElement`] when the page has no code blocks,
/// or the first attachment failure.
pub fn install<H: Host>(host: &Rc<H>) -> Result<Vec<H::El>, PageError> {
    let blocks = host.query_all(CODE_BLOCK_SELECTOR);
    if blocks.is_empty() {
        return Err(PageError::MissingElement(CODE_BLOCK_SELECTOR));
    }
    blocks.iter().map(|block| attach(host, block)).collect()
}
