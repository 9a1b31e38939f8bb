//! One-shot entrance animation for content sections.
//!
//! Sections start transparent and shifted down; the first time 10% of one
//! is inside the viewport (less a 50px bottom margin) it eases into place.
//! Sections never hide again once revealed.

#[cfg(test)]
#[path = "reveal_test.rs"]
mod reveal_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::consts::SECTION_SELECTOR;
use crate::error::PageError;
use crate::host::{Element, Host};
use crate::visibility::{TrackerOptions, VisibilityEntry, VisibilityTracker};

pub struct Reveal<E> {
    sections: Vec<E>,
    revealed: Vec<bool>,
}

impl<E: Element> Reveal<E> {
    /// Take ownership of `sections` and put them in their hidden state.
    #[must_use]
    pub fn new(sections: Vec<E>) -> Self {
        for section in &sections {
            section.set_styles(&[
                ("opacity", "0"),
                ("transform", "translateY(30px)"),
                ("transition", "opacity 0.6s ease, transform 0.6s ease"),
            ]);
        }
        let revealed = vec![false; sections.len()];
        Self { sections, revealed }
    }

    #[must_use]
    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn on_visibility(&mut self, entries: &[VisibilityEntry]) {
        for entry in entries.iter().filter(|e| e.intersecting) {
            let Some(section) = self.sections.get(entry.index) else {
                continue;
            };
            if self.revealed[entry.index] {
                continue;
            }
            section.set_style("opacity", "1");
            section.set_style("transform", "translateY(0)");
            self.revealed[entry.index] = true;
        }
    }
}

/// Hide every `.content-section` and reveal each as it scrolls in.
///
/// # Errors
///
/// Returns [`PageError::MissingElement`] when the page has no sections, or
/// the tracker error when visibility tracking cannot start.
pub fn install<H: Host>(host: &Rc<H>) -> Result<(Rc<RefCell<Reveal<H::El>>>, Box<dyn VisibilityTracker>), PageError> {
    let sections = host.query_all(SECTION_SELECTOR);
    if sections.is_empty() {
        return Err(PageError::MissingElement(SECTION_SELECTOR));
    }
    let reveal = Rc::new(RefCell::new(Reveal::new(sections.clone())));
    let tracker = {
        let reveal = Rc::clone(&reveal);
        host.track_visibility(
            TrackerOptions::reveal(),
            sections,
            Box::new(move |entries: &[VisibilityEntry]| reveal.borrow_mut().on_visibility(entries)),
        )?
    };
    Ok((reveal, tracker))
}
