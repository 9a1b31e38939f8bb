use futures::executor::block_on;

use super::*;
use crate::testing::{FakeClipboard, FakeElement, FakeHost};

fn code_block(host: &FakeHost, text: &str) -> FakeElement {
    let block = host.body.child(FakeElement::new("pre").with_class("code-block"));
    block.child(FakeElement::new("code").with_text(text));
    block
}

// =============================================================
// copy_text
// =============================================================

#[test]
fn copy_text_prefers_async_api() {
    let clipboard = FakeClipboard::default();
    let outcome = block_on(copy_text(&clipboard, "hello"));
    assert_eq!(outcome, CopyOutcome::Clipboard);
    assert_eq!(clipboard.contents.borrow().as_deref(), Some("hello"));
    assert_eq!(clipboard.fallback_calls.get(), 0);
}

#[test]
fn copy_text_falls_back_when_api_rejects() {
    let clipboard = FakeClipboard::default();
    clipboard.api_fails.set(true);
    let outcome = block_on(copy_text(&clipboard, "hello"));
    assert_eq!(outcome, CopyOutcome::Fallback);
    assert_eq!(clipboard.contents.borrow().as_deref(), Some("hello"));
    assert_eq!(clipboard.fallback_calls.get(), 1);
}

#[test]
fn copy_text_reports_failure_of_both_paths() {
    let clipboard = FakeClipboard::default();
    clipboard.api_fails.set(true);
    clipboard.fallback_fails.set(true);
    let outcome = block_on(copy_text(&clipboard, "hello"));
    assert_eq!(outcome, CopyOutcome::Failed);
    assert!(!outcome.copied());
    assert!(clipboard.contents.borrow().is_none());
}

// =============================================================
// attach / install
// =============================================================

#[test]
fn attach_injects_hidden_button() {
    let host = FakeHost::new();
    let block = code_block(&host, "hello");
    let button = attach(&host, &block).expect("attach");
    assert!(button.has_class(COPY_BUTTON_CLASS));
    assert_eq!(button.text(), GLYPH_COPY);
    assert_eq!(button.style("opacity"), "0");
    assert_eq!(block.style("position"), "relative");
    assert!(button.parent().is_some_and(|p| p.same_node(&block)));
}

#[test]
fn hover_shows_and_hides_button() {
    let host = FakeHost::new();
    let block = code_block(&host, "hello");
    let button = attach(&host, &block).expect("attach");
    block.fire(EventKind::PointerEnter, true);
    assert_eq!(button.style("opacity"), "1");
    block.fire(EventKind::PointerLeave, true);
    assert_eq!(button.style("opacity"), "0");
}

#[test]
fn click_copies_and_flashes_success_for_two_seconds() {
    let host = FakeHost::new();
    let block = code_block(&host, "hello");
    let button = attach(&host, &block).expect("attach");

    button.click();
    host.run_tasks();
    assert_eq!(host.clipboard.contents.borrow().as_deref(), Some("hello"));
    assert_eq!(button.text(), GLYPH_COPIED);
    assert_eq!(button.style("background"), COPY_SUCCESS_BACKGROUND);

    host.advance(1999);
    assert_eq!(button.text(), GLYPH_COPIED);
    host.advance(1);
    assert_eq!(button.text(), GLYPH_COPY);
    assert_eq!(button.style("background"), COPY_IDLE_BACKGROUND);
}

#[test]
fn click_uses_fallback_and_shows_same_success() {
    let host = FakeHost::new();
    host.clipboard.api_fails.set(true);
    let block = code_block(&host, "fn main() {}");
    let button = attach(&host, &block).expect("attach");

    button.click();
    host.run_tasks();
    assert_eq!(host.clipboard.fallback_calls.get(), 1);
    assert_eq!(host.clipboard.contents.borrow().as_deref(), Some("fn main() {}"));
    assert_eq!(button.text(), GLYPH_COPIED);
}

#[test]
fn click_when_both_paths_fail_leaves_button_idle() {
    let host = FakeHost::new();
    host.clipboard.api_fails.set(true);
    host.clipboard.fallback_fails.set(true);
    let block = code_block(&host, "hello");
    let button = attach(&host, &block).expect("attach");

    button.click();
    host.run_tasks();
    assert_eq!(button.text(), GLYPH_COPY);
    assert_eq!(host.pending_timers(), 0);
}

#[test]
fn click_on_block_without_code_does_nothing() {
    let host = FakeHost::new();
    let block = host.body.child(FakeElement::new("pre").with_class("code-block"));
    let button = attach(&host, &block).expect("attach");
    button.click();
    host.run_tasks();
    assert!(host.clipboard.contents.borrow().is_none());
}

#[test]
fn install_attaches_one_button_per_block() {
    let host = FakeHost::new();
    let first = code_block(&host, "a");
    let second = code_block(&host, "b");
    let buttons = install(&host).expect("install");
    assert_eq!(buttons.len(), 2);
    assert_eq!(first.children().len(), 2);
    assert_eq!(second.children().len(), 2);

    buttons[1].click();
    host.run_tasks();
    assert_eq!(host.clipboard.contents.borrow().as_deref(), Some("b"));
}

#[test]
fn install_requires_code_blocks() {
    let host = FakeHost::new();
    assert_eq!(install(&host).err(), Some(PageError::MissingElement(".code-block")));
}
