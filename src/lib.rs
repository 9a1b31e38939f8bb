//! Interactive behaviors for a static documentation page.
//!
//! This crate is compiled to WebAssembly and loaded by the page. It wires
//! DOM events to DOM updates: theme switching, scroll-tracked navigation,
//! code copy buttons, a back-to-top control, section entrance animation, a
//! collapsible mobile menu, and an image overlay. Features are written
//! against the capability traits in [`host`], so all of them run natively
//! under `cargo test` against an in-memory page.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | Installs every feature once and reports what was skipped |
//! | [`host`] | Element/host capability traits and event types |
//! | [`visibility`] | Viewport band math and the polling visibility tracker |
//! | [`theme`] | Light/dark preference and toggle |
//! | [`nav`] | Smooth in-page navigation and active-link tracking |
//! | [`copy`] | Copy-to-clipboard buttons on code blocks |
//! | [`back_to_top`] | Floating back-to-top control |
//! | [`reveal`] | One-shot section entrance animation |
//! | [`mobile_nav`] | Collapsible sidebar on narrow viewports |
//! | [`modal`] | Click-to-enlarge image overlay |
//! | [`images`] | Fade images in after load |
//! | [`parallax`] | Frame-coalesced background parallax |
//! | [`config`] | `PageConfig` and its JSON form |
//! | [`consts`] | Selectors, glyphs, colors, timings |
//! | `web` | `web-sys` host (`hydrate` feature only) |

pub mod back_to_top;
pub mod config;
pub mod consts;
pub mod controller;
pub mod copy;
pub mod error;
pub mod host;
pub mod images;
pub mod mobile_nav;
pub mod modal;
pub mod nav;
pub mod parallax;
pub mod reveal;
pub mod theme;
pub mod visibility;

#[cfg(test)]
mod testing;

#[cfg(feature = "hydrate")]
pub mod web;

#[cfg(feature = "hydrate")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "hydrate")]
fn install_logging() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger already set: {e}")));
    }
}

/// Module entry point: start with the default configuration unless
/// [`init_with_config`] supplies one first.
#[cfg(feature = "hydrate")]
#[wasm_bindgen(start)]
pub fn start() {
    install_logging();
    if let Err(e) = web::schedule_start() {
        log::error!("page behaviors not started: {e}");
    }
}

/// Start with a JSON configuration (see [`config::PageConfig`]) in place of
/// the default one.
///
/// # Errors
///
/// Rejects with the configuration error, or when the page behaviors have
/// already started.
#[cfg(feature = "hydrate")]
#[wasm_bindgen(js_name = initWithConfig)]
pub fn init_with_config(json: &str) -> Result<(), JsValue> {
    let config = config::PageConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    web::start_with(config).map_err(|e| JsValue::from_str(&e.to_string()))
}
