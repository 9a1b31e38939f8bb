//! Capability layer between page features and the browser.
//!
//! Features are written against [`Host`] and [`Element`] rather than
//! `web-sys` directly. The browser implementation lives in `web` (behind the
//! `hydrate` feature); tests drive the same features through an in-memory
//! fake and invoke listeners with synthetic events.

use std::cell::Cell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::error::PageError;
use crate::visibility::{TrackerOptions, VisibilityListener, VisibilityTracker};

/// Listener for an element or document event.
pub type Listener<E> = Box<dyn FnMut(&E)>;

/// Element events the features listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    PointerEnter,
    PointerLeave,
    /// Resource finished loading (images).
    Load,
}

impl EventKind {
    /// DOM event name.
    #[must_use]
    pub fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::PointerEnter => "mouseenter",
            Self::PointerLeave => "mouseleave",
            Self::Load => "load",
        }
    }
}

/// An element event as seen by a listener.
#[derive(Debug, Default)]
pub struct Event {
    on_self: bool,
    default_prevented: Cell<bool>,
}

impl Event {
    #[must_use]
    pub fn new(on_self: bool) -> Self {
        Self { on_self, default_prevented: Cell::new(false) }
    }

    /// True when the event target is the element the listener is attached
    /// to, not one of its descendants.
    #[must_use]
    pub fn on_self(&self) -> bool {
        self.on_self
    }

    /// Ask the host to skip the browser's default action.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// A document-level key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
}

impl KeyEvent {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Vertical extent of an element relative to the viewport top.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }
}

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// A handle to one DOM element.
///
/// Handles are cheap to clone and compare by identity. Style, text, and
/// class mutations are infallible from the caller's point of view; the
/// browser implementation logs the rare rejection instead of surfacing it.
pub trait Element: Clone + 'static {
    fn id(&self) -> String;
    fn attr(&self, name: &str) -> Option<String>;
    fn set_attr(&self, name: &str, value: &str);
    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    /// Inline style value, empty when unset.
    fn style(&self, property: &str) -> String;
    fn set_style(&self, property: &str, value: &str);
    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    /// First descendant matching `selector`.
    fn query(&self, selector: &str) -> Option<Self>;
    /// Append `child` as the last child of this element.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Dom`] if the host rejects the insertion.
    fn append_child(&self, child: &Self) -> Result<(), PageError>;
    /// Insert `sibling` into this element's parent, directly before it.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Dom`] if this element has no parent or the host
    /// rejects the insertion.
    fn insert_before(&self, sibling: &Self) -> Result<(), PageError>;
    /// Height of the content including the part clipped by overflow.
    fn scroll_height(&self) -> f64;
    fn rect(&self) -> Rect;
    /// Whether a loadable element (image) has finished loading.
    fn is_loaded(&self) -> bool;
    /// Smooth-scroll so the element's top aligns with the viewport start.
    fn scroll_into_view(&self);
    fn listen(&self, kind: EventKind, listener: Listener<Event>);
    fn same_node(&self, other: &Self) -> bool;

    /// Set several inline style properties at once.
    fn set_styles(&self, declarations: &[(&str, &str)]) {
        for (property, value) in declarations {
            self.set_style(property, value);
        }
    }
}

/// Persistent key/value preference storage (`localStorage` in the browser).
pub trait PreferenceStore {
    /// # Errors
    ///
    /// Returns [`PageError::Storage`] if the store rejects the read.
    fn get(&self, key: &str) -> Result<Option<String>, PageError>;

    /// # Errors
    ///
    /// Returns [`PageError::Storage`] if the store rejects the write
    /// (quota exceeded, storage disabled).
    fn set(&self, key: &str, value: &str) -> Result<(), PageError>;
}

/// System clipboard access.
pub trait Clipboard {
    /// Asynchronous clipboard API write.
    fn write_text(&self, text: &str) -> LocalBoxFuture<'static, Result<(), PageError>>;

    /// Legacy synchronous copy through a transient offscreen text field.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Clipboard`] when the host refuses the copy.
    fn copy_via_selection(&self, text: &str) -> Result<(), PageError>;
}

/// The document, window, and browser services a page feature can use.
pub trait Host: 'static {
    type El: Element;

    fn query(&self, selector: &str) -> Option<Self::El>;
    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::El>;
    fn element_by_id(&self, id: &str) -> Option<Self::El>;
    fn body(&self) -> Option<Self::El>;

    /// # Errors
    ///
    /// Returns [`PageError::Dom`] if the element cannot be created.
    fn create_element(&self, tag: &str) -> Result<Self::El, PageError>;

    fn viewport(&self) -> Viewport;
    /// Current vertical scroll offset of the page.
    fn scroll_offset(&self) -> f64;
    /// Smooth-scroll the page back to the document origin.
    fn scroll_to_origin(&self);

    fn on_scroll(&self, listener: Box<dyn FnMut()>);
    fn on_key_down(&self, listener: Listener<KeyEvent>);

    /// Run `callback` before the next repaint.
    fn request_frame(&self, callback: Box<dyn FnOnce()>);
    /// Run `callback` once after `delay_ms`.
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>);
    /// Drive a local (non-`Send`) future to completion on the event loop.
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);

    /// # Errors
    ///
    /// Returns [`PageError::StorageUnavailable`] when the host has no
    /// preference storage.
    fn storage(&self) -> Result<Rc<dyn PreferenceStore>, PageError>;
    fn clipboard(&self) -> Rc<dyn Clipboard>;

    /// Start reporting visibility changes of `targets`.
    ///
    /// Entries address targets by their position in `targets`.
    ///
    /// # Errors
    ///
    /// Returns an error when neither a native observer nor the polling
    /// fallback can be set up.
    fn track_visibility(
        self: &Rc<Self>,
        options: TrackerOptions,
        targets: Vec<Self::El>,
        listener: VisibilityListener,
    ) -> Result<Box<dyn VisibilityTracker>, PageError>;
}
