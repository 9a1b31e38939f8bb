//! Browser implementation of the capability layer (`hydrate` only).
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps `web-sys` so the feature modules never touch it. Listeners live for
//! the lifetime of the page, so their closures are leaked with `forget`.
//! DOM calls that reject are logged and otherwise ignored; none of them can
//! leave a feature in an inconsistent state worse than a missed style.

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, HtmlDocument, HtmlElement, HtmlImageElement, HtmlTextAreaElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, ScrollToOptions, Window,
};

use crate::config::PageConfig;
use crate::controller::Boot;
use crate::error::PageError;
use crate::host::{
    Clipboard, Element, Event, EventKind, Host, KeyEvent, Listener, PreferenceStore, Rect, Viewport,
};
use crate::visibility::{
    self, PollTracker, TrackerKind, TrackerOptions, VisibilityEntry, VisibilityListener, VisibilityTracker,
};

fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        Self::Dom(js_error(&value))
    }
}

/// `dyn_into` without keeping the rejected value.
fn cast<T: JsCast>(value: impl JsCast) -> Option<T> {
    match value.dyn_into::<T>() {
        Ok(cast) => Some(cast),
        Err(_) => None,
    }
}

fn warn_on_err<T>(what: &str, result: Result<T, JsValue>) {
    if let Err(e) = result {
        log::warn!("{what} failed: {}", js_error(&e));
    }
}

// =============================================================
// Elements
// =============================================================

#[derive(Clone, PartialEq)]
pub struct WebElement(HtmlElement);

impl WebElement {
    fn from_element(element: web_sys::Element) -> Option<Self> {
        cast::<HtmlElement>(element).map(Self)
    }
}

impl Element for WebElement {
    fn id(&self) -> String {
        self.0.id()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attr(&self, name: &str, value: &str) {
        warn_on_err("set attribute", self.0.set_attribute(name, value));
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn style(&self, property: &str) -> String {
        self.0.style().get_property_value(property).unwrap_or_default()
    }

    fn set_style(&self, property: &str, value: &str) {
        warn_on_err("set style", self.0.style().set_property(property, value));
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        warn_on_err("add class", self.0.class_list().add_1(class));
    }

    fn remove_class(&self, class: &str) {
        warn_on_err("remove class", self.0.class_list().remove_1(class));
    }

    fn query(&self, selector: &str) -> Option<Self> {
        match self.0.query_selector(selector) {
            Ok(found) => found.and_then(Self::from_element),
            Err(e) => {
                log::warn!("bad selector {selector}: {}", js_error(&e));
                None
            }
        }
    }

    fn append_child(&self, child: &Self) -> Result<(), PageError> {
        self.0.append_child(&child.0)?;
        Ok(())
    }

    fn insert_before(&self, sibling: &Self) -> Result<(), PageError> {
        let parent = self.0.parent_node().ok_or_else(|| PageError::Dom("element has no parent".into()))?;
        parent.insert_before(&sibling.0, Some(&self.0))?;
        Ok(())
    }

    fn scroll_height(&self) -> f64 {
        f64::from(self.0.scroll_height())
    }

    fn rect(&self) -> Rect {
        let rect = self.0.get_bounding_client_rect();
        Rect::new(rect.top(), rect.bottom())
    }

    fn is_loaded(&self) -> bool {
        self.0.dyn_ref::<HtmlImageElement>().is_none_or(HtmlImageElement::complete)
    }

    fn scroll_into_view(&self) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        self.0.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn listen(&self, kind: EventKind, mut listener: Listener<Event>) {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |raw: web_sys::Event| {
            let on_self = match (raw.target(), raw.current_target()) {
                (Some(target), Some(current)) => target == current,
                _ => false,
            };
            let event = Event::new(on_self);
            listener(&event);
            if event.default_prevented() {
                raw.prevent_default();
            }
        });
        warn_on_err(
            kind.dom_name(),
            self.0.add_event_listener_with_callback(kind.dom_name(), callback.as_ref().unchecked_ref()),
        );
        callback.forget();
    }

    fn same_node(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

// =============================================================
// Services
// =============================================================

struct LocalStore(web_sys::Storage);

impl PreferenceStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, PageError> {
        self.0.get_item(key).map_err(|e| PageError::Storage(js_error(&e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PageError> {
        self.0.set_item(key, value).map_err(|e| PageError::Storage(js_error(&e)))
    }
}

struct WebClipboard {
    window: Window,
    document: Document,
}

impl Clipboard for WebClipboard {
    fn write_text(&self, text: &str) -> LocalBoxFuture<'static, Result<(), PageError>> {
        // `navigator.clipboard` is undefined outside secure contexts.
        let navigator = self.window.navigator();
        let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"));
        let text = text.to_owned();
        async move {
            let clipboard = clipboard.map_err(|e| PageError::Clipboard(js_error(&e)))?;
            if clipboard.is_undefined() || clipboard.is_null() {
                return Err(PageError::Unsupported("navigator.clipboard"));
            }
            let promise = clipboard.unchecked_into::<web_sys::Clipboard>().write_text(&text);
            wasm_bindgen_futures::JsFuture::from(promise)
                .await
                .map_err(|e| PageError::Clipboard(js_error(&e)))?;
            Ok(())
        }
        .boxed_local()
    }

    fn copy_via_selection(&self, text: &str) -> Result<(), PageError> {
        let body = self.document.body().ok_or(PageError::MissingElement("body"))?;
        let area = cast::<HtmlTextAreaElement>(self.document.create_element("textarea")?)
            .ok_or(PageError::Unsupported("textarea"))?;
        area.set_value(text);
        warn_on_err("position textarea", area.style().set_property("position", "fixed"));
        warn_on_err("position textarea", area.style().set_property("left", "-9999px"));
        body.append_child(&area)?;
        area.select();
        let copied = self
            .document
            .dyn_ref::<HtmlDocument>()
            .ok_or(PageError::Unsupported("execCommand"))
            .and_then(|doc| doc.exec_command("copy").map_err(PageError::from));
        warn_on_err("remove textarea", body.remove_child(&area));
        if copied? {
            Ok(())
        } else {
            Err(PageError::Clipboard("execCommand(\"copy\") was refused".into()))
        }
    }
}

// =============================================================
// Native visibility tracker
// =============================================================

struct NativeTracker {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl NativeTracker {
    fn start(
        options: TrackerOptions,
        targets: &[WebElement],
        mut listener: VisibilityListener,
    ) -> Result<Self, PageError> {
        let elements: Vec<web_sys::Element> = targets.iter().map(|t| t.0.clone().into()).collect();
        let observed = elements.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let batch: Vec<VisibilityEntry> = entries
                    .iter()
                    .filter_map(cast::<IntersectionObserverEntry>)
                    .filter_map(|entry| {
                        let target = entry.target();
                        let index = observed.iter().position(|el| *el == target)?;
                        Some(VisibilityEntry {
                            index,
                            intersecting: entry.is_intersecting(),
                            ratio: entry.intersection_ratio(),
                        })
                    })
                    .collect();
                if !batch.is_empty() {
                    listener(&batch);
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.margin.css());
        init.set_threshold(&JsValue::from_f64(options.threshold));
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        for element in &elements {
            observer.observe(element);
        }
        Ok(Self { observer, _callback: callback })
    }
}

impl VisibilityTracker for NativeTracker {
    fn kind(&self) -> TrackerKind {
        TrackerKind::Native
    }

    fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

// =============================================================
// Host
// =============================================================

pub struct WebHost {
    window: Window,
    document: Document,
}

impl WebHost {
    /// The current window's host.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Unsupported`] outside a browser window.
    pub fn current() -> Result<Rc<Self>, PageError> {
        let window = web_sys::window().ok_or(PageError::Unsupported("window"))?;
        let document = window.document().ok_or(PageError::Unsupported("document"))?;
        Ok(Rc::new(Self { window, document }))
    }

    fn has_native_observer(&self) -> bool {
        js_sys::Reflect::has(&self.window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
    }
}

impl Host for WebHost {
    type El = WebElement;

    fn query(&self, selector: &str) -> Option<WebElement> {
        match self.document.query_selector(selector) {
            Ok(found) => found.and_then(WebElement::from_element),
            Err(e) => {
                log::warn!("bad selector {selector}: {}", js_error(&e));
                None
            }
        }
    }

    fn query_all(&self, selector: &str) -> Vec<WebElement> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("bad selector {selector}: {}", js_error(&e));
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(cast::<web_sys::Element>)
            .filter_map(WebElement::from_element)
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).and_then(WebElement::from_element)
    }

    fn body(&self) -> Option<WebElement> {
        self.document.body().map(WebElement)
    }

    fn create_element(&self, tag: &str) -> Result<WebElement, PageError> {
        let element = self.document.create_element(tag)?;
        WebElement::from_element(element).ok_or(PageError::Unsupported("non-HTML element"))
    }

    fn viewport(&self) -> Viewport {
        let read = |value: Result<JsValue, JsValue>| value.map_or(0.0, |v| v.as_f64().unwrap_or(0.0));
        Viewport { width: read(self.window.inner_width()), height: read(self.window.inner_height()) }
    }

    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to_origin(&self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn on_scroll(&self, mut listener: Box<dyn FnMut()>) {
        let callback = Closure::<dyn FnMut()>::new(move || listener());
        warn_on_err(
            "scroll listener",
            self.window.add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref()),
        );
        callback.forget();
    }

    fn on_key_down(&self, mut listener: Listener<KeyEvent>) {
        let callback = Closure::<dyn FnMut(KeyboardEvent)>::new(move |raw: KeyboardEvent| {
            listener(&KeyEvent::new(raw.key()));
        });
        warn_on_err(
            "keydown listener",
            self.document.add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref()),
        );
        callback.forget();
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        let frame = Closure::once_into_js(move || callback());
        warn_on_err("animation frame", self.window.request_animation_frame(frame.unchecked_ref()));
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        Timeout::new(delay_ms, callback).forget();
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn storage(&self) -> Result<Rc<dyn PreferenceStore>, PageError> {
        match self.window.local_storage() {
            Ok(Some(storage)) => Ok(Rc::new(LocalStore(storage))),
            Ok(None) => Err(PageError::StorageUnavailable),
            Err(e) => Err(PageError::Storage(js_error(&e))),
        }
    }

    fn clipboard(&self) -> Rc<dyn Clipboard> {
        Rc::new(WebClipboard { window: self.window.clone(), document: self.document.clone() })
    }

    fn track_visibility(
        self: &Rc<Self>,
        options: TrackerOptions,
        targets: Vec<WebElement>,
        listener: VisibilityListener,
    ) -> Result<Box<dyn VisibilityTracker>, PageError> {
        if self.has_native_observer() {
            return Ok(Box::new(NativeTracker::start(options, &targets, listener)?));
        }
        log::debug!("IntersectionObserver unavailable, polling on scroll");
        Ok(visibility::poll_on_scroll(self, PollTracker::new(options, targets), listener))
    }
}

// =============================================================
// Boot
// =============================================================

thread_local! {
    static BOOT: RefCell<Boot> = RefCell::new(Boot::default());
}

fn is_loading(host: &WebHost) -> bool {
    host.document.ready_state() == "loading"
}

fn start_pending(host: &Rc<WebHost>) {
    BOOT.with(|boot| {
        if let Err(e) = boot.borrow_mut().start(host) {
            log::debug!("automatic start skipped: {e}");
        }
    });
}

/// Start the page behaviors with the pending configuration once the document
/// is interactive.
///
/// The start is always deferred to a later task, so a configuration passed
/// right after the module loads still takes effect.
///
/// # Errors
///
/// Returns [`PageError::Unsupported`] outside a browser window.
pub fn schedule_start() -> Result<(), PageError> {
    let host = WebHost::current()?;
    if !is_loading(&host) {
        Timeout::new(0, move || start_pending(&host)).forget();
        return Ok(());
    }
    let document = host.document.clone();
    let ready = Closure::once(move || start_pending(&host));
    warn_on_err(
        "DOMContentLoaded listener",
        document.add_event_listener_with_callback("DOMContentLoaded", ready.as_ref().unchecked_ref()),
    );
    ready.forget();
    Ok(())
}

/// Replace the pending configuration, starting right away when the document
/// is already interactive.
///
/// # Errors
///
/// Returns [`PageError::AlreadyStarted`] when the page behaviors are running,
/// or [`PageError::Unsupported`] outside a browser window.
pub fn start_with(config: PageConfig) -> Result<(), PageError> {
    let host = WebHost::current()?;
    BOOT.with(|boot| {
        let mut boot = boot.borrow_mut();
        boot.configure(config)?;
        if is_loading(&host) {
            log::debug!("configuration stored until DOMContentLoaded");
            return Ok(());
        }
        boot.start(&host)
    })
}
