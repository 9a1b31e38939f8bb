//! In-memory host used by the unit tests.
//!
//! Elements form a small tree rooted at `<body>`. Selectors support the
//! three forms the features use: `.class`, `#id`, and a bare tag name.
//! Time only moves through [`FakeHost::advance`], frames only run through
//! [`FakeHost::run_frames`], and spawned tasks only run through
//! [`FakeHost::run_tasks`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures::FutureExt;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use crate::error::PageError;
use crate::host::{Clipboard, Element, Event, EventKind, Host, KeyEvent, Listener, PreferenceStore, Rect, Viewport};
use crate::visibility::{self, PollTracker, TrackerOptions, VisibilityListener, VisibilityTracker};

// =============================================================
// Elements
// =============================================================

#[derive(Default)]
struct FakeNode {
    tag: String,
    attrs: RefCell<HashMap<String, String>>,
    classes: RefCell<Vec<String>>,
    styles: RefCell<HashMap<String, String>>,
    text: RefCell<String>,
    children: RefCell<Vec<FakeElement>>,
    parent: RefCell<Weak<FakeNode>>,
    listeners: RefCell<Vec<(EventKind, Listener<Event>)>>,
    rect: Cell<Rect>,
    scroll_height: Cell<f64>,
    loaded: Cell<bool>,
    scrolled_into_view: Cell<u32>,
}

#[derive(Clone)]
pub struct FakeElement(Rc<FakeNode>);

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(FakeNode { tag: tag.to_owned(), ..FakeNode::default() }))
    }

    pub fn with_id(self, id: &str) -> Self {
        self.set_attr("id", id);
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    /// Append and return the child, for building trees inline.
    pub fn child(&self, child: FakeElement) -> FakeElement {
        self.attach(&child);
        child
    }

    pub fn children(&self) -> Vec<FakeElement> {
        self.0.children.borrow().clone()
    }

    pub fn parent(&self) -> Option<FakeElement> {
        self.0.parent.borrow().upgrade().map(FakeElement)
    }

    pub fn set_rect(&self, rect: Rect) {
        self.0.rect.set(rect);
    }

    pub fn set_scroll_height(&self, height: f64) {
        self.0.scroll_height.set(height);
    }

    pub fn set_loaded(&self, loaded: bool) {
        self.0.loaded.set(loaded);
    }

    pub fn scrolled_into_view(&self) -> u32 {
        self.0.scrolled_into_view.get()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.0.listeners.borrow().iter().filter(|(k, _)| *k == kind).count()
    }

    /// Dispatch an event to this element's listeners and return it so the
    /// caller can inspect `default_prevented`.
    pub fn fire(&self, kind: EventKind, on_self: bool) -> Event {
        let event = Event::new(on_self);
        let mut listeners = self.0.listeners.take();
        for (k, listener) in &mut listeners {
            if *k == kind {
                listener(&event);
            }
        }
        listeners.append(&mut self.0.listeners.borrow_mut());
        *self.0.listeners.borrow_mut() = listeners;
        event
    }

    pub fn click(&self) -> Event {
        self.fire(EventKind::Click, true)
    }

    fn attach(&self, child: &FakeElement) {
        if let Some(old) = child.parent() {
            old.0.children.borrow_mut().retain(|c| !c.same_node(child));
        }
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child.clone());
    }

    fn matches(&self, selector: &str) -> bool {
        if let Some(class) = selector.strip_prefix('.') {
            self.has_class(class)
        } else if let Some(id) = selector.strip_prefix('#') {
            self.id() == id
        } else {
            self.0.tag == selector
        }
    }

    fn descendants(&self, out: &mut Vec<FakeElement>) {
        for child in self.0.children.borrow().iter() {
            out.push(child.clone());
            child.descendants(out);
        }
    }

    fn find_all(&self, selector: &str) -> Vec<FakeElement> {
        let mut all = Vec::new();
        self.descendants(&mut all);
        all.into_iter().filter(|el| el.matches(selector)).collect()
    }
}

impl Element for FakeElement {
    fn id(&self) -> String {
        self.attr("id").unwrap_or_default()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0.attrs.borrow().get(name).cloned()
    }

    fn set_attr(&self, name: &str, value: &str) {
        self.0.attrs.borrow_mut().insert(name.to_owned(), value.to_owned());
    }

    fn text(&self) -> String {
        let mut text = self.0.text.borrow().clone();
        for child in self.0.children.borrow().iter() {
            text.push_str(&child.text());
        }
        text
    }

    fn set_text(&self, text: &str) {
        *self.0.text.borrow_mut() = text.to_owned();
    }

    fn style(&self, property: &str) -> String {
        self.0.styles.borrow().get(property).cloned().unwrap_or_default()
    }

    fn set_style(&self, property: &str, value: &str) {
        self.0.styles.borrow_mut().insert(property.to_owned(), value.to_owned());
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.classes.borrow().iter().any(|c| c == class)
    }

    fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.0.classes.borrow_mut().push(class.to_owned());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.classes.borrow_mut().retain(|c| c != class);
    }

    fn query(&self, selector: &str) -> Option<Self> {
        self.find_all(selector).into_iter().next()
    }

    fn append_child(&self, child: &Self) -> Result<(), PageError> {
        self.attach(child);
        Ok(())
    }

    fn insert_before(&self, sibling: &Self) -> Result<(), PageError> {
        let parent = self.parent().ok_or_else(|| PageError::Dom("element has no parent".into()))?;
        if let Some(old) = sibling.parent() {
            old.0.children.borrow_mut().retain(|c| !c.same_node(sibling));
        }
        *sibling.0.parent.borrow_mut() = Rc::downgrade(&parent.0);
        let mut children = parent.0.children.borrow_mut();
        let at = children.iter().position(|c| c.same_node(self)).unwrap_or(children.len());
        children.insert(at, sibling.clone());
        Ok(())
    }

    fn scroll_height(&self) -> f64 {
        self.0.scroll_height.get()
    }

    fn rect(&self) -> Rect {
        self.0.rect.get()
    }

    fn is_loaded(&self) -> bool {
        self.0.loaded.get()
    }

    fn scroll_into_view(&self) {
        self.0.scrolled_into_view.set(self.0.scrolled_into_view.get() + 1);
    }

    fn listen(&self, kind: EventKind, listener: Listener<Event>) {
        self.0.listeners.borrow_mut().push((kind, listener));
    }

    fn same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// =============================================================
// Services
// =============================================================

#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    pub fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.values.borrow_mut().insert(key.to_owned(), value.to_owned());
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PageError> {
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PageError> {
        if self.fail_writes.get() {
            return Err(PageError::Storage("quota exceeded".into()));
        }
        self.insert(key, value);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeClipboard {
    pub contents: RefCell<Option<String>>,
    pub api_fails: Cell<bool>,
    pub fallback_fails: Cell<bool>,
    pub fallback_calls: Cell<u32>,
}

impl Clipboard for FakeClipboard {
    fn write_text(&self, text: &str) -> LocalBoxFuture<'static, Result<(), PageError>> {
        let result = if self.api_fails.get() {
            Err(PageError::Clipboard("permission denied".into()))
        } else {
            *self.contents.borrow_mut() = Some(text.to_owned());
            Ok(())
        };
        futures::future::ready(result).boxed_local()
    }

    fn copy_via_selection(&self, text: &str) -> Result<(), PageError> {
        self.fallback_calls.set(self.fallback_calls.get() + 1);
        if self.fallback_fails.get() {
            return Err(PageError::Clipboard("execCommand refused".into()));
        }
        *self.contents.borrow_mut() = Some(text.to_owned());
        Ok(())
    }
}

// =============================================================
// Host
// =============================================================

type Timer = (u64, Box<dyn FnOnce()>);

pub struct FakeHost {
    pub body: FakeElement,
    pub viewport: Cell<Viewport>,
    pub offset: Cell<f64>,
    pub store: Rc<MemoryStore>,
    pub storage_available: Cell<bool>,
    pub clipboard: Rc<FakeClipboard>,
    pub scrolled_to_origin: Cell<u32>,
    scroll_listeners: RefCell<Vec<Box<dyn FnMut()>>>,
    key_listeners: RefCell<Vec<Listener<KeyEvent>>>,
    frames: RefCell<Vec<Box<dyn FnOnce()>>>,
    timers: RefCell<Vec<Timer>>,
    now_ms: Cell<u64>,
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
}

impl FakeHost {
    /// An empty desktop-sized page.
    pub fn new() -> Rc<Self> {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Rc::new(Self {
            body: FakeElement::new("body"),
            viewport: Cell::new(Viewport { width: 1280.0, height: 800.0 }),
            offset: Cell::new(0.0),
            store: Rc::new(MemoryStore::default()),
            storage_available: Cell::new(true),
            clipboard: Rc::new(FakeClipboard::default()),
            scrolled_to_origin: Cell::new(0),
            scroll_listeners: RefCell::new(Vec::new()),
            key_listeners: RefCell::new(Vec::new()),
            frames: RefCell::new(Vec::new()),
            timers: RefCell::new(Vec::new()),
            now_ms: Cell::new(0),
            pool: RefCell::new(pool),
            spawner,
        })
    }

    pub fn set_width(&self, width: f64) {
        let viewport = self.viewport.get();
        self.viewport.set(Viewport { width, ..viewport });
    }

    /// Move the page and dispatch a scroll event.
    pub fn scroll_to(&self, offset: f64) {
        self.offset.set(offset);
        let mut listeners = self.scroll_listeners.take();
        for listener in &mut listeners {
            listener();
        }
        listeners.append(&mut self.scroll_listeners.borrow_mut());
        *self.scroll_listeners.borrow_mut() = listeners;
    }

    pub fn press_key(&self, key: &str) {
        let event = KeyEvent::new(key);
        let mut listeners = self.key_listeners.take();
        for listener in &mut listeners {
            listener(&event);
        }
        listeners.append(&mut self.key_listeners.borrow_mut());
        *self.key_listeners.borrow_mut() = listeners;
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn run_frames(&self) {
        let frames = self.frames.take();
        for frame in frames {
            frame();
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Advance the clock, firing due timers in order.
    pub fn advance(&self, ms: u64) {
        let target = self.now_ms.get() + ms;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let due = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, (at, _))| *at <= target)
                    .min_by_key(|(_, (at, _))| *at)
                    .map(|(i, _)| i);
                due.map(|i| timers.remove(i))
            };
            let Some((at, callback)) = next else {
                break;
            };
            self.now_ms.set(at);
            callback();
        }
        self.now_ms.set(target);
    }

    pub fn run_tasks(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }
}

impl Host for FakeHost {
    type El = FakeElement;

    fn query(&self, selector: &str) -> Option<FakeElement> {
        self.body.query(selector)
    }

    fn query_all(&self, selector: &str) -> Vec<FakeElement> {
        self.body.find_all(selector)
    }

    fn element_by_id(&self, id: &str) -> Option<FakeElement> {
        self.body.find_all(&format!("#{id}")).into_iter().next()
    }

    fn body(&self) -> Option<FakeElement> {
        Some(self.body.clone())
    }

    fn create_element(&self, tag: &str) -> Result<FakeElement, PageError> {
        Ok(FakeElement::new(tag))
    }

    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn scroll_offset(&self) -> f64 {
        self.offset.get()
    }

    fn scroll_to_origin(&self) {
        self.scrolled_to_origin.set(self.scrolled_to_origin.get() + 1);
        self.offset.set(0.0);
    }

    fn on_scroll(&self, listener: Box<dyn FnMut()>) {
        self.scroll_listeners.borrow_mut().push(listener);
    }

    fn on_key_down(&self, listener: Listener<KeyEvent>) {
        self.key_listeners.borrow_mut().push(listener);
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        self.frames.borrow_mut().push(callback);
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        let at = self.now_ms.get() + u64::from(delay_ms);
        self.timers.borrow_mut().push((at, callback));
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        if let Err(e) = self.spawner.spawn_local(task) {
            log::error!("fake host could not spawn task: {e}");
        }
    }

    fn storage(&self) -> Result<Rc<dyn PreferenceStore>, PageError> {
        if !self.storage_available.get() {
            return Err(PageError::StorageUnavailable);
        }
        let store: Rc<dyn PreferenceStore> = self.store.clone();
        Ok(store)
    }

    fn clipboard(&self) -> Rc<dyn Clipboard> {
        self.clipboard.clone()
    }

    fn track_visibility(
        self: &Rc<Self>,
        options: TrackerOptions,
        targets: Vec<FakeElement>,
        listener: VisibilityListener,
    ) -> Result<Box<dyn VisibilityTracker>, PageError> {
        Ok(visibility::poll_on_scroll(self, PollTracker::new(options, targets), listener))
    }
}
