//! Shared test utilities: an in-memory DOM, storage, and a manual clock.
//!
//! The fake DOM implements the [`Document`] and [`Element`] traits closely
//! enough for the behavior units: class lists, attributes, inline styles,
//! text, form values, focus, containment, and a compound-selector subset
//! (`tag`, `.class`, `#id`, `[attr]`, `[attr="v"]`, `[attr^="v"]`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let doc = FakeDocument::new();
//! let nav = doc.append(&doc.body_element(), "ul").with_id("nav-links");
//! let link = doc.append(&nav, "a").with_class("nav-link").with_attr("href", "#about");
//!
//! assert_eq!(doc.query_all(".nav-link"), vec![link]);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::dom::{Document, Element, Intersection, Storage};
use crate::schedule::Scheduler;

// =========================================================================
// Elements
// =========================================================================

type FocusSlot = Rc<RefCell<Option<FakeElement>>>;

struct Node {
    tag: String,
    classes: RefCell<Vec<String>>,
    attributes: RefCell<BTreeMap<String, String>>,
    styles: RefCell<BTreeMap<String, String>>,
    text: RefCell<String>,
    value: RefCell<String>,
    top: Cell<f64>,
    children: RefCell<Vec<FakeElement>>,
    parent: RefCell<Weak<Node>>,
    focus: FocusSlot,
}

/// An element of the in-memory DOM. Clones share the same node.
#[derive(Clone)]
pub struct FakeElement(Rc<Node>);

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.0.tag)?;
        if let Some(id) = self.attribute("id") {
            write!(f, " id={id:?}")?;
        }
        let classes = self.0.classes.borrow();
        if !classes.is_empty() {
            write!(f, " class={:?}", classes.join(" "))?;
        }
        write!(f, ">")
    }
}

impl FakeElement {
    fn new(tag: &str, focus: FocusSlot) -> Self {
        Self(Rc::new(Node {
            tag: tag.to_ascii_lowercase(),
            classes: RefCell::new(Vec::new()),
            attributes: RefCell::new(BTreeMap::new()),
            styles: RefCell::new(BTreeMap::new()),
            text: RefCell::new(String::new()),
            value: RefCell::new(String::new()),
            top: Cell::new(0.0),
            children: RefCell::new(Vec::new()),
            parent: RefCell::new(Weak::new()),
            focus,
        }))
    }

    pub fn with_id(self, id: &str) -> Self {
        self.set_attribute("id", id);
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_top(self, top: f64) -> Self {
        self.set_top(top);
        self
    }

    pub fn set_top(&self, top: f64) {
        self.0.top.set(top);
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.styles.borrow().get(property).cloned()
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.classes.borrow().clone()
    }

    pub fn is_focused(&self) -> bool {
        self.0.focus.borrow().as_ref() == Some(self)
    }

    /// Visibility report for this element.
    pub fn seen(&self, ratio: f64) -> Intersection<FakeElement> {
        Intersection {
            target: self.clone(),
            is_intersecting: ratio > 0.0,
            ratio,
            top: self.0.top.get(),
        }
    }

    fn descendants(&self, out: &mut Vec<FakeElement>) {
        for child in self.0.children.borrow().iter() {
            out.push(child.clone());
            child.descendants(out);
        }
    }

    fn matches(&self, selector: &Compound) -> bool {
        if let Some(tag) = &selector.tag {
            if !tag.eq_ignore_ascii_case(&self.0.tag) {
                return false;
            }
        }
        if let Some(id) = &selector.id {
            if self.attribute("id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !selector.classes.iter().all(|c| self.has_class(c)) {
            return false;
        }
        selector.attributes.iter().all(|(name, op)| {
            let Some(value) = self.attribute(name) else {
                return false;
            };
            match op {
                AttrOp::Exists => true,
                AttrOp::Equals(expected) => &value == expected,
                AttrOp::Prefix(prefix) => value.starts_with(prefix.as_str()),
            }
        })
    }
}

impl Element for FakeElement {
    fn has_class(&self, class: &str) -> bool {
        self.0.classes.borrow().iter().any(|c| c == class)
    }

    fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.0.classes.borrow_mut().push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.classes.borrow_mut().retain(|c| c != class);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.0
            .attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.0.attributes.borrow_mut().remove(name);
    }

    fn text(&self) -> String {
        self.0.text.borrow().clone()
    }

    fn set_text(&self, text: &str) {
        *self.0.text.borrow_mut() = text.to_string();
    }

    fn value(&self) -> String {
        self.0.value.borrow().clone()
    }

    fn set_value(&self, value: &str) {
        *self.0.value.borrow_mut() = value.to_string();
    }

    fn set_style(&self, property: &str, value: &str) {
        self.0
            .styles
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
    }

    fn focus(&self) {
        *self.0.focus.borrow_mut() = Some(self.clone());
    }

    fn contains(&self, other: &Self) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if &node == self {
                return true;
            }
            current = node.0.parent.borrow().upgrade().map(FakeElement);
        }
        false
    }

    fn query_all(&self, selector: &str) -> Vec<Self> {
        let compound = Compound::parse(selector);
        let mut all = Vec::new();
        self.descendants(&mut all);
        all.into_iter().filter(|e| e.matches(&compound)).collect()
    }

    fn top(&self) -> f64 {
        self.0.top.get()
    }
}

// =========================================================================
// Selectors
// =========================================================================

enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

#[derive(Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, AttrOp)>,
}

impl Compound {
    /// Parse a single compound selector such as `a.nav-link[href^="#"]`.
    fn parse(selector: &str) -> Self {
        let chars: Vec<char> = selector.trim().chars().collect();
        let mut compound = Compound::default();
        let mut i = 0;

        let read_ident = |i: &mut usize| -> String {
            let start = *i;
            while *i < chars.len()
                && (chars[*i].is_alphanumeric() || chars[*i] == '-' || chars[*i] == '_')
            {
                *i += 1;
            }
            chars[start..*i].iter().collect()
        };

        while i < chars.len() {
            match chars[i] {
                '.' => {
                    i += 1;
                    compound.classes.push(read_ident(&mut i));
                }
                '#' => {
                    i += 1;
                    compound.id = Some(read_ident(&mut i));
                }
                '[' => {
                    let start = i + 1;
                    while i < chars.len() && chars[i] != ']' {
                        i += 1;
                    }
                    let inner: String = chars[start..i].iter().collect();
                    compound.attributes.push(parse_attribute(&inner));
                    i += 1;
                }
                '*' => i += 1,
                _ => {
                    let tag = read_ident(&mut i);
                    if tag.is_empty() {
                        panic!("unsupported selector syntax in {selector:?}");
                    }
                    compound.tag = Some(tag);
                }
            }
        }
        compound
    }
}

fn parse_attribute(inner: &str) -> (String, AttrOp) {
    let unquote = |v: &str| v.trim().trim_matches(|c| c == '"' || c == '\'').to_string();
    if let Some((name, value)) = inner.split_once("^=") {
        (name.trim().to_string(), AttrOp::Prefix(unquote(value)))
    } else if let Some((name, value)) = inner.split_once('=') {
        (name.trim().to_string(), AttrOp::Equals(unquote(value)))
    } else {
        (inner.trim().to_string(), AttrOp::Exists)
    }
}

// =========================================================================
// Document
// =========================================================================

/// An in-memory page: `<html>` with a `<body>`, a scroll position, and
/// computed root styles.
pub struct FakeDocument {
    root: FakeElement,
    body: FakeElement,
    focus: FocusSlot,
    scroll_y: Cell<f64>,
    root_styles: RefCell<BTreeMap<String, String>>,
    scrolls: RefCell<Vec<f64>>,
}

impl Default for FakeDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDocument {
    pub fn new() -> Self {
        let focus: FocusSlot = Rc::new(RefCell::new(None));
        let root = FakeElement::new("html", Rc::clone(&focus));
        let body = FakeElement::new("body", Rc::clone(&focus));
        attach(&root, &body);
        Self {
            root,
            body,
            focus,
            scroll_y: Cell::new(0.0),
            root_styles: RefCell::new(BTreeMap::new()),
            scrolls: RefCell::new(Vec::new()),
        }
    }

    pub fn body_element(&self) -> FakeElement {
        self.body.clone()
    }

    /// Create a `tag` element as the last child of `parent`.
    pub fn append(&self, parent: &FakeElement, tag: &str) -> FakeElement {
        let child = FakeElement::new(tag, Rc::clone(&self.focus));
        attach(parent, &child);
        child
    }

    pub fn set_scroll_y(&self, y: f64) {
        self.scroll_y.set(y);
    }

    pub fn set_root_style(&self, property: &str, value: &str) {
        self.root_styles
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
    }

    /// Every target passed to `smooth_scroll_to`, oldest first.
    pub fn scrolls(&self) -> Vec<f64> {
        self.scrolls.borrow().clone()
    }

    pub fn focused(&self) -> Option<FakeElement> {
        self.focus.borrow().clone()
    }
}

fn attach(parent: &FakeElement, child: &FakeElement) {
    *child.0.parent.borrow_mut() = Rc::downgrade(&parent.0);
    parent.0.children.borrow_mut().push(child.clone());
}

impl Document for FakeDocument {
    type Element = FakeElement;

    fn element_by_id(&self, id: &str) -> Option<FakeElement> {
        let mut all = vec![self.root.clone()];
        self.root.descendants(&mut all);
        all.into_iter()
            .find(|e| e.attribute("id").as_deref() == Some(id))
    }

    fn query_all(&self, selector: &str) -> Vec<FakeElement> {
        self.root.query_all(selector)
    }

    fn body(&self) -> Option<FakeElement> {
        Some(self.body.clone())
    }

    fn root_style_value(&self, property: &str) -> Option<String> {
        self.root_styles.borrow().get(property).cloned()
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn smooth_scroll_to(&self, top: f64) {
        self.scrolls.borrow_mut().push(top);
    }
}

// =========================================================================
// Storage
// =========================================================================

/// `localStorage` stand-in. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.set(key, value);
        storage
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

// =========================================================================
// Manual clock
// =========================================================================

struct ScheduledTask {
    id: u64,
    due: Duration,
    cancelled: Rc<Cell<bool>>,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    tasks: Vec<ScheduledTask>,
}

/// A scheduler whose time only moves when a test calls [`advance`].
///
/// [`advance`]: ManualScheduler::advance
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

/// Cancels its task when dropped, like a `gloo` timeout.
pub struct ManualHandle {
    cancelled: Rc<Cell<bool>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

impl ManualScheduler {
    /// Move time forward, running every due task in deadline order.
    ///
    /// Tasks scheduled by a running task are picked up in the same call when
    /// they fall due before the new time.
    pub fn advance(&self, by: Duration) {
        let target = self.clock.borrow().now + by;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                clock.tasks.retain(|t| !t.cancelled.get());
                let earliest = clock
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(i, _)| i);
                earliest.map(|i| {
                    let task = clock.tasks.remove(i);
                    clock.now = task.due;
                    task
                })
            };
            match next {
                Some(scheduled) => (scheduled.task)(),
                None => break,
            }
        }
        self.clock.borrow_mut().now = target;
    }

    /// Tasks still waiting to run.
    pub fn pending(&self) -> usize {
        self.clock
            .borrow()
            .tasks
            .iter()
            .filter(|t| !t.cancelled.get())
            .count()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> ManualHandle {
        let mut clock = self.clock.borrow_mut();
        let cancelled = Rc::new(Cell::new(false));
        let id = clock.next_id;
        clock.next_id += 1;
        let due = clock.now + delay;
        clock.tasks.push(ScheduledTask {
            id,
            due,
            cancelled: Rc::clone(&cancelled),
            task,
        });
        ManualHandle { cancelled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_subset_matches() {
        let doc = FakeDocument::new();
        let body = doc.body_element();
        let section = doc.append(&body, "section").with_id("about");
        let link = doc
            .append(&body, "a")
            .with_class("nav-link")
            .with_attr("href", "#about");
        let external = doc.append(&body, "a").with_attr("href", "https://x.dev");

        assert_eq!(doc.query_all("section[id]"), vec![section.clone()]);
        assert_eq!(doc.query_all("a[href^=\"#\"]"), vec![link.clone()]);
        assert_eq!(doc.query_all("a"), vec![link.clone(), external]);
        assert_eq!(doc.query_all(".nav-link[href=\"#about\"]"), vec![link]);
        assert_eq!(doc.element_by_id("about"), Some(section));
    }

    #[test]
    fn containment_is_inclusive() {
        let doc = FakeDocument::new();
        let nav = doc.append(&doc.body_element(), "ul");
        let item = doc.append(&nav, "li");
        assert!(nav.contains(&item));
        assert!(nav.contains(&nav));
        assert!(!item.contains(&nav));
    }

    #[test]
    fn dropped_handle_cancels_task() {
        let scheduler = ManualScheduler::default();
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        drop(scheduler.schedule(Duration::from_millis(5), Box::new(move || flag.set(true))));
        scheduler.advance(Duration::from_millis(10));
        assert!(!ran.get());
        assert_eq!(scheduler.pending(), 0);
    }
}
