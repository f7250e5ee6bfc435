//! Browser backend.
//!
//! Implements the [`crate::dom`] traits over `web-sys`, then wires every
//! attached unit to real events: `gloo` listeners for clicks, keys, form
//! events and scrolling, `IntersectionObserver` for viewport entry, and
//! `gloo` timeouts for the form's delayed continuations.
//!
//! Host failures (storage quota, style writes, exceptions from the platform)
//! are logged at `debug` and otherwise ignored. Nothing is written to the
//! console.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    HtmlElement, HtmlInputElement, HtmlTextAreaElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, NodeList, ScrollBehavior,
    ScrollToOptions, Window,
};

use crate::config::{self, BehaviorConfig};
use crate::dom::{Document, Element, Intersection, ObserveOptions, Storage};
use crate::form::Field;
use crate::schedule::Scheduler;
use crate::{Behaviors, initialize};

/// Id of the `<script type="application/json">` holding a config override.
const CONFIG_SCRIPT_ID: &str = "behavior-config";

// =============================================================================
// Host seam
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct WebElement(web_sys::Element);

fn elements(list: Result<NodeList, JsValue>) -> Vec<WebElement> {
    let Ok(list) = list else {
        debug!("selector query failed");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(WebElement)
        .collect()
}

impl Element for WebElement {
    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        let _ = self.0.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.0.class_list().remove_1(class);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if self.0.set_attribute(name, value).is_err() {
            debug!(name, "attribute write rejected");
        }
    }

    fn remove_attribute(&self, name: &str) {
        let _ = self.0.remove_attribute(name);
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn value(&self) -> String {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, value: &str) {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        }
    }

    fn set_style(&self, property: &str, value: &str) {
        let Some(element) = self.0.dyn_ref::<HtmlElement>() else {
            return;
        };
        if element.style().set_property(property, value).is_err() {
            debug!(property, "style write rejected");
        }
    }

    fn focus(&self) {
        if let Some(element) = self.0.dyn_ref::<HtmlElement>() {
            let _ = element.focus();
        }
    }

    fn contains(&self, other: &Self) -> bool {
        let node: &web_sys::Node = &other.0;
        self.0.contains(Some(node))
    }

    fn query_all(&self, selector: &str) -> Vec<Self> {
        elements(self.0.query_selector_all(selector))
    }

    fn top(&self) -> f64 {
        self.0.get_bounding_client_rect().top()
    }
}

#[derive(Debug, Clone)]
pub struct WebDocument {
    window: Window,
    document: web_sys::Document,
}

impl WebDocument {
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    /// The embedded config override, or the defaults when there is none or it
    /// does not parse.
    fn embedded_config(&self) -> BehaviorConfig {
        let Some(script) = self.document.get_element_by_id(CONFIG_SCRIPT_ID) else {
            return BehaviorConfig::default();
        };
        let text = script.text_content().unwrap_or_default();
        config::from_json(&text).unwrap_or_else(|e| {
            debug!(error = %e, "ignoring embedded config");
            BehaviorConfig::default()
        })
    }
}

impl Document for WebDocument {
    type Element = WebElement;

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).map(WebElement)
    }

    fn query_all(&self, selector: &str) -> Vec<WebElement> {
        elements(self.document.query_selector_all(selector))
    }

    fn body(&self) -> Option<WebElement> {
        self.document.body().map(|body| WebElement(body.into()))
    }

    fn root_style_value(&self, property: &str) -> Option<String> {
        let root = self.document.document_element()?;
        let style = self.window.get_computed_style(&root).ok().flatten()?;
        let value = style.get_property_value(property).ok()?;
        (!value.trim().is_empty()).then_some(value)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}

/// `localStorage`, when the browser allows it.
pub struct LocalStorage(Option<web_sys::Storage>);

impl LocalStorage {
    pub fn current(window: &Window) -> Self {
        Self(window.local_storage().ok().flatten())
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = &self.0 else {
            return;
        };
        if storage.set_item(key, value).is_err() {
            debug!(key, "localStorage write rejected");
        }
    }
}

/// `setTimeout` through `gloo`. Dropping the handle clears the timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Timeout {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task)
    }
}

// =============================================================================
// Viewport observation
// =============================================================================

/// A live observer. Disconnects on drop.
struct Observed {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Drop for Observed {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Observe `targets`, handing each batch to `on_batch` and unobserving the
/// elements it returns.
fn observe(
    targets: &[WebElement],
    options: &ObserveOptions,
    mut on_batch: impl FnMut(&[Intersection<WebElement>]) -> Vec<WebElement> + 'static,
) -> Option<Observed> {
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            let batch: Vec<_> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| Intersection {
                    target: WebElement(entry.target()),
                    is_intersecting: entry.is_intersecting(),
                    ratio: entry.intersection_ratio(),
                    top: entry.bounding_client_rect().top(),
                })
                .collect();
            for done in on_batch(&batch) {
                observer.unobserve(&done.0);
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_root_margin(&options.root_margin);
    init.set_threshold(&JsValue::from_f64(options.threshold));
    let observer =
        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => observer,
            Err(_) => {
                debug!("IntersectionObserver unavailable");
                return None;
            }
        };
    for target in targets {
        observer.observe(&target.0);
    }
    Some(Observed {
        observer,
        _callback: callback,
    })
}

// =============================================================================
// Wiring
// =============================================================================

type PageBehaviors = Behaviors<WebElement, TimeoutScheduler>;

/// Everything that keeps the page's behaviors alive.
struct App {
    behaviors: Rc<PageBehaviors>,
    _listeners: Vec<EventListener>,
    _observers: Vec<Observed>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

impl App {
    fn wire(doc: WebDocument, behaviors: Rc<PageBehaviors>) -> Self {
        let mut listeners = Vec::new();
        let mut observers = Vec::new();

        if let Some(toggle) = &behaviors.theme_toggle {
            let b = Rc::clone(&behaviors);
            let d = doc.clone();
            listeners.push(EventListener::new(&toggle.control().0, "click", move |_| {
                b.activate_theme(d.scroll_y());
            }));
        }

        if let Some(menu) = &behaviors.menu {
            let b = Rc::clone(&behaviors);
            listeners.push(EventListener::new(&menu.toggle_control().0, "click", move |_| {
                if let Some(menu) = &b.menu {
                    menu.toggle();
                }
            }));
            for link in menu.links() {
                let b = Rc::clone(&behaviors);
                listeners.push(EventListener::new(&link.0, "click", move |_| {
                    if let Some(menu) = &b.menu {
                        menu.on_link_click();
                    }
                }));
            }
            let b = Rc::clone(&behaviors);
            listeners.push(EventListener::new(&doc.document, "keydown", move |event| {
                let (Some(menu), Some(key)) = (&b.menu, event.dyn_ref::<KeyboardEvent>()) else {
                    return;
                };
                menu.on_key(&key.key());
            }));
            let b = Rc::clone(&behaviors);
            listeners.push(EventListener::new(&doc.document, "click", move |event| {
                let target = event
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                    .map(WebElement);
                if let Some(menu) = &b.menu {
                    menu.on_document_click(target.as_ref());
                }
            }));
        }

        if let Some(anchors) = &behaviors.anchors {
            for anchor in anchors.anchors() {
                let b = Rc::clone(&behaviors);
                let d = doc.clone();
                let a = anchor.clone();
                listeners.push(EventListener::new_with_options(
                    &anchor.0,
                    "click",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        let Some(anchors) = &b.anchors else { return };
                        if anchors.on_click(&d, &a).prevents_default() {
                            event.prevent_default();
                        }
                    },
                ));
            }
        }

        if let Some(nav) = &behaviors.active_nav {
            let b = Rc::clone(&behaviors);
            observers.extend(observe(nav.sections(), &nav.observe_options(), move |batch| {
                if let Some(nav) = &b.active_nav {
                    nav.on_intersections(batch);
                }
                Vec::new()
            }));
        }

        if let Some(reveal) = &behaviors.reveal {
            let b = Rc::clone(&behaviors);
            observers.extend(observe(
                &reveal.observed(),
                &reveal.observe_options(),
                move |batch| {
                    b.reveal
                        .as_ref()
                        .map(|reveal| reveal.on_intersections(batch))
                        .unwrap_or_default()
                },
            ));
        }

        if let Some(skills) = &behaviors.skills {
            let b = Rc::clone(&behaviors);
            observers.extend(observe(
                &skills.observed(),
                &skills.observe_options(),
                move |batch| {
                    b.skills
                        .as_ref()
                        .map(|skills| skills.on_intersections(batch))
                        .unwrap_or_default()
                },
            ));
        }

        if let Some(form) = &behaviors.form {
            let b = Rc::clone(&behaviors);
            listeners.push(EventListener::new_with_options(
                &form.form().0,
                "submit",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    if let Some(form) = &b.form {
                        form.submit();
                    }
                },
            ));
            for field in Field::ALL {
                let input = &form.input(field).0;
                let b = Rc::clone(&behaviors);
                listeners.push(EventListener::new(input, "blur", move |_| {
                    if let Some(form) = &b.form {
                        form.on_blur(field);
                    }
                }));
                let b = Rc::clone(&behaviors);
                listeners.push(EventListener::new(input, "input", move |_| {
                    if let Some(form) = &b.form {
                        form.on_input(field);
                    }
                }));
            }
        }

        if behaviors.header.is_some() {
            let b = Rc::clone(&behaviors);
            let d = doc.clone();
            listeners.push(EventListener::new(&doc.window, "scroll", move |_| {
                if let Some(header) = &b.header {
                    header.apply(d.scroll_y());
                }
            }));
        }

        debug!(
            listeners = listeners.len(),
            observers = observers.len(),
            "behaviors wired"
        );
        Self {
            behaviors,
            _listeners: listeners,
            _observers: observers,
        }
    }
}

fn boot() {
    let Some(doc) = WebDocument::current() else {
        return;
    };
    let config = doc.embedded_config();
    let storage = Rc::new(LocalStorage::current(&doc.window));
    let behaviors = Rc::new(initialize(&doc, storage, TimeoutScheduler, &config));
    let app = App::wire(doc, behaviors);
    APP.with(|slot| *slot.borrow_mut() = Some(app));
}

/// Entry point: initialize once the document is parsed.
#[wasm_bindgen(start)]
pub fn start() {
    let Some(doc) = WebDocument::current() else {
        return;
    };
    if doc.document.ready_state() == "loading" {
        EventListener::once(&doc.document, "DOMContentLoaded", |_| boot()).forget();
    } else {
        boot();
    }
}

/// Remove every listener, disconnect observers, and cancel pending form
/// continuations.
#[wasm_bindgen]
pub fn teardown() {
    let app = APP.with(|slot| slot.borrow_mut().take());
    if let Some(app) = app {
        app.behaviors.teardown();
        debug!("behaviors torn down");
    }
}
