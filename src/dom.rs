//! The host seam every behavior unit is written against.
//!
//! Units never call into `web_sys` directly. They receive a [`Document`] to
//! look up their elements, operate on those elements through the [`Element`]
//! trait, and persist through [`Storage`]. The browser backend in
//! `web` implements these traits on top of `web-sys`; tests use the
//! in-memory DOM from `test_helpers`.
//!
//! Viewport observation is modelled as batches of [`Intersection`] entries
//! handed to a unit's `on_intersections` method. The method returns the
//! elements that should no longer be observed, and the backend unobserves
//! them.

/// A handle to one element of the page.
///
/// Handles are cheap to clone and compare by identity: two handles are equal
/// when they point at the same node.
pub trait Element: Clone + PartialEq + 'static {
    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);

    /// Add `class` when `on` is true, remove it otherwise.
    fn set_class(&self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);

    /// Text content of the element and its descendants.
    fn text(&self) -> String;
    fn set_text(&self, text: &str);

    /// Current value of a form control. Empty for anything else.
    fn value(&self) -> String;
    fn set_value(&self, value: &str);

    /// Set an inline style property. Custom properties (`--name`) included.
    fn set_style(&self, property: &str, value: &str);

    fn focus(&self);

    /// Inclusive containment: an element contains itself.
    fn contains(&self, other: &Self) -> bool;

    /// Descendants matching a CSS selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self>;

    /// Distance from the viewport's top edge to the element's top edge.
    fn top(&self) -> f64;
}

/// The loaded page.
pub trait Document {
    type Element: Element;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// All elements matching a CSS selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    fn query(&self, selector: &str) -> Option<Self::Element> {
        self.query_all(selector).into_iter().next()
    }

    fn body(&self) -> Option<Self::Element>;

    /// Computed value of a property on the root element, e.g. a CSS variable.
    fn root_style_value(&self, property: &str) -> Option<String>;

    /// Current vertical scroll offset of the window.
    fn scroll_y(&self) -> f64;

    /// Animated scroll of the window to an absolute vertical offset.
    fn smooth_scroll_to(&self, top: f64);
}

/// Persistent key-value storage (browser `localStorage`).
///
/// Writes are best-effort: a full or disabled store silently drops them.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// One element's visibility report from a viewport observation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection<E> {
    pub target: E,
    pub is_intersecting: bool,
    /// Visible fraction of the element's area, 0.0 to 1.0.
    pub ratio: f64,
    /// Top edge of the element relative to the viewport at report time.
    pub top: f64,
}

impl<E> Intersection<E> {
    /// True when the element intersects and at least `threshold` of its area
    /// is visible.
    pub fn visible_at(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}

/// How a unit wants its elements observed.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserveOptions {
    /// CSS margin applied to the viewport before intersecting, e.g.
    /// `"-40% 0px -55% 0px"`.
    pub root_margin: String,
    pub threshold: f64,
}

impl ObserveOptions {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            root_margin: "0px".to_string(),
            threshold,
        }
    }
}
