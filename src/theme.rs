//! Light/dark theme preference.
//!
//! The preference is the only state that outlives a page view: one
//! `localStorage` entry holding `"dark"` or `"light"`. On startup
//! [`restore`] applies it to `<body>` before anything else runs, whether or
//! not the page has a toggle control. [`ThemeToggle`] then labels the control
//! with the action it performs and flips the theme on activation.
//!
//! The active theme lives in a [`SharedTheme`] cell rather than being read
//! back from the body's class list; the header shadow reads the same cell.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::config::ThemeConfig;
use crate::dom::{Document, Element, Storage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Interpret a stored value. Only the exact `"dark"` sentinel selects
    /// dark; anything else, including absence, is light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Accessible label describing what activating the toggle will do.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Switch to dark mode",
            Theme::Dark => "Switch to light mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The page's active theme, shared by the units that depend on it.
pub type SharedTheme = Rc<Cell<Theme>>;

/// Read the persisted preference and apply it to the body.
pub fn restore<D: Document>(doc: &D, storage: &dyn Storage, config: &ThemeConfig) -> SharedTheme {
    let theme = Theme::from_stored(storage.get(&config.storage_key).as_deref());
    if let Some(body) = doc.body() {
        body.set_class(&config.dark_class, theme == Theme::Dark);
    }
    debug!(%theme, "restored theme preference");
    Rc::new(Cell::new(theme))
}

/// The toggle control and everything it writes to.
pub struct ThemeToggle<E: Element> {
    control: E,
    body: Option<E>,
    theme: SharedTheme,
    storage: Rc<dyn Storage>,
    config: ThemeConfig,
}

impl<E: Element> ThemeToggle<E> {
    /// Label the control for the current theme. `None` when the page has no
    /// toggle control.
    pub fn attach<D: Document<Element = E>>(
        doc: &D,
        storage: Rc<dyn Storage>,
        theme: SharedTheme,
        config: &ThemeConfig,
    ) -> Option<Self> {
        let Some(control) = doc.element_by_id(&config.toggle_id) else {
            debug!(id = %config.toggle_id, "no theme toggle, skipping");
            return None;
        };
        let toggle = Self {
            control,
            body: doc.body(),
            theme,
            storage,
            config: config.clone(),
        };
        toggle.update_label();
        Some(toggle)
    }

    pub fn control(&self) -> &E {
        &self.control
    }

    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    /// Flip the theme, persist it, and relabel the control.
    pub fn activate(&self) -> Theme {
        let next = self.theme.get().toggled();
        self.theme.set(next);
        if let Some(body) = &self.body {
            body.set_class(&self.config.dark_class, next == Theme::Dark);
        }
        self.storage.set(&self.config.storage_key, next.as_str());
        self.update_label();
        debug!(theme = %next, "theme toggled");
        next
    }

    fn update_label(&self) {
        let label = self.theme.get().toggle_label();
        self.control.set_attribute("aria-label", label);
        self.control.set_attribute("title", label);
    }
}
