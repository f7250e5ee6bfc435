//! Mobile navigation menu.
//!
//! A hamburger control opens and closes the link container. While open, the
//! container carries the open class, the control reports
//! `aria-expanded="true"`, and the body's overflow is hidden so the page
//! behind the overlay cannot scroll. Closing reverses all three.
//!
//! Close triggers: the control itself, any link inside the container, Escape
//! (which also returns focus to the control), and a click outside both the
//! control and the container. None of them do anything while closed.

use std::cell::Cell;

use tracing::{debug, trace};

use crate::config::MenuConfig;
use crate::dom::{Document, Element};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Open,
    Closed,
}

pub struct MobileMenu<E: Element> {
    toggle: E,
    container: E,
    links: Vec<E>,
    body: Option<E>,
    state: Cell<MenuState>,
    config: MenuConfig,
}

impl<E: Element> MobileMenu<E> {
    /// `None` unless both the control and the container exist.
    pub fn attach<D: Document<Element = E>>(doc: &D, config: &MenuConfig) -> Option<Self> {
        let (Some(toggle), Some(container)) = (
            doc.element_by_id(&config.toggle_id),
            doc.element_by_id(&config.container_id),
        ) else {
            debug!("menu control or container missing, skipping");
            return None;
        };
        let links = container.query_all(&config.link_selector);
        // Markup may ship the menu pre-opened; that is the only time the
        // class list is consulted.
        let state = if container.has_class(&config.open_class) {
            MenuState::Open
        } else {
            MenuState::Closed
        };
        Some(Self {
            toggle,
            container,
            links,
            body: doc.body(),
            state: Cell::new(state),
            config: config.clone(),
        })
    }

    pub fn state(&self) -> MenuState {
        self.state.get()
    }

    pub fn toggle_control(&self) -> &E {
        &self.toggle
    }

    pub fn links(&self) -> &[E] {
        &self.links
    }

    pub fn open(&self) {
        self.container.add_class(&self.config.open_class);
        self.toggle.set_attribute("aria-expanded", "true");
        if let Some(body) = &self.body {
            body.set_style("overflow", "hidden");
        }
        self.state.set(MenuState::Open);
        trace!("menu opened");
    }

    pub fn close(&self) {
        self.container.remove_class(&self.config.open_class);
        self.toggle.set_attribute("aria-expanded", "false");
        if let Some(body) = &self.body {
            body.set_style("overflow", "");
        }
        self.state.set(MenuState::Closed);
        trace!("menu closed");
    }

    /// Activation of the hamburger control.
    pub fn toggle(&self) {
        match self.state.get() {
            MenuState::Open => self.close(),
            MenuState::Closed => self.open(),
        }
    }

    /// Activation of a link inside the container.
    pub fn on_link_click(&self) {
        if self.state.get() == MenuState::Open {
            self.close();
        }
    }

    /// A key pressed anywhere on the page.
    pub fn on_key(&self, key: &str) {
        if key == "Escape" && self.state.get() == MenuState::Open {
            self.close();
            self.toggle.focus();
        }
    }

    /// A click anywhere on the page. `target` is `None` when the click did
    /// not land on an element, which counts as outside.
    pub fn on_document_click(&self, target: Option<&E>) {
        if self.state.get() != MenuState::Open {
            return;
        }
        let inside = target.is_some_and(|t| self.toggle.contains(t) || self.container.contains(t));
        if !inside {
            self.close();
        }
    }
}
