//! Drop shadow under the fixed header once the page is scrolled.

use crate::config::HeaderConfig;
use crate::dom::{Document, Element};
use crate::theme::{SharedTheme, Theme};

pub struct HeaderShadow<E: Element> {
    header: E,
    theme: SharedTheme,
    config: HeaderConfig,
}

impl<E: Element> HeaderShadow<E> {
    pub fn attach<D: Document<Element = E>>(
        doc: &D,
        theme: SharedTheme,
        config: &HeaderConfig,
    ) -> Option<Self> {
        let header = doc.query(&config.selector)?;
        Some(Self {
            header,
            theme,
            config: config.clone(),
        })
    }

    /// Shadow for a scroll offset under the active theme. `"none"` at or
    /// below the threshold.
    pub fn shadow_for(&self, scroll_y: f64) -> &str {
        if scroll_y <= self.config.threshold {
            return "none";
        }
        match self.theme.get() {
            Theme::Light => &self.config.light_shadow,
            Theme::Dark => &self.config.dark_shadow,
        }
    }

    /// Re-apply the shadow. Runs on every scroll and after each theme flip.
    pub fn apply(&self, scroll_y: f64) {
        self.header.set_style("box-shadow", self.shadow_for(scroll_y));
    }
}
