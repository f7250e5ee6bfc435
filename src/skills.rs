//! Skill-level bars that fill in when scrolled into view.
//!
//! Bars carry their target level as a percentage attribute
//! (`data-level="85"`). The first time 30% of a bar is visible its width
//! variable is set to that percentage and the animate class is added; the bar
//! is then no longer observed.

use std::cell::RefCell;

use tracing::{debug, trace};

use crate::config::SkillsConfig;
use crate::dom::{Document, Element, Intersection, ObserveOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarState {
    Waiting,
    Animated,
}

/// Parse a declared level into a CSS percentage, clamped to `0%..=100%`.
pub fn level_width(raw: &str) -> Option<String> {
    let level: f64 = raw.trim().trim_end_matches('%').parse().ok()?;
    if !level.is_finite() {
        return None;
    }
    Some(format!("{}%", level.clamp(0.0, 100.0)))
}

pub struct SkillBars<E: Element> {
    bars: RefCell<Vec<(E, BarState)>>,
    config: SkillsConfig,
}

impl<E: Element> SkillBars<E> {
    /// `None` when the page has no bars.
    pub fn attach<D: Document<Element = E>>(doc: &D, config: &SkillsConfig) -> Option<Self> {
        let bars = doc.query_all(&config.selector);
        if bars.is_empty() {
            debug!("no skill bars, skipping");
            return None;
        }
        Some(Self {
            bars: RefCell::new(bars.into_iter().map(|b| (b, BarState::Waiting)).collect()),
            config: config.clone(),
        })
    }

    pub fn observed(&self) -> Vec<E> {
        self.bars
            .borrow()
            .iter()
            .filter(|(_, state)| *state == BarState::Waiting)
            .map(|(b, _)| b.clone())
            .collect()
    }

    pub fn observe_options(&self) -> ObserveOptions {
        ObserveOptions::with_threshold(self.config.threshold)
    }

    /// Animate every bar that became visible enough. Returns the bars
    /// animated by this batch, which should no longer be observed.
    pub fn on_intersections(&self, batch: &[Intersection<E>]) -> Vec<E> {
        let mut animated = Vec::new();
        let mut bars = self.bars.borrow_mut();
        for entry in batch.iter().filter(|e| e.visible_at(self.config.threshold)) {
            let Some((bar, state)) = bars.iter_mut().find(|(b, _)| *b == entry.target) else {
                continue;
            };
            if *state == BarState::Animated {
                continue;
            }
            let raw = bar.attribute(&self.config.level_attribute).unwrap_or_default();
            match level_width(&raw) {
                Some(width) => bar.set_style(&self.config.width_property, &width),
                None => debug!(level = %raw, "unreadable skill level"),
            }
            bar.add_class(&self.config.animate_class);
            *state = BarState::Animated;
            animated.push(bar.clone());
        }
        if !animated.is_empty() {
            trace!(count = animated.len(), "animated skill bars");
        }
        animated
    }
}
