//! Fade-in of content blocks on first viewport entry.
//!
//! Each configured group (a selector plus a stagger base) is decorated with
//! the reveal marker, and every element after the first, or every element of
//! a group with a non-zero base, also gets a stagger tier class
//! (`reveal-delay-1` to `reveal-delay-3`). Stylesheets own what those classes
//! look like.
//!
//! A page that authors no marker at all is left untouched: nothing is
//! decorated and nothing is observed. Otherwise every element carrying the
//! marker, decorated here or authored in the markup, is observed. The first
//! time enough of it is visible it gets the revealed class and is dropped
//! from observation. Revealing is one-way.

use std::cell::RefCell;

use tracing::{debug, trace};

use crate::config::RevealConfig;
use crate::dom::{Document, Element, Intersection, ObserveOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Waiting,
    Revealed,
}

/// Stagger tier for the `index`-th element of a group with the given base.
///
/// `None` for the first element of an unstaggered group; otherwise
/// `base + index`, capped at `max`.
pub fn stagger_tier(base: u32, index: usize, max: u32) -> Option<u32> {
    if base == 0 && index == 0 {
        return None;
    }
    let index = u32::try_from(index).unwrap_or(u32::MAX);
    Some(base.saturating_add(index).min(max))
}

pub struct ScrollReveal<E: Element> {
    elements: RefCell<Vec<(E, RevealState)>>,
    config: RevealConfig,
}

impl<E: Element> ScrollReveal<E> {
    /// Decorate the configured groups and collect everything to observe.
    /// `None`, with the page untouched, when the markup carries no marker.
    pub fn attach<D: Document<Element = E>>(doc: &D, config: &RevealConfig) -> Option<Self> {
        let marker = format!(".{}", config.marker_class);
        if doc.query(&marker).is_none() {
            debug!("no reveal markers, skipping");
            return None;
        }
        for target in &config.targets {
            for (index, element) in doc.query_all(&target.selector).iter().enumerate() {
                element.add_class(&config.marker_class);
                if let Some(tier) = stagger_tier(target.stagger, index, config.max_stagger) {
                    element.add_class(&format!("{}-{}", config.delay_class_prefix, tier));
                }
            }
        }

        let elements = doc
            .query_all(&marker)
            .into_iter()
            .map(|e| {
                let state = if e.has_class(&config.revealed_class) {
                    RevealState::Revealed
                } else {
                    RevealState::Waiting
                };
                (e, state)
            })
            .collect();
        Some(Self {
            elements: RefCell::new(elements),
            config: config.clone(),
        })
    }

    /// Elements still waiting to be revealed.
    pub fn observed(&self) -> Vec<E> {
        self.elements
            .borrow()
            .iter()
            .filter(|(_, state)| *state == RevealState::Waiting)
            .map(|(e, _)| e.clone())
            .collect()
    }

    pub fn state_of(&self, element: &E) -> Option<RevealState> {
        self.elements
            .borrow()
            .iter()
            .find(|(e, _)| e == element)
            .map(|(_, state)| *state)
    }

    pub fn observe_options(&self) -> ObserveOptions {
        ObserveOptions::with_threshold(self.config.threshold)
    }

    /// Reveal every element that became visible enough. Returns the elements
    /// revealed by this batch, which should no longer be observed.
    pub fn on_intersections(&self, batch: &[Intersection<E>]) -> Vec<E> {
        let mut revealed = Vec::new();
        let mut elements = self.elements.borrow_mut();
        for entry in batch.iter().filter(|e| e.visible_at(self.config.threshold)) {
            let Some((element, state)) = elements.iter_mut().find(|(e, _)| *e == entry.target)
            else {
                continue;
            };
            if *state == RevealState::Revealed {
                continue;
            }
            element.add_class(&self.config.revealed_class);
            *state = RevealState::Revealed;
            revealed.push(element.clone());
        }
        if !revealed.is_empty() {
            trace!(count = revealed.len(), "revealed elements");
        }
        revealed
    }
}
