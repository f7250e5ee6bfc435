//! Highlights the nav link of the section in the middle of the viewport.
//!
//! Sections are observed against a band that excludes the top 40% and the
//! bottom 55% of the viewport, so a section becomes current only once it
//! reaches the central strip. When several sections enter the band in one
//! observation batch, the one whose top edge is highest wins; ties keep
//! document order.

use tracing::{debug, trace};

use crate::config::ActiveNavConfig;
use crate::dom::{Document, Element, Intersection, ObserveOptions};

pub struct ActiveNav<E: Element> {
    sections: Vec<E>,
    links: Vec<E>,
    config: ActiveNavConfig,
}

impl<E: Element> ActiveNav<E> {
    /// `None` when the page has no identified sections or no nav links.
    pub fn attach<D: Document<Element = E>>(doc: &D, config: &ActiveNavConfig) -> Option<Self> {
        let sections = doc.query_all(&config.section_selector);
        let links = doc.query_all(&config.link_selector);
        if sections.is_empty() || links.is_empty() {
            debug!("no sections or nav links, skipping");
            return None;
        }
        Some(Self {
            sections,
            links,
            config: config.clone(),
        })
    }

    pub fn sections(&self) -> &[E] {
        &self.sections
    }

    pub fn observe_options(&self) -> ObserveOptions {
        ObserveOptions {
            root_margin: format!(
                "-{}% 0px -{}% 0px",
                self.config.top_margin_percent, self.config.bottom_margin_percent
            ),
            threshold: 0.0,
        }
    }

    /// Process one observation batch. Returns the id of the section that
    /// became current, if any. Sections stay observed for the page's lifetime.
    pub fn on_intersections(&self, batch: &[Intersection<E>]) -> Option<String> {
        let winner = batch
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_intersecting)
            .filter_map(|(order, entry)| {
                let id = entry.target.attribute("id")?;
                Some((entry.top, self.document_position(&entry.target), order, id))
            })
            .min_by(|a, b| {
                a.0.total_cmp(&b.0)
                    .then(a.1.cmp(&b.1))
                    .then(a.2.cmp(&b.2))
            })
            .map(|(_, _, _, id)| id)?;

        let href = format!("#{winner}");
        for link in &self.links {
            let current = link.attribute("href").as_deref() == Some(href.as_str());
            link.set_class(&self.config.active_class, current);
        }
        trace!(section = %winner, "active section");
        Some(winner)
    }

    fn document_position(&self, target: &E) -> usize {
        self.sections
            .iter()
            .position(|s| s == target)
            .unwrap_or(usize::MAX)
    }
}
