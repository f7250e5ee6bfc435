//! Smooth scrolling for in-page anchors.
//!
//! Every `href="#..."` link is intercepted. The target is scrolled to with an
//! animated scroll that leaves its top edge just below the fixed header. The
//! header height comes from a CSS custom property on the root element and is
//! read on every click, so a stylesheet that changes it at a breakpoint is
//! honoured.

use tracing::{debug, trace};

use crate::config::ScrollConfig;
use crate::dom::{Document, Element};

/// What happened to an anchor click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorOutcome {
    /// Not handled; the browser's default action proceeds.
    Default,
    /// Default suppressed, smooth scroll started towards this offset.
    Scrolled(f64),
}

impl AnchorOutcome {
    pub fn prevents_default(self) -> bool {
        matches!(self, AnchorOutcome::Scrolled(_))
    }
}

/// Element id named by a same-document link, if any.
///
/// A bare `"#"` names nothing.
pub fn fragment_target(href: &str) -> Option<&str> {
    match href.strip_prefix('#') {
        Some("") | None => None,
        Some(id) => Some(id),
    }
}

/// Parse a header height the way the stylesheet exposes it (`"68px"`,
/// `" 72 "`): the leading integer counts, units are ignored. Missing,
/// unparsable, or zero values fall back.
pub fn header_offset(raw: Option<&str>, fallback: f64) -> f64 {
    let Some(raw) = raw else {
        return fallback;
    };
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    match trimmed[..end].parse::<i64>() {
        Ok(0) | Err(_) => fallback,
        Ok(n) => n as f64,
    }
}

/// The set of intercepted links.
pub struct AnchorScroll<E: Element> {
    anchors: Vec<E>,
    config: ScrollConfig,
}

impl<E: Element> AnchorScroll<E> {
    /// `None` when the page has no fragment links.
    pub fn attach<D: Document<Element = E>>(doc: &D, config: &ScrollConfig) -> Option<Self> {
        let anchors = doc.query_all(&config.anchor_selector);
        if anchors.is_empty() {
            debug!("no fragment links, skipping");
            return None;
        }
        Some(Self {
            anchors,
            config: config.clone(),
        })
    }

    pub fn anchors(&self) -> &[E] {
        &self.anchors
    }

    /// Handle a click on one of the intercepted links.
    pub fn on_click<D: Document<Element = E>>(&self, doc: &D, anchor: &E) -> AnchorOutcome {
        let href = anchor.attribute("href").unwrap_or_default();
        let Some(id) = fragment_target(&href) else {
            return AnchorOutcome::Default;
        };
        let Some(target) = doc.element_by_id(id) else {
            return AnchorOutcome::Default;
        };
        let offset = header_offset(
            doc.root_style_value(&self.config.header_height_property)
                .as_deref(),
            self.config.fallback_header_height,
        );
        let top = target.top() + doc.scroll_y() - offset;
        doc.smooth_scroll_to(top);
        trace!(anchor = id, top, "smooth scroll");
        AnchorOutcome::Scrolled(top)
    }
}
