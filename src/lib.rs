//! # Portfolio Behaviors
//!
//! The interactive layer of a static personal-portfolio page: theme toggle,
//! mobile menu, smooth in-page scrolling, active-section highlighting, scroll
//! reveal, skill bars, contact form validation, and the header scroll shadow.
//! Compiled to WebAssembly it replaces the page's hand-written script; compiled
//! natively it provides a small CLI for checking configuration and trying the
//! form rules.
//!
//! # Architecture: Units Behind a Host Seam
//!
//! ```text
//! web (wasm32 only)   listeners, observers, timeouts, localStorage
//!        │
//!        ▼
//! initialize()        finds each unit's elements, returns Behaviors
//!        │
//!        ▼
//! units               pure handlers over dom::{Document, Element, Storage}
//! ```
//!
//! Units own no listeners. Each exposes an `attach` constructor that returns
//! `None` when its elements are missing, plus handler methods the backend
//! calls when events arrive. Tests drive the same handlers against the
//! in-memory DOM in `test_helpers`, so every behavior is covered without a
//! browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | Host traits: `Document`, `Element`, `Storage`, intersection entries |
//! | [`schedule`] | Cancellable delayed continuations |
//! | [`config`] | Class names, ids, thresholds and delays; TOML and JSON loading, validation |
//! | [`theme`] | Light/dark theme restore and toggle |
//! | [`menu`] | Mobile navigation menu |
//! | [`anchor`] | Smooth scrolling to in-page anchors below the fixed header |
//! | [`active_nav`] | Highlights the nav link of the section in view |
//! | [`reveal`] | Staggered fade-in on first viewport entry |
//! | [`skills`] | Skill bars that fill in on first viewport entry |
//! | [`form`] | Contact form rules and simulated submission |
//! | [`header`] | Header shadow once the page is scrolled |
//! | [`output`] | CLI output formatting |
//! | `web` | Browser backend, `wasm32` only |
//!
//! # Design Decisions
//!
//! ## One Shared Theme Value
//!
//! The theme is written by the toggle and read by the header shadow. Both hold
//! the same [`theme::SharedTheme`] cell rather than reading the body class
//! back, so the two can never disagree about which shadow to draw.
//!
//! ## Cancellable Continuations
//!
//! The simulated form submission schedules its follow-up work through a
//! [`schedule::Scheduler`]. Handles are kept until their task starts, and
//! [`Behaviors::teardown`] drops the rest, so nothing fires into a page that
//! has been torn down.
//!
//! ## Configuration Over Hard-Coded Markup
//!
//! Every class name, id, and timing lives in [`config::BehaviorConfig`] with
//! defaults that match the stock markup. A page with different markup embeds
//! a JSON override instead of patching the code.

use std::rc::Rc;

pub mod active_nav;
pub mod anchor;
pub mod config;
pub mod dom;
pub mod form;
pub mod header;
pub mod menu;
pub mod output;
pub mod reveal;
pub mod schedule;
pub mod skills;
pub mod theme;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;

use active_nav::ActiveNav;
use anchor::AnchorScroll;
use config::BehaviorConfig;
use dom::{Document, Element, Storage};
use form::ContactForm;
use header::HeaderShadow;
use menu::MobileMenu;
use reveal::ScrollReveal;
use schedule::Scheduler;
use skills::SkillBars;
use theme::{SharedTheme, Theme, ThemeToggle};

/// Every unit that found its elements on the page.
pub struct Behaviors<E: Element, S: Scheduler> {
    pub theme: SharedTheme,
    pub theme_toggle: Option<ThemeToggle<E>>,
    pub menu: Option<MobileMenu<E>>,
    pub anchors: Option<AnchorScroll<E>>,
    pub active_nav: Option<ActiveNav<E>>,
    pub reveal: Option<ScrollReveal<E>>,
    pub skills: Option<SkillBars<E>>,
    pub form: Option<ContactForm<E, S>>,
    pub header: Option<HeaderShadow<E>>,
}

/// Restore the theme, then attach every unit.
///
/// Units are independent: a missing element disables only the unit that
/// needs it.
pub fn initialize<D, S>(
    doc: &D,
    storage: Rc<dyn Storage>,
    scheduler: S,
    config: &BehaviorConfig,
) -> Behaviors<D::Element, S>
where
    D: Document,
    S: Scheduler,
{
    let theme = theme::restore(doc, storage.as_ref(), &config.theme);
    let behaviors = Behaviors {
        theme_toggle: ThemeToggle::attach(doc, storage, Rc::clone(&theme), &config.theme),
        menu: MobileMenu::attach(doc, &config.menu),
        anchors: AnchorScroll::attach(doc, &config.scroll),
        active_nav: ActiveNav::attach(doc, &config.active_nav),
        reveal: ScrollReveal::attach(doc, &config.reveal),
        skills: SkillBars::attach(doc, &config.skills),
        form: ContactForm::attach(doc, scheduler, &config.form),
        header: HeaderShadow::attach(doc, Rc::clone(&theme), &config.header),
        theme,
    };
    tracing::debug!(active = behaviors.active_units(), "behaviors initialized");
    behaviors
}

impl<E: Element, S: Scheduler> Behaviors<E, S> {
    /// The theme control was activated: flip the theme, then redraw the
    /// header shadow in the new theme's color.
    pub fn activate_theme(&self, scroll_y: f64) -> Option<Theme> {
        let next = self.theme_toggle.as_ref()?.activate();
        if let Some(header) = &self.header {
            header.apply(scroll_y);
        }
        Some(next)
    }

    /// Number of units that attached.
    pub fn active_units(&self) -> usize {
        [
            self.theme_toggle.is_some(),
            self.menu.is_some(),
            self.anchors.is_some(),
            self.active_nav.is_some(),
            self.reveal.is_some(),
            self.skills.is_some(),
            self.form.is_some(),
            self.header.is_some(),
        ]
        .into_iter()
        .filter(|attached| *attached)
        .count()
    }

    /// Cancel pending continuations.
    pub fn teardown(&self) {
        if let Some(form) = &self.form {
            form.teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Field, SubmitOutcome};
    use crate::test_helpers::*;
    use std::time::Duration;

    /// The stock portfolio markup, trimmed to what the units touch.
    fn portfolio() -> (FakeDocument, MemoryStorage) {
        let doc = FakeDocument::new();
        let body = doc.body_element();
        let nav = doc.append(&body, "nav").with_class("navbar");
        doc.append(&nav, "button").with_id("theme-toggle");
        doc.append(&nav, "button").with_id("hamburger");
        let links = doc.append(&nav, "ul").with_id("nav-links");
        for id in ["about", "skills", "contact"] {
            doc.append(&links, "a")
                .with_class("nav-link")
                .with_attr("href", &format!("#{id}"));
            doc.append(&body, "section").with_id(id);
        }
        doc.append(&body, "div")
            .with_class("about-text")
            .with_class("reveal");
        doc.append(&body, "div")
            .with_class("skill-bar")
            .with_attr("data-level", "80");
        let form = doc.append(&body, "form").with_id("contact-form");
        for field in Field::ALL {
            doc.append(&form, "input").with_id(field.input_id());
            doc.append(&form, "span").with_id(field.error_id());
        }
        doc.append(&form, "button")
            .with_attr("type", "submit")
            .with_text("Send Message");
        doc.append(&body, "div")
            .with_id("form-success")
            .with_attr("hidden", "");
        (doc, MemoryStorage::default())
    }

    #[test]
    fn every_unit_attaches_to_stock_markup() {
        let (doc, storage) = portfolio();
        let behaviors = initialize(
            &doc,
            Rc::new(storage),
            ManualScheduler::default(),
            &BehaviorConfig::default(),
        );
        assert_eq!(behaviors.active_units(), 8);
    }

    #[test]
    fn empty_page_is_inert() {
        let doc = FakeDocument::new();
        let behaviors = initialize(
            &doc,
            Rc::new(MemoryStorage::default()),
            ManualScheduler::default(),
            &BehaviorConfig::default(),
        );
        assert_eq!(behaviors.active_units(), 0);
        assert_eq!(behaviors.activate_theme(0.0), None);
        assert!(!doc.body_element().has_class("dark-mode"));
    }

    #[test]
    fn stored_theme_applies_before_units_attach() {
        let (doc, _) = portfolio();
        let storage = MemoryStorage::with_item("portfolio-theme", "dark");
        let behaviors = initialize(
            &doc,
            Rc::new(storage),
            ManualScheduler::default(),
            &BehaviorConfig::default(),
        );
        assert!(doc.body_element().has_class("dark-mode"));
        assert_eq!(behaviors.theme.get(), Theme::Dark);
        let toggle = doc.element_by_id("theme-toggle").unwrap();
        assert_eq!(
            toggle.attribute("aria-label").as_deref(),
            Some("Switch to light mode")
        );
    }

    #[test]
    fn theme_activation_redraws_header_shadow() {
        let (doc, storage) = portfolio();
        let behaviors = initialize(
            &doc,
            Rc::new(storage.clone()),
            ManualScheduler::default(),
            &BehaviorConfig::default(),
        );
        let navbar = doc.query(".navbar").unwrap();

        assert_eq!(behaviors.activate_theme(120.0), Some(Theme::Dark));
        assert_eq!(
            navbar.style("box-shadow").as_deref(),
            Some("0 1px 32px rgba(0,5,30,0.50)")
        );
        assert_eq!(storage.get("portfolio-theme").as_deref(), Some("dark"));

        assert_eq!(behaviors.activate_theme(0.0), Some(Theme::Light));
        assert_eq!(navbar.style("box-shadow").as_deref(), Some("none"));
    }

    #[test]
    fn teardown_cancels_simulated_submission() {
        let (doc, storage) = portfolio();
        let scheduler = ManualScheduler::default();
        let behaviors = initialize(
            &doc,
            Rc::new(storage),
            scheduler.clone(),
            &BehaviorConfig::default(),
        );
        let form = behaviors.form.as_ref().unwrap();
        form.input(Field::Name).set_value("Ada");
        form.input(Field::Email).set_value("ada@example.com");
        form.input(Field::Message).set_value("Hello there, Ada here.");
        assert_eq!(form.submit(), SubmitOutcome::Pending);

        behaviors.teardown();
        scheduler.advance(Duration::from_secs(10));
        assert_eq!(form.input(Field::Name).value(), "Ada");
        assert!(form.is_submitting());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn custom_config_is_honored() {
        let (doc, storage) = portfolio();
        let mut config = BehaviorConfig::default();
        config.menu.toggle_id = "menu-button".to_string();
        config.header.selector = ".site-header".to_string();
        let behaviors = initialize(
            &doc,
            Rc::new(storage),
            ManualScheduler::default(),
            &config,
        );
        assert!(behaviors.menu.is_none());
        assert!(behaviors.header.is_none());
        assert_eq!(behaviors.active_units(), 6);
    }
}
