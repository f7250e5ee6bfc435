//! Behavior configuration.
//!
//! Every class name, element id, selector, threshold and delay the units use
//! lives here, with defaults matching the stock portfolio markup and
//! stylesheet. A page only needs configuration when its markup differs.
//!
//! ## Sources
//!
//! - **Stock defaults**: [`BehaviorConfig::default`].
//! - **Embedded JSON**: the browser bootstrap reads
//!   `<script type="application/json" id="behavior-config">` and parses it with
//!   [`from_json`].
//! - **TOML file**: [`load_config`], used by the CLI to check a config before
//!   it is embedded.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [theme]
//! storage_key = "portfolio-theme"
//! toggle_id = "theme-toggle"
//! dark_class = "dark-mode"
//!
//! [menu]
//! toggle_id = "hamburger"
//! container_id = "nav-links"
//! link_selector = ".nav-link"
//! open_class = "open"
//!
//! [scroll]
//! anchor_selector = 'a[href^="#"]'
//! header_height_property = "--nav-h"
//! fallback_header_height = 68.0
//!
//! [active_nav]
//! section_selector = "section[id]"
//! link_selector = ".nav-link"
//! active_class = "active"
//! top_margin_percent = 40.0
//! bottom_margin_percent = 55.0
//!
//! [reveal]
//! marker_class = "reveal"
//! revealed_class = "revealed"
//! delay_class_prefix = "reveal-delay"
//! threshold = 0.12
//! max_stagger = 3
//!
//! [[reveal.targets]]
//! selector = ".about-card"
//! stagger = 1
//!
//! [skills]
//! selector = ".skill-bar[data-level]"
//! level_attribute = "data-level"
//! width_property = "--w"
//! animate_class = "animate"
//! threshold = 0.3
//!
//! [form]
//! form_id = "contact-form"
//! submit_selector = '[type="submit"]'
//! success_id = "form-success"
//! error_class = "error"
//! pending_label = "Sending..."
//! submit_delay_ms = 1200
//! success_visible_ms = 5000
//!
//! [header]
//! selector = ".navbar"
//! threshold = 20.0
//! light_shadow = "0 1px 24px rgba(10,30,80,0.12)"
//! dark_shadow = "0 1px 32px rgba(0,5,30,0.50)"
//! ```
//!
//! ## Partial Configuration
//!
//! Config documents are sparse; override just the values you want:
//!
//! ```toml
//! [theme]
//! storage_key = "jane-doe-theme"
//! ```
//!
//! Listing `[[reveal.targets]]` replaces the whole default target list.
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration for every behavior unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BehaviorConfig {
    pub theme: ThemeConfig,
    pub menu: MenuConfig,
    pub scroll: ScrollConfig,
    pub active_nav: ActiveNavConfig,
    pub reveal: RevealConfig,
    pub skills: SkillsConfig,
    pub form: FormConfig,
    pub header: HeaderConfig,
}

impl BehaviorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("theme.storage_key", &self.theme.storage_key),
            ("theme.dark_class", &self.theme.dark_class),
            ("menu.open_class", &self.menu.open_class),
            ("active_nav.active_class", &self.active_nav.active_class),
            ("reveal.marker_class", &self.reveal.marker_class),
            ("reveal.revealed_class", &self.reveal.revealed_class),
            ("skills.animate_class", &self.skills.animate_class),
            ("form.error_class", &self.form.error_class),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }

        for (key, value) in [
            ("reveal.threshold", self.reveal.threshold),
            ("skills.threshold", self.skills.threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!("{key} must be 0.0-1.0")));
            }
        }

        let band = &self.active_nav;
        for (key, value) in [
            ("active_nav.top_margin_percent", band.top_margin_percent),
            ("active_nav.bottom_margin_percent", band.bottom_margin_percent),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::Validation(format!("{key} must be 0-100")));
            }
        }
        if band.top_margin_percent + band.bottom_margin_percent >= 100.0 {
            return Err(ConfigError::Validation(
                "active_nav margins must leave part of the viewport uncovered".into(),
            ));
        }

        if self.scroll.fallback_header_height <= 0.0 {
            return Err(ConfigError::Validation(
                "scroll.fallback_header_height must be positive".into(),
            ));
        }
        if self.reveal.max_stagger == 0 {
            return Err(ConfigError::Validation(
                "reveal.max_stagger must be at least 1".into(),
            ));
        }
        if self.reveal.targets.iter().any(|t| t.selector.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "reveal.targets selectors must not be empty".into(),
            ));
        }
        if self.header.threshold < 0.0 {
            return Err(ConfigError::Validation(
                "header.threshold must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Theme preference storage and toggle control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// `localStorage` key holding `"dark"` or `"light"`.
    pub storage_key: String,
    pub toggle_id: String,
    /// Class on `<body>` while the dark theme is active.
    pub dark_class: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "portfolio-theme".to_string(),
            toggle_id: "theme-toggle".to_string(),
            dark_class: "dark-mode".to_string(),
        }
    }
}

/// Mobile navigation menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuConfig {
    pub toggle_id: String,
    pub container_id: String,
    /// Links inside the container that close the menu.
    pub link_selector: String,
    pub open_class: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            toggle_id: "hamburger".to_string(),
            container_id: "nav-links".to_string(),
            link_selector: ".nav-link".to_string(),
            open_class: "open".to_string(),
        }
    }
}

/// Smooth scrolling to in-page anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    pub anchor_selector: String,
    /// CSS custom property on `:root` holding the fixed header's height.
    pub header_height_property: String,
    /// Used when the property is missing, unparsable, or zero.
    pub fallback_header_height: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            anchor_selector: r##"a[href^="#"]"##.to_string(),
            header_height_property: "--nav-h".to_string(),
            fallback_header_height: 68.0,
        }
    }
}

/// Active-section highlighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActiveNavConfig {
    pub section_selector: String,
    pub link_selector: String,
    pub active_class: String,
    /// Share of the viewport, from the top, that does not count as inside.
    pub top_margin_percent: f64,
    /// Share of the viewport, from the bottom, that does not count as inside.
    pub bottom_margin_percent: f64,
}

impl Default for ActiveNavConfig {
    fn default() -> Self {
        Self {
            section_selector: "section[id]".to_string(),
            link_selector: ".nav-link".to_string(),
            active_class: "active".to_string(),
            top_margin_percent: 40.0,
            bottom_margin_percent: 55.0,
        }
    }
}

/// One group of elements decorated for reveal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RevealTarget {
    pub selector: String,
    /// Stagger tier of the group's first element.
    #[serde(default)]
    pub stagger: u32,
}

impl RevealTarget {
    fn new(selector: &str, stagger: u32) -> Self {
        Self {
            selector: selector.to_string(),
            stagger,
        }
    }
}

/// Scroll-reveal animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    pub marker_class: String,
    pub revealed_class: String,
    /// Stagger classes are `{prefix}-{tier}`.
    pub delay_class_prefix: String,
    /// Visible fraction that triggers the reveal.
    pub threshold: f64,
    pub max_stagger: u32,
    pub targets: Vec<RevealTarget>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            marker_class: "reveal".to_string(),
            revealed_class: "revealed".to_string(),
            delay_class_prefix: "reveal-delay".to_string(),
            threshold: 0.12,
            max_stagger: 3,
            targets: vec![
                RevealTarget::new(".about-text", 0),
                RevealTarget::new(".about-card", 1),
                RevealTarget::new(".skill-category", 0),
                RevealTarget::new(".project-card", 0),
                RevealTarget::new(".contact-intro", 0),
                RevealTarget::new(".contact-form", 1),
                RevealTarget::new(".section-header", 0),
            ],
        }
    }
}

/// Skill-bar fill animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkillsConfig {
    pub selector: String,
    /// Attribute holding the target percentage.
    pub level_attribute: String,
    /// CSS custom property receiving the percentage.
    pub width_property: String,
    pub animate_class: String,
    pub threshold: f64,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            selector: ".skill-bar[data-level]".to_string(),
            level_attribute: "data-level".to_string(),
            width_property: "--w".to_string(),
            animate_class: "animate".to_string(),
            threshold: 0.3,
        }
    }
}

/// Contact form. Input ids (`name`, `email`, `message`) and their error
/// slots (`<id>-error`) are fixed by the markup contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    pub form_id: String,
    /// Submit control, looked up inside the form.
    pub submit_selector: String,
    pub success_id: String,
    pub error_class: String,
    /// Submit control text while the simulated submission runs.
    pub pending_label: String,
    pub submit_delay_ms: u64,
    /// How long the success notice stays visible.
    pub success_visible_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_id: "contact-form".to_string(),
            submit_selector: r#"[type="submit"]"#.to_string(),
            success_id: "form-success".to_string(),
            error_class: "error".to_string(),
            pending_label: "Sending...".to_string(),
            submit_delay_ms: 1200,
            success_visible_ms: 5000,
        }
    }
}

/// Header scroll shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderConfig {
    pub selector: String,
    /// Scroll offset above which the shadow shows.
    pub threshold: f64,
    pub light_shadow: String,
    pub dark_shadow: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            selector: ".navbar".to_string(),
            threshold: 20.0,
            light_shadow: "0 1px 24px rgba(10,30,80,0.12)".to_string(),
            dark_shadow: "0 1px 32px rgba(0,5,30,0.50)".to_string(),
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse and validate a TOML config document.
pub fn from_toml(content: &str) -> Result<BehaviorConfig, ConfigError> {
    let config: BehaviorConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Parse and validate a JSON config document, as embedded in a page.
pub fn from_json(content: &str) -> Result<BehaviorConfig, ConfigError> {
    let config: BehaviorConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load a TOML config file on top of the stock defaults.
pub fn load_config(path: &Path) -> Result<BehaviorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    from_toml(&content)
}

/// Returns a fully-commented stock config TOML with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Portfolio Behaviors Configuration
# =================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Check a config with `portfolio-behaviors check-config <file>`, then embed
# it in the page as JSON:
#   <script type="application/json" id="behavior-config">{ ... }</script>
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Theme toggle
# ---------------------------------------------------------------------------
[theme]
# localStorage key holding "dark" or "light".
storage_key = "portfolio-theme"
# Id of the toggle button.
toggle_id = "theme-toggle"
# Class placed on <body> while dark mode is active.
dark_class = "dark-mode"

# ---------------------------------------------------------------------------
# Mobile navigation menu
# ---------------------------------------------------------------------------
[menu]
toggle_id = "hamburger"
container_id = "nav-links"
# Links inside the container that close the menu when clicked.
link_selector = ".nav-link"
open_class = "open"

# ---------------------------------------------------------------------------
# Smooth scrolling to in-page anchors
# ---------------------------------------------------------------------------
[scroll]
anchor_selector = 'a[href^="#"]'
# CSS custom property on :root holding the fixed header's height.
header_height_property = "--nav-h"
# Used when the property is missing or unreadable.
fallback_header_height = 68.0

# ---------------------------------------------------------------------------
# Active nav link highlighting
# ---------------------------------------------------------------------------
[active_nav]
section_selector = "section[id]"
link_selector = ".nav-link"
active_class = "active"
# A section is current while it crosses the band between these margins.
top_margin_percent = 40.0
bottom_margin_percent = 55.0

# ---------------------------------------------------------------------------
# Scroll reveal
# ---------------------------------------------------------------------------
[reveal]
marker_class = "reveal"
revealed_class = "revealed"
# Stagger classes are "<prefix>-<tier>", tier 1 to max_stagger.
delay_class_prefix = "reveal-delay"
# Visible fraction (0.0-1.0) that triggers the reveal.
threshold = 0.12
max_stagger = 3

# Groups decorated with the reveal marker. `stagger` is the tier of the
# group's first element; later elements step up by one.
[[reveal.targets]]
selector = ".about-text"
stagger = 0

[[reveal.targets]]
selector = ".about-card"
stagger = 1

[[reveal.targets]]
selector = ".skill-category"
stagger = 0

[[reveal.targets]]
selector = ".project-card"
stagger = 0

[[reveal.targets]]
selector = ".contact-intro"
stagger = 0

[[reveal.targets]]
selector = ".contact-form"
stagger = 1

[[reveal.targets]]
selector = ".section-header"
stagger = 0

# ---------------------------------------------------------------------------
# Skill bars
# ---------------------------------------------------------------------------
[skills]
selector = ".skill-bar[data-level]"
# Attribute holding the target percentage.
level_attribute = "data-level"
# CSS custom property receiving the percentage.
width_property = "--w"
animate_class = "animate"
threshold = 0.3

# ---------------------------------------------------------------------------
# Contact form
# ---------------------------------------------------------------------------
[form]
form_id = "contact-form"
submit_selector = '[type="submit"]'
success_id = "form-success"
error_class = "error"
pending_label = "Sending..."
# Simulated submission time, then how long the success notice stays up.
submit_delay_ms = 1200
success_visible_ms = 5000

# ---------------------------------------------------------------------------
# Header shadow
# ---------------------------------------------------------------------------
[header]
selector = ".navbar"
# Scroll offset (px) above which the shadow shows.
threshold = 20.0
light_shadow = "0 1px 24px rgba(10,30,80,0.12)"
dark_shadow = "0 1px 32px rgba(0,5,30,0.50)"
"##
}
