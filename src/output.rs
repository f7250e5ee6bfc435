//! CLI output formatting.
//!
//! # Output Format
//!
//! ## check-config
//!
//! ```text
//! Config behaviors.toml
//! Theme
//!     storage key: portfolio-theme
//!     toggle: #theme-toggle
//!     dark class: dark-mode
//! Reveal
//!     threshold: 12%
//!     targets:
//!         .about-text
//!         .about-card (stagger 1)
//! ...
//! ```
//!
//! ## validate
//!
//! ```text
//! name     ok
//! email    Please enter a valid email.
//! message  ok
//!
//! 1 field invalid
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::BehaviorConfig;
use crate::form::{Field, FieldError};
use std::path::Path;

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn percent(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round())
}

/// Header line followed by its indented `key: value` lines.
fn section(title: &str, entries: &[(&str, String)]) -> Vec<String> {
    let mut lines = vec![title.to_string()];
    lines.extend(
        entries
            .iter()
            .map(|(key, value)| format!("{}{key}: {value}", indent(1))),
    );
    lines
}

// ============================================================================
// check-config
// ============================================================================

pub fn format_config_summary(config: &BehaviorConfig, path: &Path) -> Vec<String> {
    let mut lines = vec![format!("Config {}", path.display())];

    let theme = &config.theme;
    lines.extend(section(
        "Theme",
        &[
            ("storage key", theme.storage_key.clone()),
            ("toggle", format!("#{}", theme.toggle_id)),
            ("dark class", theme.dark_class.clone()),
        ],
    ));

    let menu = &config.menu;
    lines.extend(section(
        "Menu",
        &[
            ("toggle", format!("#{}", menu.toggle_id)),
            ("container", format!("#{}", menu.container_id)),
            ("links", menu.link_selector.clone()),
            ("open class", menu.open_class.clone()),
        ],
    ));

    let scroll = &config.scroll;
    lines.extend(section(
        "Scroll",
        &[
            ("anchors", scroll.anchor_selector.clone()),
            (
                "header height",
                format!(
                    "var({}), fallback {}px",
                    scroll.header_height_property, scroll.fallback_header_height
                ),
            ),
        ],
    ));

    let nav = &config.active_nav;
    lines.extend(section(
        "Active nav",
        &[
            ("sections", nav.section_selector.clone()),
            ("links", nav.link_selector.clone()),
            (
                "band",
                format!(
                    "{}% from top, {}% from bottom",
                    nav.top_margin_percent, nav.bottom_margin_percent
                ),
            ),
            ("active class", nav.active_class.clone()),
        ],
    ));

    let reveal = &config.reveal;
    lines.extend(section(
        "Reveal",
        &[
            ("threshold", percent(reveal.threshold)),
            (
                "stagger",
                format!(
                    "{prefix}-1 to {prefix}-{}",
                    reveal.max_stagger,
                    prefix = reveal.delay_class_prefix
                ),
            ),
        ],
    ));
    if reveal.targets.is_empty() {
        lines.push(format!("{}targets: none", indent(1)));
    } else {
        lines.push(format!("{}targets:", indent(1)));
        for target in &reveal.targets {
            let stagger = match target.stagger {
                0 => String::new(),
                n => format!(" (stagger {n})"),
            };
            lines.push(format!("{}{}{stagger}", indent(2), target.selector));
        }
    }

    let skills = &config.skills;
    lines.extend(section(
        "Skills",
        &[
            ("bars", skills.selector.clone()),
            (
                "level",
                format!("{} -> {}", skills.level_attribute, skills.width_property),
            ),
            ("threshold", percent(skills.threshold)),
        ],
    ));

    let form = &config.form;
    lines.extend(section(
        "Form",
        &[
            ("form", format!("#{}", form.form_id)),
            ("submit", form.submit_selector.clone()),
            ("success notice", format!("#{}", form.success_id)),
            ("pending label", form.pending_label.clone()),
            (
                "timing",
                format!(
                    "submit {}ms, notice {}ms",
                    form.submit_delay_ms, form.success_visible_ms
                ),
            ),
        ],
    ));

    let header = &config.header;
    lines.extend(section(
        "Header",
        &[
            ("selector", header.selector.clone()),
            ("shadow above", format!("{}px", header.threshold)),
        ],
    ));

    lines
}

pub fn print_config_summary(config: &BehaviorConfig, path: &Path) {
    for line in format_config_summary(config, path) {
        println!("{}", line);
    }
}

// ============================================================================
// validate
// ============================================================================

/// One line per field, then a blank line and the verdict.
pub fn format_validation(results: &[(Field, Result<(), FieldError>)]) -> Vec<String> {
    let mut lines: Vec<String> = results
        .iter()
        .map(|(field, result)| match result {
            Ok(()) => format!("{:<9}ok", field.input_id()),
            Err(error) => format!("{:<9}{error}", field.input_id()),
        })
        .collect();

    let invalid = results.iter().filter(|(_, r)| r.is_err()).count();
    lines.push(String::new());
    lines.push(match invalid {
        0 => "All fields valid".to_string(),
        1 => "1 field invalid".to_string(),
        n => format!("{n} fields invalid"),
    });
    lines
}

pub fn print_validation(results: &[(Field, Result<(), FieldError>)]) {
    for line in format_validation(results) {
        println!("{}", line);
    }
}
