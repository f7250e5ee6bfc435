//! Contact form validation and simulated submission.
//!
//! ## Rules
//!
//! All rules run on the trimmed value. Lengths count UTF-16 code units, the
//! way the browser reports an input's length, so `"😀"` is two long. Any
//! whitespace inside an email address, ASCII or not, makes it invalid.
//!
//! | Field | Empty | Otherwise fails when |
//! |-------|-------|----------------------|
//! | name | "Name is required." | shorter than 2: "Name must be at least 2 characters." |
//! | email | "Email is required." | not `local@domain.tld`: "Please enter a valid email." |
//! | message | "Message is required." | shorter than 10: "Message must be at least 10 characters." |
//!
//! ## Field lifecycle
//!
//! ```text
//! Pristine ── blur, fails ──▶ Invalid ── input ──────────▶ Pristine
//! Pristine ── blur, passes ─▶ Valid
//! Valid ───── blur, fails ──▶ Invalid ── blur, passes ───▶ Valid
//! any ─────── submit ───────▶ Invalid or Valid
//! ```
//!
//! Input while invalid clears the error without re-validating; the next blur
//! or submit decides again.
//!
//! ## Submission
//!
//! Submit validates every field. On failure all messages show at once and
//! focus moves to the first failing field in form order. On success the
//! submit control is disabled with a pending label; after the submit delay the
//! fields are cleared, the control is restored, and the success notice is
//! shown until the notice delay elapses. Nothing is sent anywhere.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::LazyLock;
use std::time::Duration;

use regex_lite::Regex;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::FormConfig;
use crate::dom::{Document, Element};
use crate::schedule::{PendingTasks, Scheduler};

const NAME_MIN_LEN: usize = 2;
const MESSAGE_MIN_LEN: usize = 10;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// A failed validation rule. `Display` is the message shown to the visitor.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Name is required.")]
    NameRequired,
    #[error("Name must be at least 2 characters.")]
    NameTooShort,
    #[error("Email is required.")]
    EmailRequired,
    #[error("Please enter a valid email.")]
    EmailInvalid,
    #[error("Message is required.")]
    MessageRequired,
    #[error("Message must be at least 10 characters.")]
    MessageTooShort,
}

/// Length as a browser input reports it.
fn input_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// `\s` in the pattern is ASCII-only; this covers the rest.
fn has_inner_whitespace(value: &str) -> bool {
    value.chars().any(|c| c.is_whitespace() || c == '\u{FEFF}')
}

pub fn validate_name(raw: &str) -> Result<(), FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        Err(FieldError::NameRequired)
    } else if input_len(value) < NAME_MIN_LEN {
        Err(FieldError::NameTooShort)
    } else {
        Ok(())
    }
}

pub fn validate_email(raw: &str) -> Result<(), FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        Err(FieldError::EmailRequired)
    } else if has_inner_whitespace(value) || !EMAIL_PATTERN.is_match(value) {
        Err(FieldError::EmailInvalid)
    } else {
        Ok(())
    }
}

pub fn validate_message(raw: &str) -> Result<(), FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        Err(FieldError::MessageRequired)
    } else if input_len(value) < MESSAGE_MIN_LEN {
        Err(FieldError::MessageTooShort)
    } else {
        Ok(())
    }
}

/// The form's fields, in the order focus visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    /// Element id of the input.
    pub fn input_id(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Message => "message",
        }
    }

    /// Element id of the inline error slot.
    pub fn error_id(self) -> &'static str {
        match self {
            Field::Name => "name-error",
            Field::Email => "email-error",
            Field::Message => "message-error",
        }
    }

    pub fn validate(self, raw: &str) -> Result<(), FieldError> {
        match self {
            Field::Name => validate_name(raw),
            Field::Email => validate_email(raw),
            Field::Message => validate_message(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Pristine,
    Invalid(FieldError),
    Valid,
}

/// Result of a submit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one field failed; focus went to `first_invalid`.
    Rejected { first_invalid: Field },
    /// Simulated submission started.
    Pending,
    /// A simulated submission is already running; nothing changed.
    InFlight,
}

struct FieldSlot<E: Element> {
    field: Field,
    input: E,
    error: Option<E>,
    state: Rc<Cell<FieldState>>,
}

pub struct ContactForm<E: Element, S: Scheduler> {
    form: E,
    fields: Vec<FieldSlot<E>>,
    submit: Option<E>,
    success: Option<E>,
    submitting: Rc<Cell<bool>>,
    scheduler: S,
    pending: PendingTasks<S>,
    config: FormConfig,
}

impl<E: Element, S: Scheduler> ContactForm<E, S> {
    /// `None` unless the form and all three inputs exist. Error slots, the
    /// submit control, and the success notice are optional.
    pub fn attach<D: Document<Element = E>>(
        doc: &D,
        scheduler: S,
        config: &FormConfig,
    ) -> Option<Self> {
        let Some(form) = doc.element_by_id(&config.form_id) else {
            debug!(id = %config.form_id, "no contact form, skipping");
            return None;
        };
        let mut fields = Vec::with_capacity(Field::ALL.len());
        for field in Field::ALL {
            let Some(input) = doc.element_by_id(field.input_id()) else {
                debug!(field = field.input_id(), "contact form input missing, skipping");
                return None;
            };
            fields.push(FieldSlot {
                field,
                input,
                error: doc.element_by_id(field.error_id()),
                state: Rc::new(Cell::new(FieldState::Pristine)),
            });
        }
        let submit = form.query_all(&config.submit_selector).into_iter().next();
        Some(Self {
            form,
            fields,
            submit,
            success: doc.element_by_id(&config.success_id),
            submitting: Rc::new(Cell::new(false)),
            scheduler,
            pending: PendingTasks::default(),
            config: config.clone(),
        })
    }

    pub fn form(&self) -> &E {
        &self.form
    }

    pub fn input(&self, field: Field) -> &E {
        &self.slot(field).input
    }

    pub fn state(&self, field: Field) -> FieldState {
        self.slot(field).state.get()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.get()
    }

    /// The input lost focus: validate it.
    pub fn on_blur(&self, field: Field) {
        self.check(self.slot(field));
    }

    /// The visitor typed into the input: drop a shown error, nothing else.
    pub fn on_input(&self, field: Field) {
        let slot = self.slot(field);
        if matches!(slot.state.get(), FieldState::Invalid(_)) {
            self.clear_error(slot);
            slot.state.set(FieldState::Pristine);
        }
    }

    /// The form was submitted. The caller suppresses the browser's own
    /// submission in every case.
    pub fn submit(&self) -> SubmitOutcome {
        if self.submitting.get() {
            return SubmitOutcome::InFlight;
        }

        let mut first_invalid = None;
        for slot in &self.fields {
            if !self.check(slot) && first_invalid.is_none() {
                first_invalid = Some(slot);
            }
        }
        if let Some(slot) = first_invalid {
            slot.input.focus();
            debug!(field = slot.field.input_id(), "contact form rejected");
            return SubmitOutcome::Rejected {
                first_invalid: slot.field,
            };
        }

        self.submitting.set(true);
        let original_label = self.submit.as_ref().map(|b| b.text());
        if let Some(button) = &self.submit {
            button.set_attribute("disabled", "");
            button.set_text(&self.config.pending_label);
        }
        debug!("contact form submitted (simulated)");

        let fields: Vec<(E, Rc<Cell<FieldState>>)> = self
            .fields
            .iter()
            .map(|s| (s.input.clone(), Rc::clone(&s.state)))
            .collect();
        let button = self.submit.clone();
        let success = self.success.clone();
        let submitting = Rc::clone(&self.submitting);
        let scheduler = self.scheduler.clone();
        let pending = self.pending.clone();
        let notice_delay = Duration::from_millis(self.config.success_visible_ms);

        self.pending.push(
            &self.scheduler,
            Duration::from_millis(self.config.submit_delay_ms),
            move || {
                for (input, state) in &fields {
                    input.set_value("");
                    state.set(FieldState::Pristine);
                }
                if let Some(button) = &button {
                    button.remove_attribute("disabled");
                    button.set_text(original_label.as_deref().unwrap_or_default());
                }
                submitting.set(false);
                trace!("simulated submission complete");

                if let Some(notice) = success {
                    notice.remove_attribute("hidden");
                    pending.push(&scheduler, notice_delay, move || {
                        notice.set_attribute("hidden", "");
                    });
                }
            },
        );
        SubmitOutcome::Pending
    }

    /// Cancel pending continuations. Whatever they would have done is
    /// skipped; the page keeps its current state.
    pub fn teardown(&self) {
        self.pending.cancel_all();
    }

    fn slot(&self, field: Field) -> &FieldSlot<E> {
        // attach() fills one slot per field, in Field::ALL order.
        &self.fields[field as usize]
    }

    /// Validate one field, update its display, and report whether it passed.
    fn check(&self, slot: &FieldSlot<E>) -> bool {
        match slot.field.validate(&slot.input.value()) {
            Ok(()) => {
                self.clear_error(slot);
                slot.state.set(FieldState::Valid);
                true
            }
            Err(error) => {
                slot.input.add_class(&self.config.error_class);
                slot.input.set_attribute("aria-invalid", "true");
                if let Some(slot_el) = &slot.error {
                    slot_el.set_text(&error.to_string());
                }
                slot.state.set(FieldState::Invalid(error));
                false
            }
        }
    }

    fn clear_error(&self, slot: &FieldSlot<E>) {
        slot.input.remove_class(&self.config.error_class);
        slot.input.remove_attribute("aria-invalid");
        if let Some(slot_el) = &slot.error {
            slot_el.set_text("");
        }
    }
}
