//! Client-side form validation and submission.
//!
//! Every `.needs-validation` / `.c-form` element validates a field when it
//! loses focus and validates all of its fields on submit. The element is
//! usually the `<form>` itself; a wrapper catches the `submit` as it bubbles. Native submission is
//! always prevented. A fully valid form locks its submit button behind a busy
//! indicator and hands its payload to the configured [`Submitter`]:
//!
//! ```text
//! submit ─► validate all ─┬─ any invalid ─► danger toast
//!                         └─ all valid ──► button busy ─► Submitter
//!                                                          ├─ Accepted ─► success toast ─► redirect
//!                                                          └─ Rejected ─► danger toast, button restored
//! ```
//!
//! ## Rules
//!
//! Checked in order on the trimmed value; the first that applies wins:
//!
//! 1. `required` and empty
//! 2. `type=email`, non-empty, not `local@domain.tld`
//! 3. `type=tel`, non-empty, not 8–20 of digits, spaces, `+`, `(`, `)`, `-`
//! 4. `<textarea>`, non-empty, shorter than the configured minimum
//! 5. required checkbox left unchecked
//!
//! ## Feedback
//!
//! Each field reports through the first `.invalid-feedback` inside its
//! parent, created on the field's first validation when the markup has none.
//! Valid fields hide their feedback node rather than removing it.

use super::markup::{FIELD_TAGS, FORM_CLASSES, INVALID_FEEDBACK, IS_INVALID, SPINNER_CLASS};
use super::submit::{FormPayload, SubmitCallback, SubmitOutcome, Submitter};
use super::toast::{ToastKind, notify};
use crate::config::{BehaviorConfig, MessageConfig};
use crate::controller::{ControllerState, claim};
use crate::dom::{Element, NodeId};
use crate::event::{EventTarget, EventType};
use crate::page::Page;
use regex::Regex;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+0-9\s()\-]{8,20}$").expect("phone pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    InvalidEmail,
    InvalidPhone,
    TooShort,
    MustAgree,
}

impl FieldError {
    pub fn message(self, messages: &MessageConfig) -> &str {
        match self {
            Self::Required => &messages.required,
            Self::InvalidEmail => &messages.invalid_email,
            Self::InvalidPhone => &messages.invalid_phone,
            Self::TooShort => &messages.too_short,
            Self::MustAgree => &messages.must_agree,
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

/// The rule a control currently violates, if any.
pub fn field_error(field: &Element, min_message_length: usize) -> Option<FieldError> {
    let value = field.value().trim();
    let kind = field.control_type();
    let required = field.has_attr("required");

    if required && value.is_empty() {
        return Some(FieldError::Required);
    }
    match kind.as_str() {
        "email" if !value.is_empty() => {
            (!is_valid_email(value)).then_some(FieldError::InvalidEmail)
        }
        "tel" if !value.is_empty() => (!is_valid_phone(value)).then_some(FieldError::InvalidPhone),
        "textarea" if !value.is_empty() => {
            (value.chars().count() < min_message_length).then_some(FieldError::TooShort)
        }
        "checkbox" if required && !field.checked() => Some(FieldError::MustAgree),
        _ => None,
    }
}

/// Per-field outcome of the last validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldState {
    pub feedback: Option<NodeId>,
    pub error: Option<FieldError>,
}

struct FormState {
    form: NodeId,
    config: Rc<BehaviorConfig>,
    submitter: Rc<dyn Submitter>,
    fields: RefCell<HashMap<NodeId, FieldState>>,
    in_flight: Cell<bool>,
}

impl FormState {
    fn feedback_node(&self, page: &mut Page, field: NodeId) -> Option<NodeId> {
        if let Some(state) = self.fields.borrow().get(&field)
            && state.feedback.is_some_and(|f| page.document().is_connected(f))
        {
            return state.feedback;
        }
        let parent = page.document().parent_element(field)?;
        if let Some(existing) = page
            .document()
            .find_first(parent, |el| el.has_class(INVALID_FEEDBACK))
        {
            return Some(existing);
        }
        let doc = page.document_mut();
        let feedback = doc.create_element("div");
        doc.add_class(feedback, INVALID_FEEDBACK);
        doc.append_child(parent, feedback);
        Some(feedback)
    }

    /// Validate one field and update its markers. Returns whether it passed.
    fn validate_field(&self, page: &mut Page, field: NodeId) -> bool {
        let Some(element) = page.document().element(field) else {
            return true;
        };
        let error = field_error(element, self.config.forms.min_message_length);
        let feedback = self.feedback_node(page, field);

        let doc = page.document_mut();
        match error {
            Some(error) => {
                doc.add_class(field, IS_INVALID);
                if let Some(feedback) = feedback {
                    doc.set_text_content(feedback, error.message(&self.config.forms.messages));
                    doc.set_style_property(feedback, "display", "block");
                }
            }
            None => {
                doc.remove_class(field, IS_INVALID);
                if let Some(feedback) = feedback {
                    doc.set_style_property(feedback, "display", "none");
                }
            }
        }
        self.fields
            .borrow_mut()
            .insert(field, FieldState { feedback, error });
        error.is_none()
    }

    fn handle_submit(self: &Rc<Self>, page: &mut Page) {
        if self.in_flight.get() {
            tracing::debug!(form = %self.form, "submission already in flight");
            return;
        }
        let fields = form_fields(page, self.form);
        let mut all_valid = true;
        for field in fields {
            all_valid &= self.validate_field(page, field);
        }
        let forms = &self.config.forms;
        if !all_valid {
            notify(
                page,
                &forms.messages.form_invalid,
                ToastKind::Danger,
                self.config.toasts.lifetime_ms,
            );
            return;
        }

        let button = page.document().find_first(self.form, |el| {
            el.is("button") && el.attr("type") == Some("submit")
        });
        let original = button.map(|b| show_busy(page, b, &forms.messages.submitting));
        self.in_flight.set(true);

        let payload = collect_payload(page, self.form);
        let state = Rc::clone(self);
        let done: SubmitCallback = Box::new(move |page: &mut Page, outcome: SubmitOutcome| {
            state.in_flight.set(false);
            state.finish(page, outcome, button.zip(original));
        });
        self.submitter.submit(page, payload, done);
    }

    fn finish(
        &self,
        page: &mut Page,
        outcome: SubmitOutcome,
        busy: Option<(NodeId, Vec<NodeId>)>,
    ) {
        let lifetime = self.config.toasts.lifetime_ms;
        let forms = &self.config.forms;
        match outcome {
            SubmitOutcome::Accepted => {
                notify(page, &forms.messages.submitted, ToastKind::Success, lifetime);
                let target = forms.redirect_target.clone();
                page.set_timeout(forms.redirect_delay_ms, move |page| page.navigate(&target));
            }
            SubmitOutcome::Rejected(reason) => {
                tracing::debug!(form = %self.form, %reason, "submission rejected");
                notify(page, &forms.messages.submit_failed, ToastKind::Danger, lifetime);
                if let Some((button, original)) = busy {
                    restore_button(page, button, original);
                }
            }
        }
    }
}

/// Controls currently inside `form`, in document order.
fn form_fields(page: &Page, form: NodeId) -> Vec<NodeId> {
    page.document()
        .find_all(form, |el| FIELD_TAGS.contains(&el.tag()))
}

/// Disable `button` and swap its content for a spinner. Returns the original
/// children.
fn show_busy(page: &mut Page, button: NodeId, label: &str) -> Vec<NodeId> {
    let doc = page.document_mut();
    let original = doc.take_children(button);
    doc.set_disabled(button, true);
    let spinner = doc.create_element("span");
    doc.set_attr(spinner, "class", SPINNER_CLASS);
    doc.set_attr(spinner, "role", "status");
    doc.set_attr(spinner, "aria-hidden", "true");
    doc.append_child(button, spinner);
    let text = doc.create_text(label);
    doc.append_child(button, text);
    original
}

fn restore_button(page: &mut Page, button: NodeId, original: Vec<NodeId>) {
    let doc = page.document_mut();
    doc.take_children(button);
    for child in original {
        doc.append_child(button, child);
    }
    doc.set_disabled(button, false);
}

/// Name (or id) → value of every submittable control in `form`.
pub fn collect_payload(page: &Page, form: NodeId) -> FormPayload {
    let doc = page.document();
    let fields = form_fields(page, form)
        .into_iter()
        .filter_map(|field| {
            let el = doc.element(field)?;
            let kind = el.control_type();
            if matches!(kind.as_str(), "submit" | "button" | "reset") {
                return None;
            }
            if matches!(kind.as_str(), "checkbox" | "radio") && !el.checked() {
                return None;
            }
            let name = el.attr("name").filter(|n| !n.is_empty()).or_else(|| el.id())?;
            Some((name.to_string(), el.value().to_string()))
        })
        .collect();
    FormPayload {
        form_id: doc.attr(form, "id").map(str::to_string),
        fields,
    }
}

pub fn init(
    page: &mut Page,
    state: &mut ControllerState,
    config: &Rc<BehaviorConfig>,
    submitter: &Rc<dyn Submitter>,
) {
    if !claim(&mut state.forms) {
        return;
    }
    let doc = page.document();
    let forms = doc.find_all(doc.root(), |el| el.has_any_class(FORM_CLASSES));
    if forms.is_empty() {
        tracing::debug!("forms: no validated forms, skipping");
        return;
    }

    for form in forms {
        let form_state = Rc::new(FormState {
            form,
            config: Rc::clone(config),
            submitter: Rc::clone(submitter),
            fields: RefCell::new(HashMap::new()),
            in_flight: Cell::new(false),
        });

        for field in form_fields(page, form) {
            let form_state = Rc::clone(&form_state);
            page.add_listener(EventTarget::Node(field), EventType::Blur, move |page, _| {
                form_state.validate_field(page, field);
            });
        }

        page.add_listener(EventTarget::Node(form), EventType::Submit, move |page, event| {
            event.prevent_default();
            event.stop_propagation();
            form_state.handle_submit(page);
        });
    }
}
