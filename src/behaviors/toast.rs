//! Transient notifications.
//!
//! Toasts stack inside one fixed-position `#toast-container`, created on the
//! first notification. Each toast carries a close button and removes itself
//! after its lifetime if still attached.

use super::markup::{TOAST_CLOSE, TOAST_CONTAINER_ID, TOAST_CONTAINER_STYLE, TOAST_STYLE};
use crate::dom::NodeId;
use crate::event::{EventTarget, EventType};
use crate::page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Danger,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }
}

fn container(page: &mut Page) -> NodeId {
    if let Some(existing) = page.document().element_by_id(TOAST_CONTAINER_ID) {
        return existing;
    }
    let doc = page.document_mut();
    let container = doc.create_element("div");
    doc.set_attr(container, "id", TOAST_CONTAINER_ID);
    doc.set_attr(container, "style", TOAST_CONTAINER_STYLE);
    let parent = doc.body().unwrap_or_else(|| doc.root());
    doc.append_child(parent, container);
    container
}

/// Detach `toast` and drop its close-button listener.
fn dismiss(page: &mut Page, toast: NodeId, close: NodeId) {
    page.document_mut().detach(toast);
    page.remove_listeners(EventTarget::Node(close));
}

/// Show `message` as a toast and return its node.
pub fn notify(page: &mut Page, message: &str, kind: ToastKind, lifetime_ms: u64) -> NodeId {
    let container = container(page);
    let doc = page.document_mut();
    let toast = doc.create_element("div");
    doc.set_attr(
        toast,
        "class",
        &format!("alert alert-{} alert-dismissible fade show", kind.as_str()),
    );
    doc.set_attr(toast, "role", "alert");
    doc.set_attr(toast, "style", TOAST_STYLE);
    let text = doc.create_text(message);
    doc.append_child(toast, text);

    let close = doc.create_element("button");
    doc.set_attr(close, "type", "button");
    doc.set_attr(close, "class", TOAST_CLOSE);
    doc.set_attr(close, "aria-label", "Close");
    let times = doc.create_text("\u{d7}");
    doc.append_child(close, times);
    doc.append_child(toast, close);
    doc.append_child(container, toast);

    page.add_listener(EventTarget::Node(close), EventType::Click, move |page, _| {
        dismiss(page, toast, close);
    });
    page.set_timeout(lifetime_ms, move |page| {
        if page.document().parent(toast).is_some() {
            dismiss(page, toast, close);
        }
    });
    tracing::debug!(kind = kind.as_str(), message, "toast");
    toast
}

/// Toasts currently attached to the container, oldest first.
pub fn active_toasts(page: &Page) -> Vec<NodeId> {
    page.document()
        .element_by_id(TOAST_CONTAINER_ID)
        .map(|c| page.document().children(c).to_vec())
        .unwrap_or_default()
}
