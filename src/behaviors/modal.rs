//! Modal dialogs opened by `[data-bs-toggle="modal"]` triggers.
//!
//! Every open appends its own backdrop, but closing removes whichever
//! backdrop comes first in the document and clears `modal-open` on the body
//! unconditionally. Pages are expected to show one modal at a time.

use super::markup::{DATA_DISMISS, DATA_TARGET, DATA_TOGGLE, MODAL, MODAL_BACKDROP, MODAL_OPEN, SHOW};
use crate::controller::{ControllerState, claim};
use crate::dom::{NodeId, Selector};
use crate::event::{EventTarget, EventType};
use crate::page::Page;

fn open(page: &mut Page, modal: NodeId) {
    let doc = page.document_mut();
    doc.add_class(modal, SHOW);
    doc.set_style_property(modal, "display", "block");
    let Some(body) = doc.body() else {
        return;
    };
    doc.add_class(body, MODAL_OPEN);
    let backdrop = doc.create_element("div");
    doc.set_attr(backdrop, "class", "modal-backdrop fade show");
    doc.append_child(body, backdrop);
}

fn close(page: &mut Page, modal: NodeId) {
    let doc = page.document_mut();
    doc.remove_class(modal, SHOW);
    doc.set_style_property(modal, "display", "none");
    if let Some(body) = doc.body() {
        doc.remove_class(body, MODAL_OPEN);
    }
    if let Some(backdrop) = doc.find_first(doc.root(), |el| el.has_class(MODAL_BACKDROP)) {
        doc.detach(backdrop);
    }
}

/// Resolve a trigger's `data-bs-target` selector.
fn target_modal(page: &Page, trigger: NodeId) -> Option<NodeId> {
    let doc = page.document();
    let source = doc.attr(trigger, DATA_TARGET)?;
    let selector = match Selector::parse(source) {
        Ok(selector) => selector,
        Err(err) => {
            tracing::debug!(%trigger, %err, "modal trigger has an unusable target");
            return None;
        }
    };
    doc.select_first(doc.root(), &selector)
}

pub fn init(page: &mut Page, state: &mut ControllerState) {
    if !claim(&mut state.modals) {
        return;
    }
    let doc = page.document();
    let triggers = doc.find_all(doc.root(), |el| el.attr(DATA_TOGGLE) == Some(MODAL));
    let dismissers = doc.find_all(doc.root(), |el| el.attr(DATA_DISMISS) == Some(MODAL));

    for trigger in triggers {
        page.add_listener(EventTarget::Node(trigger), EventType::Click, move |page, event| {
            event.prevent_default();
            if let Some(modal) = target_modal(page, trigger) {
                open(page, modal);
            }
        });
    }
    for dismiss in dismissers {
        page.add_listener(EventTarget::Node(dismiss), EventType::Click, move |page, _| {
            if let Some(modal) = page.document().closest(dismiss, |el| el.has_class(MODAL)) {
                close(page, modal);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    const PAGE: &str = r##"
        <button id="open-a" data-bs-toggle="modal" data-bs-target="#modal-a">A</button>
        <button id="open-b" data-bs-toggle="modal" data-bs-target="#modal-b">B</button>
        <button id="open-bad" data-bs-toggle="modal" data-bs-target="#">Bad</button>
        <div class="modal" id="modal-a"><button id="close-a" data-bs-dismiss="modal">x</button></div>
        <div class="modal" id="modal-b"><button id="close-b" data-bs-dismiss="modal">x</button></div>
    "##;

    fn setup() -> Page {
        let mut page = page_from(PAGE);
        let mut state = ControllerState::default();
        init(&mut page, &mut state);
        page
    }

    fn backdrops(page: &Page) -> usize {
        let doc = page.document();
        doc.find_all(doc.root(), |el| el.has_class("modal-backdrop")).len()
    }

    #[test]
    fn open_and_close() {
        let mut page = setup();
        page.click(by_id(&page, "open-a"));
        let modal = by_id(&page, "modal-a");
        assert!(page.document().has_class(modal, "show"));
        assert_eq!(page.document().style_property(modal, "display").as_deref(), Some("block"));
        assert_has_class(&page, "body", "modal-open");
        assert_eq!(backdrops(&page), 1);

        page.click(by_id(&page, "close-a"));
        assert!(!page.document().has_class(modal, "show"));
        assert_eq!(page.document().style_property(modal, "display").as_deref(), Some("none"));
        assert_lacks_class(&page, "body", "modal-open");
        assert_eq!(backdrops(&page), 0);
    }

    #[test]
    fn closing_one_of_two_open_modals_clears_body_marker() {
        let mut page = setup();
        page.click(by_id(&page, "open-a"));
        page.click(by_id(&page, "open-b"));
        assert_eq!(backdrops(&page), 2);

        page.click(by_id(&page, "close-b"));
        assert!(page.document().has_class(by_id(&page, "modal-a"), "show"));
        assert_lacks_class(&page, "body", "modal-open");
        assert_eq!(backdrops(&page), 1);
    }

    #[test]
    fn unresolvable_target_is_ignored() {
        let mut page = setup();
        page.click(by_id(&page, "open-bad"));
        assert_eq!(backdrops(&page), 0);
        assert!(page.followed_links().is_empty());
    }

    #[test]
    fn repeated_init_adds_one_backdrop_per_open() {
        let mut page = page_from(PAGE);
        let mut state = ControllerState::default();
        init(&mut page, &mut state);
        let count = page.listener_count();
        init(&mut page, &mut state);
        assert_eq!(page.listener_count(), count);

        page.click(by_id(&page, "open-a"));
        assert_eq!(backdrops(&page), 1);
    }
}
