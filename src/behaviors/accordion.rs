//! Independent expand/collapse panels.

use super::markup::{ACCORDION_BUTTON, ARIA_CONTROLS, ARIA_EXPANDED, DATA_TARGET, SHOW};
use crate::controller::{ControllerState, claim};
use crate::dom::NodeId;
use crate::event::{EventTarget, EventType};
use crate::page::Page;

/// Panel id referenced by a trigger, with any leading `#` removed.
fn panel_ref(page: &Page, trigger: NodeId) -> Option<String> {
    let doc = page.document();
    let raw = doc
        .attr(trigger, DATA_TARGET)
        .filter(|r| !r.is_empty())
        .or_else(|| doc.attr(trigger, ARIA_CONTROLS))?;
    Some(raw.strip_prefix('#').unwrap_or(raw).to_string())
}

fn toggle(page: &mut Page, trigger: NodeId) {
    let Some(id) = panel_ref(page, trigger) else {
        return;
    };
    let Some(panel) = page.document().element_by_id(&id) else {
        return;
    };
    let doc = page.document_mut();
    if doc.attr(trigger, ARIA_EXPANDED) == Some("true") {
        doc.set_attr(trigger, ARIA_EXPANDED, "false");
        doc.remove_class(panel, SHOW);
    } else {
        doc.set_attr(trigger, ARIA_EXPANDED, "true");
        doc.add_class(panel, SHOW);
    }
}

pub fn init(page: &mut Page, state: &mut ControllerState) {
    if !claim(&mut state.accordions) {
        return;
    }
    let doc = page.document();
    for trigger in doc.find_all(doc.root(), |el| el.has_class(ACCORDION_BUTTON)) {
        page.add_listener(EventTarget::Node(trigger), EventType::Click, move |page, _| {
            toggle(page, trigger);
        });
    }
}
