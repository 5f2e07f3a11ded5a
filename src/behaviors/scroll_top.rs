//! "Back to top" button, shown once the page is scrolled past a threshold.

use super::markup::{DATA_SCROLL_TOP, SCROLL_TOP_CLASS, VISIBLE};
use crate::config::ScrollingConfig;
use crate::controller::{ControllerState, claim};
use crate::dom::NodeId;
use crate::event::{EventTarget, EventType};
use crate::page::{Page, ScrollBehavior};
use crate::rate_limit::throttle;

fn sync_visibility(page: &mut Page, button: NodeId, threshold: f64) {
    if page.window().scroll_y > threshold {
        page.document_mut().add_class(button, VISIBLE);
    } else {
        page.document_mut().remove_class(button, VISIBLE);
    }
}

pub fn init(page: &mut Page, state: &mut ControllerState, config: &ScrollingConfig) {
    if !claim(&mut state.scroll_to_top) {
        return;
    }
    let doc = page.document();
    let Some(button) = doc.find_first(doc.root(), |el| {
        el.has_attr(DATA_SCROLL_TOP) || el.has_class(SCROLL_TOP_CLASS)
    }) else {
        tracing::debug!("scroll to top: no button, skipping");
        return;
    };

    page.add_listener(EventTarget::Node(button), EventType::Click, |page, event| {
        event.prevent_default();
        page.scroll_to(0.0, ScrollBehavior::Smooth);
    });

    let threshold = config.scroll_top_threshold;
    let on_scroll = throttle(config.scroll_top_throttle_ms, move |page: &mut Page, ()| {
        sync_visibility(page, button, threshold)
    });
    page.add_listener(EventTarget::Window, EventType::Scroll, move |page, _| {
        on_scroll.call(page, ());
    });
    sync_visibility(page, button, threshold);
}
