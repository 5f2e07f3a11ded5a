//! In-page anchor scrolling with a fixed-header offset.

use super::markup::HEADER;
use crate::config::ScrollingConfig;
use crate::controller::{ControllerState, claim};
use crate::dom::NodeId;
use crate::event::EventType;
use crate::page::{Page, ScrollBehavior};

/// Height of the first `.l-header`, or `fallback` when there is none.
pub fn header_height(page: &Page, fallback: f64) -> f64 {
    let doc = page.document();
    doc.find_first(doc.root(), |el| el.has_class(HEADER))
        .map_or(fallback, |header| doc.geometry(header).height)
}

/// Element an in-page `href` points at (`#id`, non-empty id).
pub fn anchor_target(page: &Page, href: &str) -> Option<NodeId> {
    let id = href.strip_prefix('#')?;
    page.document().element_by_id(id)
}

/// Scroll so `section` sits just below the header.
pub fn scroll_to_section(page: &mut Page, section: NodeId, header_fallback: f64) {
    let top = page.document().geometry(section).top - header_height(page, header_fallback);
    let behavior = if page.window().smooth_scroll_supported {
        ScrollBehavior::Smooth
    } else {
        ScrollBehavior::Instant
    };
    page.scroll_to(top, behavior);
}

pub fn init(page: &mut Page, state: &mut ControllerState, config: &ScrollingConfig) {
    if !claim(&mut state.smooth_scroll) {
        return;
    }
    let fallback = config.header_fallback_height;
    let document = page.document_target();
    page.add_listener(document, EventType::Click, move |page, event| {
        let Some(target) = event.target_node() else {
            return;
        };
        let Some(link) = page.document().closest(target, |el| el.is("a")) else {
            return;
        };
        let Some(href) = page.document().attr(link, "href").map(str::to_string) else {
            return;
        };
        let Some(section) = anchor_target(page, &href) else {
            return;
        };
        event.prevent_default();
        scroll_to_section(page, section, fallback);
        page.push_state(&href);
    });
}
