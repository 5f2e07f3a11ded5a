//! Scroll-synchronized highlighting of in-page navigation links.
//!
//! Each `.nav-link` pointing at `#section` is paired with the section it
//! references. On scroll, the last section whose top is at or above the
//! scroll offset (plus a fixed look-ahead) wins: every link loses `active`
//! and `aria-current`, and the winner gains both. When no section qualifies
//! the current marking is left alone.

use super::markup::{ACTIVE, ARIA_CURRENT, NAV_LINK};
use crate::config::ScrollingConfig;
use crate::controller::{ControllerState, claim};
use crate::dom::{NodeId, Selector};
use crate::event::{EventTarget, EventType};
use crate::page::Page;
use crate::rate_limit::throttle;
use std::rc::Rc;

/// Index of the section to highlight: the last one whose top is at or above
/// `scroll_pos`.
pub fn active_section(tops: &[f64], scroll_pos: f64) -> Option<usize> {
    tops.iter().rposition(|top| *top <= scroll_pos)
}

#[derive(Debug, Clone, Copy)]
struct Pairing {
    link: NodeId,
    section: NodeId,
}

struct Spy {
    links: Vec<NodeId>,
    pairs: Vec<Pairing>,
    offset: f64,
}

impl Spy {
    fn update(&self, page: &mut Page) {
        let scroll_pos = page.window().scroll_y + self.offset;
        let tops: Vec<f64> = self
            .pairs
            .iter()
            .map(|p| page.document().geometry(p.section).top)
            .collect();
        let Some(index) = active_section(&tops, scroll_pos) else {
            return;
        };
        let doc = page.document_mut();
        for link in &self.links {
            doc.remove_class(*link, ACTIVE);
            doc.remove_attr(*link, ARIA_CURRENT);
        }
        let winner = self.pairs[index].link;
        doc.add_class(winner, ACTIVE);
        doc.set_attr(winner, ARIA_CURRENT, "page");
    }
}

fn build_pairs(page: &Page, links: &[NodeId]) -> Vec<Pairing> {
    let doc = page.document();
    links
        .iter()
        .filter_map(|&link| {
            let href = doc.attr(link, "href")?;
            if href.len() <= 1 {
                return None;
            }
            let selector = Selector::parse(href).ok()?;
            let section = doc.select_first(doc.root(), &selector)?;
            Some(Pairing { link, section })
        })
        .collect()
}

pub fn init(page: &mut Page, state: &mut ControllerState, config: &ScrollingConfig) {
    if !claim(&mut state.scroll_spy) {
        return;
    }
    let doc = page.document();
    let links = doc.find_all(doc.root(), |el| {
        el.has_class(NAV_LINK) && el.attr("href").is_some_and(|h| h.starts_with('#'))
    });
    if links.is_empty() {
        tracing::debug!("scroll spy: no in-page nav links, skipping");
        return;
    }
    let pairs = build_pairs(page, &links);
    if pairs.is_empty() {
        tracing::debug!("scroll spy: no nav link resolves to a section, skipping");
        return;
    }

    let spy = Rc::new(Spy {
        links,
        pairs,
        offset: config.spy_offset,
    });
    let on_scroll = {
        let spy = Rc::clone(&spy);
        throttle(config.spy_throttle_ms, move |page: &mut Page, ()| spy.update(page))
    };
    page.add_listener(EventTarget::Window, EventType::Scroll, move |page, _| {
        on_scroll.call(page, ());
    });
    spy.update(page);
}
