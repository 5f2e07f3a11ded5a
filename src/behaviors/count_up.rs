//! Animated statistic counters.
//!
//! A `[data-count]` element counts from zero to its target the first time at
//! least half of it becomes visible. Each animation frame adds a fixed
//! increment and renders the floored value; the final frame renders the
//! exact target and marks the element `counted`, which stops it from ever
//! animating again.

use super::markup::{COUNTED, DATA_COUNT};
use crate::config::CounterConfig;
use crate::controller::{ControllerState, claim};
use crate::dom::NodeId;
use crate::page::Page;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Leading integer of a `data-count` value (`"120+"` → 120).
pub fn parse_target(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let digits_start = usize::from(trimmed.starts_with(['-', '+']));
    let end = trimmed[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed.len(), |i| i + digits_start);
    if end == digits_start {
        return None;
    }
    trimmed[..end].parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CounterProgress {
    current: f64,
    target: i64,
    increment: f64,
}

#[derive(Default)]
struct Counters {
    running: RefCell<HashMap<NodeId, CounterProgress>>,
}

impl Counters {
    fn start(self: &Rc<Self>, page: &mut Page, node: NodeId, config: &CounterConfig) {
        if page.document().has_class(node, COUNTED) || self.running.borrow().contains_key(&node) {
            return;
        }
        let Some(target) = page.document().attr(node, DATA_COUNT).and_then(parse_target) else {
            tracing::debug!(%node, "count up: data-count is not an integer");
            return;
        };
        let frames = config.duration_ms as f64 / config.frame_ms as f64;
        self.running.borrow_mut().insert(
            node,
            CounterProgress {
                current: 0.0,
                target,
                increment: target as f64 / frames,
            },
        );
        self.step(page, node);
    }

    fn step(self: &Rc<Self>, page: &mut Page, node: NodeId) {
        let progress = {
            let mut running = self.running.borrow_mut();
            let Some(progress) = running.get_mut(&node) else {
                return;
            };
            progress.current += progress.increment;
            *progress
        };
        let doc = page.document_mut();
        if progress.current < progress.target as f64 {
            doc.set_text_content(node, &progress.current.floor().to_string());
            let counters = Rc::clone(self);
            page.request_animation_frame(move |page| counters.step(page, node));
        } else {
            doc.set_text_content(node, &progress.target.to_string());
            doc.add_class(node, COUNTED);
            self.running.borrow_mut().remove(&node);
        }
    }
}

pub fn init(page: &mut Page, state: &mut ControllerState, config: &CounterConfig) {
    if !claim(&mut state.count_up) {
        return;
    }
    let doc = page.document();
    let stats = doc.find_all(doc.root(), |el| el.has_attr(DATA_COUNT));
    if stats.is_empty() {
        tracing::debug!("count up: no counters, skipping");
        return;
    }

    let counters = Rc::new(Counters::default());
    let frame_config = config.clone();
    let observer = page.create_observer(config.threshold, move |page, entries| {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            counters.start(page, entry.target, &frame_config);
        }
    });
    for node in stats {
        page.observe(observer, node);
    }
}
