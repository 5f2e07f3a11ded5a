//! Events, event targets, and the listener store.
//!
//! Dispatch itself lives on [`Page`](crate::page::Page) because handlers need
//! mutable access to the whole page. This module only describes events and
//! keeps track of who listens to what.

use crate::dom::NodeId;
use crate::page::Page;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Event types the page host can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    DomContentLoaded,
    Click,
    KeyDown,
    Blur,
    Submit,
    Scroll,
    Resize,
    /// Resource load failure (images).
    Error,
}

impl EventType {
    /// Whether the event propagates from the target up to the window.
    pub fn bubbles(self) -> bool {
        matches!(self, Self::Click | Self::KeyDown | Self::Submit)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::Blur => "blur",
            Self::Submit => "submit",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a listener is attached. The document is the arena root node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Node(NodeId),
}

/// One event travelling through the propagation path.
#[derive(Debug, Clone)]
pub struct Event {
    event_type: EventType,
    target: EventTarget,
    current_target: EventTarget,
    key: Option<String>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub fn new(event_type: EventType, target: EventTarget) -> Self {
        Self {
            event_type,
            target,
            current_target: target,
            key: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// A keyboard event carrying `key` (`"Escape"`, `"Enter"`, ...).
    pub fn key_down(target: EventTarget, key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            ..Self::new(EventType::KeyDown, target)
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn target(&self) -> EventTarget {
        self.target
    }

    /// The target node, if the event was not dispatched on the window.
    pub fn target_node(&self) -> Option<NodeId> {
        match self.target {
            EventTarget::Node(node) => Some(node),
            EventTarget::Window => None,
        }
    }

    pub fn current_target(&self) -> EventTarget {
        self.current_target
    }

    pub(crate) fn set_current_target(&mut self, target: EventTarget) {
        self.current_target = target;
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// A registered event handler.
pub type Handler = Rc<dyn Fn(&mut Page, &mut Event)>;

/// Listeners keyed by target and event type, in registration order.
#[derive(Default)]
pub(crate) struct ListenerStore {
    map: HashMap<(EventTarget, EventType), Vec<Handler>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, target: EventTarget, event_type: EventType, handler: Handler) {
        self.map.entry((target, event_type)).or_default().push(handler);
    }

    /// Snapshot of the handlers for one target, so handlers may register
    /// further listeners while the event is being delivered.
    pub(crate) fn get(&self, target: EventTarget, event_type: EventType) -> Vec<Handler> {
        self.map
            .get(&(target, event_type))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn count(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    pub(crate) fn count_for(&self, target: EventTarget, event_type: EventType) -> usize {
        self.map.get(&(target, event_type)).map_or(0, Vec::len)
    }

    /// Drop every listener registered on `target`. Returns how many went.
    pub(crate) fn remove_target(&mut self, target: EventTarget) -> usize {
        let before = self.count();
        self.map.retain(|(t, _), _| *t != target);
        before - self.count()
    }
}

impl fmt::Debug for ListenerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerStore")
            .field("targets", &self.map.len())
            .field("listeners", &self.count())
            .finish()
    }
}
