//! The page host: document, window state, listeners, timers, and
//! intersection tracking.
//!
//! [`Page`] plays the role a browser tab plays for client-side scripts. The
//! behavior modules only ever talk to a `Page`: they read geometry and window
//! state, attach listeners, schedule timers, and mutate the document. Tests
//! and the scenario runner drive it from the other side through the user
//! entry points ([`Page::click`], [`Page::press_key`], [`Page::scroll_to`],
//! [`Page::advance`], ...).
//!
//! ## Event Dispatch
//!
//! Bubbling events visit the target, each ancestor up to the document node,
//! then the window. Non-bubbling events visit only the target. Listeners on
//! one target run in registration order.
//!
//! ## Default Actions
//!
//! After a click that no listener prevented, the host performs the browser's
//! default action:
//!
//! - checkbox and radio inputs keep the toggle they got before listeners ran;
//!   a prevented click restores the previous state
//! - a submit button inside a form submits the form
//! - a link is recorded as followed ([`Page::followed_links`])
//!
//! An un-prevented `submit` is recorded as a native form submission.
//!
//! ## Intersection Tracking
//!
//! There is no layout, so visibility is whatever the host says it is
//! ([`Page::set_visible_ratio`]). Observers are notified synchronously when a
//! node's intersecting state changes, and once with the current state when a
//! node is first observed.

use crate::dom::{Document, NodeId, ParseError};
use crate::event::{Event, EventTarget, EventType, Handler, ListenerStore};
use crate::scheduler::{DEFAULT_STEP_LIMIT, FRAME_INTERVAL_MS, Scheduler, TimerId};
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("timer step limit of {limit} exceeded at {now_ms} ms")]
    StepLimit { limit: usize, now_ms: u64 },
}

/// Document loading state as scripts observe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// One programmatic scroll, as requested by a behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRecord {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    /// Fragment including the leading `#`, or empty.
    pub hash: String,
}

impl Location {
    fn apply(&mut self, url: &str) {
        let (path, hash) = match url.find('#') {
            Some(i) => (&url[..i], &url[i..]),
            None => (url, ""),
        };
        if !path.is_empty() {
            self.pathname = path.to_string();
        }
        self.hash = hash.to_string();
    }
}

/// Window-level state: viewport, scroll position, location, history.
#[derive(Debug, Clone)]
pub struct Window {
    pub inner_width: u32,
    pub scroll_y: f64,
    pub smooth_scroll_supported: bool,
    pub location: Location,
    /// URLs pushed with `history.pushState`, oldest first.
    pub history: Vec<String>,
    /// Full navigations (`location.href = ...`), oldest first.
    pub navigations: Vec<String>,
    pub scrolls: Vec<ScrollRecord>,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            inner_width: 1280,
            scroll_y: 0.0,
            smooth_scroll_supported: true,
            location: Location {
                pathname: "/".to_string(),
                hash: String::new(),
            },
            history: Vec::new(),
            navigations: Vec::new(),
            scrolls: Vec::new(),
        }
    }
}

/// One observed node's visibility, as delivered to an observer callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub ratio: f64,
    pub is_intersecting: bool,
}

pub type IntersectionCallback = Rc<dyn Fn(&mut Page, &[IntersectionEntry])>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

struct Observer {
    threshold: f64,
    /// Observed nodes with their last delivered intersecting state.
    targets: Vec<(NodeId, bool)>,
    callback: IntersectionCallback,
}

fn intersects(ratio: f64, threshold: f64) -> bool {
    ratio > 0.0 && ratio >= threshold
}

pub struct Page {
    document: Document,
    window: Window,
    listeners: ListenerStore,
    scheduler: Scheduler,
    observers: Vec<Observer>,
    visibility: Vec<(NodeId, f64)>,
    ready_state: ReadyState,
    focused: Option<NodeId>,
    followed_links: Vec<String>,
    native_submissions: Vec<NodeId>,
    step_limit: usize,
}

impl Page {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            window: Window::default(),
            listeners: ListenerStore::default(),
            scheduler: Scheduler::new(),
            observers: Vec::new(),
            visibility: Vec::new(),
            ready_state: ReadyState::Complete,
            focused: None,
            followed_links: Vec::new(),
            native_submissions: Vec::new(),
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    pub fn from_html(html: &str) -> Result<Self, ParseError> {
        Ok(Self::new(Document::parse_html(html)?))
    }

    #[must_use]
    pub fn with_path(mut self, path: &str) -> Self {
        self.window.location.apply(path);
        self
    }

    #[must_use]
    pub fn with_viewport_width(mut self, width: u32) -> Self {
        self.window.inner_width = width;
        self
    }

    #[must_use]
    pub fn with_smooth_scroll(mut self, supported: bool) -> Self {
        self.window.smooth_scroll_supported = supported;
        self
    }

    #[must_use]
    pub fn with_ready_state(mut self, ready_state: ReadyState) -> Self {
        self.ready_state = ready_state;
        self
    }

    #[must_use]
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = limit;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn location(&self) -> &Location {
        &self.window.location
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn followed_links(&self) -> &[String] {
        &self.followed_links
    }

    pub fn native_submissions(&self) -> &[NodeId] {
        &self.native_submissions
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Total registered listeners across all targets.
    pub fn listener_count(&self) -> usize {
        self.listeners.count()
    }

    pub fn listener_count_for(&self, target: EventTarget, event_type: EventType) -> usize {
        self.listeners.count_for(target, event_type)
    }

    /// Remove every listener on `target`, as dropping a detached node does.
    pub fn remove_listeners(&mut self, target: EventTarget) -> usize {
        self.listeners.remove_target(target)
    }

    /// The document node as an event target.
    pub fn document_target(&self) -> EventTarget {
        EventTarget::Node(self.document.root())
    }

    // ------------------------------------------------------------------
    // Listeners and dispatch
    // ------------------------------------------------------------------

    pub fn add_listener(
        &mut self,
        target: EventTarget,
        event_type: EventType,
        handler: impl Fn(&mut Page, &mut Event) + 'static,
    ) {
        let handler: Handler = Rc::new(handler);
        self.listeners.add(target, event_type, handler);
    }

    /// Deliver `event` along its propagation path and return it, so callers
    /// can inspect `default_prevented`.
    pub fn dispatch(&mut self, mut event: Event) -> Event {
        let path = self.propagation_path(event.target(), event.event_type());
        tracing::trace!(event = %event.event_type(), hops = path.len(), "dispatch");
        for current in path {
            event.set_current_target(current);
            for handler in self.listeners.get(current, event.event_type()) {
                handler(self, &mut event);
            }
            if event.propagation_stopped() {
                break;
            }
        }
        event
    }

    fn propagation_path(&self, target: EventTarget, event_type: EventType) -> Vec<EventTarget> {
        let EventTarget::Node(node) = target else {
            return vec![EventTarget::Window];
        };
        if !event_type.bubbles() {
            return vec![target];
        }
        let mut path: Vec<EventTarget> = self
            .document
            .ancestors(node)
            .map(EventTarget::Node)
            .collect();
        if self.document.is_connected(node) {
            path.push(EventTarget::Window);
        }
        path
    }

    // ------------------------------------------------------------------
    // User entry points
    // ------------------------------------------------------------------

    /// Click `node`, then run the browser's default action unless a listener
    /// prevented it.
    pub fn click(&mut self, node: NodeId) {
        let Some(element) = self.document.element(node) else {
            return;
        };
        if element.disabled() && (element.is("button") || element.is("input")) {
            return;
        }
        let mut previous_checked = None;
        if element.is("input") && matches!(element.control_type().as_str(), "checkbox" | "radio")
        {
            let was_checked = element.checked();
            let toggled = element.control_type() == "radio" || !was_checked;
            self.document.set_checked(node, toggled);
            previous_checked = Some(was_checked);
        }

        let event = self.dispatch(Event::new(EventType::Click, EventTarget::Node(node)));
        if event.default_prevented() {
            if let Some(was_checked) = previous_checked {
                self.document.set_checked(node, was_checked);
            }
            return;
        }

        if let Some(link) = self.document.closest(node, |el| el.is("a") && el.has_attr("href")) {
            if let Some(href) = self.document.attr(link, "href") {
                self.followed_links.push(href.to_string());
            }
            return;
        }
        let submitter = self.document.closest(node, |el| {
            (el.is("button") || el.is("input")) && el.control_type() == "submit"
        });
        if let Some(submitter) = submitter
            && let Some(form) = self.document.closest(submitter, |el| el.is("form"))
        {
            self.submit(form);
        }
    }

    /// Dispatch `submit` on a form; record a native submission if nothing
    /// prevented it.
    pub fn submit(&mut self, form: NodeId) {
        let event = self.dispatch(Event::new(EventType::Submit, EventTarget::Node(form)));
        if !event.default_prevented() {
            self.native_submissions.push(form);
        }
    }

    /// Key press delivered to the focused element, else the body.
    pub fn press_key(&mut self, key: &str) {
        let target = self
            .focused
            .filter(|n| self.document.is_connected(*n))
            .or_else(|| self.document.body())
            .unwrap_or_else(|| self.document.root());
        self.dispatch(Event::key_down(EventTarget::Node(target), key));
    }

    /// Move focus to `node`, blurring whatever had it.
    pub fn focus(&mut self, node: NodeId) {
        if self.focused == Some(node) {
            return;
        }
        if let Some(previous) = self.focused.take() {
            self.dispatch(Event::new(EventType::Blur, EventTarget::Node(previous)));
        }
        self.focused = Some(node);
    }

    /// Dispatch `blur` on `node`, dropping focus if it held it.
    pub fn blur(&mut self, node: NodeId) {
        if self.focused == Some(node) {
            self.focused = None;
        }
        self.dispatch(Event::new(EventType::Blur, EventTarget::Node(node)));
    }

    /// Focus a control and replace its value, as typing would.
    pub fn type_text(&mut self, node: NodeId, text: &str) {
        self.focus(node);
        self.document.set_value(node, text);
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        self.document.set_value(node, value);
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        self.document.set_checked(node, checked);
    }

    /// `window.scrollTo`: clamp, record, and fire `scroll`.
    pub fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let top = top.max(0.0);
        self.window.scroll_y = top;
        self.window.scrolls.push(ScrollRecord { top, behavior });
        self.dispatch(Event::new(EventType::Scroll, EventTarget::Window));
    }

    /// Change the viewport width and fire `resize`.
    pub fn resize(&mut self, width: u32) {
        self.window.inner_width = width;
        self.dispatch(Event::new(EventType::Resize, EventTarget::Window));
    }

    /// Report that an image failed to load.
    pub fn fail_image_load(&mut self, img: NodeId) {
        self.dispatch(Event::new(EventType::Error, EventTarget::Node(img)));
    }

    /// Mark the document parsed and fire `DOMContentLoaded`.
    pub fn finish_loading(&mut self) {
        if self.ready_state == ReadyState::Complete {
            return;
        }
        self.ready_state = ReadyState::Complete;
        let target = self.document_target();
        self.dispatch(Event::new(EventType::DomContentLoaded, target));
    }

    /// `history.pushState(null, null, url)`: no navigation, no reload.
    pub fn push_state(&mut self, url: &str) {
        self.window.history.push(url.to_string());
        self.window.location.apply(url);
    }

    /// `location.href = url`.
    pub fn navigate(&mut self, url: &str) {
        tracing::debug!(url, "navigate");
        self.window.navigations.push(url.to_string());
        self.window.location.apply(url);
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    pub fn set_timeout(&mut self, delay_ms: u64, task: impl FnOnce(&mut Page) + 'static) -> TimerId {
        self.scheduler.schedule(delay_ms, Box::new(task))
    }

    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.scheduler.cancel(id)
    }

    /// Run `task` on the next animation frame.
    pub fn request_animation_frame(&mut self, task: impl FnOnce(&mut Page) + 'static) -> TimerId {
        self.scheduler.schedule(FRAME_INTERVAL_MS, Box::new(task))
    }

    /// Advance the clock by `delta_ms`, running every task that falls due.
    /// Returns the number of tasks run.
    pub fn advance(&mut self, delta_ms: u64) -> Result<usize, PageError> {
        let target = self.scheduler.now().saturating_add(delta_ms);
        let ran = self.run_tasks(Some(target))?;
        self.scheduler.set_now(target);
        Ok(ran)
    }

    /// Run tasks until the queue is empty, jumping the clock as needed.
    pub fn run_until_idle(&mut self) -> Result<usize, PageError> {
        self.run_tasks(None)
    }

    fn run_tasks(&mut self, limit: Option<u64>) -> Result<usize, PageError> {
        let mut steps = 0usize;
        while let Some((due_at, task)) = self.scheduler.pop_due(limit) {
            steps += 1;
            if steps > self.step_limit {
                return Err(PageError::StepLimit {
                    limit: self.step_limit,
                    now_ms: self.scheduler.now(),
                });
            }
            self.scheduler.set_now(due_at);
            task(self);
        }
        Ok(steps)
    }

    // ------------------------------------------------------------------
    // Intersection tracking
    // ------------------------------------------------------------------

    pub fn create_observer(
        &mut self,
        threshold: f64,
        callback: impl Fn(&mut Page, &[IntersectionEntry]) + 'static,
    ) -> ObserverId {
        let id = ObserverId(self.observers.len());
        self.observers.push(Observer {
            threshold,
            targets: Vec::new(),
            callback: Rc::new(callback),
        });
        id
    }

    /// Start observing `node`; the callback receives one entry with the
    /// node's current state.
    pub fn observe(&mut self, observer: ObserverId, node: NodeId) {
        let ratio = self.visible_ratio(node);
        let Some(obs) = self.observers.get_mut(observer.0) else {
            return;
        };
        if obs.targets.iter().any(|(n, _)| *n == node) {
            return;
        }
        let is_intersecting = intersects(ratio, obs.threshold);
        obs.targets.push((node, is_intersecting));
        let callback = Rc::clone(&obs.callback);
        callback(
            self,
            &[IntersectionEntry {
                target: node,
                ratio,
                is_intersecting,
            }],
        );
    }

    pub fn visible_ratio(&self, node: NodeId) -> f64 {
        self.visibility
            .iter()
            .find(|(n, _)| *n == node)
            .map_or(0.0, |(_, r)| *r)
    }

    /// Set how much of `node` is inside the viewport (0.0–1.0) and notify
    /// observers whose intersecting state for it changed.
    pub fn set_visible_ratio(&mut self, node: NodeId, ratio: f64) {
        let ratio = ratio.clamp(0.0, 1.0);
        match self.visibility.iter_mut().find(|(n, _)| *n == node) {
            Some((_, r)) => *r = ratio,
            None => self.visibility.push((node, ratio)),
        }

        let mut deliveries = Vec::new();
        for obs in &mut self.observers {
            let threshold = obs.threshold;
            if let Some((_, state)) = obs.targets.iter_mut().find(|(n, _)| *n == node) {
                let now = intersects(ratio, threshold);
                if now != *state {
                    *state = now;
                    deliveries.push((
                        Rc::clone(&obs.callback),
                        IntersectionEntry {
                            target: node,
                            ratio,
                            is_intersecting: now,
                        },
                    ));
                }
            }
        }
        for (callback, entry) in deliveries {
            callback(self, &[entry]);
        }
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("location", &self.window.location)
            .field("ready_state", &self.ready_state)
            .field("listeners", &self.listeners)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}
