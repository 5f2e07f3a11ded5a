//! # Page Behaviors
//!
//! A page-behavior controller for marketing sites, plus the headless page host
//! it runs on. The behaviors wire interactive affordances onto server-rendered
//! markup: a collapsible navigation menu, smooth in-page scrolling,
//! scroll-synchronized nav highlighting, image fallbacks, client-side form
//! validation with a simulated submission, modals, accordions, a category
//! filter, animated counters and a scroll-to-top button.
//!
//! # Architecture: Host, Behaviors, Scenarios
//!
//! ```text
//! 1. Host        HTML  →  Page           (DOM arena, events, timers, window)
//! 2. Behaviors   Page  →  Page + state   (listeners and per-module records)
//! 3. Scenarios   TOML  →  report         (actions, expectations, digest)
//! ```
//!
//! The behaviors only ever talk to a [`page::Page`]. They attach listeners,
//! schedule timers and mutate classes and attributes, the way a script in a
//! browser tab would. Tests and the scenario runner drive the same page from
//! the other side: they click, type, scroll, and advance a virtual clock.
//! Nothing depends on wall-clock time, so every run is reproducible.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | Node arena, HTML parsing (html5ever), a small selector engine |
//! | [`render`] | Serializes the arena back to HTML with maud |
//! | [`event`] | Event types, propagation flags, listener storage |
//! | [`scheduler`] | Virtual clock, timers and animation frames |
//! | [`page`] | The host: document, window state, dispatch, intersection tracking |
//! | [`rate_limit`] | Debounce and throttle wrappers over page timers |
//! | [`behaviors`] | One module per interactive affordance |
//! | [`controller`] | Initializes every behavior exactly once |
//! | [`config`] | `behaviors.toml` loading, merging over stock defaults, validation |
//! | [`scenario`] | Scenario file format and runner |
//! | [`check`] | Parallel scenario runs compared with the snapshot manifest |
//! | [`snapshot`] | Digest manifest for behavior regressions |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Idempotent Initialization
//!
//! Every behavior's `init` claims a flag in
//! [`controller::ControllerState`] before doing anything, so running the
//! orchestrator twice (or a module directly and then through the
//! orchestrator) never attaches a listener twice. Missing markup makes a
//! module inert rather than an error: a page without a filter bar simply has
//! no filter.
//!
//! ## Module-Local State
//!
//! There is no shared store. Each module keeps what it needs in the closures
//! it registers (`Rc`/`RefCell`/`Cell`, since a page is single-threaded), and
//! the document itself carries the visible state: a menu is open because its
//! panel has `show`, not because a flag says so.
//!
//! ## Layout Is Data
//!
//! There is no layout engine. Element geometry and visibility are supplied by
//! the caller (a scenario's `[layout]` table, or a test), which keeps scroll
//! offsets and intersection triggers exact and easy to reason about.

pub mod behaviors;
pub mod check;
pub mod config;
pub mod controller;
pub mod dom;
pub mod event;
pub mod logging;
pub mod output;
pub mod page;
pub mod rate_limit;
pub mod render;
pub mod scenario;
pub mod scheduler;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod test_helpers;
