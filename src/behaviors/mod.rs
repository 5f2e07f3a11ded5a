//! Behavior modules.
//!
//! Each module wires one interactive affordance onto server-rendered markup.
//! Every `init` claims its flag in the [`ControllerState`](crate::controller::ControllerState)
//! first, so calling it again is a no-op, and then looks for its anchors.
//! Missing markup leaves the module inert; nothing here returns an error.
//!
//! | Module | Anchors | Owns |
//! |--------|---------|------|
//! | [`nav_toggle`] | `.navbar-toggler`, `.navbar-collapse` | menu open/closed |
//! | [`smooth_scroll`] | `a[href^="#"]` (delegated) | nothing |
//! | [`scroll_spy`] | `.nav-link[href^="#"]` | link/section pairs |
//! | [`active_link`] | `.nav-link` | nothing (one pass) |
//! | [`images`] | `img` | nothing |
//! | [`forms`] | `.needs-validation`, `.c-form` | field feedback, busy button |
//! | [`scroll_top`] | `[data-scroll-top]`, `.scroll-to-top` | nothing |
//! | [`modal`] | `[data-bs-toggle="modal"]` | nothing |
//! | [`accordion`] | `.accordion-button` | nothing |
//! | [`filter`] | `[data-filter]`, `[data-category]` | active key |
//! | [`count_up`] | `[data-count]` | counter progress |

pub mod accordion;
pub mod active_link;
pub mod count_up;
pub mod filter;
pub mod forms;
pub mod images;
pub mod markup;
pub mod modal;
pub mod nav_toggle;
pub mod scroll_spy;
pub mod scroll_top;
pub mod smooth_scroll;
pub mod submit;
pub mod toast;
