//! Class names and attributes the behaviors read from and write to the page.

// Navigation
pub const NAV_TOGGLE_CLASSES: &[&str] = &["c-nav__toggle", "navbar-toggler"];
pub const NAV_COLLAPSE: &str = "navbar-collapse";
pub const NAV_LINK: &str = "nav-link";
pub const NO_SCROLL: &str = "u-no-scroll";
pub const HEADER: &str = "l-header";

// Shared state classes
pub const SHOW: &str = "show";
pub const ACTIVE: &str = "active";
pub const IS_ACTIVE: &str = "is-active";
pub const VISIBLE: &str = "visible";

// Images
pub const LOGO_IMAGE: &str = "c-logo__img";
pub const DATA_CRITICAL: &str = "data-critical";
/// Inline SVG shown in place of an image that failed to load.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 400 300\"%3E%3Crect width=\"400\" height=\"300\" fill=\"%23e9ecef\"/%3E%3Ctext x=\"50%25\" y=\"50%25\" dominant-baseline=\"middle\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"18\" fill=\"%236c757d\"%3EImage%3C/text%3E%3C/svg%3E";

// Forms
pub const FORM_CLASSES: &[&str] = &["needs-validation", "c-form"];
pub const FIELD_TAGS: &[&str] = &["input", "textarea", "select"];
pub const IS_INVALID: &str = "is-invalid";
pub const INVALID_FEEDBACK: &str = "invalid-feedback";
pub const SPINNER_CLASS: &str = "spinner-border spinner-border-sm me-2";

// Toasts
pub const TOAST_CONTAINER_ID: &str = "toast-container";
pub const TOAST_CONTAINER_STYLE: &str =
    "position:fixed;top:20px;right:20px;z-index:9999;min-width:250px;max-width:350px;";
pub const TOAST_STYLE: &str = "margin-bottom:10px;box-shadow:0 4px 6px rgba(0,0,0,0.1);";
pub const TOAST_CLOSE: &str = "btn-close";

// Scroll-to-top
pub const DATA_SCROLL_TOP: &str = "data-scroll-top";
pub const SCROLL_TOP_CLASS: &str = "scroll-to-top";

// Modals
pub const DATA_TOGGLE: &str = "data-bs-toggle";
pub const DATA_DISMISS: &str = "data-bs-dismiss";
pub const DATA_TARGET: &str = "data-bs-target";
pub const MODAL: &str = "modal";
pub const MODAL_OPEN: &str = "modal-open";
pub const MODAL_BACKDROP: &str = "modal-backdrop";

// Accordions
pub const ACCORDION_BUTTON: &str = "accordion-button";

// Filter
pub const DATA_FILTER: &str = "data-filter";
pub const DATA_CATEGORY: &str = "data-category";
pub const FILTER_ALL: &str = "all";

// Counters
pub const DATA_COUNT: &str = "data-count";
pub const COUNTED: &str = "counted";

// ARIA
pub const ARIA_EXPANDED: &str = "aria-expanded";
pub const ARIA_CURRENT: &str = "aria-current";
pub const ARIA_CONTROLS: &str = "aria-controls";
