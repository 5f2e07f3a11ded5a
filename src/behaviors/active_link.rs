//! Marks the nav link for the current page.

use super::markup::{ACTIVE, ARIA_CURRENT, NAV_LINK};
use crate::controller::{ControllerState, claim};
use crate::page::Page;

fn is_home(path: &str) -> bool {
    path == "/" || path == "/index.html"
}

/// Whether a nav link `href` refers to the page at `current_path`.
///
/// Home links match `/`, `/index.html`, and any path ending in
/// `/index.html`. Other root-relative links match by equality or suffix.
/// Anything else never matches.
pub fn link_matches_path(href: &str, current_path: &str) -> bool {
    if is_home(href) {
        is_home(current_path) || current_path.ends_with("/index.html")
    } else if href.starts_with('/') {
        current_path == href || current_path.ends_with(href)
    } else {
        false
    }
}

pub fn init(page: &mut Page, state: &mut ControllerState) {
    if !claim(&mut state.active_link) {
        return;
    }
    let current_path = page.location().pathname.clone();
    let doc = page.document();
    let matches = doc.find_all(doc.root(), |el| {
        el.has_class(NAV_LINK)
            && el
                .attr("href")
                .is_some_and(|href| !href.is_empty() && !href.starts_with('#') && link_matches_path(href, &current_path))
    });
    tracing::debug!(path = %current_path, matched = matches.len(), "active link");
    let doc = page.document_mut();
    for link in matches {
        doc.set_attr(link, ARIA_CURRENT, "page");
        doc.add_class(link, ACTIVE);
    }
}
