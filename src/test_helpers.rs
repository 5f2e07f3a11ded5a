//! Shared test utilities for the page-behaviors test suite.
//!
//! Provides page builders and lookup helpers that panic with the available
//! candidates listed, so a typo in a test points straight at the problem.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let mut page = page_from(r#"<button class="navbar-toggler">Menu</button>"#);
//! page.click(by_selector(&page, ".navbar-toggler"));
//! assert_has_class(&page, "body", "u-no-scroll");
//! ```

use crate::dom::{NodeId, Selector};
use crate::page::Page;

/// The full demo site used by the scenario fixtures.
pub const FULL_SITE: &str = include_str!("../fixtures/site/index.html");

// =========================================================================
// Page builders
// =========================================================================

pub fn blank_page() -> Page {
    page_from("")
}

/// Parse an HTML snippet (or full document) into a page at `/`.
pub fn page_from(html: &str) -> Page {
    Page::from_html(html).unwrap()
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find an element by id. Panics if not found.
pub fn by_id(page: &Page, id: &str) -> NodeId {
    page.document().element_by_id(id).unwrap_or_else(|| {
        let doc = page.document();
        let ids: Vec<&str> = doc
            .find_all(doc.root(), |el| el.id().is_some())
            .into_iter()
            .filter_map(|n| doc.attr(n, "id"))
            .collect();
        panic!("no element with id '{id}'. Available: {ids:?}")
    })
}

/// First element matching a CSS selector. Panics if none match.
pub fn by_selector(page: &Page, selector: &str) -> NodeId {
    let parsed = Selector::parse(selector)
        .unwrap_or_else(|err| panic!("bad selector '{selector}': {err}"));
    let doc = page.document();
    doc.select_first(doc.root(), &parsed).unwrap_or_else(|| {
        let tags: Vec<String> = doc
            .find_all(doc.root(), |_| true)
            .into_iter()
            .map(|n| crate::render::render_node(doc, n).chars().take(60).collect())
            .collect();
        panic!("nothing matches '{selector}'. Elements: {tags:#?}")
    })
}

// =========================================================================
// Assertions
// =========================================================================

pub fn assert_has_class(page: &Page, selector: &str, class: &str) {
    let node = by_selector(page, selector);
    assert!(
        page.document().has_class(node, class),
        "expected '{selector}' to have class '{class}', got {:?}",
        page.document().attr(node, "class")
    );
}

pub fn assert_lacks_class(page: &Page, selector: &str, class: &str) {
    let node = by_selector(page, selector);
    assert!(
        !page.document().has_class(node, class),
        "expected '{selector}' not to have class '{class}', got {:?}",
        page.document().attr(node, "class")
    );
}
