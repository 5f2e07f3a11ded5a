//! HTML serialization of the page arena.
//!
//! Nodes render through maud's [`Render`] trait so a rendered subtree can be
//! spliced into other maud templates, and all text and attribute values go
//! through maud's [`Escaper`]. Attribute order is the order the arena holds
//! (source order, then insertion order), which keeps output byte-stable for
//! snapshot digests.

use crate::dom::{Document, NodeId};
use maud::{DOCTYPE, Escaper, Render, html};
use std::fmt::Write as _;

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A renderable view of one node and its subtree.
pub struct NodeView<'a> {
    document: &'a Document,
    node: NodeId,
}

impl<'a> NodeView<'a> {
    pub fn new(document: &'a Document, node: NodeId) -> Self {
        Self { document, node }
    }
}

impl Render for NodeView<'_> {
    fn render_to(&self, buffer: &mut String) {
        write_node(self.document, self.node, buffer);
    }
}

/// Serialize the whole document, prefixed with a doctype.
pub fn render_document(document: &Document) -> String {
    html! {
        (DOCTYPE)
        (NodeView::new(document, document.root()))
    }
    .into_string()
}

/// Serialize one node including its own tags (`outerHTML`).
pub fn render_node(document: &Document, node: NodeId) -> String {
    NodeView::new(document, node).render().into_string()
}

fn write_node(document: &Document, node: NodeId, out: &mut String) {
    if let Some(text) = document.text(node) {
        escape_into(text, out);
        return;
    }
    let Some(element) = document.element(node) else {
        for child in document.children(node) {
            write_node(document, *child, out);
        }
        return;
    };

    out.push('<');
    out.push_str(element.tag());
    for (name, value) in element.attrs() {
        out.push(' ');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            escape_into(value, out);
            out.push('"');
        }
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.tag()) {
        return;
    }
    for child in document.children(node) {
        write_node(document, *child, out);
    }
    out.push_str("</");
    out.push_str(element.tag());
    out.push('>');
}

fn escape_into(text: &str, out: &mut String) {
    // Writing into a String cannot fail.
    let _ = Escaper::new(out).write_str(text);
}
