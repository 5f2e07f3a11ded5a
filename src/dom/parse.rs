//! HTML parsing with html5ever.
//!
//! html5ever builds an `RcDom`, which is then copied into the crate's own
//! arena. Doctypes, comments and processing instructions are dropped, as are
//! whitespace-only text nodes.

use super::{Document, NodeId};
use html5ever::tendril::TendrilSink as _;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("HTML read error: {0}")]
    Io(#[from] std::io::Error),
}

impl Document {
    /// Parse a full HTML document.
    ///
    /// html5ever is error-tolerant, so malformed markup still yields a tree
    /// (missing `<html>`/`<body>` are synthesized). Only reading the input can
    /// fail.
    pub fn parse_html(html: &str) -> Result<Self, ParseError> {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                exact_errors: false,
                scripting_enabled: false,
                ..TreeBuilderOpts::default()
            },
            ..ParseOpts::default()
        };
        let dom = parse_document(RcDom::default(), opts)
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut document = Document::new();
        let root = document.root();
        copy_tree(&mut document, &dom.document, root);
        document.init_form_state();
        Ok(document)
    }
}

fn copy_tree(document: &mut Document, handle: &Handle, parent: NodeId) {
    match &handle.data {
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                copy_tree(document, child, parent);
            }
        }
        NodeData::Element { name, attrs, .. } => {
            let node = document.create_element(&name.local);
            for attr in attrs.borrow().iter() {
                document.set_attr(node, &attr.name.local, &attr.value);
            }
            document.append_child(parent, node);
            for child in handle.children.borrow().iter() {
                copy_tree(document, child, node);
            }
        }
        NodeData::Text { contents } => {
            let text = contents.borrow();
            if !text.trim().is_empty() {
                let node = document.create_text(&text);
                document.append_child(parent, node);
            }
        }
        _ => {}
    }
}
