//! In-memory document model.
//!
//! The page host keeps its markup in a flat arena of nodes addressed by
//! [`NodeId`]. Ids are never reused: detaching a node only unlinks it from its
//! parent, so handlers that captured an id keep pointing at the same node for
//! the lifetime of the page.
//!
//! ## Element State
//!
//! Elements carry three kinds of state:
//!
//! - **Attributes**, kept in source order so rendering is stable. Classes and
//!   inline style are views over the `class` and `style` attributes.
//! - **Form-control state** (`value`, `checked`, `disabled`), initialised from
//!   attributes when parsed and then live, the way browsers separate a
//!   control's properties from its markup.
//! - **Geometry** (`top`, `height`), document-relative and supplied by the
//!   host. There is no layout engine; scenarios declare the numbers they need.
//!
//! ## Lookups
//!
//! [`Document::find_all`] and [`Document::closest`] take element predicates,
//! which is how the behavior modules express their markup contract. String
//! selectors live in [`select`] and are used where the selector itself comes
//! from data (a `data-bs-target` attribute, a scenario file).

pub mod parse;
pub mod select;

pub use parse::ParseError;
pub use select::{Selector, SelectorError};

use std::fmt;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Document-relative box of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Geometry {
    /// Distance from the top of the document to the element's top edge.
    pub top: f64,
    /// Rendered height of the element.
    pub height: f64,
}

/// An element node: tag, attributes, and live control state.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    value: String,
    checked: bool,
    disabled: bool,
    geometry: Geometry,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            value: String::new(),
            checked: false,
            disabled: false,
            geometry: Geometry::default(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Case-insensitive tag comparison.
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(n, _)| n == name)
    }

    /// Attributes in source order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn has_any_class(&self, classes: &[&str]) -> bool {
        classes.iter().any(|c| self.has_class(c))
    }

    /// The control type as scripts observe it.
    ///
    /// - `<input>` → lower-cased `type` attribute, `"text"` when absent
    /// - `<button>` → lower-cased `type` attribute, `"submit"` when absent
    /// - `<textarea>` → `"textarea"`, `<select>` → `"select-one"`
    /// - anything else → `""`
    pub fn control_type(&self) -> String {
        match self.tag.as_str() {
            "input" => self
                .attr("type")
                .map(str::to_ascii_lowercase)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "text".to_string()),
            "button" => self
                .attr("type")
                .map(str::to_ascii_lowercase)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "submit".to_string()),
            "textarea" => "textarea".to_string(),
            "select" => "select-one".to_string(),
            _ => String::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Read one property from the inline `style` attribute.
    pub fn style_property(&self, name: &str) -> Option<String> {
        parse_style(self.attr("style").unwrap_or(""))
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|(n, _)| n != name);
        self.attrs.len() != before
    }

    fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut classes: Vec<&str> = self.classes().collect();
        classes.push(class);
        let joined = classes.join(" ");
        self.set_attr("class", &joined);
    }

    fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let joined = self
            .classes()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr("class", &joined);
    }

    fn set_style_property(&mut self, name: &str, value: &str) {
        let mut props = parse_style(self.attr("style").unwrap_or(""));
        props.retain(|(n, _)| n != name);
        if !value.is_empty() {
            props.push((name.to_string(), value.to_string()));
        }
        if props.is_empty() {
            self.remove_attr("style");
        } else {
            let style = props
                .iter()
                .map(|(n, v)| format!("{n}: {v};"))
                .collect::<Vec<_>>()
                .join(" ");
            self.set_attr("style", &style);
        }
    }
}

/// Split an inline style declaration block into `(property, value)` pairs.
fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

#[derive(Debug, Clone)]
enum NodeData {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// A parsed page: a node arena rooted at the document node.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document containing only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(Element::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.contains(child, parent) {
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Unlink a node from its parent. The subtree stays intact.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    /// Detach and return every child of `node`.
    pub fn take_children(&mut self, node: NodeId) -> Vec<NodeId> {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in &children {
            self.nodes[child.0].parent = None;
        }
        children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Parent, if it is an element (the document node is not).
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|p| self.is_element(*p))
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes[node.0].data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node.0].data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    /// Contents of a text node; `None` for documents and elements.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(Element::tag)
    }

    /// `node` and its ancestors, nearest first.
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            document: self,
            next: Some(node),
        }
    }

    /// All descendants of `scope` in document order, excluding `scope`.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Elements under `scope` (document order) matching `predicate`.
    pub fn find_all(&self, scope: NodeId, predicate: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| self.element(*n).is_some_and(&predicate))
            .collect()
    }

    /// First element under `scope` (document order) matching `predicate`.
    pub fn find_first(
        &self,
        scope: NodeId,
        predicate: impl Fn(&Element) -> bool,
    ) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.element(node).is_some_and(&predicate) {
                return Some(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        None
    }

    /// Nearest inclusive ancestor element satisfying `predicate`.
    pub fn closest(&self, node: NodeId, predicate: impl Fn(&Element) -> bool) -> Option<NodeId> {
        self.ancestors(node)
            .find(|n| self.element(*n).is_some_and(&predicate))
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|n| n == ancestor)
    }

    /// Whether `node` is attached to the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.root(), node)
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.find_first(self.root(), |el| el.id() == Some(id))
    }

    pub fn body(&self) -> Option<NodeId> {
        self.find_first(self.root(), |el| el.is("body"))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        match &self.nodes[node.0].data {
            NodeData::Text(text) => text.clone(),
            _ => self
                .children(node)
                .iter()
                .map(|c| self.text_content(*c))
                .collect(),
        }
    }

    /// Replace all children of an element with a single text node.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        if let NodeData::Text(existing) = &mut self.nodes[node.0].data {
            *existing = text.to_string();
            return;
        }
        if !self.is_element(node) {
            return;
        }
        self.take_children(node);
        if !text.is_empty() {
            let child = self.create_text(text);
            self.append_child(node, child);
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|el| el.attr(name))
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.element(node).is_some_and(|el| el.has_attr(name))
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.set_attr(name, value);
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element_mut(node) {
            el.remove_attr(name);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            el.add_class(class);
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            el.remove_class(class);
        }
    }

    pub fn style_property(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node).and_then(|el| el.style_property(name))
    }

    /// Set an inline style property; an empty value removes it.
    pub fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.set_style_property(name, value);
        }
    }

    pub fn value(&self, node: NodeId) -> &str {
        self.element(node).map(Element::value).unwrap_or("")
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.value = value.to_string();
        }
    }

    pub fn checked(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(Element::checked)
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(el) = self.element_mut(node) {
            el.checked = checked;
        }
    }

    pub fn disabled(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(Element::disabled)
    }

    /// Set the disabled state, reflected to the `disabled` attribute.
    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if let Some(el) = self.element_mut(node) {
            el.disabled = disabled;
            if disabled {
                el.set_attr("disabled", "");
            } else {
                el.remove_attr("disabled");
            }
        }
    }

    pub fn geometry(&self, node: NodeId) -> Geometry {
        self.element(node)
            .map(Element::geometry)
            .unwrap_or_default()
    }

    pub fn set_geometry(&mut self, node: NodeId, geometry: Geometry) {
        if let Some(el) = self.element_mut(node) {
            el.geometry = geometry;
        }
    }

    /// Initialise control state from markup, the way a browser does when it
    /// first creates the controls.
    pub(crate) fn init_form_state(&mut self) {
        for node in self.descendants(self.root()) {
            let Some(el) = self.element(node) else {
                continue;
            };
            let (value, checked) = match el.tag() {
                "input" => {
                    let default = match el.control_type().as_str() {
                        "checkbox" | "radio" => "on",
                        _ => "",
                    };
                    (
                        el.attr("value").unwrap_or(default).to_string(),
                        el.has_attr("checked"),
                    )
                }
                "textarea" => (self.text_content(node), false),
                "select" => (self.initial_select_value(node), false),
                _ => continue,
            };
            let disabled = el.has_attr("disabled");
            if let Some(el) = self.element_mut(node) {
                el.value = value;
                el.checked = checked;
                el.disabled = disabled;
            }
        }
        for node in self.find_all(self.root(), |el| el.is("button") && el.has_attr("disabled")) {
            if let Some(el) = self.element_mut(node) {
                el.disabled = true;
            }
        }
    }

    fn initial_select_value(&self, select: NodeId) -> String {
        let options = self.find_all(select, |el| el.is("option"));
        let chosen = options
            .iter()
            .copied()
            .find(|o| self.has_attr(*o, "selected"))
            .or_else(|| options.first().copied());
        match chosen {
            Some(option) => self
                .attr(option, "value")
                .map(str::to_string)
                .unwrap_or_else(|| self.text_content(option).trim().to_string()),
            None => String::new(),
        }
    }
}

/// Iterator over a node and its ancestors, nearest first.
pub struct Ancestors<'a> {
    document: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.document.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::parse_html(
            r#"<html><body>
                <nav class="navbar"><a id="home" class="nav-link active" href="/">Home</a></nav>
                <main id="main"><p>Hello <b id="bold">world</b></p></main>
            </body></html>"#,
        )
        .unwrap()
    }

    #[test]
    fn element_by_id_finds_nested_element() {
        let doc = sample();
        let bold = doc.element_by_id("bold").unwrap();
        assert_eq!(doc.tag_name(bold), Some("b"));
        assert_eq!(doc.text_content(bold), "world");
    }

    #[test]
    fn element_by_id_rejects_empty_id() {
        let doc = sample();
        assert_eq!(doc.element_by_id(""), None);
    }

    #[test]
    fn closest_is_inclusive() {
        let doc = sample();
        let bold = doc.element_by_id("bold").unwrap();
        assert_eq!(doc.closest(bold, |el| el.is("b")), Some(bold));
        let main = doc.element_by_id("main").unwrap();
        assert_eq!(doc.closest(bold, |el| el.is("main")), Some(main));
        assert_eq!(doc.closest(bold, |el| el.is("nav")), None);
    }

    #[test]
    fn contains_is_inclusive_and_directional() {
        let doc = sample();
        let main = doc.element_by_id("main").unwrap();
        let bold = doc.element_by_id("bold").unwrap();
        assert!(doc.contains(main, bold));
        assert!(doc.contains(main, main));
        assert!(!doc.contains(bold, main));
    }

    #[test]
    fn class_helpers_preserve_other_classes() {
        let mut doc = sample();
        let home = doc.element_by_id("home").unwrap();
        doc.add_class(home, "current");
        doc.add_class(home, "current");
        assert_eq!(doc.attr(home, "class"), Some("nav-link active current"));
        doc.remove_class(home, "active");
        assert_eq!(doc.attr(home, "class"), Some("nav-link current"));
        assert!(!doc.has_class(home, "active"));
    }

    #[test]
    fn style_property_set_and_clear() {
        let mut doc = sample();
        let main = doc.element_by_id("main").unwrap();
        doc.set_style_property(main, "display", "none");
        assert_eq!(doc.style_property(main, "display").as_deref(), Some("none"));
        doc.set_style_property(main, "color", "red");
        assert_eq!(doc.attr(main, "style"), Some("display: none; color: red;"));
        doc.set_style_property(main, "display", "");
        doc.set_style_property(main, "color", "");
        assert_eq!(doc.style_property(main, "display"), None);
        assert!(!doc.has_attr(main, "style"));
    }

    #[test]
    fn detach_and_reattach() {
        let mut doc = sample();
        let bold = doc.element_by_id("bold").unwrap();
        doc.detach(bold);
        assert!(!doc.is_connected(bold));
        assert_eq!(doc.element_by_id("bold"), None);
        let main = doc.element_by_id("main").unwrap();
        doc.append_child(main, bold);
        assert!(doc.is_connected(bold));
        assert_eq!(doc.parent(bold), Some(main));
    }

    #[test]
    fn append_child_refuses_cycles() {
        let mut doc = sample();
        let main = doc.element_by_id("main").unwrap();
        let bold = doc.element_by_id("bold").unwrap();
        doc.append_child(bold, main);
        assert!(doc.contains(main, bold));
        assert!(doc.is_connected(main));
    }

    #[test]
    fn set_text_content_replaces_children() {
        let mut doc = sample();
        let main = doc.element_by_id("main").unwrap();
        doc.set_text_content(main, "replaced");
        assert_eq!(doc.text_content(main), "replaced");
        assert_eq!(doc.children(main).len(), 1);
        assert_eq!(doc.element_by_id("bold"), None);
    }

    #[test]
    fn control_type_defaults() {
        assert_eq!(Element::new("input").control_type(), "text");
        assert_eq!(Element::new("button").control_type(), "submit");
        assert_eq!(Element::new("TEXTAREA").control_type(), "textarea");
        assert_eq!(Element::new("div").control_type(), "");
    }

    #[test]
    fn disabled_is_reflected_to_attribute() {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        doc.set_disabled(button, true);
        assert!(doc.disabled(button));
        assert!(doc.has_attr(button, "disabled"));
        doc.set_disabled(button, false);
        assert!(!doc.has_attr(button, "disabled"));
    }

    #[test]
    fn find_all_is_document_order() {
        let doc = Document::parse_html(
            r#"<body><ul><li id="a"><span id="b"></span></li><li id="c"></li></ul></body>"#,
        )
        .unwrap();
        let ids: Vec<&str> = doc
            .find_all(doc.root(), |el| el.id().is_some())
            .into_iter()
            .filter_map(|n| doc.attr(n, "id"))
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
