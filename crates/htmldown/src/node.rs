//! Arena-backed document tree.
//!
//! Parsers build a [`Document`] once per conversion. Nodes live in a flat
//! vector and refer to their parent and children by [`NodeId`], so walking up
//! the tree is an index lookup. Converters see the tree through [`NodeRef`],
//! which also applies a [`View`]: a filter that hides formatting-only text
//! nodes (and optionally navigation and form content) without mutating the
//! document.

use std::fmt;

use html_escape::{encode_double_quoted_attribute, encode_text};
use htmldown_core::PreprocessingOptions;
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::utilities::{is_form_element, is_navigation, is_structural, is_void};

/// Index of a node inside its [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An element's tag name (lowercase) and attributes in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element(Element),
    Text(String),
    Comment(String),
    Doctype(String),
}

// Most elements have only a few children - avoid a heap allocation for them
type Children = SmallVec<[NodeId; 4]>;

#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Children,
}

impl NodeData {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A parsed HTML document.
///
/// Trees can also be built by hand:
///
/// ```rust
/// use htmldown::Document;
///
/// let mut doc = Document::new();
/// let root = doc.root();
/// let h1 = doc.append_element(root, "h1", [("id", "top")]);
/// doc.append_text(h1, "Hello");
///
/// assert_eq!(doc.node(h1).text_content(), "Hello");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

static UNFILTERED: View = View { hidden: Vec::new() };

impl Document {
    /// Create an empty document holding only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: SmallVec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing but the root node exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn get(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    /// Unfiltered cursor at `id`
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            view: &UNFILTERED,
            id,
        }
    }

    /// Cursor at `id` that sees the tree through `view`
    pub fn node_in<'a>(&'a self, view: &'a View, id: NodeId) -> NodeRef<'a> {
        NodeRef {
            doc: self,
            view,
            id,
        }
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: SmallVec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append an element. Names are lowercased and the first occurrence of a
    /// duplicated attribute wins.
    pub fn append_element<I, K, V>(&mut self, parent: NodeId, name: &str, attrs: I) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = IndexMap::new();
        for (key, value) in attrs {
            let key: String = key.into();
            map.entry(key.to_ascii_lowercase()).or_insert_with(|| value.into());
        }
        self.push(
            parent,
            NodeKind::Element(Element {
                name: name.to_ascii_lowercase(),
                attrs: map,
            }),
        )
    }

    /// Append text, merging with a directly preceding text node
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeKind::Text(existing) = &mut self.nodes[last.0].kind {
                existing.push_str(text);
                return last;
            }
        }
        self.push(parent, NodeKind::Text(text.to_string()))
    }

    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(parent, NodeKind::Comment(text.to_string()))
    }

    pub fn append_doctype(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.push(parent, NodeKind::Doctype(name.to_string()))
    }

    /// First element named `name` in document order
    pub fn find_element(&self, name: &str) -> Option<NodeId> {
        self.node(self.root()).find(name).map(|node| node.id())
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn is_blank_text(&self, id: NodeId) -> bool {
        matches!(&self.nodes[id.0].kind, NodeKind::Text(text) if text.trim().is_empty())
    }

    fn source_len(&self, id: NodeId) -> usize {
        let mut total = 0;
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let data = &self.nodes[id.0];
            stack.extend(data.children.iter().copied());
            total += match &data.kind {
                NodeKind::Document => 0,
                NodeKind::Text(text) => text.len(),
                NodeKind::Comment(text) => text.len() + "<!---->".len(),
                NodeKind::Doctype(name) => name.len() + "<!DOCTYPE >".len(),
                NodeKind::Element(element) => {
                    let attrs: usize = element
                        .attrs
                        .iter()
                        .map(|(key, value)| key.len() + value.len() + 4)
                        .sum();
                    let close = if is_void(&element.name) {
                        0
                    } else {
                        element.name.len() + 3
                    };
                    element.name.len() + 2 + attrs + close
                }
            };
        }
        total
    }

    fn outer_html(&self, id: NodeId) -> String {
        enum Step {
            Open(NodeId),
            Close(NodeId),
        }

        let mut html = String::new();
        let mut stack = vec![Step::Open(id)];
        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Open(id) => id,
                Step::Close(id) => {
                    if let Some(element) = self.element(id) {
                        html.push_str(&format!("</{}>", element.name));
                    }
                    continue;
                }
            };
            let data = &self.nodes[id.0];
            match &data.kind {
                NodeKind::Document => {}
                NodeKind::Text(text) => {
                    html.push_str(&encode_text(text));
                    continue;
                }
                NodeKind::Comment(text) => {
                    html.push_str(&format!("<!--{text}-->"));
                    continue;
                }
                NodeKind::Doctype(name) => {
                    html.push_str(&format!("<!DOCTYPE {name}>"));
                    continue;
                }
                NodeKind::Element(element) => {
                    html.push('<');
                    html.push_str(&element.name);
                    for (key, value) in &element.attrs {
                        html.push_str(&format!(" {key}=\"{}\"", encode_double_quoted_attribute(value)));
                    }
                    html.push('>');
                    if is_void(&element.name) {
                        continue;
                    }
                    stack.push(Step::Close(id));
                }
            }
            stack.extend(data.children.iter().rev().map(|&child| Step::Open(child)));
        }
        html
    }
}

/// Which nodes a conversion skips.
///
/// Comments and doctypes are always hidden. Inside list and table structure,
/// a whitespace-only text node is hidden when it sits at the start or end of
/// its parent or next to another structural element. With preprocessing
/// enabled, navigation and form content is hidden as well.
#[derive(Debug, Clone, Default)]
pub struct View {
    hidden: Vec<bool>,
}

impl View {
    pub fn structural(doc: &Document, preprocessing: &PreprocessingOptions) -> Self {
        let mut hidden = vec![false; doc.len()];

        for (index, data) in doc.nodes.iter().enumerate() {
            match &data.kind {
                NodeKind::Comment(_) | NodeKind::Doctype(_) => hidden[index] = true,
                NodeKind::Element(element) if is_preprocessed_away(element, preprocessing) => {
                    hidden[index] = true;
                }
                NodeKind::Element(element) if is_structural(&element.name) => {
                    let children = data.children();
                    for (position, &child) in children.iter().enumerate() {
                        if !doc.is_blank_text(child) {
                            continue;
                        }
                        let boundary = |sibling: Option<&NodeId>| {
                            sibling.map_or(true, |&s| {
                                doc.element(s).is_some_and(|e| is_structural(&e.name))
                            })
                        };
                        let previous = position.checked_sub(1).and_then(|p| children.get(p));
                        if boundary(previous) || boundary(children.get(position + 1)) {
                            hidden[child.0] = true;
                        }
                    }
                }
                _ => {}
            }
        }

        Self { hidden }
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.hidden.get(id.0).copied().unwrap_or(false)
    }
}

fn is_preprocessed_away(element: &Element, preprocessing: &PreprocessingOptions) -> bool {
    preprocessing.enabled
        && ((preprocessing.remove_navigation && is_navigation(element))
            || (preprocessing.remove_forms && is_form_element(&element.name)))
}

/// A borrowed cursor into a [`Document`], seen through a [`View`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    view: &'a View,
    id: NodeId,
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", self.kind())
            .finish()
    }
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    fn at(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef {
            doc: self.doc,
            view: self.view,
            id,
        }
    }

    pub fn kind(&self) -> &'a NodeKind {
        let doc = self.doc;
        &doc.nodes[self.id.0].kind
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind(), NodeKind::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind(), NodeKind::Text(_))
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self) -> Option<&'a str> {
        self.doc.element(self.id).map(|e| e.name.as_str())
    }

    /// Is this an element named `name`?
    pub fn is(&self, name: &str) -> bool {
        self.tag_name() == Some(name)
    }

    pub fn is_any(&self, names: &[&str]) -> bool {
        self.tag_name().is_some_and(|tag| names.contains(&tag))
    }

    /// Content of a text node
    pub fn text(&self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Attribute value, if present
    pub fn get_str(&self, name: &str) -> Option<&'a str> {
        self.doc
            .element(self.id)
            .and_then(|e| e.attrs.get(name))
            .map(String::as_str)
    }

    /// Space-separated attribute tokens (`class`, `rel`, ...)
    pub fn get_list(&self, name: &str) -> Vec<&'a str> {
        self.get_str(name)
            .map(|value| value.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.get_str(name).is_some()
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.doc
            .element(self.id)
            .into_iter()
            .flat_map(|e| e.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.doc.nodes[self.id.0].parent.map(|id| self.at(id))
    }

    /// Tag name of the parent element
    pub fn parent_name(&self) -> Option<&'a str> {
        self.parent().and_then(|p| p.tag_name())
    }

    /// Parent, grandparent, ... up to the document root
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    pub fn has_ancestor(&self, names: &[&str]) -> bool {
        self.ancestors().any(|node| node.is_any(names))
    }

    /// Visible children in document order
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let this = *self;
        let doc = self.doc;
        doc.nodes[self.id.0]
            .children
            .iter()
            .filter(move |&&id| !this.view.is_hidden(id))
            .map(move |&id| this.at(id))
    }

    fn sibling_slots(&self) -> Option<(&'a [NodeId], usize)> {
        let doc = self.doc;
        let parent = doc.nodes[self.id.0].parent?;
        let siblings = doc.nodes[parent.0].children();
        let position = siblings.iter().position(|&id| id == self.id)?;
        Some((siblings, position))
    }

    /// Visible siblings before this node, nearest first
    pub fn preceding_siblings(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let this = *self;
        let before = self
            .sibling_slots()
            .map_or(&[][..], |(siblings, position)| &siblings[..position]);
        before
            .iter()
            .rev()
            .filter(move |&&id| !this.view.is_hidden(id))
            .map(move |&id| this.at(id))
    }

    pub fn previous_sibling(&self) -> Option<NodeRef<'a>> {
        self.preceding_siblings().next()
    }

    pub fn next_sibling(&self) -> Option<NodeRef<'a>> {
        let (siblings, position) = self.sibling_slots()?;
        siblings[position + 1..]
            .iter()
            .find(|&&id| !self.view.is_hidden(id))
            .map(|&id| self.at(id))
    }

    /// Visible descendants in document order, excluding this node
    pub fn descendants(&self) -> Descendants<'a> {
        let mut descendants = Descendants {
            node: *self,
            stack: Vec::new(),
        };
        descendants.push_children(self.id);
        descendants
    }

    /// First descendant element named `name`
    pub fn find(&self, name: &str) -> Option<NodeRef<'a>> {
        self.descendants().find(|node| node.is(name))
    }

    /// All descendant elements named any of `names`
    pub fn find_all(&self, names: &[&str]) -> Vec<NodeRef<'a>> {
        self.descendants().filter(|node| node.is_any(names)).collect()
    }

    /// Concatenated text of all visible descendant text nodes
    pub fn text_content(&self) -> String {
        if let Some(text) = self.text() {
            return text.to_string();
        }
        self.descendants().filter_map(|node| node.text()).collect()
    }

    /// Approximate byte length of this node serialized back to HTML
    pub fn source_len(&self) -> usize {
        self.doc.source_len(self.id)
    }

    /// This node serialized back to HTML, ignoring the view
    pub fn outer_html(&self) -> String {
        self.doc.outer_html(self.id)
    }
}

/// Pre-order iterator returned by [`NodeRef::descendants`]
pub struct Descendants<'a> {
    node: NodeRef<'a>,
    stack: Vec<NodeId>,
}

impl Descendants<'_> {
    fn push_children(&mut self, id: NodeId) {
        let view = self.node.view;
        let doc = self.node.doc;
        self.stack.extend(
            doc.nodes[id.0]
                .children
                .iter()
                .rev()
                .filter(|&&child| !view.is_hidden(child)),
        );
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.push_children(id);
        Some(self.node.at(id))
    }
}
