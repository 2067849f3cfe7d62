//! Arena-backed markup tree.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`].
//! Children are owned by index lists; the parent link is a plain index and
//! carries no ownership. Detached nodes stay in the arena, so ids handed out
//! during a pass remain valid until the document is dropped.

use crate::error::{FilterError, Result};
use scraper::{Html, Node as ParsedNode};

/// Index of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl ElementData {
    /// Case-insensitive attribute lookup.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Create a document whose container element is `root_name`.
    pub fn new(root_name: &str) -> Self {
        Self::with_container(ElementData {
            name: root_name.to_string(),
            attributes: Vec::new(),
        })
    }

    fn with_container(container: ElementData) -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(container),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// Parse `markup` as a body fragment with the tolerant HTML parser.
    ///
    /// The parser wraps the fragment in an `<html>` element, which becomes
    /// the container of the returned document.
    pub fn parse_fragment(markup: &str) -> Result<Self> {
        let html = Html::parse_fragment(markup);
        Self::from_html(&html)
    }

    fn from_html(html: &Html) -> Result<Self> {
        let container = html
            .tree
            .root()
            .children()
            .find(|child| child.value().is_element())
            .ok_or_else(|| {
                FilterError::BackendUnavailable("parser produced no root container".to_string())
            })?;

        let ParsedNode::Element(element) = container.value() else {
            return Err(FilterError::BackendUnavailable(
                "parser root container is not an element".to_string(),
            ));
        };

        let mut document = Self::with_container(ElementData {
            name: element.name().to_string(),
            attributes: element
                .attrs()
                .map(|(name, value)| Attribute::new(name, value))
                .collect(),
        });
        let root = document.root;

        // Explicit stack instead of recursion keeps deeply nested input safe.
        let mut stack = vec![(container, root)];
        while let Some((parsed, parent)) = stack.pop() {
            for child in parsed.children() {
                match child.value() {
                    ParsedNode::Element(element) => {
                        let id = document.append(
                            parent,
                            NodeData::Element(ElementData {
                                name: element.name().to_string(),
                                attributes: element
                                    .attrs()
                                    .map(|(name, value)| Attribute::new(name, value))
                                    .collect(),
                            }),
                        );
                        stack.push((child, id));
                    }
                    ParsedNode::Text(text) => {
                        document.append(parent, NodeData::Text((**text).to_owned()));
                    }
                    // Comments, doctypes and processing instructions are dropped.
                    _ => {}
                }
            }
        }

        Ok(document)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        !self.nodes[id.0].children.is_empty()
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].data {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    pub fn attributes_mut(&mut self, id: NodeId) -> Option<&mut Vec<Attribute>> {
        match &mut self.nodes[id.0].data {
            NodeData::Element(element) => Some(&mut element.attributes),
            NodeData::Text(_) => None,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.name.as_str())
    }

    /// Whether `id` is still reachable from the container.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Concatenation of all descendant text, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current.0];
            if let NodeData::Text(text) = &node.data {
                out.push_str(text);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Allocate a detached node.
    pub fn create(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeData::Text(text.into()))
    }

    /// Allocate a node and append it as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.create(data);
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.push(id);
        id
    }

    fn position(&self, parent: NodeId, child: NodeId) -> Result<usize> {
        self.nodes[parent.0]
            .children
            .iter()
            .position(|&id| id == child)
            .ok_or_else(|| {
                FilterError::InternalMutationFailure(format!(
                    "node {} is not a child of node {}",
                    child.0, parent.0
                ))
            })
    }

    /// Put `new` at the position of `old` in `parent`'s child list and detach
    /// `old`. Returns the detached node.
    pub fn replace_child(&mut self, parent: NodeId, new: NodeId, old: NodeId) -> Result<NodeId> {
        if self.nodes[new.0].parent.is_some() || new == self.root {
            return Err(FilterError::InternalMutationFailure(format!(
                "replacement node {} is already attached",
                new.0
            )));
        }
        let index = self.position(parent, old)?;
        self.nodes[parent.0].children[index] = new;
        self.nodes[new.0].parent = Some(parent);
        self.nodes[old.0].parent = None;
        Ok(old)
    }

    /// Detach `child` from `parent`. Returns the detached node.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        let index = self.position(parent, child)?;
        self.nodes[parent.0].children.remove(index);
        self.nodes[child.0].parent = None;
        Ok(child)
    }

    /// Ids of every element reachable from the container, container included.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(current) = stack.pop() {
            if self.element(current).is_some() {
                out.push(current);
            }
            stack.extend(self.nodes[current.0].children.iter().rev());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new("body");
        let root = doc.root();
        let div = doc.append(
            root,
            NodeData::Element(ElementData {
                name: "div".to_string(),
                attributes: vec![Attribute::new("class", "a")],
            }),
        );
        let text = doc.append(div, NodeData::Text("hello ".to_string()));
        let em = doc.append(
            div,
            NodeData::Element(ElementData {
                name: "em".to_string(),
                attributes: Vec::new(),
            }),
        );
        doc.append(em, NodeData::Text("world".to_string()));
        (doc, div, text, em)
    }

    #[test]
    fn test_text_content_in_document_order() {
        let (doc, div, _, _) = sample();
        assert_eq!(doc.text_content(div), "hello world");
        assert_eq!(doc.text_content(doc.root()), "hello world");
    }

    #[test]
    fn test_replace_child_keeps_position() {
        let (mut doc, div, text, em) = sample();
        let replacement = doc.create_text("WORLD");

        let detached = doc.replace_child(div, replacement, em).unwrap();
        assert_eq!(detached, em);
        assert_eq!(doc.children(div), &[text, replacement]);
        assert_eq!(doc.parent(replacement), Some(div));
        assert_eq!(doc.parent(em), None);
        assert!(!doc.is_attached(em));
    }

    #[test]
    fn test_remove_child() {
        let (mut doc, div, text, em) = sample();

        doc.remove_child(div, text).unwrap();
        assert_eq!(doc.children(div), &[em]);
        assert!(!doc.is_attached(text));
    }

    #[test]
    fn test_remove_non_child_fails() {
        let (mut doc, div, _, em) = sample();
        let root = doc.root();

        let err = doc.remove_child(root, em).unwrap_err();
        assert!(matches!(err, FilterError::InternalMutationFailure(_)));
        assert!(doc.is_attached(em));
        assert_eq!(doc.parent(em), Some(div));
    }

    #[test]
    fn test_replace_with_attached_node_fails() {
        let (mut doc, div, text, em) = sample();
        assert!(doc.replace_child(div, text, em).is_err());
    }

    #[test]
    fn test_parse_fragment_builds_container() {
        let doc = Document::parse_fragment("<p>one<!-- note --><b>two</b></p>").unwrap();
        let root = doc.root();

        assert_eq!(doc.tag_name(root), Some("html"));
        let p = doc.children(root)[0];
        assert_eq!(doc.tag_name(p), Some("p"));
        assert_eq!(doc.children(p).len(), 2);
        assert_eq!(doc.text_content(root), "onetwo");
    }

    #[test]
    fn test_parse_fragment_preserves_attribute_order() {
        let doc = Document::parse_fragment(r#"<span style="color:red" class="x" id="y">t</span>"#)
            .unwrap();
        let span = doc.children(doc.root())[0];
        let names: Vec<&str> = doc
            .element(span)
            .unwrap()
            .attributes
            .iter()
            .map(|attr| attr.name.as_str())
            .collect();

        assert_eq!(names, ["style", "class", "id"]);
    }

    #[test]
    fn test_parse_fragment_recovers_unclosed_tags() {
        let doc = Document::parse_fragment("<div>xxxx</div><div>dddd").unwrap();
        let root = doc.root();

        assert_eq!(doc.children(root).len(), 2);
        assert_eq!(doc.text_content(doc.children(root)[1]), "dddd");
    }

    #[test]
    fn test_elements_lists_attached_only() {
        let (mut doc, div, _, em) = sample();
        assert_eq!(doc.elements(), vec![doc.root(), div, em]);

        doc.remove_child(div, em).unwrap();
        assert_eq!(doc.elements(), vec![doc.root(), div]);
    }
}
