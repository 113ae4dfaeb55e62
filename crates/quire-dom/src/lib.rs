//! Element tree read by the Quire box tree builder.
//!
//! [DOM Living Standard](https://dom.spec.whatwg.org/)
//!
//! Nodes live in one vector and refer to each other by [`NodeId`]. The tree
//! only grows: a parser (or a test) appends nodes in document order, and the
//! box tree builder walks it read-only. Only what box generation looks at is
//! kept: local names, attributes in source order, text data, and enough of
//! comments and processing instructions to skip them.

use std::iter;

/// Index of a node in its [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The Document node.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// What a node is, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// [§ 4.5](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.11](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.14](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
    /// [§ 4.13](https://dom.spec.whatwg.org/#interface-processinginstruction)
    ProcessingInstruction {
        /// "ProcessingInstruction nodes have an associated target."
        target: String,
        /// Character data after the target.
        data: String,
    },
}

/// A node and its place in the tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Kind and payload.
    pub data: NodeData,
    /// `None` for the Document and for nothing else.
    pub parent: Option<NodeId>,
    /// In document order.
    pub children: Vec<NodeId>,
}

/// Local name and attributes of an element.
///
/// Attribute names are matched ASCII case-insensitively, as for elements in
/// the HTML namespace of an HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name", as written.
    pub tag_name: String,
    attributes: Vec<(String, String)>,
}

impl ElementData {
    /// An element named `tag_name` with `(name, value)` attributes. A repeated
    /// name keeps its first value, like the HTML tokenizer does.
    #[must_use]
    pub fn new(tag_name: &str, attributes: &[(&str, &str)]) -> Self {
        let mut element = Self {
            tag_name: tag_name.to_string(),
            attributes: Vec::with_capacity(attributes.len()),
        };
        for &(name, value) in attributes {
            if element.attr(name).is_none() {
                element.attributes.push((name.to_ascii_lowercase(), value.to_string()));
            }
        }
        element
    }

    /// Whether the local name is `name`, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(name)
    }

    /// Value of the attribute `name`.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Attributes in source order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attributes.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// [§ 4.6.7 Link types](https://html.spec.whatwg.org/multipage/links.html#linkTypes)
    ///
    /// Whether `rel` holds the token `link_type`. "The rel attribute ... must
    /// have a value that is an unordered set of unique space-separated
    /// tokens", compared ASCII case-insensitively.
    #[must_use]
    pub fn has_link_type(&self, link_type: &str) -> bool {
        self.attr("rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case(link_type))
        })
    }

    /// [§ 2.3.4.2 Non-negative integers](https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#rules-for-parsing-non-negative-integers)
    ///
    /// The attribute `name` parsed with the rules for non-negative integers.
    /// Trailing garbage is ignored (`"2px"` is 2); a sign other than `+`, no
    /// digits, or overflow give `None`.
    #[must_use]
    pub fn non_negative_integer_attr(&self, name: &str) -> Option<u32> {
        // STEP 1-3: "Skip ASCII whitespace within input given position."
        let input = self.attr(name)?.trim_start_matches(|c: char| c.is_ascii_whitespace());
        // STEP 4-6: a "+" is skipped; "-" would make the value negative.
        let input = input.strip_prefix('+').unwrap_or(input);
        // STEP 7-9: "Collect a sequence of code points that are ASCII digits".
        let digits = input.split(|c: char| !c.is_ascii_digit()).next()?;
        if digits.is_empty() {
            return None;
        }
        digits.parse().ok()
    }
}

/// An append-only document tree. [`NodeId::ROOT`] is the Document.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// A tree holding only the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The Document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes, the Document included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the Document is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node `id`, if it belongs to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Create a node from `data` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not in this tree, or is a Text, Comment or
    /// ProcessingInstruction node, which cannot have children.
    pub fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent_node = self
            .nodes
            .get_mut(parent.0)
            .unwrap_or_else(|| panic!("parent {parent:?} is not in the tree"));
        assert!(
            matches!(parent_node.data, NodeData::Document | NodeData::Element(_)),
            "{parent:?} cannot have children"
        );
        parent_node.children.push(id);
        self.nodes.push(Node {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        id
    }

    /// Append an element named `tag_name` to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag_name: &str, attributes: &[(&str, &str)]) -> NodeId {
        self.append(parent, NodeData::Element(ElementData::new(tag_name, attributes)))
    }

    /// Append a text node to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeData::Text(text.to_string()))
    }

    /// Append a comment to `parent`.
    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeData::Comment(text.to_string()))
    }

    /// Parent of `id`; `None` for the Document.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Children of `id` in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |node| node.children.as_slice())
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&sibling| sibling == id)?;
        siblings.get(index + 1).copied()
    }

    /// Parent, grandparent and so on up to the Document.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.parent(id), |&node| self.parent(node))
    }

    /// Element data of `id`, if it is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Data of `id`, if it is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// [§ 4.5](https://dom.spec.whatwg.org/#document-element)
    ///
    /// "The document element of a document is the element whose parent is
    /// that document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(NodeId::ROOT).map(|(id, _)| id).next()
    }

    /// Element children of `id`, skipping text, comments and processing
    /// instructions.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &ElementData)> + '_ {
        self.children(id)
            .iter()
            .filter_map(move |&child| self.as_element(child).map(|element| (child, element)))
    }
}
