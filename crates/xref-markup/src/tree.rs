//! Arena-backed document tree.
//!
//! Nodes live in a single `Vec` and are addressed by [`NodeId`]. Parent,
//! sibling and child links are stored as ids, so a text node can be split and
//! new siblings inserted while a traversal holds on to the id of the node it
//! is currently visiting.

use crate::fragment::Fragment;

/// Stable handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Element tag and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in source order.
    pub attrs: Vec<(String, String)>,
}

impl Element {
    /// Create an element without attributes.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    /// Value of the first attribute named `key`.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Payload of a document node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    previous_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            previous_sibling: None,
            next_sibling: None,
            first_child: None,
            last_child: None,
        }
    }
}

/// A parsed HTML fragment rooted at a synthetic wrapper element.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Document {
    /// Create a document containing only the wrapper element `root_tag`.
    #[must_use]
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Element(Element::new(root_tag)))],
            root: NodeId(0),
        }
    }

    /// The synthetic wrapper element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Text payload, if `id` is a text node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Tag name, if `id` is an element.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(element) => Some(&element.tag),
            _ => None,
        }
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].first_child
    }

    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next_sibling
    }

    /// Iterate over the children of `id` in order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.first_child(id),
        }
    }

    /// Append a new node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let child = self.alloc(kind);
        self.attach_last(parent, child);
        child
    }

    /// Append text to `parent`, merging into its last child when that is text.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.nodes[parent.0].last_child
            && let NodeKind::Text(existing) = &mut self.nodes[last.0].kind
        {
            existing.push_str(text);
            return;
        }
        self.append(parent, NodeKind::Text(text.to_owned()));
    }

    /// Replace `text[start..end]` of a text node with `replacement`.
    ///
    /// The node keeps the text before `start`, the replacement becomes its
    /// next sibling and the text after `end` (if any) follows as a new text
    /// node. Nothing else in the tree changes.
    pub fn splice(&mut self, node: NodeId, start: usize, end: usize, replacement: Fragment) {
        let NodeKind::Text(text) = &mut self.nodes[node.0].kind else {
            debug_assert!(false, "splice target must be a text node");
            return;
        };
        let after = text.split_off(end);
        text.truncate(start);

        let inserted = self.insert_fragment_after(node, replacement);
        if !after.is_empty() {
            let rest = self.alloc(NodeKind::Text(after));
            self.insert_after(inserted, rest);
        }
    }

    /// Turn a text node into an anchor to `href` wrapping its former text.
    pub fn wrap_in_link(&mut self, node: NodeId, href: &str) {
        let mut anchor = Element::new("a");
        anchor.attrs.push(("href".to_owned(), href.to_owned()));
        let previous = std::mem::replace(&mut self.nodes[node.0].kind, NodeKind::Element(anchor));
        debug_assert!(matches!(previous, NodeKind::Text(_)));
        self.append(node, previous);
    }

    /// Materialize `fragment` and insert it right after `anchor`.
    pub fn insert_fragment_after(&mut self, anchor: NodeId, fragment: Fragment) -> NodeId {
        let id = self.build(fragment);
        self.insert_after(anchor, id);
        id
    }

    fn build(&mut self, fragment: Fragment) -> NodeId {
        match fragment {
            Fragment::Text(text) => self.alloc(NodeKind::Text(text)),
            Fragment::Element {
                tag,
                attrs,
                children,
            } => {
                let id = self.alloc(NodeKind::Element(Element { tag, attrs }));
                for child in children {
                    let child_id = self.build(child);
                    self.attach_last(id, child_id);
                }
                id
            }
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    fn attach_last(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        match self.nodes[parent.0].last_child {
            Some(last) => {
                self.nodes[last.0].next_sibling = Some(child);
                self.nodes[child.0].previous_sibling = Some(last);
            }
            None => self.nodes[parent.0].first_child = Some(child),
        }
        self.nodes[parent.0].last_child = Some(child);
    }

    /// Link a detached node in as the next sibling of `anchor`.
    fn insert_after(&mut self, anchor: NodeId, new_sibling: NodeId) {
        let parent = self.nodes[anchor.0].parent;
        let next = self.nodes[anchor.0].next_sibling;

        self.nodes[new_sibling.0].parent = parent;
        self.nodes[new_sibling.0].previous_sibling = Some(anchor);
        self.nodes[new_sibling.0].next_sibling = next;
        self.nodes[anchor.0].next_sibling = Some(new_sibling);

        match next {
            Some(next) => self.nodes[next.0].previous_sibling = Some(new_sibling),
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent.0].last_child = Some(new_sibling);
                }
            }
        }
    }
}

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}
