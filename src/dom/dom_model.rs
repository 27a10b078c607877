use std::collections::BTreeMap;
use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::dom::mutation::{MutationObserver, MutationRecord};
use crate::error::DetectError;

/// Tag used for text nodes. Anything starting with `#` is not an element.
pub const TEXT_TAG: &str = "#text";
pub const DOCUMENT_TAG: &str = "#document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// Rendered box of a node, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn has_extent(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    #[default]
    Block,
    Inline,
    InlineBlock,
    Flex,
    Grid,
    Contents,
    None,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

/// Computed style subset needed for the visibility query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Style {
    #[serde(default)]
    pub display: Display,
    #[serde(default)]
    pub visibility: Visibility,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub text: Option<String>,
    pub value: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub style: Style,
    pub rect: Rect,
}

impl Node {
    fn new(tag: &str) -> Self {
        Node {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            text: None,
            value: None,
            parent: None,
            children: Vec::new(),
            style: Style::default(),
            rect: Rect::default(),
        }
    }

    pub fn is_element(&self) -> bool {
        !self.tag.starts_with('#')
    }
}

struct Subscriber {
    root: NodeId,
    tx: mpsc::Sender<MutationRecord>,
}

/// Arena-backed live document.
///
/// The document owns every node; callers only ever hold `NodeId`s. Nodes
/// removed from the tree stay in the arena (detached) so mutation records
/// that mention them can still be inspected.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    url: String,
    title: String,
    subscribers: Vec<Subscriber>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url)
            .field("nodes", &self.nodes.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Document {
    /// Empty page: `#document > html > body`.
    pub fn new() -> Self {
        let mut nodes = vec![Node::new(DOCUMENT_TAG), Node::new("html"), Node::new("body")];
        nodes[0].children.push(NodeId(1));
        nodes[1].parent = Some(NodeId(0));
        nodes[1].children.push(NodeId(2));
        nodes[2].parent = Some(NodeId(1));

        Document {
            nodes,
            root: NodeId(0),
            body: NodeId(2),
            url: String::new(),
            title: String::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tag
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.nodes[id.0].is_element()
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0].attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.nodes[id.0].attrs.contains_key(name)
    }

    /// Attribute value trimmed and lowercased; empty when absent.
    pub fn attr_lower(&self, id: NodeId, name: &str) -> String {
        self.attr(id, name)
            .map(|v| v.trim().to_lowercase())
            .unwrap_or_default()
    }

    pub fn style(&self, id: NodeId) -> Style {
        self.nodes[id.0].style
    }

    pub fn rect(&self, id: NodeId) -> Rect {
        self.nodes[id.0].rect
    }

    /// Live value of a form control, falling back to its `value` attribute.
    pub fn value(&self, id: NodeId) -> Option<&str> {
        let node = &self.nodes[id.0];
        node.value.as_deref().or_else(|| node.attrs.get("value").map(String::as_str))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|p| self.is_element(*p))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).iter().copied().filter(|c| self.is_element(*c))
    }

    /// Ancestor elements, nearest first. Excludes `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent_element(id), move |n| self.parent_element(*n))
    }

    /// Inclusive ancestor walk: the first element (starting at `id`) matching `pred`.
    pub fn closest(&self, id: NodeId, pred: impl Fn(NodeId) -> bool) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|n| self.is_element(*n) && pred(*n))
    }

    /// Descendant elements of `id` in document order, excluding `id`.
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            if self.is_element(current) {
                out.push(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }

        out
    }

    /// Element siblings before `id`, nearest first.
    pub fn previous_element_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(id) else {
            return Vec::new();
        };
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|s| *s == id).unwrap_or(0);

        siblings[..pos]
            .iter()
            .rev()
            .copied()
            .filter(|s| self.is_element(*s))
            .collect()
    }

    /// Element siblings after `id`, nearest first.
    pub fn next_element_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(id) else {
            return Vec::new();
        };
        let siblings = self.children(parent);
        let pos = match siblings.iter().position(|s| *s == id) {
            Some(p) => p + 1,
            None => siblings.len(),
        };

        siblings[pos..]
            .iter()
            .copied()
            .filter(|s| self.is_element(*s))
            .collect()
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.push_text(id, &mut out);
        out
    }

    fn push_text(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        if let Some(text) = &node.text {
            out.push_str(text);
        }
        for child in &node.children {
            self.push_text(*child, out);
        }
    }

    /// True when `ancestor` is `node` or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        contains(&self.nodes, ancestor, node)
    }

    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    /// First connected element (document order) matching `pred`.
    pub fn find_first(&self, pred: impl Fn(NodeId) -> bool) -> Option<NodeId> {
        self.descendant_elements(self.root).into_iter().find(|n| pred(*n))
    }

    /// All connected elements (document order) matching `pred`.
    pub fn find_all(&self, pred: impl Fn(NodeId) -> bool) -> Vec<NodeId> {
        self.descendant_elements(self.root)
            .into_iter()
            .filter(|n| pred(*n))
            .collect()
    }

    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        if value.is_empty() {
            return None;
        }
        self.find_first(|n| self.attr(n, "id") == Some(value))
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    pub fn create_element(&mut self, tag: &str) -> Result<NodeId, DetectError> {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || tag.starts_with('#') {
            return Err(DetectError::InvalidDocument(format!(
                "'{}' is not a valid element tag",
                tag
            )));
        }
        Ok(self.push_node(Node::new(&tag)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        let mut node = Node::new(TEXT_TAG);
        node.text = Some(text.to_string());
        self.push_node(node)
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Append `child` under `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DetectError> {
        if self.node(parent).text.is_some() {
            return Err(DetectError::InvalidDocument("text nodes cannot have children".into()));
        }
        if self.contains(child, parent) {
            return Err(DetectError::InvalidDocument(
                "cannot append a node into its own subtree".into(),
            ));
        }

        if let Some(old_parent) = self.parent(child) {
            self.remove_child(old_parent, child);
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);

        self.notify(MutationRecord {
            target: parent,
            added: vec![child],
            removed: vec![],
        });
        Ok(())
    }

    /// Detach `child` from `parent`. Returns false when it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let siblings = &mut self.nodes[parent.0].children;
        let Some(pos) = siblings.iter().position(|c| *c == child) else {
            return false;
        };
        siblings.remove(pos);
        self.nodes[child.0].parent = None;

        self.notify(MutationRecord {
            target: parent,
            added: vec![],
            removed: vec![child],
        });
        true
    }

    /// Remove every child of `parent`, one record per child.
    pub fn clear_children(&mut self, parent: NodeId) {
        let children = self.children(parent).to_vec();
        for child in children {
            self.remove_child(parent, child);
        }
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        self.nodes[id.0]
            .attrs
            .insert(name.to_lowercase(), value.to_string());
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        self.nodes[id.0].attrs.remove(name);
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) {
        self.nodes[id.0].value = Some(value.to_string());
    }

    pub fn set_style(&mut self, id: NodeId, style: Style) {
        self.nodes[id.0].style = style;
    }

    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        self.nodes[id.0].rect = rect;
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribe to structural mutations inside the subtree at `root`.
    ///
    /// Dropping the returned handle unsubscribes.
    pub fn observe(&mut self, root: NodeId) -> MutationObserver {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(Subscriber { root, tx });
        MutationObserver::new(root, rx)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify(&mut self, record: MutationRecord) {
        let nodes = &self.nodes;
        self.subscribers.retain(|sub| {
            if !contains(nodes, sub.root, record.target) {
                return true;
            }
            sub.tx.send(record.clone()).is_ok()
        });
    }
}

fn contains(nodes: &[Node], ancestor: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if n == ancestor {
            return true;
        }
        current = nodes[n.0].parent;
    }
    false
}
