//! Decoded node tree
//!
//! All nodes of one decode live in a single arena owned by [`UtfTree`].
//! Parent and child links are [`NodeId`] handles into that arena, so a
//! child never owns its parent.

use std::fmt;

use crate::record::NodeFlags;

/// Path separator used by UTF node paths
pub const PATH_SEPARATOR: char = '\\';

/// Handle to a node inside a [`UtfTree`] (or a [`crate::UtfBuilder`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in its arena
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named node: either a leaf carrying a payload or an intermediate node
/// grouping children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtfNode {
    pub(crate) name: String,
    pub(crate) flags: NodeFlags,
    pub(crate) data: Option<Vec<u8>>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl UtfNode {
    pub(crate) fn new(name: String, flags: NodeFlags, parent: Option<NodeId>) -> Self {
        Self {
            name,
            flags,
            data: None,
            parent,
            children: Vec::new(),
        }
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw record flags
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Leaf payload, `None` for intermediate nodes
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Enclosing node, `None` at the top level
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in file order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node carries a payload
    pub fn is_leaf(&self) -> bool {
        self.flags.is_leaf()
    }

    /// Whether the node groups children
    pub fn is_intermediate(&self) -> bool {
        self.flags.is_intermediate()
    }
}

/// Forest of nodes decoded from one container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtfTree {
    nodes: Vec<UtfNode>,
    roots: Vec<NodeId>,
}

impl UtfTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store `node` and link it under its parent (or at the top level)
    pub(crate) fn push(&mut self, node: UtfNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        match node.parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        self.nodes.push(node);
        id
    }

    /// Top-level nodes in file order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of leaf nodes
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Look up a node by handle
    pub fn get(&self, id: NodeId) -> Option<&UtfNode> {
        self.nodes.get(id.0)
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(UtfNode::parent)
    }

    /// Children of a node, empty for unknown handles
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Pre-order traversal in file order
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Backslash-joined names from the top level down to `id`
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id)?;
            names.push(node.name());
            current = node.parent;
        }

        let mut path = String::new();
        for name in names.iter().rev() {
            if !path.ends_with(PATH_SEPARATOR) {
                path.push(PATH_SEPARATOR);
            }
            if *name != "\\" {
                path.push_str(name);
            }
        }
        Some(path)
    }

    /// Resolve a backslash-separated path such as `\Cmpnd\Root\File name`.
    ///
    /// Segments compare ASCII case-insensitively. When the top-level node is
    /// the conventional `\` root, a leading separator selects it.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        let mut level: &[NodeId] = &self.roots;
        let mut rest = path;

        if let Some(stripped) = path.strip_prefix(PATH_SEPARATOR) {
            rest = stripped;
            if let Some(&root) = self
                .roots
                .iter()
                .find(|&&id| self.nodes[id.0].name == "\\")
            {
                if rest.is_empty() {
                    return Some(root);
                }
                level = &self.nodes[root.0].children;
            }
        }

        let mut found = None;
        for segment in rest.split(PATH_SEPARATOR).filter(|s| !s.is_empty()) {
            let id = level
                .iter()
                .copied()
                .find(|id| self.nodes[id.0].name.eq_ignore_ascii_case(segment))?;
            found = Some(id);
            level = &self.nodes[id.0].children;
        }
        found
    }
}

/// Pre-order iterator over a [`UtfTree`]
#[derive(Debug)]
pub struct PreOrder<'a> {
    tree: &'a UtfTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (NodeId, &'a UtfNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.get(id)?;
        self.stack.extend(node.children.iter().rev().copied());
        Some((id, node))
    }
}

impl<'a> IntoIterator for &'a UtfTree {
    type Item = (NodeId, &'a UtfNode);
    type IntoIter = PreOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaf(name: &str, parent: Option<NodeId>, data: &[u8]) -> UtfNode {
        let mut node = UtfNode::new(name.to_string(), NodeFlags::leaf(), parent);
        node.data = Some(data.to_vec());
        node
    }

    fn group(name: &str, parent: Option<NodeId>) -> UtfNode {
        UtfNode::new(name.to_string(), NodeFlags::intermediate(), parent)
    }

    /// `\` -> { Cmpnd -> { Root -> { File name } }, VMeshLibrary }
    fn sample() -> UtfTree {
        let mut tree = UtfTree::new();
        let root = tree.push(group("\\", None));
        let cmpnd = tree.push(group("Cmpnd", Some(root)));
        let inner = tree.push(group("Root", Some(cmpnd)));
        tree.push(leaf("File name", Some(inner), b"ship.3db\0"));
        tree.push(group("VMeshLibrary", Some(root)));
        tree
    }

    #[test]
    fn test_push_links_parent_and_children() {
        let tree = sample();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.roots(), &[NodeId(0)]);
        assert_eq!(tree.children(NodeId(0)), &[NodeId(1), NodeId(4)]);
        assert_eq!(tree.parent(NodeId(3)), Some(NodeId(2)));
        assert_eq!(tree.parent(NodeId(0)), None);
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn test_pre_order() {
        let tree = sample();
        let names: Vec<&str> = tree.iter().map(|(_, n)| n.name()).collect();
        assert_eq!(
            names,
            vec!["\\", "Cmpnd", "Root", "File name", "VMeshLibrary"]
        );
    }

    #[test]
    fn test_path_of() {
        let tree = sample();
        assert_eq!(tree.path_of(NodeId(0)).unwrap(), "\\");
        assert_eq!(tree.path_of(NodeId(3)).unwrap(), "\\Cmpnd\\Root\\File name");
        assert_eq!(tree.path_of(NodeId(99)), None);
    }

    #[test]
    fn test_find() {
        let tree = sample();
        assert_eq!(tree.find("\\"), Some(NodeId(0)));
        assert_eq!(tree.find("\\Cmpnd\\Root\\File name"), Some(NodeId(3)));
        assert_eq!(tree.find("\\cmpnd\\ROOT\\file NAME"), Some(NodeId(3)));
        assert_eq!(tree.find("\\VMeshLibrary\\"), Some(NodeId(4)));
        assert_eq!(tree.find("\\Cmpnd\\Missing"), None);
    }

    #[test]
    fn test_find_without_backslash_root() {
        let mut tree = UtfTree::new();
        let a = tree.push(group("A", None));
        let b = tree.push(leaf("B", Some(a), &[1]));
        assert_eq!(tree.find("A\\B"), Some(b));
        assert_eq!(tree.find("\\A\\B"), Some(b));
        assert_eq!(tree.find(""), None);
    }
}
