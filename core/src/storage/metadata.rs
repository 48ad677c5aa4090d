use std::fmt;
use std::path::PathBuf;

use super::document::{DocumentFile, DocumentKind};
use super::{Error, Result};

/// Index of a node inside a [`DocumentForest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position of one document in the catalog hierarchy.
///
/// Parent and child links are owned by the [`DocumentForest`] and can only be
/// changed through it.
#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    type_id: String,
    kind: DocumentKind,
    /// Segments from the parent's directory (or the catalog root) down to the
    /// directory holding this document. Empty when co-located with the parent.
    directories: Vec<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl DocumentMetadata {
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn file_name(&self) -> String {
        DocumentFile::new(self.type_id.as_str(), self.kind).file_name()
    }
}

/// Arena holding every document node of a catalog.
///
/// Nodes are never removed; a node without a parent is listed in
/// [`roots`](Self::roots). Every node is either a root or appears in exactly
/// one parent's children, and its back-reference always names that parent.
#[derive(Debug, Clone, Default)]
pub struct DocumentForest {
    nodes: Vec<DocumentMetadata>,
    roots: Vec<NodeId>,
}

impl DocumentForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached node and returns its id. The node starts out as a root.
    pub fn insert(
        &mut self,
        type_id: impl Into<String>,
        kind: DocumentKind,
        directories: Vec<String>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DocumentMetadata {
            type_id: type_id.into(),
            kind,
            directories,
            parent: None,
            children: Vec::new(),
        });
        self.roots.push(id);
        id
    }

    /// Adds a node below `parent`, or as a root when `parent` is `None`.
    pub fn insert_under(
        &mut self,
        parent: Option<NodeId>,
        type_id: impl Into<String>,
        kind: DocumentKind,
        directories: Vec<String>,
    ) -> Result<NodeId> {
        if let Some(parent) = parent {
            self.node(parent)?;
        }
        let id = self.insert(type_id, kind, directories);
        self.move_to(id, parent)?;
        Ok(id)
    }

    /// Re-parents `node`, unlinking it from wherever it currently is.
    ///
    /// Moving a node below itself or one of its descendants fails with
    /// [`Error::CyclicParent`]. Moving a node to the parent it already has
    /// leaves everything untouched.
    pub fn move_to(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<()> {
        let current = self.node(node)?.parent;
        if let Some(parent) = parent {
            self.node(parent)?;
            if parent == node || self.ancestors(parent).any(|ancestor| ancestor == node) {
                return Err(Error::CyclicParent { node, parent });
            }
        }
        if current == parent {
            return Ok(());
        }

        match current {
            Some(old) => self.nodes[old.0].children.retain(|&child| child != node),
            None => self.roots.retain(|&root| root != node),
        }
        match parent {
            Some(new) => self.nodes[new.0].children.push(node),
            None => self.roots.push(node),
        }
        self.nodes[node.0].parent = parent;
        Ok(())
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.move_to(child, Some(parent))
    }

    /// Turns `node` into a root.
    pub fn detach(&mut self, node: NodeId) -> Result<()> {
        self.move_to(node, None)
    }

    /// Detaches `child` if it currently belongs to `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool> {
        if self.node(child)?.parent != Some(parent) {
            return Ok(false);
        }
        self.detach(child)?;
        Ok(true)
    }

    pub fn get(&self, id: NodeId) -> Option<&DocumentMetadata> {
        self.nodes.get(id.0)
    }

    fn node(&self, id: NodeId) -> Result<&DocumentMetadata> {
        self.get(id).ok_or(Error::UnknownNode(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DocumentMetadata)> {
        self.nodes.iter().enumerate().map(|(index, node)| (NodeId(index), node))
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&ancestor| self.parent(ancestor))
    }

    /// Descendants of `id` in depth-first pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            result.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        result
    }

    pub fn find_by_type<'a>(&'a self, type_id: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.iter()
            .filter(move |(_, node)| node.type_id == type_id)
            .map(|(id, _)| id)
    }

    /// Path of the document relative to the catalog root: the directory
    /// segments of every ancestor from the root down, then the node's own
    /// segments, then its file name. Segments are joined as-is, `..` is not
    /// normalized.
    pub fn path(&self, id: NodeId) -> Result<PathBuf> {
        let node = self.node(id)?;
        let mut chain: Vec<NodeId> = self.ancestors(id).collect();
        chain.reverse();

        let mut path = PathBuf::new();
        for ancestor in chain {
            path.extend(&self.nodes[ancestor.0].directories);
        }
        path.extend(&node.directories);
        path.push(node.file_name());
        Ok(path)
    }

    fn shape(&self, id: NodeId) -> Shape<'_> {
        let node = &self.nodes[id.0];
        let mut children: Vec<Shape<'_>> =
            node.children.iter().map(|&child| self.shape(child)).collect();
        children.sort();
        Shape { type_id: &node.type_id, directories: &node.directories, children }
    }

    fn shapes(&self) -> Vec<Shape<'_>> {
        let mut shapes: Vec<Shape<'_>> = self.roots.iter().map(|&root| self.shape(root)).collect();
        shapes.sort();
        shapes
    }
}

/// Canonical, order-independent view of a subtree.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Shape<'a> {
    type_id: &'a str,
    directories: &'a [String],
    children: Vec<Shape<'a>>,
}

/// Two forests are equal when they hold the same trees of
/// `(type_id, directories, children)`, regardless of the order of roots or
/// children at any level.
impl PartialEq for DocumentForest {
    fn eq(&self, other: &Self) -> bool {
        self.shapes() == other.shapes()
    }
}

impl Eq for DocumentForest {}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirs(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn inserted_nodes_start_as_roots() {
        let mut forest = DocumentForest::new();
        let a = forest.insert("issuer", DocumentKind::Main, vec![]);
        let b = forest.insert("issuer", DocumentKind::Main, dirs(&["other"]));
        assert_eq!(forest.roots(), &[a, b]);
        assert_eq!(forest.parent(a), None);
    }

    #[test]
    fn reparenting_moves_node_between_parents() {
        let mut forest = DocumentForest::new();
        let p1 = forest.insert("emission", DocumentKind::Main, vec![]);
        let p2 = forest.insert("emission", DocumentKind::Main, vec![]);
        let n = forest.insert("coin", DocumentKind::Main, dirs(&["leu"]));

        forest.add_child(p1, n).unwrap();
        forest.add_child(p2, n).unwrap();

        assert!(forest.children(p1).is_empty());
        assert_eq!(forest.children(p2), &[n]);
        assert_eq!(forest.parent(n), Some(p2));
        assert!(!forest.roots().contains(&n));
    }

    #[test]
    fn adding_same_child_twice_keeps_one_entry() {
        let mut forest = DocumentForest::new();
        let p = forest.insert("emission", DocumentKind::Main, vec![]);
        let n = forest.insert("coin", DocumentKind::Child, vec![]);

        forest.add_child(p, n).unwrap();
        forest.add_child(p, n).unwrap();

        assert_eq!(forest.children(p), &[n]);
    }

    #[test]
    fn rejects_cycles() {
        let mut forest = DocumentForest::new();
        let a = forest.insert("issuer", DocumentKind::Main, vec![]);
        let b = forest.insert_under(Some(a), "emission", DocumentKind::Main, dirs(&["x"])).unwrap();
        let c = forest.insert_under(Some(b), "coin", DocumentKind::Main, dirs(&["y"])).unwrap();

        assert!(matches!(forest.add_child(c, a), Err(Error::CyclicParent { .. })));
        assert!(matches!(forest.add_child(a, a), Err(Error::CyclicParent { .. })));
        assert_eq!(forest.parent(a), None);
        assert_eq!(forest.children(c), &[] as &[NodeId]);
    }

    #[test]
    fn detach_and_remove_child() {
        let mut forest = DocumentForest::new();
        let p = forest.insert("issuer", DocumentKind::Main, vec![]);
        let other = forest.insert("issuer", DocumentKind::Main, vec![]);
        let n = forest.insert_under(Some(p), "emission", DocumentKind::Main, dirs(&["e"])).unwrap();

        assert!(!forest.remove_child(other, n).unwrap());
        assert_eq!(forest.parent(n), Some(p));

        assert!(forest.remove_child(p, n).unwrap());
        assert_eq!(forest.parent(n), None);
        assert!(forest.roots().contains(&n));
        assert!(forest.children(p).is_empty());
    }

    #[test]
    fn unknown_nodes_are_reported() {
        let mut forest = DocumentForest::new();
        let a = forest.insert("issuer", DocumentKind::Main, vec![]);
        let ghost = NodeId(42);
        assert!(matches!(forest.add_child(a, ghost), Err(Error::UnknownNode(id)) if id == ghost));
        assert!(matches!(forest.path(ghost), Err(Error::UnknownNode(_))));
    }

    #[test]
    fn path_concatenates_ancestor_directories() {
        let mut forest = DocumentForest::new();
        let a = forest.insert("issuer", DocumentKind::Main, dirs(&["a", "b"]));
        let b = forest.insert_under(Some(a), "emission", DocumentKind::Main, dirs(&["c"])).unwrap();
        let c = forest.insert_under(Some(b), "coin", DocumentKind::Main, dirs(&["d"])).unwrap();

        let expected: PathBuf = ["a", "b", "c", "d", "m-coin.json"].iter().collect();
        assert_eq!(forest.path(c).unwrap(), expected);
    }

    #[test]
    fn child_documents_render_with_child_prefix() {
        let mut forest = DocumentForest::new();
        let main = forest.insert("coin", DocumentKind::Main, dirs(&["leu"]));
        let child = forest.insert_under(Some(main), "banknote", DocumentKind::Child, vec![]).unwrap();

        let expected: PathBuf = ["leu", "c-banknote.json"].iter().collect();
        assert_eq!(forest.path(child).unwrap(), expected);
        assert_eq!(forest.path(main).unwrap(), PathBuf::from("leu").join("m-coin.json"));
    }

    #[test]
    fn descendants_are_preorder() {
        let mut forest = DocumentForest::new();
        let root = forest.insert("issuer", DocumentKind::Main, vec![]);
        let e1 = forest.insert_under(Some(root), "emission", DocumentKind::Main, dirs(&["1"])).unwrap();
        let c1 = forest.insert_under(Some(e1), "coin", DocumentKind::Main, dirs(&["c"])).unwrap();
        let e2 = forest.insert_under(Some(root), "emission", DocumentKind::Main, dirs(&["2"])).unwrap();

        assert_eq!(forest.descendants(root), vec![e1, c1, e2]);
        assert_eq!(forest.ancestors(c1).collect::<Vec<_>>(), vec![e1, root]);
        assert_eq!(forest.find_by_type("emission").collect::<Vec<_>>(), vec![e1, e2]);
    }

    #[test]
    fn equality_ignores_child_order() {
        let mut left = DocumentForest::new();
        let root = left.insert("issuer", DocumentKind::Main, vec![]);
        let x = left.insert_under(Some(root), "emission", DocumentKind::Main, dirs(&["x"])).unwrap();
        left.insert_under(Some(x), "coin", DocumentKind::Main, dirs(&["c1"])).unwrap();
        left.insert_under(Some(x), "coin", DocumentKind::Main, dirs(&["c2"])).unwrap();
        left.insert_under(Some(root), "emission", DocumentKind::Main, dirs(&["y"])).unwrap();
        left.insert("emission", DocumentKind::Child, vec![]);

        let mut right = DocumentForest::new();
        right.insert("emission", DocumentKind::Child, vec![]);
        let root = right.insert("issuer", DocumentKind::Main, vec![]);
        right.insert_under(Some(root), "emission", DocumentKind::Main, dirs(&["y"])).unwrap();
        let x = right.insert_under(Some(root), "emission", DocumentKind::Main, dirs(&["x"])).unwrap();
        right.insert_under(Some(x), "coin", DocumentKind::Main, dirs(&["c2"])).unwrap();
        right.insert_under(Some(x), "coin", DocumentKind::Main, dirs(&["c1"])).unwrap();

        assert_eq!(left, right);
    }

    #[test]
    fn equality_respects_directories_and_nesting() {
        let mut left = DocumentForest::new();
        let root = left.insert("issuer", DocumentKind::Main, vec![]);
        left.insert_under(Some(root), "emission", DocumentKind::Main, dirs(&["a", "b"])).unwrap();

        let mut reordered = DocumentForest::new();
        let root = reordered.insert("issuer", DocumentKind::Main, vec![]);
        reordered.insert_under(Some(root), "emission", DocumentKind::Main, dirs(&["b", "a"])).unwrap();
        assert_ne!(left, reordered);

        let mut flat = DocumentForest::new();
        flat.insert("issuer", DocumentKind::Main, vec![]);
        flat.insert("emission", DocumentKind::Main, dirs(&["a", "b"]));
        assert_ne!(left, flat);
    }
}
