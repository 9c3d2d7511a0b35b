//! Hierarchical Path Index
//!
//! In-memory prefix tree over slash-delimited paths, independent of the
//! property store. Used for structural questions (how many fabrics, which
//! nodes under a fabric) and for printing branches.
//!
//! The root is a sentinel directory that is never reported. An empty path (or
//! one made only of slashes) refers to it on lookup.

pub mod node;

pub use node::{DirNode, NodeId};

use crate::error::IndexError;

const ROOT: NodeId = NodeId(0);

/// Prefix tree of path segments.
#[derive(Debug, Clone)]
pub struct PathIndex {
    nodes: Vec<DirNode>,
    elements: usize,
}

impl Default for PathIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PathIndex {
    pub fn new() -> Self {
        PathIndex {
            nodes: vec![DirNode::new("root", true)],
            elements: 0,
        }
    }

    /// The sentinel root, or `None` while nothing has been inserted.
    pub fn root(&self) -> Option<NodeId> {
        if self.elements == 0 {
            None
        } else {
            Some(ROOT)
        }
    }

    /// Number of `insert` calls, not distinct nodes.
    pub fn len(&self) -> usize {
        self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements == 0
    }

    /// The node for `id`, or `None` when `id` is not from this index.
    pub fn node(&self, id: NodeId) -> Option<&DirNode> {
        self.nodes.get(id.0)
    }

    /// Insert a path, creating missing segments. The last segment is a
    /// file unless it already has children; every ancestor is a directory.
    pub fn insert(&mut self, path: &str) -> Result<(), IndexError> {
        let segments: Vec<&str> = segments(path).collect();
        if segments.is_empty() {
            return Err(IndexError::InvalidArgument(format!(
                "cannot insert empty path {:?}",
                path
            )));
        }

        self.elements += 1;
        let mut current = ROOT;
        let last = segments.len() - 1;
        for (i, segment) in segments.into_iter().enumerate() {
            let is_dir = i < last;
            current = match self.child(current, segment) {
                Some(existing) => {
                    if is_dir {
                        self.nodes[existing.0].is_dir = true;
                    }
                    existing
                }
                None => {
                    let id = NodeId(self.nodes.len());
                    self.nodes.push(DirNode::new(segment, is_dir));
                    self.nodes[current.0].children.push(id);
                    id
                }
            };
        }
        Ok(())
    }

    pub fn has_key(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    /// Names of the children of `path`, in insertion order.
    pub fn children(&self, path: &str) -> Result<Vec<String>, IndexError> {
        let id = self
            .find(path)
            .ok_or_else(|| IndexError::NoSuchPath(path.to_string()))?;
        Ok(self.nodes[id.0]
            .children
            .iter()
            .map(|c| self.nodes[c.0].name.clone())
            .collect())
    }

    /// Locate the node for `path`.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        segments(path).try_fold(ROOT, |current, segment| self.child(current, segment))
    }

    /// Count nodes exactly `depth` levels below `node`. With `dirs_only`,
    /// only directories are counted. A foreign `node` counts nothing.
    pub fn count_nodes(&self, node: NodeId, depth: usize, dirs_only: bool) -> usize {
        let Some(current) = self.node(node) else {
            return 0;
        };
        if depth == 0 {
            return usize::from(!dirs_only || current.is_dir);
        }
        current
            .children
            .iter()
            .map(|child| self.count_nodes(*child, depth - 1, dirs_only))
            .sum()
    }

    /// Pre-order `(node, depth)` pairs for the subtree at `path`, at most
    /// `level` levels below it. Depth is measured from the start node; the
    /// sentinel root itself is never yielded.
    pub fn traverse(&self, path: &str, level: usize) -> Result<Traversal<'_>, IndexError> {
        let start = self
            .find(path)
            .ok_or_else(|| IndexError::NoSuchPath(path.to_string()))?;
        let stack = if start == ROOT {
            if level == 0 {
                Vec::new()
            } else {
                self.nodes[ROOT.0].children.iter().rev().map(|c| (*c, 1)).collect()
            }
        } else {
            vec![(start, 0)]
        };
        Ok(Traversal {
            index: self,
            stack,
            level,
        })
    }

    /// Render the branch at `path` down to `level` levels, one node per
    /// line, each level indented by ` | `.
    pub fn print(&self, path: &str, level: usize) -> Result<String, IndexError> {
        let offset = usize::from(self.find(path) == Some(ROOT));
        let mut out = String::new();
        for (id, depth) in self.traverse(path, level)? {
            out.push_str(&" | ".repeat(depth - offset));
            out.push_str(&self.nodes[id.0].name);
            out.push('\n');
        }
        Ok(out)
    }

    fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|c| self.nodes[c.0].name == name)
    }
}

impl<'a> FromIterator<&'a str> for PathIndex {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut index = PathIndex::new();
        for path in iter {
            // Empty paths carry no segments; skipping them is the only
            // sensible behaviour when collecting.
            let _ = index.insert(path);
        }
        index
    }
}

/// Lazy pre-order walk produced by [`PathIndex::traverse`].
pub struct Traversal<'a> {
    index: &'a PathIndex,
    stack: Vec<(NodeId, usize)>,
    level: usize,
}

impl Iterator for Traversal<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        if depth < self.level {
            self.stack.extend(
                self.index.nodes[id.0]
                    .children
                    .iter()
                    .rev()
                    .map(|c| (*c, depth + 1)),
            );
        }
        Some((id, depth))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_index_has_no_root() {
        let index = PathIndex::new();
        assert!(index.root().is_none());
        assert!(index.is_empty());
        assert!(index.has_key(""));
    }

    #[test]
    fn insert_creates_ancestors() {
        let mut index = PathIndex::new();
        index.insert("a/b/c").unwrap();
        assert!(index.has_key("a"));
        assert!(index.has_key("a/b"));
        assert!(index.has_key("a/b/c"));
        assert!(!index.has_key("a/c"));
        assert_eq!(index.children("a/b").unwrap(), vec!["c".to_string()]);

        let b = index.find("a/b").unwrap();
        let c = index.find("a/b/c").unwrap();
        assert!(index.node(b).unwrap().is_directory());
        assert!(!index.node(c).unwrap().is_directory());
    }

    #[test]
    fn reinsert_counts_but_does_not_duplicate() {
        let mut index = PathIndex::new();
        index.insert("a/b/c").unwrap();
        index.insert("a/b/c").unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.children("a").unwrap().len(), 1);
        assert_eq!(index.children("a/b").unwrap().len(), 1);
    }

    #[test]
    fn leaf_becomes_directory_when_extended() {
        let mut index = PathIndex::new();
        index.insert("a/b").unwrap();
        let b = index.find("a/b").unwrap();
        assert!(!index.node(b).unwrap().is_directory());
        index.insert("a/b/c").unwrap();
        assert!(index.node(b).unwrap().is_directory());
    }

    #[test]
    fn invalid_arguments() {
        let mut index = PathIndex::new();
        assert!(matches!(index.insert(""), Err(IndexError::InvalidArgument(_))));
        assert!(matches!(index.insert("///"), Err(IndexError::InvalidArgument(_))));
        assert_eq!(index.len(), 0);
        assert!(matches!(
            index.children("missing"),
            Err(IndexError::NoSuchPath(_))
        ));
        assert!(index.print("missing", 2).is_err());
    }

    #[test]
    fn count_nodes_by_depth() {
        let index: PathIndex = [
            "rwc/storm/h1/a.conf",
            "rwc/storm/h2/b.conf",
            "rwc/kafka/h1/c.conf",
            "dev/storm/h1/a.conf",
        ]
        .into_iter()
        .collect();
        let root = index.root().unwrap();
        assert_eq!(index.count_nodes(root, 1, true), 2);
        assert_eq!(index.count_nodes(root, 2, true), 3);
        assert_eq!(index.count_nodes(root, 3, true), 4);
        assert_eq!(index.count_nodes(root, 4, false), 4);
        assert_eq!(index.count_nodes(root, 4, true), 0);
        assert_eq!(index.count_nodes(root, 0, true), 1);
    }

    #[test]
    fn ids_from_another_index_resolve_to_nothing() {
        let large: PathIndex = ["a/b/c/d/e/f"].into_iter().collect();
        let small: PathIndex = ["x"].into_iter().collect();
        let deep = large.find("a/b/c/d/e/f").unwrap();
        assert!(small.node(deep).is_none());
        assert_eq!(small.count_nodes(deep, 0, false), 0);
        assert_eq!(small.count_nodes(deep, 2, false), 0);
    }

    #[test]
    fn print_indents_by_depth() {
        let index: PathIndex = ["rwc/storm/h1/a.conf", "rwc/storm/h2/b.conf"]
            .into_iter()
            .collect();
        assert_eq!(index.print("", 2).unwrap(), "rwc\n | storm\n");
        assert_eq!(
            index.print("rwc/storm", 2).unwrap(),
            "storm\n | h1\n |  | a.conf\n | h2\n |  | b.conf\n"
        );
        assert_eq!(index.print("rwc", 0).unwrap(), "rwc\n");
    }

    #[test]
    fn traversal_is_preorder_with_depths() {
        let index: PathIndex = ["a/b", "a/c", "d"].into_iter().collect();
        let names: Vec<(String, usize)> = index
            .traverse("", 5)
            .unwrap()
            .map(|(id, depth)| (index.node(id).unwrap().name().to_string(), depth))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a".to_string(), 1),
                ("b".to_string(), 2),
                ("c".to_string(), 2),
                ("d".to_string(), 1),
            ]
        );
    }

    proptest! {
        #[test]
        fn inserted_paths_and_prefixes_are_present(
            paths in proptest::collection::vec(
                proptest::collection::vec("[a-c]{1,2}", 1..5), 1..20)
        ) {
            let mut index = PathIndex::new();
            for segs in &paths {
                index.insert(&segs.join("/")).unwrap();
            }
            prop_assert_eq!(index.len(), paths.len());
            for segs in &paths {
                for end in 1..=segs.len() {
                    prop_assert!(index.has_key(&segs[..end].join("/")));
                }
            }
        }

        #[test]
        fn double_insert_adds_no_nodes(
            segs in proptest::collection::vec("[a-z]{1,4}", 1..6)
        ) {
            let path = segs.join("/");
            let mut once = PathIndex::new();
            once.insert(&path).unwrap();
            let mut twice = once.clone();
            twice.insert(&path).unwrap();
            prop_assert_eq!(once.nodes.len(), twice.nodes.len());
            prop_assert_eq!(twice.len(), 2);
        }
    }
}
