//! Path index node types

/// Position of a node in the index arena. Only a [`super::PathIndex`]
/// hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(super) usize);

/// One path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    pub(super) name: String,
    pub(super) is_dir: bool,
    pub(super) children: Vec<NodeId>, // insertion order, names unique
}

impl DirNode {
    pub(super) fn new(name: &str, is_dir: bool) -> Self {
        Self {
            name: name.to_string(),
            is_dir,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `false` only for leaf (file) segments.
    pub fn is_directory(&self) -> bool {
        self.is_dir
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
