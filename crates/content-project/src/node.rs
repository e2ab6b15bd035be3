//! Content node model

use crate::registry::{self, ContentType};
use content_manifest::ManifestEntry;
use std::collections::HashMap;
use std::fmt;
use std::time::SystemTime;

/// Stable handle of a node inside a [`ContentTree`](crate::ContentTree).
///
/// Handles are never reused, so a handle to a discarded node simply stops
/// resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind-specific node data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Children keyed by lowercased name.
    Folder { children: HashMap<String, NodeId> },
    File { content_type: ContentType },
}

impl NodeKind {
    pub fn folder() -> Self {
        Self::Folder {
            children: HashMap::new(),
        }
    }

    pub fn file(content_type: ContentType) -> Self {
        Self::File { content_type }
    }
}

/// One entry of the content tree.
#[derive(Debug, Clone)]
pub struct ContentNode {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
    pub(crate) entry: ManifestEntry,
    pub(crate) last_modified: Option<SystemTime>,
    pub(crate) cut: bool,
}

impl ContentNode {
    pub(crate) fn new(name: impl Into<String>, kind: NodeKind, entry: ManifestEntry) -> Self {
        Self {
            name: name.into(),
            parent: None,
            kind,
            entry,
            last_modified: None,
            cut: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn content_type(&self) -> ContentType {
        match self.kind {
            NodeKind::Folder { .. } => ContentType::Folder,
            NodeKind::File { content_type } => content_type,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    /// True for a folder without children. Files are never empty.
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            NodeKind::Folder { children } => children.is_empty(),
            NodeKind::File { .. } => false,
        }
    }

    pub fn entry(&self) -> &ManifestEntry {
        &self.entry
    }

    /// Disk timestamp recorded at load, include, or the last refresh.
    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }

    /// Whether the node is the pending source of a cut-and-paste.
    pub fn is_cut(&self) -> bool {
        self.cut
    }

    pub fn importer(&self) -> Option<&str> {
        self.entry.importer()
    }

    pub fn processor(&self) -> Option<&str> {
        self.entry.processor()
    }

    pub fn should_compile(&self) -> bool {
        registry::should_compile(self.content_type(), &self.entry)
    }

    pub fn should_copy_to_output(&self) -> bool {
        registry::should_copy_to_output(&self.entry)
    }

    pub(crate) fn children(&self) -> Option<&HashMap<String, NodeId>> {
        match &self.kind {
            NodeKind::Folder { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }
}
