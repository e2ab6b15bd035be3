//! Arena-backed content tree
//!
//! Nodes live in a flat arena addressed by [`NodeId`]. Every node stores its
//! parent handle and every folder stores a lowercased-name map of its
//! children, so both directions are O(1) without shared ownership.

use crate::node::{ContentNode, NodeId, NodeKind};
use crate::ordering::natural_cmp;
use crate::{Error, Result};
use content_fs::NormalizedPath;
use content_manifest::{ElementKind, ManifestEntry};
use std::cmp::Ordering;

pub(crate) fn key(name: &str) -> String {
    name.to_lowercase()
}

#[derive(Debug, Clone)]
pub struct ContentTree {
    nodes: Vec<Option<ContentNode>>,
    root: NodeId,
}

impl ContentTree {
    /// A tree holding only a root folder called `root_name`.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = ContentNode::new(
            root_name,
            NodeKind::folder(),
            ManifestEntry::new(ElementKind::Folder),
        );
        Self {
            nodes: vec![Some(root)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_name(&self) -> &str {
        self.get(self.root).map(|n| n.name()).unwrap_or_default()
    }

    pub fn get(&self, id: NodeId) -> Option<&ContentNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn node(&self, id: NodeId) -> Result<&ContentNode> {
        self.get(id).ok_or_else(|| Error::not_found(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut ContentNode> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::not_found(id))
    }

    /// Store a new, detached node.
    pub(crate) fn create(&mut self, node: ContentNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(node));
        id
    }

    /// Register `child` under `folder`.
    pub fn add_child(&mut self, folder: NodeId, child: NodeId) -> Result<()> {
        let name = self.node(child)?.name.clone();
        let folder_name = self.display_path(folder);
        let NodeKind::Folder { children } = &mut self.node_mut(folder)?.kind else {
            return Err(Error::DirectoryNotFound { path: folder_name });
        };
        if children.contains_key(&key(&name)) {
            return Err(Error::AlreadyExists {
                folder: folder_name,
                name,
            });
        }
        children.insert(key(&name), child);
        self.node_mut(child)?.parent = Some(folder);
        Ok(())
    }

    /// Unregister the child called `name` (case-insensitive) and return it.
    pub fn remove_child(&mut self, folder: NodeId, name: &str) -> Result<NodeId> {
        let folder_name = self.display_path(folder);
        let removed = match &mut self.node_mut(folder)?.kind {
            NodeKind::Folder { children } => children.remove(&key(name)),
            NodeKind::File { .. } => None,
        };
        let child = removed.ok_or_else(|| {
            Error::not_found(NormalizedPath::new(&folder_name).join(name))
        })?;
        self.node_mut(child)?.parent = None;
        Ok(child)
    }

    /// Take `id` out of its parent. The subtree stays in the arena.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        let node = self.node(id)?;
        let Some(parent) = node.parent else {
            return Err(Error::DetachedNode {
                name: node.name.clone(),
            });
        };
        let name = node.name.clone();
        self.remove_child(parent, &name)?;
        Ok(())
    }

    /// Detach `id` if attached and drop it together with its descendants.
    pub fn discard(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::not_found(""));
        }
        if self.node(id)?.parent.is_some() {
            self.detach(id)?;
        }
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for victim in doomed {
            if let Some(slot) = self.nodes.get_mut(victim.0) {
                *slot = None;
            }
        }
        Ok(())
    }

    pub fn child(&self, folder: NodeId, name: &str) -> Option<NodeId> {
        self.get(folder)?.children()?.get(&key(name)).copied()
    }

    /// Children of `folder` in presentation order: folders first, then
    /// natural order by name.
    pub fn children(&self, folder: NodeId) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .get(folder)
            .and_then(ContentNode::children)
            .map(|children| children.values().copied().collect())
            .unwrap_or_default();
        ids.sort_by(|a, b| self.compare_siblings(*a, *b));
        ids
    }

    /// Resolve a `/`-separated path below `folder`.
    ///
    /// Absence is not an error; every segment but the last must be a folder.
    pub fn lookup(&self, folder: NodeId, relative: &NormalizedPath) -> Option<NodeId> {
        relative
            .segments()
            .try_fold(folder, |current, segment| self.child(current, segment))
    }

    /// Project-relative path of `id`. The root's path is empty.
    pub fn path(&self, id: NodeId) -> Result<NormalizedPath> {
        let mut names = Vec::new();
        let mut current = id;
        while current != self.root {
            let node = self.node(current)?;
            names.push(node.name.as_str());
            current = node.parent.ok_or_else(|| Error::DetachedNode {
                name: node.name.clone(),
            })?;
        }
        names.reverse();
        Ok(NormalizedPath::new(names.join("/")))
    }

    /// Folders before files, then natural order of the paths.
    pub fn compare(&self, a: NodeId, b: NodeId) -> Ordering {
        let a_path = self.display_path(a);
        let b_path = self.display_path(b);
        self.folder_rank(a)
            .cmp(&self.folder_rank(b))
            .then_with(|| natural_cmp(&a_path, &b_path))
    }

    /// Every node below `id` in pre-order, siblings in presentation order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.get(node).and_then(|n| n.parent);
        }
        false
    }

    /// Change the name of `id`, keeping its parent's key in step.
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> Result<()> {
        let node = self.node(id)?;
        let old_key = key(&node.name);
        if let Some(parent) = node.parent {
            let folder_name = self.display_path(parent);
            if let NodeKind::Folder { children } = &mut self.node_mut(parent)?.kind {
                if old_key != key(new_name) && children.contains_key(&key(new_name)) {
                    return Err(Error::AlreadyExists {
                        folder: folder_name,
                        name: new_name.to_string(),
                    });
                }
                children.remove(&old_key);
                children.insert(key(new_name), id);
            }
        }
        self.node_mut(id)?.name = new_name.to_string();
        Ok(())
    }

    /// Every live node, attached or not, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ContentNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|node| (NodeId(idx), node)))
    }

    /// Number of live nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.get(self.root).is_none_or(ContentNode::is_empty)
    }

    fn folder_rank(&self, id: NodeId) -> u8 {
        match self.get(id) {
            Some(node) if node.is_folder() => 0,
            _ => 1,
        }
    }

    fn compare_siblings(&self, a: NodeId, b: NodeId) -> Ordering {
        let name = |id| self.get(id).map(|n| n.name.as_str()).unwrap_or_default();
        self.folder_rank(a)
            .cmp(&self.folder_rank(b))
            .then_with(|| natural_cmp(name(a), name(b)))
    }

    /// Path text for messages and ordering; detached nodes fall back to
    /// their name.
    fn display_path(&self, id: NodeId) -> String {
        match self.path(id) {
            Ok(path) => path.to_string(),
            Err(_) => self
                .get(id)
                .map(|n| n.name.clone())
                .unwrap_or_else(|| id.to_string()),
        }
    }
}
