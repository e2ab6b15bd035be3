//! Conversion between the content tree and manifest entries

use crate::node::{ContentNode, NodeId, NodeKind};
use crate::registry::ContentType;
use crate::tree::{self, ContentTree};
use crate::{Result, resolver};
use content_fs::NormalizedPath;
use content_manifest::entry::NAME;
use content_manifest::{ElementKind, ItemGroup, ManifestEntry};
use std::collections::{BTreeMap, HashSet};

/// Rebuild a tree from manifest entries in document order.
///
/// Intermediate folders are created on demand. Returns the tree and the
/// number of nodes created.
pub(crate) fn build_tree(root_name: &str, entries: &[ManifestEntry]) -> Result<(ContentTree, usize)> {
    let mut tree = ContentTree::new(root_name);
    let mut created = 0;
    let mut seen = HashSet::new();

    for entry in entries {
        let Some(include) = entry.include() else {
            continue;
        };
        let path = resolver::from_include(include);
        let Some(name) = path.file_name() else {
            tracing::warn!(include, "Content item has an empty path, skipping");
            continue;
        };
        if !seen.insert(tree::key(path.as_str())) {
            tracing::warn!(include, "Duplicate content item, skipping");
            continue;
        }

        let directory = path.parent().unwrap_or_default();
        let Some(parent) = ensure_folders(&mut tree, &directory, &mut created)? else {
            tracing::warn!(include, "Content item sits below a file, skipping");
            continue;
        };

        let is_folder = entry.kind() == ElementKind::Folder;
        if let Some(existing) = tree.child(parent, name) {
            let node = tree.node_mut(existing)?;
            if is_folder && node.is_folder() {
                node.entry = entry.clone();
            } else {
                tracing::warn!(include, "Content item clashes with an existing node, skipping");
            }
            continue;
        }

        let kind = if is_folder {
            NodeKind::folder()
        } else {
            NodeKind::file(ContentType::for_file_name(name))
        };
        let id = tree.create(ContentNode::new(name, kind, entry.clone()));
        tree.add_child(parent, id)?;
        created += 1;
    }

    Ok((tree, created))
}

/// Walk `directory` from the root creating missing folders. `None` when a
/// segment names a file.
fn ensure_folders(
    tree: &mut ContentTree,
    directory: &NormalizedPath,
    created: &mut usize,
) -> Result<Option<NodeId>> {
    let mut current = tree.root();
    let mut walked = NormalizedPath::empty();
    for segment in directory.segments() {
        walked = walked.join(segment);
        current = match tree.child(current, segment) {
            Some(id) if tree.node(id)?.is_folder() => id,
            Some(_) => return Ok(None),
            None => {
                let mut entry = ManifestEntry::new(ElementKind::Folder);
                entry.set_include(resolver::to_include(&walked, true));
                let id = tree.create(ContentNode::new(segment, NodeKind::folder(), entry));
                tree.add_child(current, id)?;
                *created += 1;
                id
            }
        };
    }
    Ok(Some(current))
}

/// Bring every entry's `Include` and `Name` in line with the node's
/// current position.
pub(crate) fn refresh_entries(tree: &mut ContentTree) -> Result<()> {
    for id in tree.descendants(tree.root()) {
        let path = tree.path(id)?;
        let node = tree.node_mut(id)?;
        let is_folder = node.is_folder();
        node.entry.set_include(resolver::to_include(&path, is_folder));
        if !is_folder {
            if let Some(stem) = path.file_stem() {
                node.entry.set_metadata(NAME, stem);
            }
        }
    }
    Ok(())
}

/// One item group per content type, in emission order.
///
/// Folders with children are left out; their files' includes imply them.
pub(crate) fn item_groups(tree: &ContentTree) -> Result<Vec<ItemGroup>> {
    let mut buckets: BTreeMap<ContentType, Vec<NodeId>> = BTreeMap::new();
    for id in tree.descendants(tree.root()) {
        let node = tree.node(id)?;
        if node.is_folder() && !node.is_empty() {
            continue;
        }
        buckets.entry(node.content_type()).or_default().push(id);
    }

    let mut groups = Vec::with_capacity(buckets.len());
    for content_type in ContentType::ORDERED {
        let Some(mut ids) = buckets.remove(&content_type) else {
            continue;
        };
        ids.sort_by(|a, b| tree.compare(*a, *b));
        let entries = ids
            .into_iter()
            .map(|id| tree.node(id).map(|node| node.entry.clone()))
            .collect::<Result<Vec<_>>>()?;
        groups.push(ItemGroup::new(entries));
    }
    Ok(groups)
}
