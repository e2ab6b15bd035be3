//! Path resolution between project paths, manifest includes, nodes and disk

use crate::node::NodeId;
use crate::tree::ContentTree;
use crate::{Error, Result};
use content_fs::NormalizedPath;

/// Normalize a project path as typed by a caller or read from a manifest.
///
/// Either separator is accepted and a trailing separator is dropped.
pub fn normalize(path: &str) -> NormalizedPath {
    NormalizedPath::new(path)
}

/// `Include` attribute for a project path: backslash separated, folders
/// ending in a backslash.
pub fn to_include(path: &NormalizedPath, is_folder: bool) -> String {
    let mut include = path.as_str().replace('/', "\\");
    if is_folder && !include.is_empty() {
        include.push('\\');
    }
    include
}

pub fn from_include(include: &str) -> NormalizedPath {
    normalize(include)
}

/// The node at `path`, the root for an empty path.
pub fn resolve(tree: &ContentTree, path: &str) -> Option<NodeId> {
    tree.lookup(tree.root(), &normalize(path))
}

/// The node at `path`, which must exist and must not be the root.
pub fn resolve_item(tree: &ContentTree, path: &str) -> Result<NodeId> {
    match resolve(tree, path) {
        Some(id) if id != tree.root() => Ok(id),
        _ => Err(Error::not_found(normalize(path))),
    }
}

/// The folder at `path`; the root for an empty path.
pub fn resolve_folder(tree: &ContentTree, path: &str) -> Result<NodeId> {
    resolve(tree, path)
        .filter(|id| tree.get(*id).is_some_and(|node| node.is_folder()))
        .ok_or_else(|| Error::DirectoryNotFound {
            path: normalize(path).to_string(),
        })
}

/// Absolute disk location of `id` below the project directory `root_dir`.
pub fn disk_path(tree: &ContentTree, root_dir: &NormalizedPath, id: NodeId) -> Result<NormalizedPath> {
    let relative = tree.path(id)?;
    if relative.is_empty() {
        return Ok(root_dir.clone());
    }
    Ok(root_dir.join(relative.as_str()))
}
