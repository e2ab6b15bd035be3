//! Tree mutations
//!
//! Each operation checks its preconditions, performs the disk step, and
//! only then changes the tree. Delete is the exception: the node leaves
//! the project first and the disk delete follows.

use crate::node::{NodeId, NodeKind};
use crate::project::ContentProject;
use crate::registry::{self, ContentType};
use crate::{Error, ErrorPolicy, Result, names, resolver, tree};
use content_fs::NormalizedPath;

/// Leaf name of an incoming disk path.
pub(crate) fn source_name(source: &NormalizedPath) -> Result<String> {
    source
        .file_name()
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidName {
            name: source.to_string(),
            reason: "path has no file name",
        })
}

fn kind_label(is_folder: bool) -> &'static str {
    if is_folder { "folder" } else { "file" }
}

impl ContentProject {
    /// Add the file or directory at `source` to the folder `destination`,
    /// copying it there first unless it already lives there.
    pub fn include(
        &mut self,
        source: impl Into<NormalizedPath>,
        destination: &str,
        policy: ErrorPolicy,
    ) -> Result<Option<NodeId>> {
        let source = source.into();
        let result = resolver::resolve_folder(&self.tree, destination).and_then(|folder| {
            let name = source_name(&source)?;
            self.include_into(folder, &source, &name)
        });
        self.guard(policy, result)
    }

    /// Remove the node at `path` from the project. Disk is left alone.
    pub fn exclude(&mut self, path: &str, policy: ErrorPolicy) -> Result<()> {
        let result = self.exclude_inner(path);
        self.guard(policy, result).map(|_| ())
    }

    /// Swap the content behind the existing node at `path` for `source`.
    pub fn replace(
        &mut self,
        path: &str,
        source: impl Into<NormalizedPath>,
        policy: ErrorPolicy,
    ) -> Result<Option<NodeId>> {
        let source = source.into();
        let result = self.replace_inner(path, &source);
        self.guard(policy, result)
    }

    /// Move the node at `path` into the folder `destination`.
    pub fn move_node(&mut self, path: &str, destination: &str, policy: ErrorPolicy) -> Result<()> {
        let result = resolver::resolve_item(&self.tree, path).and_then(|id| {
            let folder = resolver::resolve_folder(&self.tree, destination)?;
            self.move_into(id, folder)
        });
        self.guard(policy, result).map(|_| ())
    }

    pub fn rename(&mut self, path: &str, new_name: &str, policy: ErrorPolicy) -> Result<()> {
        let result = self.rename_inner(path, new_name);
        self.guard(policy, result).map(|_| ())
    }

    /// Remove the node at `path` from the project and delete it from disk.
    ///
    /// The node is gone from the tree even when the disk delete fails.
    pub fn delete(&mut self, path: &str, policy: ErrorPolicy) -> Result<()> {
        let result = self.delete_inner(path);
        self.guard(policy, result).map(|_| ())
    }

    /// Create a directory under `destination` and register it. Without a
    /// name the configured base name is made unique.
    pub fn new_folder(
        &mut self,
        destination: &str,
        name: Option<&str>,
        policy: ErrorPolicy,
    ) -> Result<Option<NodeId>> {
        let result = self.create_inner(destination, name, true);
        self.guard(policy, result)
    }

    /// Create an empty file under `destination` and register it.
    pub fn new_file(
        &mut self,
        destination: &str,
        name: Option<&str>,
        policy: ErrorPolicy,
    ) -> Result<Option<NodeId>> {
        let result = self.create_inner(destination, name, false);
        self.guard(policy, result)
    }

    pub(crate) fn include_into(&mut self, folder: NodeId, source: &NormalizedPath, name: &str) -> Result<NodeId> {
        names::validate_name(name)?;
        self.ensure_free(folder, name)?;
        let target = self.disk_path_of(folder)?.join(name);

        if source.same_location(&target) {
            if !self.disk.exists(&target) {
                return Err(Error::not_found(source));
            }
        } else {
            self.disk.copy(source, &target)?;
        }

        let id = self.build_from_disk(name, &target)?;
        self.tree.add_child(folder, id)?;
        self.dirty = true;
        tracing::debug!(path = %self.tree.path(id)?, "Included");
        Ok(id)
    }

    fn exclude_inner(&mut self, path: &str) -> Result<()> {
        let id = resolver::resolve_item(&self.tree, path)?;
        self.release(id)?;
        self.tree.discard(id)?;
        self.dirty = true;
        tracing::debug!(path, "Excluded");
        Ok(())
    }

    fn replace_inner(&mut self, path: &str, source: &NormalizedPath) -> Result<NodeId> {
        let normalized = resolver::normalize(path);
        let directory = normalized.parent().unwrap_or_default();
        let folder = resolver::resolve_folder(&self.tree, directory.as_str())?;
        let existing = normalized
            .file_name()
            .and_then(|name| self.tree.child(folder, name))
            .ok_or_else(|| Error::not_found(&normalized))?;
        self.replace_node(existing, source)
    }

    pub(crate) fn replace_node(&mut self, existing: NodeId, source: &NormalizedPath) -> Result<NodeId> {
        let fresh = self.swap_node(existing, source)?;
        self.tree.discard(existing)?;
        Ok(fresh)
    }

    /// Put a node built from `source` where `existing` was. `existing` is
    /// left detached in the arena for the caller to discard or restore.
    pub(crate) fn swap_node(&mut self, existing: NodeId, source: &NormalizedPath) -> Result<NodeId> {
        let node = self.tree.node(existing)?;
        let name = node.name().to_string();
        let is_folder = node.is_folder();
        let folder = node.parent().ok_or_else(|| Error::DetachedNode { name: name.clone() })?;

        let incoming_folder = self.disk.is_dir(source);
        if is_folder != incoming_folder {
            return Err(Error::KindMismatch {
                path: self.tree.path(existing)?.to_string(),
                existing: kind_label(is_folder),
                incoming: kind_label(incoming_folder),
            });
        }

        let target = self.disk_path_of(existing)?;
        if !source.same_location(&target) {
            self.disk.copy(source, &target)?;
        }

        let fresh = self.build_from_disk(&name, &target)?;
        self.release(existing)?;
        self.tree.detach(existing)?;
        self.tree.add_child(folder, fresh)?;
        self.dirty = true;
        tracing::debug!(path = %self.tree.path(fresh)?, "Replaced");
        Ok(fresh)
    }

    pub(crate) fn move_into(&mut self, id: NodeId, folder: NodeId) -> Result<()> {
        let source_path = self.tree.path(id)?;
        let destination_path = self.tree.path(folder)?;
        let node = self.tree.node(id)?;

        if node.is_folder() && destination_path.is_within(&source_path) {
            return Err(Error::SelfSubdirectory {
                path: source_path.to_string(),
                destination: destination_path.to_string(),
            });
        }
        if node.parent() == Some(folder) {
            tracing::debug!(path = %source_path, "Already in destination");
            return Ok(());
        }

        let name = node.name().to_string();
        self.ensure_free(folder, &name)?;
        let from = self.disk_path_of(id)?;
        let to = self.disk_path_of(folder)?.join(&name);
        self.disk.rename(&from, &to)?;

        self.tree.detach(id)?;
        self.tree.add_child(folder, id)?;
        self.dirty = true;
        tracing::debug!(from = %source_path, to = %destination_path, "Moved");
        Ok(())
    }

    fn rename_inner(&mut self, path: &str, new_name: &str) -> Result<()> {
        let id = resolver::resolve_item(&self.tree, path)?;
        let node = self.tree.node(id)?;
        let old_name = node.name().to_string();
        if old_name == new_name {
            return Ok(());
        }
        names::validate_name(new_name)?;

        let parent = node.parent().ok_or_else(|| Error::DetachedNode { name: old_name.clone() })?;
        let case_only = tree::key(&old_name) == tree::key(new_name);
        if !case_only {
            self.ensure_free(parent, new_name)?;
        }

        let from = self.disk_path_of(id)?;
        let to = from.with_file_name(new_name);
        if case_only && self.disk.exists(&to) {
            tracing::debug!(path = %from, new_name, "Case-only rename, disk untouched");
        } else {
            self.disk.rename(&from, &to)?;
        }

        self.tree.rename(id, new_name)?;
        self.reclassify(id)?;
        self.dirty = true;
        tracing::debug!(from = %old_name, to = new_name, "Renamed");
        Ok(())
    }

    /// Follow a file's extension to its new content type, resetting the
    /// pipeline when the type changes.
    fn reclassify(&mut self, id: NodeId) -> Result<()> {
        let node = self.tree.node_mut(id)?;
        let NodeKind::File { content_type } = node.kind else {
            return Ok(());
        };
        let reclassified = ContentType::for_file_name(&node.name);
        if reclassified != content_type {
            node.kind = NodeKind::file(reclassified);
            registry::reset_pipeline(&mut node.entry, reclassified);
        }
        Ok(())
    }

    fn delete_inner(&mut self, path: &str) -> Result<()> {
        let id = resolver::resolve_item(&self.tree, path)?;
        let target = self.disk_path_of(id)?;
        self.release(id)?;
        self.tree.discard(id)?;
        self.dirty = true;
        tracing::debug!(path, "Deleted from project");

        Ok(self.disk.delete(&target)?)
    }

    fn create_inner(&mut self, destination: &str, name: Option<&str>, folder_kind: bool) -> Result<NodeId> {
        let folder = resolver::resolve_folder(&self.tree, destination)?;
        let dir = self.disk_path_of(folder)?;

        let name = match name {
            Some(name) => {
                names::validate_name(name)?;
                self.ensure_free(folder, name)?;
                name.to_string()
            }
            None => {
                let naming = &self.settings.naming;
                let base = if folder_kind { &naming.new_folder } else { &naming.new_file };
                names::unique_name(base, |candidate| {
                    self.tree.child(folder, candidate).is_some() || self.disk.exists(&dir.join(candidate))
                })
            }
        };

        let target = dir.join(&name);
        if folder_kind {
            self.disk.create_dir(&target)?;
        } else {
            self.disk.create_file(&target)?;
        }

        let id = self.build_from_disk(&name, &target)?;
        self.tree.add_child(folder, id)?;
        self.dirty = true;
        tracing::debug!(path = %self.tree.path(id)?, "Created");
        Ok(id)
    }
}
