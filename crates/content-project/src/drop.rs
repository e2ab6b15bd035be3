//! Dropping a batch of disk paths onto a folder
//!
//! A batch is planned in full before anything changes: every path is sorted
//! into include, duplicate, replace or merge, conflicts are confirmed once
//! per category, and only then is the plan carried out. If a step fails
//! part way, the steps already taken are undone in the tree before the
//! error is returned.

use crate::node::NodeId;
use crate::ports::{Confirmation, ConfirmPrompt};
use crate::project::ContentProject;
use crate::{Error, ErrorPolicy, Result, names, resolver, tree};
use content_fs::NormalizedPath;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropAction {
    Include,
    /// Already registered at the destination; include a suffixed copy.
    Duplicate,
    Replace(NodeId),
    Merge(NodeId),
}

/// What one applied step did, so it can be undone.
#[derive(Debug)]
enum Applied {
    /// `created` is set when the step put a new file or directory on disk.
    Added { id: NodeId, created: Option<NormalizedPath> },
    Replaced { fresh: NodeId, old: NodeId, folder: NodeId },
    Merged(Vec<NodeId>),
}

#[derive(Debug, Clone)]
struct DropItem {
    source: NormalizedPath,
    name: String,
    action: DropAction,
}

impl ContentProject {
    /// Bring `files` into the folder `destination`.
    ///
    /// Returns the nodes created or replaced. A `Cancel` answer to either
    /// confirmation returns an empty list with nothing changed.
    pub fn drop_files(
        &mut self,
        files: &[NormalizedPath],
        destination: &str,
        policy: ErrorPolicy,
    ) -> Result<Option<Vec<NodeId>>> {
        let result = resolver::resolve_folder(&self.tree, destination)
            .and_then(|folder| self.drop_into(folder, files, false));
        self.guard(policy, result)
    }

    pub(crate) fn drop_into(
        &mut self,
        folder: NodeId,
        files: &[NormalizedPath],
        originated_here: bool,
    ) -> Result<Vec<NodeId>> {
        let mut plan = self.plan_drop(folder, files, originated_here)?;

        for category in [Category::Replace, Category::Merge] {
            let names: Vec<String> = plan
                .iter()
                .filter(|item| category.matches(item.action))
                .map(|item| item.name.clone())
                .collect();
            if names.is_empty() {
                continue;
            }
            match self.host.confirm(&category.prompt(names)) {
                Confirmation::Yes => {}
                Confirmation::No => plan.retain(|item| !category.matches(item.action)),
                Confirmation::Cancel => {
                    tracing::info!(files = files.len(), "Drop cancelled");
                    return Ok(Vec::new());
                }
            }
        }

        let was_dirty = self.dirty;
        let mut applied = Vec::with_capacity(plan.len());
        for item in &plan {
            match self.apply_drop(folder, item) {
                Ok(step) => applied.push(step),
                Err(err) => {
                    tracing::warn!(source = %item.source, error = %err, "Drop failed, undoing batch");
                    self.roll_back(applied);
                    self.dirty = was_dirty;
                    return Err(err);
                }
            }
        }

        let mut touched = Vec::with_capacity(applied.len());
        for step in applied {
            match step {
                Applied::Added { id, .. } => touched.push(id),
                Applied::Replaced { fresh, old, .. } => {
                    self.tree.discard(old)?;
                    touched.push(fresh);
                }
                Applied::Merged(ids) => touched.extend(ids),
            }
        }
        Ok(touched)
    }

    fn apply_drop(&mut self, folder: NodeId, item: &DropItem) -> Result<Applied> {
        match item.action {
            DropAction::Include => {
                let target = self.disk_path_of(folder)?.join(&item.name);
                let fresh_on_disk = !item.source.same_location(&target) && !self.disk.exists(&target);
                let created = fresh_on_disk.then_some(target);
                let id = self.include_into(folder, &item.source, &item.name)?;
                Ok(Applied::Added { id, created })
            }
            DropAction::Duplicate => {
                let id = self.duplicate_into(folder, &item.source, &item.name)?;
                let created = self.disk_path_of(id)?;
                Ok(Applied::Added {
                    id,
                    created: Some(created),
                })
            }
            DropAction::Replace(existing) => {
                let fresh = self.swap_node(existing, &item.source)?;
                Ok(Applied::Replaced {
                    fresh,
                    old: existing,
                    folder,
                })
            }
            DropAction::Merge(existing) => {
                let target = self.disk_path_of(existing)?;
                if !item.source.same_location(&target) {
                    self.disk.copy(&item.source, &target)?;
                }
                let added = self.merge(existing, &target)?;
                self.dirty = true;
                Ok(Applied::Merged(added))
            }
        }
    }

    /// Undo `applied` newest first. Replaced files keep their new content on
    /// disk; only files this batch created are removed.
    fn roll_back(&mut self, applied: Vec<Applied>) {
        for step in applied.into_iter().rev() {
            if let Err(err) = self.undo(step) {
                tracing::warn!(error = %err, "Could not undo drop step");
            }
        }
    }

    fn undo(&mut self, step: Applied) -> Result<()> {
        match step {
            Applied::Added { id, created } => {
                self.release(id)?;
                self.tree.discard(id)?;
                if let Some(path) = created {
                    self.disk.delete(&path)?;
                }
            }
            Applied::Replaced { fresh, old, folder } => {
                self.release(fresh)?;
                self.tree.discard(fresh)?;
                self.tree.add_child(folder, old)?;
            }
            Applied::Merged(ids) => {
                for id in ids.into_iter().rev() {
                    if self.tree.get(id).is_some() {
                        self.tree.discard(id)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn plan_drop(
        &self,
        folder: NodeId,
        files: &[NormalizedPath],
        originated_here: bool,
    ) -> Result<Vec<DropItem>> {
        let dir = self.disk_path_of(folder)?;
        let mut seen = HashSet::new();
        let mut plan = Vec::with_capacity(files.len());

        for source in files {
            if !self.disk.exists(source) {
                return Err(Error::not_found(source));
            }
            let name = crate::mutator::source_name(source)?;
            names::validate_name(&name)?;
            if !seen.insert(tree::key(&name)) {
                return Err(Error::AlreadyExists {
                    folder: self.tree.path(folder)?.to_string(),
                    name,
                });
            }

            let existing = self.tree.child(folder, &name);
            let action = if source.same_location(&dir.join(&name)) {
                match existing {
                    None => DropAction::Include,
                    Some(_) if originated_here => DropAction::Duplicate,
                    Some(_) => {
                        tracing::debug!(%source, "Already registered at destination, skipping");
                        continue;
                    }
                }
            } else {
                match existing {
                    None => DropAction::Include,
                    Some(id) => {
                        let existing_folder = self.tree.node(id)?.is_folder();
                        let incoming_folder = self.disk.is_dir(source);
                        if existing_folder != incoming_folder {
                            return Err(Error::KindMismatch {
                                path: self.tree.path(id)?.to_string(),
                                existing: if existing_folder { "folder" } else { "file" },
                                incoming: if incoming_folder { "folder" } else { "file" },
                            });
                        }
                        if existing_folder {
                            DropAction::Merge(id)
                        } else {
                            DropAction::Replace(id)
                        }
                    }
                }
            };
            plan.push(DropItem {
                source: source.clone(),
                name,
                action,
            });
        }
        Ok(plan)
    }

    fn duplicate_into(&mut self, folder: NodeId, source: &NormalizedPath, name: &str) -> Result<NodeId> {
        let dir = self.disk_path_of(folder)?;
        let copy = names::copy_name(name, &self.settings.naming.copy_suffix, |candidate| {
            self.tree.child(folder, candidate).is_some() || self.disk.exists(&dir.join(candidate))
        });
        let target = dir.join(&copy);
        self.disk.copy(source, &target)?;
        self.include_into(folder, &target, &copy)
    }
}

#[derive(Debug, Clone, Copy)]
enum Category {
    Replace,
    Merge,
}

impl Category {
    fn matches(&self, action: DropAction) -> bool {
        matches!(
            (self, action),
            (Self::Replace, DropAction::Replace(_)) | (Self::Merge, DropAction::Merge(_))
        )
    }

    fn prompt(&self, names: Vec<String>) -> ConfirmPrompt {
        match self {
            Self::Replace => ConfirmPrompt::ReplaceFiles { names },
            Self::Merge => ConfirmPrompt::MergeFolders { names },
        }
    }
}
