//! Root project controller
//!
//! [`ContentProject`] owns the content tree, the open manifest, the cut
//! state and the collaborator ports. The mutating operations live in
//! `mutator`, `clipboard` and `drop`; this module holds loading, saving,
//! lookup and the bookkeeping they share.

use crate::node::{ContentNode, NodeId, NodeKind};
use crate::ordering::natural_cmp;
use crate::ports::{AssetCompiler, Clipboard, CompileRequest, EditorHost, HeadlessHost, MemoryClipboard};
use crate::registry::{self, ContentType};
use crate::settings::ProjectSettings;
use crate::tree::{self, ContentTree};
use crate::{Error, ErrorPolicy, Result, persist, resolver};
use content_fs::{DiskIo, LocalDisk, NormalizedPath};
use content_manifest::Manifest;
use std::time::SystemTime;

const DEFAULT_ROOT_NAME: &str = "Content";

/// Outcome of opening a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Nodes created, implied folders included
    pub created: usize,
    /// Project paths listed in the manifest but absent on disk, sorted
    pub missing: Vec<String>,
}

/// Outcome of a compile pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    pub compiled: Vec<NormalizedPath>,
    pub failed: Vec<(NormalizedPath, String)>,
}

/// An open content project.
pub struct ContentProject {
    pub(crate) tree: ContentTree,
    pub(crate) manifest: Option<Manifest>,
    pub(crate) manifest_path: Option<NormalizedPath>,
    pub(crate) manifest_stamp: Option<SystemTime>,
    pub(crate) root_dir: NormalizedPath,
    pub(crate) cut_node: Option<NodeId>,
    /// File list this project last put on the clipboard
    pub(crate) clipboard_snapshot: Option<Vec<NormalizedPath>>,
    pub(crate) dirty: bool,
    pub(crate) settings: ProjectSettings,
    pub(crate) disk: Box<dyn DiskIo>,
    pub(crate) host: Box<dyn EditorHost>,
    pub(crate) clipboard: Box<dyn Clipboard>,
}

impl ContentProject {
    pub fn new(disk: Box<dyn DiskIo>, host: Box<dyn EditorHost>, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            tree: ContentTree::new(DEFAULT_ROOT_NAME),
            manifest: None,
            manifest_path: None,
            manifest_stamp: None,
            root_dir: NormalizedPath::empty(),
            cut_node: None,
            clipboard_snapshot: None,
            dirty: false,
            settings: ProjectSettings::default(),
            disk,
            host,
            clipboard,
        }
    }

    /// A project on the local disk with headless collaborators.
    pub fn headless() -> Self {
        Self::new(
            Box::new(LocalDisk::new()),
            Box::new(HeadlessHost::new()),
            Box::new(MemoryClipboard::new()),
        )
    }

    pub fn with_settings(mut self, settings: ProjectSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Write a new, empty manifest at `manifest_path` and open it.
    pub fn create(&mut self, manifest_path: impl Into<NormalizedPath>) -> Result<LoadReport> {
        let path = manifest_path.into();
        if self.disk.exists(&path) {
            return Err(Error::AlreadyExists {
                folder: path.parent().unwrap_or_default().to_string(),
                name: path.file_name().unwrap_or_default().to_string(),
            });
        }

        let manifest = Manifest::empty(&self.settings.manifest.tools_version);
        let xml = manifest.render(&[], self.settings.manifest.indent)?;
        if let Some(dir) = path.parent().filter(|dir| !dir.is_empty()) {
            self.disk.create_dir(&dir)?;
        }
        self.disk.write_text(&path, &xml)?;
        tracing::info!(path = %path, "Created content project");

        self.load_manifest(path)
    }

    /// Open the manifest at `path`, replacing the current tree.
    ///
    /// On failure the project falls back to an empty, unnamed state and the
    /// error is returned. Files missing on disk do not fail the load.
    pub fn load_manifest(&mut self, path: impl Into<NormalizedPath>) -> Result<LoadReport> {
        let path = path.into();
        let root_name = path.file_stem().unwrap_or(DEFAULT_ROOT_NAME).to_string();

        let loaded = Manifest::load(&path).map_err(Error::from).and_then(|manifest| {
            let (tree, created) = persist::build_tree(&root_name, manifest.entries())?;
            Ok((manifest, tree, created))
        });
        let (manifest, tree, created) = match loaded {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::warn!(path = %path, error = %err, "Failed to load manifest");
                self.reset();
                return Err(err);
            }
        };

        self.clear_cut();
        self.tree = tree;
        self.manifest = Some(manifest);
        self.root_dir = path.parent().unwrap_or_default();
        self.manifest_stamp = self.disk.modified(&path).ok();
        self.manifest_path = Some(path.clone());
        self.clipboard_snapshot = None;
        self.dirty = false;

        let missing = self.stamp_all();
        if !missing.is_empty() {
            tracing::warn!(count = missing.len(), "Some content files are missing");
            if self.settings.load.report_missing_files {
                self.host.missing_files(&missing);
            }
        }

        tracing::info!(path = %path, nodes = created, "Loaded content project");
        Ok(LoadReport { created, missing })
    }

    /// Rewrite the manifest from the current tree.
    pub fn save_manifest(&mut self) -> Result<()> {
        let path = self.manifest_path.clone().ok_or(Error::NoManifest)?;
        persist::refresh_entries(&mut self.tree)?;
        let groups = persist::item_groups(&self.tree)?;
        let manifest = self.manifest.as_mut().ok_or(Error::NoManifest)?;
        manifest.save(self.disk.as_ref(), &path, groups, self.settings.manifest.indent)?;

        self.manifest_stamp = self.disk.modified(&path).ok();
        self.dirty = false;
        Ok(())
    }

    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn name(&self) -> &str {
        self.tree.root_name()
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    pub fn manifest_path(&self) -> Option<&NormalizedPath> {
        self.manifest_path.as_ref()
    }

    /// Directory holding the manifest; every node's disk path lies below it.
    pub fn root_dir(&self) -> &NormalizedPath {
        &self.root_dir
    }

    /// Whether the tree changed since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn cut_node(&self) -> Option<NodeId> {
        self.cut_node
    }

    pub fn find(&self, path: &str) -> Option<NodeId> {
        resolver::resolve(&self.tree, path)
    }

    pub fn get(&self, path: &str) -> Option<&ContentNode> {
        self.find(path).and_then(|id| self.tree.get(id))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    pub fn node(&self, id: NodeId) -> Result<&ContentNode> {
        self.tree.node(id)
    }

    pub fn path_of(&self, id: NodeId) -> Result<NormalizedPath> {
        self.tree.path(id)
    }

    pub fn disk_path_of(&self, id: NodeId) -> Result<NormalizedPath> {
        resolver::disk_path(&self.tree, &self.root_dir, id)
    }

    /// Set one metadata value on the node at `path`.
    pub fn set_metadata(&mut self, path: &str, key: &str, value: &str) -> Result<()> {
        let id = resolver::resolve_item(&self.tree, path)?;
        self.tree.node_mut(id)?.entry.set_metadata(key, value);
        self.dirty = true;
        Ok(())
    }

    /// Whether the file behind `id` changed on disk since its timestamp was
    /// last recorded.
    pub fn is_file_outdated(&self, id: NodeId) -> bool {
        let (Ok(node), Ok(path)) = (self.tree.node(id), self.disk_path_of(id)) else {
            return false;
        };
        match self.disk.modified(&path) {
            Ok(stamp) => node.last_modified != Some(stamp),
            Err(_) => false,
        }
    }

    /// Every outdated file, each reported to the editor host. The tree is
    /// left untouched.
    pub fn poll_outdated(&self) -> Vec<NodeId> {
        let outdated: Vec<NodeId> = self
            .tree
            .descendants(self.tree.root())
            .into_iter()
            .filter(|id| self.tree.get(*id).is_some_and(|node| !node.is_folder()))
            .filter(|id| self.is_file_outdated(*id))
            .collect();
        for id in &outdated {
            if let Ok(path) = self.tree.path(*id) {
                tracing::debug!(path = %path, "Content file changed on disk");
                self.host.file_changed(&path);
            }
        }
        outdated
    }

    /// Record the current disk timestamp of `id`.
    pub fn refresh_timestamp(&mut self, id: NodeId) -> Result<()> {
        let path = self.disk_path_of(id)?;
        let stamp = self.disk.modified(&path)?;
        self.tree.node_mut(id)?.last_modified = Some(stamp);
        Ok(())
    }

    pub fn is_manifest_outdated(&self) -> bool {
        let Some(path) = &self.manifest_path else {
            return false;
        };
        match self.disk.modified(path) {
            Ok(stamp) => self.manifest_stamp != Some(stamp),
            Err(_) => false,
        }
    }

    /// Hand every file that should compile to `compiler`, in tree order.
    pub fn compile(&self, compiler: &dyn AssetCompiler) -> CompileReport {
        let mut report = CompileReport::default();
        for id in self.tree.descendants(self.tree.root()) {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            if node.is_folder() || !node.should_compile() {
                continue;
            }
            let (Ok(path), Ok(source)) = (self.tree.path(id), self.disk_path_of(id)) else {
                continue;
            };
            let request = CompileRequest {
                path: path.clone(),
                source,
                content_type: node.content_type(),
                name: node.name().to_string(),
                importer: node.importer().map(str::to_string),
                processor: node.processor().map(str::to_string),
            };
            match compiler.compile(&request) {
                Ok(()) => report.compiled.push(path),
                Err(err) => {
                    tracing::warn!(path = %path, error = %err, "Asset failed to compile");
                    report.failed.push((path, err.to_string()));
                }
            }
        }
        report
    }

    /// Apply the error policy to the outcome of an operation.
    pub(crate) fn guard<T>(&self, policy: ErrorPolicy, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if policy == ErrorPolicy::Report && err.is_io() => {
                tracing::warn!(error = %err, "Content operation failed");
                self.host.show_error(&err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub(crate) fn clear_cut(&mut self) {
        if let Some(id) = self.cut_node.take() {
            if let Ok(node) = self.tree.node_mut(id) {
                node.cut = false;
            }
        }
    }

    pub(crate) fn ensure_free(&self, folder: NodeId, name: &str) -> Result<()> {
        if self.tree.child(folder, name).is_some() {
            return Err(Error::AlreadyExists {
                folder: self.tree.path(folder)?.to_string(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Close editors on `id` and everything below it, and drop the cut
    /// marker if it sits in that subtree.
    pub(crate) fn release(&mut self, id: NodeId) -> Result<()> {
        let mut affected = vec![id];
        affected.extend(self.tree.descendants(id));
        for node in &affected {
            if let Ok(path) = self.tree.path(*node) {
                self.host.close_editor(&path, true);
            }
        }
        if self.cut_node.is_some_and(|cut| affected.contains(&cut)) {
            self.clear_cut();
        }
        Ok(())
    }

    /// Build a detached node, or subtree, for whatever is at `disk_path`.
    pub(crate) fn build_from_disk(&mut self, name: &str, disk_path: &NormalizedPath) -> Result<NodeId> {
        let (kind, entry) = if self.disk.is_dir(disk_path) {
            (NodeKind::folder(), registry::new_entry(ContentType::Folder, name))
        } else {
            let content_type = ContentType::for_file_name(name);
            (NodeKind::file(content_type), registry::new_entry(content_type, name))
        };
        let is_folder = matches!(kind, NodeKind::Folder { .. });
        let mut node = ContentNode::new(name, kind, entry);
        node.last_modified = self.disk.modified(disk_path).ok();
        let id = self.tree.create(node);

        if is_folder {
            if let Err(err) = self.merge(id, disk_path) {
                self.tree.discard(id)?;
                return Err(err);
            }
        }
        Ok(id)
    }

    /// Register whatever lies under `disk_path` but is not yet a child of
    /// `folder`. Nothing is attached unless every entry could be read.
    pub(crate) fn merge(&mut self, folder: NodeId, disk_path: &NormalizedPath) -> Result<Vec<NodeId>> {
        let mut pending = Vec::new();
        if let Err(err) = self.collect_unregistered(folder, disk_path, &mut pending) {
            for (_, child) in pending {
                self.tree.discard(child)?;
            }
            return Err(err);
        }
        let mut added = Vec::with_capacity(pending.len());
        for (parent, child) in pending {
            self.tree.add_child(parent, child)?;
            added.push(child);
        }
        Ok(added)
    }

    fn collect_unregistered(
        &mut self,
        folder: NodeId,
        disk_path: &NormalizedPath,
        pending: &mut Vec<(NodeId, NodeId)>,
    ) -> Result<()> {
        for entry in self.disk.read_dir(disk_path)? {
            let Some(name) = entry.file_name().map(str::to_string) else {
                continue;
            };
            match self.tree.child(folder, &name) {
                Some(existing) => {
                    if self.tree.node(existing)?.is_folder() && self.disk.is_dir(&entry) {
                        self.collect_unregistered(existing, &entry, pending)?;
                    }
                }
                None if pending.iter().any(|(p, c)| *p == folder && self.is_named(*c, &name)) => {}
                None => {
                    let child = self.build_from_disk(&name, &entry)?;
                    pending.push((folder, child));
                }
            }
        }
        Ok(())
    }

    fn is_named(&self, id: NodeId, name: &str) -> bool {
        self.tree
            .get(id)
            .is_some_and(|node| tree::key(node.name()) == tree::key(name))
    }

    fn stamp_all(&mut self) -> Vec<String> {
        let mut missing = Vec::new();
        for id in self.tree.descendants(self.tree.root()) {
            let (Ok(path), Ok(disk_path)) = (self.tree.path(id), self.disk_path_of(id)) else {
                continue;
            };
            match self.disk.modified(&disk_path) {
                Ok(stamp) => {
                    if let Ok(node) = self.tree.node_mut(id) {
                        node.last_modified = Some(stamp);
                    }
                }
                Err(_) => missing.push(path.to_string()),
            }
        }
        missing.sort_by(|a, b| natural_cmp(a, b));
        missing
    }

    fn reset(&mut self) {
        self.tree = ContentTree::new(DEFAULT_ROOT_NAME);
        self.manifest = None;
        self.manifest_path = None;
        self.manifest_stamp = None;
        self.root_dir = NormalizedPath::empty();
        self.cut_node = None;
        self.clipboard_snapshot = None;
        self.dirty = false;
    }
}
