//! Cut, copy and paste

use crate::node::NodeId;
use crate::project::ContentProject;
use crate::{Error, ErrorPolicy, Result, resolver};
use content_fs::NormalizedPath;

impl ContentProject {
    /// Mark the node at `path` as the pending source of a move-by-paste.
    pub fn cut(&mut self, path: &str) -> Result<()> {
        self.clear_cut();
        let id = resolver::resolve_item(&self.tree, path)?;
        let disk_path = self.disk_path_of(id)?;
        self.tree.node_mut(id)?.cut = true;
        self.cut_node = Some(id);
        self.publish(vec![disk_path]);
        tracing::debug!(path, "Cut");
        Ok(())
    }

    /// Put the disk path of the node at `path` on the clipboard.
    pub fn copy(&mut self, path: &str) -> Result<()> {
        self.clear_cut();
        let id = resolver::resolve_item(&self.tree, path)?;
        let disk_path = self.disk_path_of(id)?;
        self.publish(vec![disk_path]);
        tracing::debug!(path, "Copied");
        Ok(())
    }

    /// The clipboard changed. Anything other than what this project put
    /// there cancels a pending cut.
    pub fn on_clipboard_changed(&mut self) {
        if self.clipboard.file_drop_list() == self.clipboard_snapshot {
            return;
        }
        if self.cut_node.is_some() {
            tracing::debug!("Clipboard overwritten, dropping cut marker");
        }
        self.clear_cut();
        self.clipboard_snapshot = None;
    }

    /// Paste into `destination`: finish a pending cut as a move, or drop the
    /// clipboard's file list there.
    pub fn paste(&mut self, destination: &str, policy: ErrorPolicy) -> Result<Option<Vec<NodeId>>> {
        let result = self.paste_inner(destination);
        self.guard(policy, result)
    }

    fn paste_inner(&mut self, destination: &str) -> Result<Vec<NodeId>> {
        let folder = resolver::resolve_folder(&self.tree, destination)?;

        if let Some(cut) = self.cut_node {
            if cut == folder {
                return Err(Error::PasteIntoSelf {
                    path: self.tree.path(cut)?.to_string(),
                });
            }
            self.move_into(cut, folder)?;
            self.clear_cut();
            self.clipboard.clear();
            self.clipboard_snapshot = None;
            return Ok(vec![cut]);
        }

        let Some(files) = self.clipboard.file_drop_list() else {
            return Ok(Vec::new());
        };
        let originated_here = self.clipboard_snapshot.as_ref() == Some(&files);
        self.drop_into(folder, &files, originated_here)
    }

    fn publish(&mut self, files: Vec<NormalizedPath>) {
        self.clipboard.set_file_drop_list(&files);
        self.clipboard_snapshot = Some(files);
    }
}
