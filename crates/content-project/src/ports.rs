//! Collaborator ports and their headless implementations
//!
//! The project never talks to a window system directly. Dialogs, open
//! editors, the system clipboard and the asset compiler are reached through
//! the traits below, handed to [`ContentProject`](crate::ContentProject) at
//! construction.

use crate::registry::ContentType;
use crate::{Error, ErrorKind};
use content_fs::NormalizedPath;
use std::cell::RefCell;
use std::rc::Rc;

/// Answer to a yes/no/cancel question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Confirmation {
    #[default]
    Yes,
    No,
    Cancel,
}

/// A question asked once per drop batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmPrompt {
    /// Incoming files would overwrite these registered files.
    ReplaceFiles { names: Vec<String> },
    /// Incoming directories would be merged into these registered folders.
    MergeFolders { names: Vec<String> },
}

/// Windows and dialogs of the hosting editor.
pub trait EditorHost {
    /// Close any document open on `path`. `force` discards unsaved changes.
    fn close_editor(&self, path: &NormalizedPath, force: bool);

    /// Present a failure to the user.
    fn show_error(&self, error: &Error);

    fn confirm(&self, prompt: &ConfirmPrompt) -> Confirmation;

    /// Files listed in the manifest but absent on disk, reported after load.
    fn missing_files(&self, paths: &[String]);

    /// A file was changed outside the editor.
    fn file_changed(&self, path: &NormalizedPath);
}

/// The system clipboard, restricted to file-drop lists.
pub trait Clipboard {
    fn set_file_drop_list(&self, paths: &[NormalizedPath]);

    /// `None` when the clipboard holds anything other than a file list.
    fn file_drop_list(&self) -> Option<Vec<NormalizedPath>>;

    fn clear(&self);
}

/// Everything the asset compiler needs to build one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    /// Project-relative path
    pub path: NormalizedPath,
    /// Absolute source file
    pub source: NormalizedPath,
    pub content_type: ContentType,
    pub name: String,
    pub importer: Option<String>,
    pub processor: Option<String>,
}

/// External compile hook.
pub trait AssetCompiler {
    fn compile(
        &self,
        request: &CompileRequest,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<F> AssetCompiler for F
where
    F: Fn(&CompileRequest) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>,
{
    fn compile(
        &self,
        request: &CompileRequest,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self(request)
    }
}

#[derive(Debug, Default)]
struct HostState {
    replace_answer: Confirmation,
    merge_answer: Confirmation,
    prompts: Vec<ConfirmPrompt>,
    errors: Vec<(ErrorKind, String)>,
    closed: Vec<(NormalizedPath, bool)>,
    missing: Vec<String>,
    changed: Vec<NormalizedPath>,
}

/// [`EditorHost`] without a user interface.
///
/// Confirmations are answered from configuration and every other call is
/// recorded. Clones share state, so keep one to inspect what the project did.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    state: Rc<RefCell<HostState>>,
}

impl HeadlessHost {
    /// A host that answers `Yes` to everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// A host that gives `answer` to every prompt.
    pub fn answering(answer: Confirmation) -> Self {
        let host = Self::new();
        host.set_answers(answer, answer);
        host
    }

    pub fn set_answers(&self, replace: Confirmation, merge: Confirmation) {
        let mut state = self.state.borrow_mut();
        state.replace_answer = replace;
        state.merge_answer = merge;
    }

    pub fn prompts(&self) -> Vec<ConfirmPrompt> {
        self.state.borrow().prompts.clone()
    }

    /// Kinds and messages of every error shown.
    pub fn errors(&self) -> Vec<(ErrorKind, String)> {
        self.state.borrow().errors.clone()
    }

    /// `(path, force)` of every editor close request.
    pub fn closed_editors(&self) -> Vec<(NormalizedPath, bool)> {
        self.state.borrow().closed.clone()
    }

    pub fn missing(&self) -> Vec<String> {
        self.state.borrow().missing.clone()
    }

    pub fn changed(&self) -> Vec<NormalizedPath> {
        self.state.borrow().changed.clone()
    }
}

impl EditorHost for HeadlessHost {
    fn close_editor(&self, path: &NormalizedPath, force: bool) {
        self.state.borrow_mut().closed.push((path.clone(), force));
    }

    fn show_error(&self, error: &Error) {
        self.state
            .borrow_mut()
            .errors
            .push((error.kind(), error.to_string()));
    }

    fn confirm(&self, prompt: &ConfirmPrompt) -> Confirmation {
        let mut state = self.state.borrow_mut();
        state.prompts.push(prompt.clone());
        match prompt {
            ConfirmPrompt::ReplaceFiles { .. } => state.replace_answer,
            ConfirmPrompt::MergeFolders { .. } => state.merge_answer,
        }
    }

    fn missing_files(&self, paths: &[String]) {
        self.state.borrow_mut().missing.extend_from_slice(paths);
    }

    fn file_changed(&self, path: &NormalizedPath) {
        self.state.borrow_mut().changed.push(path.clone());
    }
}

/// Process-local [`Clipboard`]. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    files: Rc<RefCell<Option<Vec<NormalizedPath>>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_file_drop_list(&self, paths: &[NormalizedPath]) {
        *self.files.borrow_mut() = Some(paths.to_vec());
    }

    fn file_drop_list(&self) -> Option<Vec<NormalizedPath>> {
        self.files.borrow().clone()
    }

    fn clear(&self) {
        *self.files.borrow_mut() = None;
    }
}
