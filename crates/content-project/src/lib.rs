//! Content project tree for the game asset editor
//!
//! This crate keeps three views of a project's content in step:
//!
//! - **Tree**: the in-memory [`ContentTree`] the editor presents
//! - **Disk**: the directories and files below the project directory
//! - **Manifest**: the MSBuild-style project file listing every content item
//!   and how it is built
//!
//! Every mutation on [`ContentProject`] (include, exclude, replace, move,
//! rename, delete, cut/copy/paste, drop) performs its disk step before it
//! touches the tree, so a failed disk step leaves the tree as it was.
//!
//! # Architecture
//!
//! ```text
//!                 editor UI / dialogs
//!                         |
//!              content-project (this crate)
//!                         |
//!          +--------------+--------------+
//!          |                             |
//!     content-fs                 content-manifest
//! ```
//!
//! # Example
//!
//! ```ignore
//! use content_project::{ContentProject, ErrorPolicy};
//!
//! let mut project = ContentProject::headless();
//! project.load_manifest("/games/demo/Content/Content.contentproj")?;
//! project.include("/downloads/hero.png", "gfx", ErrorPolicy::Propagate)?;
//! project.save_manifest()?;
//! ```

mod clipboard;
mod drop;
pub mod error;
pub mod logging;
mod mutator;
pub mod names;
pub mod node;
pub mod ordering;
mod persist;
pub mod ports;
pub mod project;
pub mod registry;
pub mod resolver;
pub mod settings;
pub mod tree;

pub use error::{Error, ErrorKind, ErrorPolicy, Result};
pub use node::{ContentNode, NodeId, NodeKind};
pub use ordering::natural_cmp;
pub use ports::{
    AssetCompiler, Clipboard, CompileRequest, ConfirmPrompt, Confirmation, EditorHost,
    HeadlessHost, MemoryClipboard,
};
pub use project::{CompileReport, ContentProject, LoadReport};
pub use registry::ContentType;
pub use settings::ProjectSettings;
pub use tree::ContentTree;
