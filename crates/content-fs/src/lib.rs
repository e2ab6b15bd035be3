//! Filesystem abstraction for the content project editor
//!
//! Provides normalized path handling, the [`DiskIo`] port every tree
//! mutation goes through, and atomic writes for the project manifest.

pub mod config;
pub mod disk;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use disk::{DiskIo, LocalDisk};
pub use error::{Error, Result};
pub use path::NormalizedPath;
