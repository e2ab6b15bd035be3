//! The disk port used by every tree mutation
//!
//! All content operations reach the filesystem through [`DiskIo`], so a
//! host (or a test) can observe, redirect, or fail individual steps.

use crate::{Error, NormalizedPath, Result, io};
use std::fs::{self, File, OpenOptions};
use std::time::SystemTime;
use walkdir::WalkDir;

/// Synchronous disk operations on absolute paths.
///
/// Every fallible method reports problems as [`Error::Io`]; callers treat
/// that as the single "disk failed" condition.
pub trait DiskIo {
    /// Copy a file, or a directory tree, overwriting whatever is at `to`.
    fn copy(&self, from: &NormalizedPath, to: &NormalizedPath) -> Result<()>;

    /// Move or rename a file or directory.
    fn rename(&self, from: &NormalizedPath, to: &NormalizedPath) -> Result<()>;

    /// Delete a file, or a directory recursively.
    fn delete(&self, path: &NormalizedPath) -> Result<()>;

    /// Create a directory and any missing parents.
    fn create_dir(&self, path: &NormalizedPath) -> Result<()>;

    /// Create an empty file. Fails if something already exists at `path`.
    fn create_file(&self, path: &NormalizedPath) -> Result<()>;

    /// Atomically replace the file at `path` with `content`.
    fn write_text(&self, path: &NormalizedPath, content: &str) -> Result<()>;

    fn exists(&self, path: &NormalizedPath) -> bool;

    fn is_dir(&self, path: &NormalizedPath) -> bool;

    /// Immediate entries of a directory, sorted by name.
    fn read_dir(&self, path: &NormalizedPath) -> Result<Vec<NormalizedPath>>;

    /// Last write time.
    fn modified(&self, path: &NormalizedPath) -> Result<SystemTime>;

    /// Overwrite the last write time.
    fn set_modified(&self, path: &NormalizedPath, time: SystemTime) -> Result<()>;
}

/// [`DiskIo`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDisk;

impl LocalDisk {
    pub fn new() -> Self {
        Self
    }

    fn copy_tree(from: &NormalizedPath, to: &NormalizedPath) -> Result<()> {
        // Snapshot first so copying a directory into its own subtree terminates
        let entries: Vec<_> = WalkDir::new(from.to_native())
            .min_depth(1)
            .into_iter()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| {
                let path = e.path().map(|p| p.to_path_buf()).unwrap_or(from.to_native());
                Error::io(path, std::io::Error::other(e))
            })?;

        fs::create_dir_all(to.to_native()).map_err(|e| Error::io(to.to_native(), e))?;
        for entry in entries {
            let relative = NormalizedPath::new(entry.path())
                .strip_prefix(from)
                .unwrap_or_default();
            let target = to.join(relative.as_str()).to_native();
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            } else {
                fs::copy(entry.path(), &target).map_err(|e| Error::io(&target, e))?;
            }
        }
        Ok(())
    }
}

impl DiskIo for LocalDisk {
    fn copy(&self, from: &NormalizedPath, to: &NormalizedPath) -> Result<()> {
        tracing::debug!(%from, %to, "Copying");
        let source = from.to_native();
        let metadata = fs::metadata(&source).map_err(|e| Error::io(&source, e))?;
        if metadata.is_dir() {
            Self::copy_tree(from, to)
        } else {
            fs::copy(&source, to.to_native()).map_err(|e| Error::io(to.to_native(), e))?;
            Ok(())
        }
    }

    fn rename(&self, from: &NormalizedPath, to: &NormalizedPath) -> Result<()> {
        tracing::debug!(%from, %to, "Renaming");
        fs::rename(from.to_native(), to.to_native()).map_err(|e| Error::io(from.to_native(), e))
    }

    fn delete(&self, path: &NormalizedPath) -> Result<()> {
        tracing::debug!(%path, "Deleting");
        let native = path.to_native();
        let metadata = fs::symlink_metadata(&native).map_err(|e| Error::io(&native, e))?;
        if metadata.is_dir() {
            fs::remove_dir_all(&native).map_err(|e| Error::io(&native, e))
        } else {
            fs::remove_file(&native).map_err(|e| Error::io(&native, e))
        }
    }

    fn create_dir(&self, path: &NormalizedPath) -> Result<()> {
        tracing::debug!(%path, "Creating directory");
        fs::create_dir_all(path.to_native()).map_err(|e| Error::io(path.to_native(), e))
    }

    fn create_file(&self, path: &NormalizedPath) -> Result<()> {
        tracing::debug!(%path, "Creating empty file");
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path.to_native())
            .map(|_| ())
            .map_err(|e| Error::io(path.to_native(), e))
    }

    fn write_text(&self, path: &NormalizedPath, content: &str) -> Result<()> {
        tracing::debug!(%path, bytes = content.len(), "Writing");
        io::write_text(path, content)
    }

    fn exists(&self, path: &NormalizedPath) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &NormalizedPath) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
        let native = path.to_native();
        let mut entries = fs::read_dir(&native)
            .map_err(|e| Error::io(&native, e))?
            .map(|entry| entry.map(|e| NormalizedPath::new(e.path())))
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| Error::io(&native, e))?;
        entries.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(entries)
    }

    fn modified(&self, path: &NormalizedPath) -> Result<SystemTime> {
        let native = path.to_native();
        fs::metadata(&native)
            .and_then(|m| m.modified())
            .map_err(|e| Error::io(&native, e))
    }

    fn set_modified(&self, path: &NormalizedPath, time: SystemTime) -> Result<()> {
        let native = path.to_native();
        let file = if native.is_dir() {
            File::open(&native)
        } else {
            OpenOptions::new().write(true).open(&native)
        };
        file.and_then(|f| f.set_modified(time))
            .map_err(|e| Error::io(&native, e))
    }
}
