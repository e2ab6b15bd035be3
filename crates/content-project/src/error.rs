//! Error types for content-project

/// Result type for content-project operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Node or folder absent
    NotFound,
    /// Name collision
    AlreadyExists,
    /// Moving or pasting a folder into its own subtree
    SelfSubdirectory,
    /// Directory and file swapped during replace
    KindMismatch,
    /// Manifest missing the expected root or namespace, or not XML at all
    InvalidManifest,
    /// Name not usable as a file name
    InvalidName,
    /// Any underlying disk failure
    Io,
    /// A node that is neither the root nor attached to a parent
    Detached,
}

/// How a mutator deals with failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Return every error to the caller.
    #[default]
    Propagate,
    /// Show disk failures through the editor host and return without a
    /// result. Everything else still propagates.
    Report,
}

/// Errors that can occur in content-project operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Content item not found: '{path}'")]
    NotFound { path: String },

    #[error("Directory does not exist: '{path}'")]
    DirectoryNotFound { path: String },

    #[error("'{name}' already exists in '{folder}'")]
    AlreadyExists { folder: String, name: String },

    #[error("Cannot move '{path}' into its own subdirectory '{destination}'")]
    SelfSubdirectory { path: String, destination: String },

    #[error("Cannot paste folder '{path}' into itself")]
    PasteIntoSelf { path: String },

    #[error("Cannot replace {existing} '{path}' with a {incoming}")]
    KindMismatch {
        path: String,
        existing: &'static str,
        incoming: &'static str,
    },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Node '{name}' is detached from the content tree")]
    DetachedNode { name: String },

    #[error("No manifest is open")]
    NoManifest,

    #[error(transparent)]
    Manifest(#[from] content_manifest::Error),

    #[error(transparent)]
    Fs(#[from] content_fs::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } | Self::DirectoryNotFound { .. } | Self::NoManifest => {
                ErrorKind::NotFound
            }
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::SelfSubdirectory { .. } | Self::PasteIntoSelf { .. } => {
                ErrorKind::SelfSubdirectory
            }
            Self::KindMismatch { .. } => ErrorKind::KindMismatch,
            Self::InvalidName { .. } => ErrorKind::InvalidName,
            Self::DetachedNode { .. } => ErrorKind::Detached,
            Self::Manifest(content_manifest::Error::Fs(_)) | Self::Fs(_) => ErrorKind::Io,
            Self::Manifest(_) => ErrorKind::InvalidManifest,
        }
    }

    pub fn is_io(&self) -> bool {
        self.kind() == ErrorKind::Io
    }

    pub(crate) fn not_found(path: impl ToString) -> Self {
        Self::NotFound {
            path: path.to_string(),
        }
    }
}
