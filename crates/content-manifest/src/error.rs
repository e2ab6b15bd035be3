//! Error types for content-manifest

/// Result type for content-manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur reading or writing a manifest
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document is not a well-formed MSBuild project
    #[error("Invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Fs(#[from] content_fs::Error),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            message: message.into(),
        }
    }
}
