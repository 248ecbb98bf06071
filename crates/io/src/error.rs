use std::fmt;
use std::path::PathBuf;

use quantiv_core::ValidationError;

/// Failure on the write path. Reads never produce one of these; they report a
/// `SourceState` instead.
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem error while writing (or reading before a rewrite).
    Io { path: PathBuf, message: String },
    /// The file to be rewritten exists but cannot be parsed; it is left alone.
    Unreadable { path: PathBuf, reason: String },
    /// Serialization of the new content failed.
    Serialize(String),
    /// Input rejected before touching disk.
    Validation(ValidationError),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, err: impl fmt::Display) -> Self {
        Self::Io { path: path.to_path_buf(), message: err.to_string() }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot write {}: {message}", path.display()),
            Self::Unreadable { path, reason } => {
                write!(f, "refusing to rewrite unreadable {}: {reason}", path.display())
            }
            Self::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Self::Validation(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}
