//! Error types for loading and reconciling the three input files.
//!
//! Fatal conditions abort a request with no partial result. Malformed rows and
//! invalid MAC values are not errors; they are counted in
//! [`ReconcileDiagnostics`](crate::reconcile::ReconcileDiagnostics) instead.

use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

/// Identifies one of the three request inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Old,
    Mags,
    New,
}

impl FileKind {
    pub const ALL: [FileKind; 3] = [FileKind::Old, FileKind::Mags, FileKind::New];

    /// Field name the input is submitted under
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Old => "old_file",
            FileKind::Mags => "mags_file",
            FileKind::New => "new_file",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Missing required file(s): {}", .files.join(", "))]
    MissingInput { files: Vec<&'static str> },

    #[error("Missing required column(s) in {file}: {}", .missing.join(", "))]
    Schema {
        file: FileKind,
        missing: Vec<&'static str>,
    },

    #[error("Invalid file encoding in {file}. Please ensure files are UTF-8 encoded.")]
    Encoding { file: FileKind },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MapError {
    pub fn internal(err: impl fmt::Display) -> Self {
        MapError::Internal(err.to_string())
    }

    /// True for errors caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        !matches!(self, MapError::Internal(_))
    }

    /// HTTP-style status code for this error
    pub fn status(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }

    /// Structured `{"detail": ...}` body. Internal errors get a generic message.
    pub fn to_detail(&self) -> Value {
        let detail = match self {
            MapError::Internal(_) => "Error processing files".to_string(),
            other => other.to_string(),
        };
        json!({ "detail": detail })
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
