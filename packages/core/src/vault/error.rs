//! Vault Error Types
//!
//! This module defines error types for corpus access, providing clear error
//! handling for enumeration and content-read failures. Orchestration-level
//! degradation (catching, logging, keeping the previous graph) happens at
//! the graph service boundary, not here.

use std::path::PathBuf;
use thiserror::Error;

/// Corpus access errors
///
/// Raised by the vault implementations shipped with this crate. The
/// "link index not yet built" condition is deliberately NOT an error:
/// `VaultReader::resolved_links` returns `Ok(None)` for it, since it is a
/// recoverable transient state, not a failure.
#[derive(Error, Debug)]
pub enum VaultError {
    /// A referenced vault file does not exist
    #[error("Vault file not found: {path}")]
    NotFound { path: String },

    /// Filesystem access failed
    #[error("Vault I/O failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured vault root is missing or not a directory
    #[error("Invalid vault root: {path:?}")]
    InvalidRoot { path: PathBuf },
}

impl VaultError {
    /// Create a file not found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create an I/O error with the offending path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid root error
    pub fn invalid_root(path: impl Into<PathBuf>) -> Self {
        Self::InvalidRoot { path: path.into() }
    }
}
