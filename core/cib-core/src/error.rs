//! Error types for cib-core operations.
//!
//! Acquisition and parse failures are fatal to a request; lookup misses are
//! ordinary outcomes that callers map to "not found" responses.

use std::path::PathBuf;

/// All errors that can occur in cib-core operations.
#[derive(Debug, thiserror::Error)]
pub enum CibError {
    // ─────────────────────────────────────────────────────────────────────
    // Acquisition Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution failed: {command}: {details}")]
    CommandFailed { command: String, details: String },

    #[error("Command produced no output: {command}")]
    EmptyOutput { command: String },

    // ─────────────────────────────────────────────────────────────────────
    // Document Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("XML parsing error: {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Malformed CIB document: {0}")]
    MalformedDocument(String),

    #[error("No lrm structures found")]
    NoLrmSections,

    // ─────────────────────────────────────────────────────────────────────
    // Lookup Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Node \"{0}\" was not found")]
    NodeNotFound(String),

    #[error("Resource \"{resource}\" was not found on node \"{node}\"")]
    ResourceNotFound { node: String, resource: String },

    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },
}

impl CibError {
    /// True when the document could not be obtained or parsed at all.
    pub fn is_acquisition(&self) -> bool {
        matches!(
            self,
            CibError::Io { .. }
                | CibError::CommandFailed { .. }
                | CibError::EmptyOutput { .. }
                | CibError::Parse { .. }
                | CibError::MalformedDocument(_)
        )
    }

    /// True for a node or resource missing from an otherwise decoded model.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            CibError::NodeNotFound(_) | CibError::ResourceNotFound { .. }
        )
    }
}

/// Convenience type alias for Results using CibError.
pub type Result<T> = std::result::Result<T, CibError>;
