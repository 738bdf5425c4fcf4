//! Error types for Folio

use thiserror::Error;

use crate::models::Section;

#[derive(Debug, Error)]
pub enum FolioError {
    // Section errors
    #[error("Unknown section: {name}")]
    UnknownSection { name: String },

    #[error("Section '{section}' is not a list")]
    NotAList { section: Section },

    #[error("Invalid {section} record: {reason}")]
    InvalidRecord { section: Section, reason: String },

    // Transfer errors
    #[error("Import rejected: {reason}")]
    Import { reason: String },

    #[error("Malformed BibTeX: {reason}")]
    BibTex { reason: String },

    // Inbox errors
    #[error("Invalid {kind} submission: {reason}")]
    InvalidSubmission { kind: String, reason: String },

    #[error("Unknown {kind} status: {value}")]
    UnknownStatus { kind: String, value: String },

    #[error("Invalid status transition for {kind} {id}: {from} -> {to}")]
    InvalidTransition {
        kind: String,
        id: String,
        from: String,
        to: String,
    },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Storage errors
    #[error("{backend} backend error: {reason}")]
    Backend { backend: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FolioError {
    /// Shorthand for a failure reported by a storage backend
    pub fn backend(backend: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Backend {
            backend: backend.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error was caused by caller input rather than the store
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownSection { .. }
                | Self::NotAList { .. }
                | Self::InvalidRecord { .. }
                | Self::Import { .. }
                | Self::BibTex { .. }
                | Self::InvalidSubmission { .. }
                | Self::UnknownStatus { .. }
                | Self::InvalidTransition { .. }
        )
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
