//! Folio Core - Domain models, record CRUD, and configuration
//!
//! This crate contains the portfolio content model, the section-level record
//! operations every storage backend shares, and the BibTeX importer.

pub mod bibtex;
pub mod config;
pub mod defaults;
pub mod error;
pub mod models;
pub mod patch;

pub use error::{FolioError, Result};
pub use models::{PortalData, Section};
pub use patch::Fields;
