//! Folio Store - Storage ports and adapters
//!
//! This crate defines the storage ports, the single CRUD routine shared by
//! every backend, and the memory, file, remote and PostgreSQL adapters.

pub mod factory;
pub mod file;
mod inbox;
pub mod memory;
pub mod portal;
pub mod ports;
pub mod postgres;
pub mod remote;

pub use factory::{open_storage, Storage};
pub use portal::PortalStore;
pub use ports::{DocumentBackend, InboxStore};
