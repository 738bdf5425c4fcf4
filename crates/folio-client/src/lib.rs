//! Folio Client - Data access for editing front ends
//!
//! [`PortalClient`] wraps a [`folio_store::PortalStore`] and keeps a mirror of
//! the loaded document that is patched after each confirmed mutation.

pub mod client;
pub mod state;

pub use client::PortalClient;
pub use state::LoadState;
