//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! - [`cache`] - Lookup cache backends (Redis, moka, no-op)
//! - [`persistence`] - Link store backends (PostgreSQL, memory)
//! - [`dns`] - Host name resolution used by the domain check

pub mod cache;
pub mod dns;
pub mod persistence;
