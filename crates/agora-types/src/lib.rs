//! Agora Types - Core type definitions for the Agora governance platform.
//!
//! This crate provides the fundamental types used throughout Agora:
//! - Addresses (20-byte, Bech32m encoded)
//! - Organization and proposal identifiers
//! - Timestamps (seconds, supplied by the caller, never read from a clock)

pub mod address;
pub mod error;
pub mod id;

#[cfg(feature = "serde")]
mod serialization;

pub use address::Address;
pub use error::TypesError;
pub use id::{OrgId, ProposalId};

/// Seconds since the Unix epoch, always supplied by the caller.
pub type Timestamp = u64;

/// A span of time in seconds.
pub type Duration = u64;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Address, Duration, OrgId, ProposalId, Timestamp, TypesError};
}
