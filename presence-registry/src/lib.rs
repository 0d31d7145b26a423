//! Doctor presence registry client
//!
//! The external registry tracks whether a doctor is currently reachable for
//! a call, keyed by the doctor's email. Its responses are *sentinel values*:
//! bare integers in the JSON body repurposed as success/failure markers
//! (302 for "set"/"available", 404 for "not found", 401 for "update
//! failed"). Those are a REST-ism of the collaborating service and are
//! preserved verbatim on the wire; this crate translates them into the
//! [`Availability`] tri-state in exactly one place so nothing else in the
//! system sees them.
//!
//! Presence is not atomic with the signaling channel: a doctor can be
//! "available" here while disconnected from the broker. That inconsistency
//! window is accepted, not eliminated.

pub mod client;
pub mod error;
pub mod sentinel;

pub use client::{RegistryClient, RegistryConfig};
pub use error::{RegistryError, RegistryResult};
pub use sentinel::Availability;
