//! Session, role and credential primitives for the HealthDesk Portal Engine
//!
//! The portal does not own authentication: the external HealthDesk backend
//! issues the opaque session token at login. What lives here is everything
//! the portal itself is responsible for:
//!
//! - the [`Session`] shape carried in HTTP-only cookies for the lifetime of
//!   a request,
//! - the [`Role`] enum and its external wire codes (`00`–`03`),
//! - the field validation rules applied before any network call is made,
//! - the compatibility password digest (hex SHA-256 of `password + salt`)
//!   the upstream credential check expects.

pub mod cookies;
pub mod error;
pub mod hashing;
pub mod models;
pub mod validation;

pub use error::{SessionError, SessionResult};
pub use hashing::PasswordHasher;
pub use models::{Role, Session};
