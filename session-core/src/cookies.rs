//! Cookie names and lifetimes shared by the login, logout and session
//! accessor routes. Existing browser clients depend on these exact names,
//! so they are part of the public contract.

/// Opaque session token; HTTP-only, SameSite=Strict, Secure in production.
pub const TOKEN: &str = "token";
pub const USER_NAME: &str = "userName";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const ROLE: &str = "role";

/// Every cookie the portal sets, in the order logout clears them.
pub const ALL: [&str; 5] = [TOKEN, USER_NAME, EMAIL, PHONE, ROLE];

/// Token lifetime: 12 hours.
pub const TOKEN_MAX_AGE_SECS: i64 = 60 * 60 * 12;
