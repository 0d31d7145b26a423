//! Sentinel-to-enum translation, the single boundary where the registry's
//! integer markers become typed state.

use serde::{Deserialize, Serialize};

/// Sentinel the registry answers with when a write or lookup succeeded.
pub const SENTINEL_OK: i64 = 302;
/// Sentinel for "doctor not present" on lookups.
pub const SENTINEL_NOT_FOUND: i64 = 404;
/// Sentinel the update endpoint answers with on failure.
pub const SENTINEL_UPDATE_FAILED: i64 = 401;

/// Tri-state presence as the rest of the system sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Unavailable,
    /// The registry could not be reached; staleness is possible either way.
    Unknown,
}

impl Availability {
    /// Interpret a lookup sentinel. Anything that is neither the "available"
    /// nor the "not found" marker is treated as unavailable, so a broken
    /// registry never offers a consultation that cannot be delivered.
    pub fn from_sentinel(value: i64) -> Self {
        match value {
            SENTINEL_OK => Availability::Available,
            SENTINEL_NOT_FOUND => Availability::Unavailable,
            _ => Availability::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sentinels() {
        assert_eq!(Availability::from_sentinel(302), Availability::Available);
        assert_eq!(Availability::from_sentinel(404), Availability::Unavailable);
    }

    #[test]
    fn unknown_sentinels_fail_closed() {
        for v in [0, 200, 401, 500, -1] {
            assert_eq!(Availability::from_sentinel(v), Availability::Unavailable);
        }
    }
}
