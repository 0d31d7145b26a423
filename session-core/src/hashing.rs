use sha2::{Digest, Sha256};

/// Default salt the upstream credential check was provisioned with.
///
/// A static, client-derivable salt is a weak scheme; it is kept solely
/// because the external backend stores digests produced this way. Override
/// with the `PASSWORD_SALT` environment variable where the deployment uses
/// a different provisioning value. Do not reuse this scheme elsewhere.
const FALLBACK_SALT: &str = "53KLGWV4CDV0bymo";

/// Upstream-compatible password digests: hex SHA-256 of `password + salt`.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    salt: String,
}

impl PasswordHasher {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// Salt from `PASSWORD_SALT`, falling back to the provisioned default.
    pub fn from_env() -> Self {
        let salt = std::env::var("PASSWORD_SALT").unwrap_or_else(|_| FALLBACK_SALT.to_string());
        Self::new(salt)
    }

    pub fn hash(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hasher.update(self.salt.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(FALLBACK_SALT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_hex_sha256() {
        let hasher = PasswordHasher::default();
        let digest = hasher.hash("secret1");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        // lowercase hex, stable across calls
        assert_eq!(digest, digest.to_lowercase());
        assert_eq!(digest, hasher.hash("secret1"));
    }

    #[test]
    fn salt_changes_digest() {
        let a = PasswordHasher::new("saltA").hash("secret1");
        let b = PasswordHasher::new("saltB").hash("secret1");
        assert_ne!(a, b);
    }

    #[test]
    fn matches_concatenation_order() {
        // The upstream stores sha256(password || salt), not sha256(salt || password).
        let hasher = PasswordHasher::new("xyz");
        let mut reference = Sha256::new();
        reference.update(b"pw");
        reference.update(b"xyz");
        assert_eq!(hasher.hash("pw"), hex::encode(reference.finalize()));
    }
}
