//! Password Hashing Service
//!
//! Salted PBKDF2-HMAC-SHA256. The salt is stored alongside the digest as
//! a hex string, and the derivation runs over the UTF-8 bytes of that hex
//! encoding.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

/// PBKDF2 parameters
#[derive(Debug, Clone)]
pub struct Pbkdf2Config {
    /// Iteration count
    pub iterations: u32,
    /// Random salt length in bytes (hex-encoded before use)
    pub salt_len: usize,
}

impl Default for Pbkdf2Config {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            salt_len: 16,
        }
    }
}

impl Pbkdf2Config {
    /// Low iteration count for tests
    pub fn testing() -> Self {
        Self {
            iterations: 10,
            salt_len: 16,
        }
    }
}

/// Password hashing service
pub struct PasswordHasher {
    config: Pbkdf2Config,
}

impl PasswordHasher {
    pub fn new(config: Pbkdf2Config) -> Self {
        Self { config }
    }

    /// Hash a password with a fresh random salt, returning
    /// `(salt_hex, digest_hex)`.
    pub fn hash_password(&self, password: &str) -> (String, String) {
        let mut salt_bytes = vec![0u8; self.config.salt_len];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = hex::encode(salt_bytes);
        let digest = self.derive(password, &salt);
        (salt, digest)
    }

    /// Verify a password against a stored salt and digest.
    pub fn verify(&self, password: &str, salt: &str, expected_digest: &str) -> bool {
        self.derive(password, salt) == expected_digest
    }

    fn derive(&self, password: &str, salt: &str) -> String {
        let mut output = [0u8; 32];
        pbkdf2_hmac::<Sha256>(
            password.as_bytes(),
            salt.as_bytes(),
            self.config.iterations,
            &mut output,
        );
        hex::encode(output)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Pbkdf2Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salt_is_sixteen_random_bytes_hex_encoded() {
        let hasher = PasswordHasher::new(Pbkdf2Config::testing());
        let (salt, digest) = hasher.hash_password("hunter2");
        assert_eq!(salt.len(), 32);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = PasswordHasher::new(Pbkdf2Config::testing());
        let (salt1, digest1) = hasher.hash_password("hunter2");
        let (salt2, digest2) = hasher.hash_password("hunter2");
        assert_ne!(salt1, salt2);
        assert_ne!(digest1, digest2);
    }

    #[test]
    fn verify_round_trips() {
        let hasher = PasswordHasher::new(Pbkdf2Config::testing());
        let (salt, digest) = hasher.hash_password("hunter2");
        assert!(hasher.verify("hunter2", &salt, &digest));
        assert!(!hasher.verify("wrong", &salt, &digest));
    }

    #[test]
    fn derivation_is_deterministic_for_a_fixed_salt() {
        let hasher = PasswordHasher::new(Pbkdf2Config::testing());
        let salt = "00112233445566778899aabbccddeeff";
        assert_eq!(
            hasher.derive("hunter2", salt),
            hasher.derive("hunter2", salt)
        );
    }
}
