//! Password hashing with Argon2id.
//!
//! Digests are PHC strings, so the salt and cost parameters travel with the hash and
//! verification does not need any side channel.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct CredentialError(String);

pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CredentialError(err.to_string()))
}

/// Returns false for a wrong password and for digests that do not parse.
pub fn verify_password(password: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_the_original_password() {
        let digest = hash_password("correct horse").expect("hash");
        assert!(verify_password("correct horse", &digest));
    }

    #[test]
    fn rejects_other_passwords() {
        let digest = hash_password("correct horse").expect("hash");
        assert!(!verify_password("correct horse ", &digest));
        assert!(!verify_password("", &digest));
        assert!(!verify_password("battery staple", &digest));
    }

    #[test]
    fn salts_every_digest() {
        let first = hash_password("same-password").expect("hash");
        let second = hash_password("same-password").expect("hash");
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
    }

    #[test]
    fn bare_sha256_digests_never_verify() {
        let legacy = "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";
        assert!(!verify_password("password", legacy));
    }
}
