use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;

/// Password hashing (Argon2id with a server-side pepper) and other digests
pub struct CryptoProvider {
    password_pepper: String,
}

impl CryptoProvider {
    pub fn new(password_pepper: impl Into<String>) -> Self {
        Self {
            password_pepper: password_pepper.into(),
        }
    }

    fn argon2(pepper: &[u8]) -> Result<Argon2<'_>, CredentialError> {
        Argon2::new_with_secret(pepper, Algorithm::Argon2id, Version::V0x13, Params::default())
            .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()))
    }

    /// Hash off the async runtime; Argon2 is deliberately slow
    pub async fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let pepper = self.password_pepper.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut rand_core::OsRng);
            let hash = Self::argon2(pepper.as_bytes())?
                .hash_password(password.as_bytes(), &salt)
                .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()))?
                .to_string();
            Ok::<_, CredentialError>(hash)
        })
        .await
        .map_err(|e| InternalError::crypto("hash_password", e.to_string()))?
        .map_err(InternalError::from)
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable
    pub async fn verify_password(&self, password_hash: &str, password: &str) -> Result<bool, InternalError> {
        let pepper = self.password_pepper.clone();
        let password_hash = password_hash.to_string();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&password_hash).map_err(|e| CredentialError::CorruptHash(e.to_string()))?;
            Ok::<_, CredentialError>(
                Self::argon2(pepper.as_bytes())?
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
            )
        })
        .await
        .map_err(|e| InternalError::crypto("verify_password", e.to_string()))?
        .map_err(InternalError::from)
    }

    /// 20 characters drawn from letters, digits and symbols
    pub fn generate_secure_password(&self) -> String {
        const PASSWORD_LENGTH: usize = 20;
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                 abcdefghijklmnopqrstuvwxyz\
                                 0123456789\
                                 !@#$%^&*()_+-=[]{}|;:,.<>?";

        let mut rng = rand::rng();
        (0..PASSWORD_LENGTH)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect()
    }

    /// Lowercase hex SHA-256, used as the default incident dedup hash
    pub fn sha256_hex(input: &str) -> String {
        format!("{:x}", Sha256::digest(input.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crypto() -> CryptoProvider {
        CryptoProvider::new("test-pepper-for-unit-tests")
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        let crypto = crypto();
        let hash = crypto.hash_password("correct horse").await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(crypto.verify_password(&hash, "correct horse").await.unwrap());
        assert!(!crypto.verify_password(&hash, "wrong horse").await.unwrap());
    }

    #[tokio::test]
    async fn test_pepper_is_part_of_the_hash() {
        let hash = crypto().hash_password("correct horse").await.unwrap();
        let other = CryptoProvider::new("a-different-pepper-value");
        assert!(!other.verify_password(&hash, "correct horse").await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_hash_is_an_error() {
        assert!(crypto().verify_password("not-a-phc-string", "x").await.is_err());
    }

    #[test]
    fn test_generate_secure_password() {
        let crypto = crypto();
        let password = crypto.generate_secure_password();
        assert_eq!(password.chars().count(), 20);
        assert_ne!(password, crypto.generate_secure_password());
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            CryptoProvider::sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
