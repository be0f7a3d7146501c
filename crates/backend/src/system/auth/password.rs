use anyhow::Result;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::shared::error::ServiceError;

/// Hash a password with argon2id and a random salt (PHC string)
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| anyhow::anyhow!("Failed to build salt: {}", e))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// `Ok(false)` on mismatch, `Err` only when the stored hash is unreadable
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn validate_password_strength(password: &str) -> Result<(), ServiceError> {
    contracts::system::users::check_password_length(password).map_err(ServiceError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("admin12345").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("admin12345", &hash).unwrap());
        assert!(!verify_password("admin1234", &hash).unwrap());
    }

    #[test]
    fn salts_differ() {
        assert_ne!(
            hash_password("same-password").unwrap(),
            hash_password("same-password").unwrap()
        );
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("x", "not-a-hash").is_err());
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(matches!(
            validate_password_strength("short"),
            Err(ServiceError::Validation(_))
        ));
        assert!(validate_password_strength("long enough").is_ok());
    }
}
