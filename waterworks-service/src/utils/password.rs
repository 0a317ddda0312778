use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use service_core::error::AppError;

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Whether a candidate password matches a stored hash. An unparseable hash
/// counts as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
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
    fn correct_password_verifies() {
        let hash = hash_password("caudal-2024").expect("Failed to hash password");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("caudal-2024", &hash));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("caudal-2024").expect("Failed to hash password");
        assert!(!verify_password("caudal-2025", &hash));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let first = hash_password("caudal-2024").expect("Failed to hash password");
        let second = hash_password("caudal-2024").expect("Failed to hash password");
        assert_ne!(first, second);
        assert!(verify_password("caudal-2024", &second));
    }

    #[test]
    fn garbage_hash_is_a_mismatch() {
        assert!(!verify_password("caudal-2024", "not-a-phc-string"));
    }
}
