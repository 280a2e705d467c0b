use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("yoga-flow-42").unwrap();

        assert_ne!(hash, "yoga-flow-42");
        assert!(verify_password("yoga-flow-42", &hash).unwrap());
        assert!(!verify_password("yoga-flow-43", &hash).unwrap());
    }

    #[test]
    fn test_hash_generates_unique_hashes() {
        let hash1 = hash_password("samepassword").unwrap();
        let hash2 = hash_password("samepassword").unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("samepassword", &hash1).unwrap());
        assert!(verify_password("samepassword", &hash2).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("whatever", "not_a_bcrypt_hash").is_err());
    }

    #[test]
    fn test_verify_case_sensitive() {
        let hash = hash_password("Password123").unwrap();

        assert!(!verify_password("password123", &hash).unwrap());
        assert!(!verify_password("PASSWORD123", &hash).unwrap());
    }
}
