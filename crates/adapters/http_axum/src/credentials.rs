//! Password hashing at the HTTP boundary.
//!
//! Clear-text passwords never reach the application layer: they are turned
//! into an Argon2id PHC string here and travel as an opaque [`Credential`].

use argon2::password_hash::{SaltString, rand_core};
use argon2::{Argon2, PasswordHasher};

use smarthome_domain::error::SmartHomeError;
use smarthome_domain::user::Credential;

/// Hash `password` with a fresh random salt.
///
/// # Errors
///
/// Returns [`SmartHomeError::Storage`] if the hasher rejects its input.
pub fn hash_password(password: &str) -> Result<Credential, SmartHomeError> {
    let salt = SaltString::generate(&mut rand_core::OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| SmartHomeError::Storage(err.to_string().into()))?;
    Ok(Credential::from_hash(hash.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{PasswordHash, PasswordVerifier};

    #[test]
    fn should_produce_verifiable_argon2_hash() {
        let credential = hash_password("hunter2").unwrap();
        assert!(credential.as_str().starts_with("$argon2"));

        let parsed = PasswordHash::new(credential.as_str()).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"hunter2", &parsed)
                .is_ok()
        );
        assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
    }

    #[test]
    fn should_salt_every_hash() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }
}
