use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use super::errors::AuthError;

/// Argon2id hasher with fixed cost parameters.
///
/// Produces PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`) with a
/// fresh 16-byte salt per call. For a given set of parameters the encoded
/// length is constant.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::HashError(e.to_string()))?;
        Ok(Self { argon: Argon2::new(Algorithm::Argon2id, Version::V0x13, params) })
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> Result<Self, AuthError> {
        Self::new(cfg.hash_memory_kib, cfg.hash_iterations, cfg.hash_parallelism)
    }

    /// CPU and memory bound; call from a blocking context.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(encoded).map_err(|e| AuthError::HashError(e.to_string()))?;
        Ok(self.argon.verify_password(password.as_bytes(), &parsed).is_ok())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self { argon: Argon2::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Hasher {
        Argon2Hasher::new(1024, 1, 1).unwrap()
    }

    #[test]
    fn hash_is_encoded_argon2id_with_fixed_length() {
        let hasher = cheap();
        let a = hasher.hash("StrongP@ssw0rd").unwrap();
        let b = hasher.hash("StrongP@ssw0rd").unwrap();

        assert!(a.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"), "{a}");
        assert_ne!(a, "StrongP@ssw0rd");
        // fresh salt each time
        assert_ne!(a, b);
        // prefix + 22 chars of salt + '$' + 43 chars of output
        let expected = "$argon2id$v=19$m=1024,t=1,p=1$".len() + 22 + 1 + 43;
        assert_eq!(a.len(), expected);
        assert_eq!(b.len(), expected);
    }

    #[test]
    fn verify_matches_only_the_original_password() {
        let hasher = cheap();
        let encoded = hasher.hash("StrongP@ssw0rd").unwrap();
        assert!(hasher.verify("StrongP@ssw0rd", &encoded).unwrap());
        assert!(!hasher.verify("StrongP@ssw0rD", &encoded).unwrap());
    }

    #[test]
    fn verify_rejects_garbage_encoding() {
        assert!(matches!(cheap().verify("x", "not-a-hash"), Err(AuthError::HashError(_))));
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(matches!(Argon2Hasher::new(1024, 0, 1), Err(AuthError::HashError(_))));
    }

    #[test]
    fn default_params_encode_to_97_chars() {
        let encoded = Argon2Hasher::default().hash("StrongP@ssw0rd").unwrap();
        assert!(encoded.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
        assert_eq!(encoded.len(), 97);
    }
}
