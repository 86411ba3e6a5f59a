/// Argon2id password hashing
///
/// User passwords are never stored as given: the user service hashes them
/// here before they reach a repository. Hashes are PHC strings, so the salt
/// and cost parameters travel with the hash and verification needs nothing
/// else.
///
/// # Example
///
/// ```
/// use taskmanager_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("112233")?;
///
/// assert!(verify_password("112233", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::password_hash::{
    self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

/// Memory cost in KiB (19 MiB)
const MEMORY_KIB: u32 = 19_456;
/// Number of passes
const ITERATIONS: u32 = 2;
/// Degree of parallelism
const LANES: u32 = 1;
/// Length of the derived hash in bytes
const OUTPUT_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Cost parameters rejected by argon2
    #[error("invalid Argon2 parameters: {0}")]
    Params(argon2::Error),

    #[error("password hashing failed: {0}")]
    Hash(password_hash::Error),

    /// Stored value is not a PHC hash string
    #[error("stored password hash is malformed: {0}")]
    Malformed(password_hash::Error),

    #[error("password verification failed: {0}")]
    Verify(password_hash::Error),
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_KIB, ITERATIONS, LANES, Some(OUTPUT_LEN))
        .map_err(PasswordError::Params)?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with a fresh random salt
///
/// ```text
/// $argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordError::Hash)
}

/// Checks a password against a stored PHC hash
///
/// A wrong password is `Ok(false)`; errors are reserved for unreadable hashes.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let stored = PasswordHash::new(hash).map_err(PasswordError::Malformed)?;

    match hasher()?.verify_password(password.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e)),
    }
}
