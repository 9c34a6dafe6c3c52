use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Secret hashed once at construction to back [`PasswordHasher::verify_dummy`].
const REFERENCE_SECRET: &str = "reference-secret-for-timing-normalisation";

/// Argon2id work factor shared by every account.
///
/// Fixed by configuration so all hashes carry a uniform cost, which can be raised
/// platform-wide without touching callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory size in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id).
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    reference_hash: String,
}

impl PasswordHasher {
    /// Create a new password hasher with a fixed work factor.
    ///
    /// Computes one reference hash up front, so construction costs one full hash.
    ///
    /// # Arguments
    /// * `cost` - Argon2id parameters applied to every new hash
    ///
    /// # Errors
    /// * `InvalidCost` - Parameters rejected by Argon2
    /// * `HashingFailed` - Reference hash could not be computed
    pub fn new(cost: HashCost) -> Result<Self, PasswordError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| PasswordError::InvalidCost(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let reference_hash = Self::hash_with(&argon2, REFERENCE_SECRET)?;

        Ok(Self {
            argon2,
            reference_hash,
        })
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with a fresh random salt, so hashing the same input twice
    /// never yields the same output.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Self::hash_with(&self.argon2, password)
    }

    /// Verify a password against a stored hash.
    ///
    /// Salt and cost are taken from the stored hash. The digest comparison is
    /// constant-time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches. False on mismatch and on a well-formed hash that
    /// cannot be checked (unknown algorithm or parameters).
    ///
    /// # Errors
    /// * `CorruptedHash` - Stored value is not a PHC string
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::CorruptedHash(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Run a full verification against the reference hash and discard the outcome.
    ///
    /// Lets callers spend the same work on an unknown account as on a real one.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &self.reference_hash);
    }

    fn hash_with(argon2: &Argon2<'static>, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", self.argon2.params())
            .finish_non_exhaustive()
    }
}
