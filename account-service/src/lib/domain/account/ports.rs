use async_trait::async_trait;
use auth::Claims;
use auth::IssuedToken;
use auth::TokenError;
use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::AuthError;
use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::Credentials;
use crate::account::models::EmailAddress;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create an account and issue its first token.
    ///
    /// # Arguments
    /// * `credentials` - Raw email and password
    ///
    /// # Returns
    /// Token bound to the new account id
    ///
    /// # Errors
    /// * `Validation` - Empty email, malformed email, or password below policy
    /// * `DuplicateAccount` - Email is already registered
    /// * `Internal` - Store, hashing, or signing failure
    async fn register(&self, credentials: Credentials) -> Result<IssuedToken, AuthError>;

    /// Check credentials and issue a token.
    ///
    /// # Arguments
    /// * `credentials` - Raw email and password
    ///
    /// # Returns
    /// Token bound to the matching account id
    ///
    /// # Errors
    /// * `Validation` - Empty or malformed input
    /// * `InvalidCredentials` - Unknown email or wrong password, indistinguishably
    /// * `Internal` - Store, hashing, or signing failure
    async fn login(&self, credentials: Credentials) -> Result<IssuedToken, AuthError>;

    /// Verify a bearer token at the current time.
    ///
    /// # Errors
    /// * `InvalidSignature` - Token was not signed with the configured key
    /// * `Expired` - Token lifetime has elapsed
    /// * `Malformed` - Token cannot be decoded
    fn verify_token(&self, token: &str) -> Result<Claims, TokenError>;
}

/// Durable storage for accounts, keyed by unique email.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Insert a new account; the store assigns its id.
    ///
    /// Uniqueness of `email` is enforced atomically by the store.
    ///
    /// # Errors
    /// * `DuplicateKey` - Email is already registered
    /// * `Unavailable` - Storage operation failed
    async fn create(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<AccountId, StoreError>;

    /// Retrieve an account by email.
    ///
    /// # Returns
    /// Optional account (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    /// * `InvalidRecord` - Stored row could not be read back
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, StoreError>;
}

/// Source of the current time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}
