use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use auth::Claims;
use auth::IssuedToken;
use auth::PasswordHasher;
use auth::TokenError;
use auth::TokenIssuer;
use chrono::Duration;

use crate::account::errors::AuthError;
use crate::account::errors::StoreError;
use crate::account::models::AccountId;
use crate::account::models::Credentials;
use crate::account::models::EmailAddress;
use crate::account::models::Password;
use crate::account::ports::AccountRepository;
use crate::account::ports::AuthServicePort;
use crate::account::ports::Clock;

/// Process-wide authentication policy, fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct AuthSettings {
    /// Lifetime of every issued token
    pub token_duration: Duration,
    /// Minimum password length (characters) accepted at registration
    pub min_password_length: usize,
}

/// Domain service implementation for registration and login.
///
/// Holds no per-call state; share it behind an `Arc` across tasks.
pub struct AuthService<AR, C>
where
    AR: AccountRepository,
    C: Clock,
{
    repository: Arc<AR>,
    clock: Arc<C>,
    password_hasher: Arc<PasswordHasher>,
    token_issuer: Arc<TokenIssuer>,
    settings: AuthSettings,
}

impl<AR, C> AuthService<AR, C>
where
    AR: AccountRepository,
    C: Clock,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `clock` - Time source for token issuance and verification
    /// * `password_hasher` - Hasher configured with the platform work factor
    /// * `token_issuer` - Issuer bound to the signing key
    /// * `settings` - Token lifetime and password policy
    pub fn new(
        repository: Arc<AR>,
        clock: Arc<C>,
        password_hasher: Arc<PasswordHasher>,
        token_issuer: Arc<TokenIssuer>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            repository,
            clock,
            password_hasher,
            token_issuer,
            settings,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, AuthError> {
        let hasher = Arc::clone(&self.password_hasher);

        tokio::task::spawn_blocking(move || hasher.hash(password.expose_secret()))
            .await
            .map_err(|e| internal("Password hashing task failed", e))?
            .map_err(|e| internal("Password hashing failed", e))
    }

    async fn verify_password(
        &self,
        password: Password,
        password_hash: String,
    ) -> Result<bool, AuthError> {
        let hasher = Arc::clone(&self.password_hasher);

        tokio::task::spawn_blocking(move || hasher.verify(password.expose_secret(), &password_hash))
            .await
            .map_err(|e| internal("Password verification task failed", e))?
            .map_err(|e| internal("Password verification failed", e))
    }

    /// Spend one verification's worth of work so unknown accounts are not
    /// answered faster than wrong passwords.
    async fn verify_dummy(&self, password: Password) {
        let hasher = Arc::clone(&self.password_hasher);

        if let Err(e) =
            tokio::task::spawn_blocking(move || hasher.verify_dummy(password.expose_secret()))
                .await
        {
            tracing::warn!(error = %e, "Dummy password verification task failed");
        }
    }

    fn issue_token(&self, account_id: &AccountId) -> Result<IssuedToken, AuthError> {
        self.token_issuer
            .issue(account_id, self.clock.now(), self.settings.token_duration)
            .map_err(|e| internal("Token signing failed", e))
    }
}

#[async_trait]
impl<AR, C> AuthServicePort for AuthService<AR, C>
where
    AR: AccountRepository,
    C: Clock,
{
    async fn register(&self, credentials: Credentials) -> Result<IssuedToken, AuthError> {
        let Credentials { email, password } = credentials;

        let email = EmailAddress::new(&email)?;
        let password = Password::new(password)?;
        password.ensure_min_length(self.settings.min_password_length)?;

        let password_hash = self.hash_password(password).await?;

        let account_id = self
            .repository
            .create(&email, &password_hash)
            .await
            .map_err(|e| match e {
                StoreError::DuplicateKey => {
                    tracing::debug!("Registration rejected: account already exists");
                    AuthError::DuplicateAccount
                }
                other => internal("Failed to create account", other),
            })?;

        tracing::info!(account_id = %account_id, "Account registered");

        self.issue_token(&account_id)
    }

    async fn login(&self, credentials: Credentials) -> Result<IssuedToken, AuthError> {
        let Credentials { email, password } = credentials;

        let email = EmailAddress::new(&email)?;
        let password = Password::new(password)?;

        let account = self
            .repository
            .find_by_email(&email)
            .await
            .map_err(|e| internal("Failed to look up account", e))?;

        // Unknown email and wrong password must be indistinguishable
        let Some(account) = account else {
            self.verify_dummy(password).await;
            tracing::debug!("Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(password, account.password_hash).await? {
            tracing::debug!("Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(account_id = %account.id, "Account logged in");

        self.issue_token(&account.id)
    }

    fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.token_issuer.verify(token, self.clock.now())
    }
}

fn internal(context: &str, err: impl Display) -> AuthError {
    tracing::error!(error = %err, "{}", context);
    AuthError::Internal(format!("{}: {}", context, err))
}
