use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::EmailAddress;
use crate::account::ports::AccountRepository;

/// Account store held in process memory.
///
/// The check for an existing email and the insert happen under one write lock,
/// so concurrent registrations of the same email yield exactly one account.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<EmailAddress, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<AccountId, StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(StoreError::DuplicateKey);
        }

        let account = Account {
            id: AccountId::new(),
            email: email.clone(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        let id = account.id;
        accounts.insert(email.clone(), account);

        Ok(id)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryAccountRepository::new();
        let email = EmailAddress::new("user@example.com").unwrap();

        let id = repository.create(&email, "$argon2id$hash").await.unwrap();
        let account = repository.find_by_email(&email).await.unwrap().unwrap();

        assert_eq!(account.id, id);
        assert_eq!(account.email, email);
        assert_eq!(account.password_hash, "$argon2id$hash");
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let repository = InMemoryAccountRepository::new();
        let email = EmailAddress::new("nobody@example.com").unwrap();

        assert!(repository.find_by_email(&email).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repository = InMemoryAccountRepository::new();
        let email = EmailAddress::new("user@example.com").unwrap();
        let same_email = EmailAddress::new("USER@example.com").unwrap();

        repository.create(&email, "first").await.unwrap();
        let result = repository.create(&same_email, "second").await;

        assert_eq!(result, Err(StoreError::DuplicateKey));
        assert_eq!(repository.len().await, 1);
        assert_eq!(
            repository
                .find_by_email(&email)
                .await
                .unwrap()
                .unwrap()
                .password_hash,
            "first"
        );
    }
}
