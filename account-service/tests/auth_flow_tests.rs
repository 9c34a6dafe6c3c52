mod common;

use std::sync::Arc;

use account_service::account::errors::AuthError;
use account_service::account::models::Credentials;
use account_service::account::ports::AuthServicePort;
use account_service::account::ports::Clock;
use account_service::outbound::clock::SystemClock;
use account_service::repositories::InMemoryAccountRepository;
use auth::TokenError;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use common::build_service;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[tokio::test]
async fn test_register_then_login_share_subject() {
    let repository = Arc::new(InMemoryAccountRepository::new());
    let service = build_service(Arc::clone(&repository), Arc::new(SystemClock));

    let registered = service
        .register(Credentials::new("user@example.com", "s3cret!"))
        .await
        .expect("Registration failed");
    let logged_in = service
        .login(Credentials::new("user@example.com", "s3cret!"))
        .await
        .expect("Login failed");

    assert_eq!(registered.claims.sub, logged_in.claims.sub);

    let email = account_service::account::models::EmailAddress::new("user@example.com").unwrap();
    let account = account_service::account::ports::AccountRepository::find_by_email(
        repository.as_ref(),
        &email,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(registered.claims.sub, account.id.to_string());
    assert_ne!(account.password_hash, "s3cret!");
}

#[tokio::test]
async fn test_scenario_register_login_wrong_password_duplicate() {
    let repository = Arc::new(InMemoryAccountRepository::new());
    let service = build_service(Arc::clone(&repository), Arc::new(SystemClock));

    let token_a = service
        .register(Credentials::new("user@example.com", "s3cret!"))
        .await
        .unwrap();
    let token_b = service
        .login(Credentials::new("user@example.com", "s3cret!"))
        .await
        .unwrap();
    assert_eq!(token_a.claims.subject(), token_b.claims.subject());

    let wrong = service
        .login(Credentials::new("user@example.com", "wrong"))
        .await;
    assert_eq!(wrong.unwrap_err(), AuthError::InvalidCredentials);

    let duplicate = service
        .register(Credentials::new("user@example.com", "anything"))
        .await;
    assert_eq!(duplicate.unwrap_err(), AuthError::DuplicateAccount);

    assert_eq!(repository.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_create_one_account() {
    let repository = Arc::new(InMemoryAccountRepository::new());
    let service = Arc::new(build_service(
        Arc::clone(&repository),
        Arc::new(SystemClock),
    ));

    let attempts: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let email = if i % 2 == 0 {
                    "race@example.com"
                } else {
                    "RACE@example.com"
                };
                service
                    .register(Credentials::new(email, format!("password-{}", i)))
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    let mut duplicates = 0;
    for attempt in attempts {
        match attempt.await.expect("Registration task panicked") {
            Ok(_) => successes += 1,
            Err(AuthError::DuplicateAccount) => duplicates += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn test_token_lifetime_follows_service_clock() {
    let repository = Arc::new(InMemoryAccountRepository::new());
    let issued_at = DateTime::from_timestamp(1_704_110_400, 0).unwrap();

    let service = build_service(Arc::clone(&repository), Arc::new(FixedClock(issued_at)));
    let issued = service
        .register(Credentials::new("user@example.com", "s3cret!"))
        .await
        .unwrap();

    let just_before = build_service(
        Arc::clone(&repository),
        Arc::new(FixedClock(issued_at + Duration::hours(24) - Duration::milliseconds(500))),
    );
    assert!(just_before.verify_token(&issued.token).is_ok());

    let at_expiry = build_service(
        Arc::clone(&repository),
        Arc::new(FixedClock(issued_at + Duration::hours(24))),
    );
    assert_eq!(
        at_expiry.verify_token(&issued.token),
        Err(TokenError::Expired)
    );
}
