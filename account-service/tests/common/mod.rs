#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use account_service::account::ports::Clock;
use account_service::domain::account::service::AuthService;
use account_service::domain::account::service::AuthSettings;
use account_service::inbound::http::router::create_router;
use account_service::outbound::clock::SystemClock;
use account_service::repositories::InMemoryAccountRepository;
use auth::HashCost;
use auth::PasswordHasher;
use auth::TokenIssuer;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Argon2 parameters cheap enough for tests
pub fn test_hash_cost() -> HashCost {
    HashCost {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn test_settings() -> AuthSettings {
    AuthSettings {
        token_duration: chrono::Duration::hours(24),
        min_password_length: 6,
    }
}

/// Auth service over an in-memory store
pub fn build_service<C: Clock>(
    repository: Arc<InMemoryAccountRepository>,
    clock: Arc<C>,
) -> AuthService<InMemoryAccountRepository, C> {
    AuthService::new(
        repository,
        clock,
        Arc::new(PasswordHasher::new(test_hash_cost()).expect("Failed to build hasher")),
        Arc::new(TokenIssuer::new(JWT_SECRET)),
        test_settings(),
    )
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryAccountRepository>,
    pub api_client: reqwest::Client,
    pub token_issuer: TokenIssuer,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryAccountRepository::new());
        let auth_service = Arc::new(build_service(
            Arc::clone(&repository),
            Arc::new(SystemClock),
        ));

        let router = create_router(auth_service, Duration::from_secs(10));

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            api_client: reqwest::Client::new(),
            token_issuer: TokenIssuer::new(JWT_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }
}
