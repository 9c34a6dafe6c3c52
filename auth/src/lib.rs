//! Authentication utilities library
//!
//! Provides the security-sensitive building blocks of account authentication:
//! - Password hashing (Argon2id, configurable work factor)
//! - Access token issuing and verification (HS256 JWT, typed claims)
//!
//! Neither component reads the wall clock or stores keys; callers supply both.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{HashCost, PasswordHasher};
//!
//! let hasher = PasswordHasher::new(HashCost::default()).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::TokenIssuer;
//! use chrono::{Duration, Utc};
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!");
//! let now = Utc::now();
//! let issued = issuer.issue("user123", now, Duration::hours(24)).unwrap();
//! let claims = issuer.verify(&issued.token, now).unwrap();
//! assert_eq!(claims.subject(), "user123");
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use password::HashCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
