use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedAccount;

/// Echo the verified claims of the presented bearer token.
pub async fn get_session(
    Extension(account): Extension<AuthenticatedAccount>,
) -> ApiSuccess<SessionResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        SessionResponseData {
            subject: account.account_id.to_string(),
            issued_at: account.claims.issued_at(),
            expires_at: account.claims.expires_at(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub subject: String,
    /// RFC 3339
    pub issued_at: DateTime<Utc>,
    /// RFC 3339
    pub expires_at: DateTime<Utc>,
}
