use auth::IssuedToken;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::account::errors::AuthError;

pub mod login;
pub mod register;
pub mod session;

/// Shared by validation failures and duplicate registrations so the response does
/// not reveal whether an email is registered.
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid email or password";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiErrorBody { error: message })).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(_) | AuthError::DuplicateAccount => {
                ApiError::BadRequest(INVALID_REQUEST_MESSAGE.to_string())
            }
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
            }
            // Detail was logged where the failure was collapsed
            AuthError::Internal(_) => {
                ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
            }
        }
    }
}

/// Unreadable bodies get the same answer as invalid credentials input.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::BadRequest(INVALID_REQUEST_MESSAGE.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Response body of register and login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub token: String,
}

impl From<IssuedToken> for TokenResponseData {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::errors::EmailError;
    use crate::account::errors::ValidationError;

    #[test]
    fn test_duplicate_account_looks_like_validation_failure() {
        let duplicate = ApiError::from(AuthError::DuplicateAccount);
        let validation = ApiError::from(AuthError::Validation(ValidationError::Email(
            EmailError::Empty,
        )));

        assert_eq!(duplicate, validation);
        assert_eq!(
            duplicate,
            ApiError::BadRequest(INVALID_REQUEST_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = ApiError::from(AuthError::Internal(
            "Failed to look up account: connection refused".to_string(),
        ));

        assert_eq!(
            err,
            ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
        );
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
