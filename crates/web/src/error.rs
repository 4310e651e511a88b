use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use ledger::LedgerError;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Seconds a client should wait before retrying a transient failure.
const RETRY_AFTER_SECS: u32 = 1;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Ledger(LedgerError),
    Validation(ValidationErrors),
    BadRequest(String),
    /// No bearer token, or one the key registry does not know.
    MissingToken,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ledger(e) => write!(f, "Ledger error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::MissingToken => write!(f, "Missing or unknown bearer token"),
        }
    }
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Ledger(e) => match e {
                LedgerError::NotFound => StatusCode::NOT_FOUND,
                LedgerError::Forbidden
                | LedgerError::Unauthorized
                | LedgerError::UserIneligible => StatusCode::FORBIDDEN,
                LedgerError::InvalidState { .. }
                | LedgerError::AlreadyReviewed
                | LedgerError::AlreadyEnrolled
                | LedgerError::CompetitionClosed
                | LedgerError::NonMonotonicTimestamp
                | LedgerError::ConfigurationChanged
                | LedgerError::ConstraintViolation(_) => StatusCode::CONFLICT,
                LedgerError::InvalidAmount(_)
                | LedgerError::InvalidRange(_)
                | LedgerError::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
                LedgerError::StoreUnavailable(_) | LedgerError::Timeout => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                LedgerError::NoConfiguration
                | LedgerError::Database(_)
                | LedgerError::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MissingToken => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ledger(e) => e.kind(),
            Self::Validation(_) => "validation",
            Self::BadRequest(_) => "bad_request",
            Self::MissingToken => "unauthenticated",
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let kind = self.kind();

        let body = match &self {
            Self::Ledger(e @ (LedgerError::Database(_) | LedgerError::Migration(_))) => {
                tracing::error!("Ledger error: {:?}", e);
                json!({
                    "error": "An internal error occurred",
                    "kind": kind
                })
            }
            Self::Ledger(e) => {
                if e.is_transient() {
                    tracing::warn!("Ledger unavailable: {}", e);
                }
                json!({
                    "error": e.to_string(),
                    "kind": kind
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "kind": kind,
                    "details": field_errors
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "error": msg,
                    "kind": kind
                })
            }
            Self::MissingToken => {
                json!({
                    "error": "Unauthorized",
                    "kind": kind
                })
            }
        };

        let mut response = (status_code, Json(body)).into_response();
        if status_code == StatusCode::SERVICE_UNAVAILABLE {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(RETRY_AFTER_SECS));
        }
        response
    }
}

impl From<LedgerError> for WebError {
    fn from(error: LedgerError) -> Self {
        Self::Ledger(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

pub type ApiResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ledger::models::ParticipationStatus;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (LedgerError::NotFound, StatusCode::NOT_FOUND),
            (LedgerError::Unauthorized, StatusCode::FORBIDDEN),
            (LedgerError::UserIneligible, StatusCode::FORBIDDEN),
            (LedgerError::AlreadyEnrolled, StatusCode::CONFLICT),
            (LedgerError::ConfigurationChanged, StatusCode::CONFLICT),
            (
                LedgerError::invalid_state(
                    &[ParticipationStatus::PendingVerification],
                    ParticipationStatus::Verified,
                ),
                StatusCode::CONFLICT,
            ),
            (
                LedgerError::InvalidAmount("wrong".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (LedgerError::Timeout, StatusCode::SERVICE_UNAVAILABLE),
            (
                LedgerError::NoConfiguration,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(WebError::from(error).status_code(), expected);
        }
        assert_eq!(WebError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_transient_errors_carry_retry_after() {
        let response = WebError::from(LedgerError::Timeout).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().contains_key(header::RETRY_AFTER));

        let response = WebError::from(LedgerError::NotFound).into_response();
        assert!(!response.headers().contains_key(header::RETRY_AFTER));
    }
}
