use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error kinds a caller of the roster endpoints can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The path names no seeded activity. Nothing was mutated.
    NotFound,
    /// The request itself was malformed, e.g. `email` missing from the query.
    Validation,
}

/// Body of every non-2xx response:
/// `{"code": "not_found", "message": "Activity not found"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn activity_not_found() -> Self {
        Self::new(ErrorCode::NotFound, "Activity not found")
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }
}

/// `ApiError` as a Rust error, for clients that propagate it with `?`.
#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiException {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ApiException> for ApiError {
    fn from(value: ApiException) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}

impl From<ApiError> for ApiException {
    fn from(value: ApiError) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_body_uses_snake_case_code() {
        let json = serde_json::to_value(ApiError::activity_not_found()).expect("json");
        assert_eq!(
            json,
            serde_json::json!({ "code": "not_found", "message": "Activity not found" })
        );
    }

    #[test]
    fn exception_round_trips_code_and_message() {
        let exception = ApiException::from(ApiError::new(ErrorCode::Validation, "missing email"));
        assert_eq!(exception.to_string(), "Validation: missing email");

        let error = ApiError::from(exception);
        assert!(!error.is_not_found());
        assert_eq!(error.message, "missing email");
    }
}
