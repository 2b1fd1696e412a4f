use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure classes the results server reports. `Upstream` covers every way the
/// Ergast API can let us down before we get a usable payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    Upstream,
    Internal,
}

/// JSON error body returned by `/api/*` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Upstream, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub message: String,
}

impl From<ApiException> for ApiError {
    fn from(value: ApiException) -> Self {
        Self::new(value.code, value.message)
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
    fn wire_format_uses_snake_case_codes() {
        let body = serde_json::to_value(ApiError::upstream("Failed to fetch data from Ergast API"))
            .expect("json");
        assert_eq!(
            body,
            serde_json::json!({
                "code": "upstream",
                "message": "Failed to fetch data from Ergast API"
            })
        );

        let parsed: ApiError =
            serde_json::from_str(r#"{"code":"validation","message":"Missing year parameter"}"#)
                .expect("parse");
        assert_eq!(parsed, ApiError::validation("Missing year parameter"));
    }

    #[test]
    fn only_reported_codes_are_accepted() {
        for code in ["validation", "upstream", "internal"] {
            assert!(serde_json::from_str::<ErrorCode>(&format!("\"{code}\"")).is_ok());
        }
        assert!(serde_json::from_str::<ErrorCode>("\"not_found\"").is_err());
    }

    #[test]
    fn exception_display_names_the_code() {
        let exception = ApiException::from(ApiError::internal("bad payload"));
        assert_eq!(exception.to_string(), "Internal: bad payload");
        assert_eq!(ApiError::from(exception).code, ErrorCode::Internal);
    }
}
