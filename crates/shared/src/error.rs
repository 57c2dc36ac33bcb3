use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            400..=499 => Self::Validation,
            _ => Self::Internal,
        }
    }
}

/// Error body returned by the feeder backend (`{"detail": ...}`).
///
/// `detail` is a plain string for handled errors and a list of field errors
/// when request validation rejects the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub detail: Value,
}

impl ApiError {
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|item| match item.get("msg").and_then(Value::as_str) {
                        Some(msg) => msg.to_string(),
                        None => item.to_string(),
                    })
                    .collect();
                Some(parts.join("; "))
            }
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
#[error("{code:?} (status {status}): {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub status: u16,
    pub message: String,
}

impl ApiException {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::from_status(status),
            status,
            message: message.into(),
        }
    }

    /// Builds an exception from a raw response body, preferring the
    /// backend's `detail` field over the raw text.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ApiError>(body)
            .ok()
            .and_then(|err| err.message())
            .unwrap_or_else(|| body.trim().to_string());
        Self::new(status, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_error_codes() {
        assert_eq!(ErrorCode::from_status(404), ErrorCode::NotFound);
        assert_eq!(ErrorCode::from_status(422), ErrorCode::Validation);
        assert_eq!(ErrorCode::from_status(503), ErrorCode::Internal);
    }

    #[test]
    fn exception_prefers_detail_string() {
        let err = ApiException::from_body(400, r#"{"detail":"Pet already exists"}"#);
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(err.message, "Pet already exists");
    }

    #[test]
    fn exception_joins_validation_messages() {
        let body = r#"{"detail":[{"loc":["body","amount"],"msg":"field required"},{"msg":"value is not a valid integer"}]}"#;
        let err = ApiException::from_body(422, body);
        assert_eq!(err.message, "field required; value is not a valid integer");
    }

    #[test]
    fn exception_falls_back_to_raw_body() {
        let err = ApiException::from_body(502, "  bad gateway\n");
        assert_eq!(err.message, "bad gateway");
    }
}
