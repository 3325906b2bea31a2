use serde::{Deserialize, Serialize};

/// Error shape returned by the billing API.
///
/// The platform reports application failures as a JSON `error` member with
/// at least a `message` and, for HTTP-level failures, a numeric `code`.
/// Validation and transport failures are folded into the same shape so a
/// query has exactly one error type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human readable description of the failure.
    pub message: String,
    /// HTTP status code, when one is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl ApiError {
    /// An error with a message and no status code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// An error carrying an HTTP status code.
    pub fn with_code(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
        }
    }

    /// The error produced when a request is cancelled mid-flight.
    pub fn cancelled() -> Self {
        Self::new("request cancelled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_with_code() {
        let error: ApiError =
            serde_json::from_value(json!({ "message": "bad request", "code": 400 })).unwrap();
        assert_eq!(error, ApiError::with_code("bad request", 400));
    }

    #[test]
    fn deserializes_without_code() {
        let error: ApiError = serde_json::from_value(json!({ "message": "server error" })).unwrap();
        assert_eq!(error, ApiError::new("server error"));
    }

    #[test]
    fn displays_message() {
        assert_eq!(
            ApiError::with_code("bad request", 400).to_string(),
            "bad request"
        );
    }
}
