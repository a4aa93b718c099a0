use thiserror::Error;

/// Common errors that can occur in AI provider HTTP requests
#[derive(Error, Debug)]
pub enum CommonRequestError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid event data in streaming response
    #[error("Invalid event data: {0}")]
    InvalidEventData(String),

    /// Error originating from the request builder
    #[error("Request builder error: {0}")]
    RequestBuilder(String),
}

impl CommonRequestError {
    /// Whether the error came from decoding a response body rather than
    /// from the transport itself.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Json(_) | Self::InvalidEventData(_))
    }
}

/// Parse error response from HTTP status and body
pub fn parse_error_response(status: reqwest::StatusCode, body: &[u8]) -> CommonRequestError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|json| extract_error_message(&json))
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

    CommonRequestError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Extract error message from provider JSON error formats
fn extract_error_message(json: &serde_json::Value) -> Option<String> {
    // OpenAI format: {"error": {"message": "..."}}
    if let Some(msg) = json
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(serde_json::Value::as_str)
    {
        return Some(msg.to_string());
    }

    // Generic message field
    json.get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_openai_error_body() {
        let body = br#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        let err = parse_error_response(StatusCode::UNAUTHORIZED, body);
        match err {
            CommonRequestError::Status { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("Expected Status error, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_text_body() {
        let err = parse_error_response(StatusCode::BAD_GATEWAY, b"upstream unavailable");
        assert_eq!(err.to_string(), "HTTP 502: upstream unavailable");
        assert!(!err.is_decode());
    }

    #[test]
    fn test_generic_message_field() {
        let err = parse_error_response(StatusCode::TOO_MANY_REQUESTS, br#"{"message": "slow down"}"#);
        assert_eq!(err.to_string(), "HTTP 429: slow down");
    }
}
