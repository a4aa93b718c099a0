use ai_ox_common::CommonRequestError;
use serde::{Serialize, Serializer, ser::SerializeStruct};
use thiserror::Error;

/// Errors surfaced by the OpenAI Codex provider.
///
/// Every variant is fatal for the call that produced it; nothing is retried.
#[derive(Debug, Error)]
pub enum CodexError {
    /// The provider cannot perform the requested operation
    #[error("{0}")]
    Capability(String),

    /// An option could not be coerced to its declared type
    #[error("Invalid value for option '{key}': {value}. Error: {reason}")]
    InvalidOption {
        key: String,
        value: String,
        reason: String,
    },

    /// A required option is absent after merging defaults
    #[error("Missing required option '{0}'")]
    MissingOption(String),

    /// The credential capability produced no usable key
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    /// A response body or stream line was not valid JSON
    #[error("Invalid event data: {0}")]
    Decode(String),

    /// Connect, timeout or non-success status from the HTTP layer
    #[error(transparent)]
    Transport(CommonRequestError),
}

impl CodexError {
    /// Whether this error stems from the supplied configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidOption { .. } | Self::MissingOption(_))
    }
}

impl From<CommonRequestError> for CodexError {
    fn from(err: CommonRequestError) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}

impl Serialize for CodexError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CodexError::Capability(message) => {
                let mut state = serializer.serialize_struct("CodexError", 2)?;
                state.serialize_field("type", "CapabilityError")?;
                state.serialize_field("message", message)?;
                state.end()
            }
            CodexError::InvalidOption { key, value, reason } => {
                let mut state = serializer.serialize_struct("CodexError", 4)?;
                state.serialize_field("type", "ConfigurationError")?;
                state.serialize_field("key", key)?;
                state.serialize_field("value", value)?;
                state.serialize_field("message", reason)?;
                state.end()
            }
            CodexError::MissingOption(key) => {
                let mut state = serializer.serialize_struct("CodexError", 2)?;
                state.serialize_field("type", "ConfigurationError")?;
                state.serialize_field("key", key)?;
                state.end()
            }
            CodexError::MissingApiKey(message) => {
                let mut state = serializer.serialize_struct("CodexError", 2)?;
                state.serialize_field("type", "MissingApiKey")?;
                state.serialize_field("message", message)?;
                state.end()
            }
            CodexError::Decode(message) => {
                let mut state = serializer.serialize_struct("CodexError", 2)?;
                state.serialize_field("type", "DecodeError")?;
                state.serialize_field("message", message)?;
                state.end()
            }
            CodexError::Transport(e) => {
                let mut state = serializer.serialize_struct("CodexError", 2)?;
                state.serialize_field("type", "TransportError")?;
                state.serialize_field("error", &e.to_string())?;
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_errors_are_routed() {
        let err: CodexError = CommonRequestError::InvalidEventData("bad".to_string()).into();
        assert!(matches!(err, CodexError::Decode(_)));

        let err: CodexError = CommonRequestError::Status {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(matches!(err, CodexError::Transport(_)));
    }

    #[test]
    fn test_invalid_option_message() {
        let err = CodexError::InvalidOption {
            key: "max_tokens".to_string(),
            value: "lots".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for option 'max_tokens': lots. Error: invalid digit found in string"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_serialize() {
        let err = CodexError::Capability("no images".to_string());
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"type": "CapabilityError", "message": "no images"})
        );
    }
}
