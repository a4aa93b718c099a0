use serde::{Deserialize, Serialize};

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender
    #[serde(default)]
    pub role: Role,

    /// The content parts of the message, in order
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

/// The role of a message sender
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    #[default]
    User,
    Assistant,
    Tool,
    /// Any role this provider does not know; rendered as a user turn
    #[serde(other)]
    Unknown,
}

/// One part of a message's content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        #[serde(default)]
        text: String,
    },
    /// Images, files and other parts; the completion prompt has no place for them
    #[serde(other)]
    Other,
}

impl Message {
    pub fn new(role: Role, content: Vec<ContentPart>) -> Self {
        Self { role, content }
    }

    /// Create a system message
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, vec![ContentPart::text(text)])
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentPart::text(text)])
    }

    /// Create an assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![ContentPart::text(text)])
    }

    /// Create a tool message
    pub fn tool(text: impl Into<String>) -> Self {
        Self::new(Role::Tool, vec![ContentPart::text(text)])
    }

    /// Non-empty text parts joined by newlines, trimmed
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentPart::as_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_host_message() {
        let message: Message = serde_json::from_value(json!({
            "role": "assistant",
            "content": [
                {"type": "text", "text": "first"},
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}},
                {"type": "text", "text": "second"},
            ]
        }))
        .unwrap();

        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content.len(), 3);
        assert_eq!(message.content[1], ContentPart::Other);
        assert_eq!(message.text(), "first\nsecond");
    }

    #[test]
    fn test_missing_role_is_user() {
        let message: Message =
            serde_json::from_value(json!({"content": [{"type": "text", "text": "hi"}]})).unwrap();
        assert_eq!(message.role, Role::User);
    }

    #[test]
    fn test_unknown_role() {
        let message: Message = serde_json::from_value(json!({"role": "developer", "content": []})).unwrap();
        assert_eq!(message.role, Role::Unknown);
    }

    #[test]
    fn test_text_skips_empty_parts_and_trims() {
        let message = Message::new(
            Role::User,
            vec![
                ContentPart::text("  a"),
                ContentPart::text(""),
                ContentPart::text("b  \n"),
            ],
        );
        assert_eq!(message.text(), "a\nb");
    }
}
