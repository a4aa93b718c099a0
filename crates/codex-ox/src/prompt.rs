//! Flattening of a conversation into a single completion prompt.
//!
//! Each turn becomes a `<Label>::` header followed by its text, turns are
//! separated by a blank line, and the prompt always ends on an assistant
//! turn so the model knows where to continue.

use crate::message::{Message, Role};

/// Trailing marker that hands the turn to the model
pub const ASSISTANT_MARKER: &str = "Assistant::";

impl Role {
    /// Label used for this role in the compiled prompt
    pub fn label(self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User | Role::Unknown => "User",
            Role::Assistant => "Assistant",
            Role::Tool => "Tool",
        }
    }
}

/// Compile `messages` into one prompt string.
///
/// Messages without text contribute nothing. If the last emitted block is
/// not an assistant turn (or nothing was emitted), an empty
/// [`ASSISTANT_MARKER`] block is appended.
pub fn compile_prompt(messages: &[Message]) -> String {
    let mut blocks = Vec::with_capacity(messages.len() + 1);
    let mut last_role = None;

    for message in messages {
        let text = message.text();
        if text.is_empty() {
            continue;
        }
        blocks.push(format!("{}::\n{}", message.role.label(), text));
        last_role = Some(message.role);
    }

    if last_role != Some(Role::Assistant) {
        blocks.push(ASSISTANT_MARKER.to_string());
    }

    blocks.join("\n\n")
}
