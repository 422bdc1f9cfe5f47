use serde::{Deserialize, Serialize};

/// One chat session's history. Lives only as long as the session; nothing
/// here is persisted.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the user side of a turn.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message {
            role: MessageRole::User,
            content: content.into(),
        });
    }

    /// Records the fully accumulated assistant reply once its stream ends.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message {
            role: MessageRole::Assistant,
            content: content.into(),
        });
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_accumulate_in_order() {
        let mut conversation = Conversation::new();
        assert!(conversation.is_empty());

        conversation.push_user("hi");
        conversation.push_assistant("hello");

        let messages = conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].content, "hello");
    }
}
