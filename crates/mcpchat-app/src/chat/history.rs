use mcpchat_models::Message;

/// Ordered, append-only list of conversation messages
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation, optionally seeded with a system message
    pub fn with_system_prompt(system_prompt: Option<&str>) -> Self {
        let mut history = Self::new();
        if let Some(prompt) = system_prompt {
            history.push(Message::system(prompt));
        }
        history
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
