use crate::agent::tools::ToolResult;
use crate::errors::{AgentError, AgentResult};
use crate::providers::base::{Message, Role, ToolCallRequest};
use std::collections::{HashSet, VecDeque};

/// The ordered message log of one conversation.
///
/// Append-only: there is no way to remove, reorder or edit an entry once it has
/// been pushed. The caller owns it and lends it to
/// [`AgentLoop::run`](crate::agent::AgentLoop::run) for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with a system prompt.
    pub fn with_system(prompt: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.push_system(prompt);
        conversation
    }

    /// Adopt an externally supplied history. It is checked against the pairing
    /// rules when a run starts, not here.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn push_system(&mut self, content: impl Into<String>) {
        self.messages.push(Message::system(content));
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn push_tool_result(&mut self, call: &ToolCallRequest, result: ToolResult) {
        self.messages.push(Message::tool_result(
            &call.id,
            &call.name,
            result.content,
            result.is_error,
        ));
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

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    /// Whether any assistant message in the log already issued `id`.
    pub fn has_call_id(&self, id: &str) -> bool {
        self.messages
            .iter()
            .flat_map(|m| &m.tool_calls)
            .any(|tc| tc.id == id)
    }

    /// Check the request/response pairing of the whole log.
    ///
    /// Every tool message must answer the oldest unanswered call of the
    /// preceding assistant message, tool-call ids must be unique, and no call
    /// may be left unanswered.
    pub fn validate_pairing(&self) -> AgentResult<()> {
        let mut pending: VecDeque<&ToolCallRequest> = VecDeque::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for (index, msg) in self.messages.iter().enumerate() {
            if msg.role != Role::Tool
                && let Some(open) = pending.front()
            {
                return Err(AgentError::Protocol(format!(
                    "tool call '{}' is unanswered at message {}",
                    open.id, index
                )));
            }

            match msg.role {
                Role::Assistant => {
                    for call in &msg.tool_calls {
                        if call.id.is_empty() {
                            return Err(AgentError::Protocol(format!(
                                "tool call with empty id at message {}",
                                index
                            )));
                        }
                        if !seen.insert(call.id.as_str()) {
                            return Err(AgentError::Protocol(format!(
                                "duplicate tool call id '{}' at message {}",
                                call.id, index
                            )));
                        }
                        pending.push_back(call);
                    }
                }
                Role::Tool => {
                    let id = msg.tool_call_id.as_deref().unwrap_or_default();
                    match pending.pop_front() {
                        Some(call) if call.id == id => {}
                        Some(call) => {
                            return Err(AgentError::Protocol(format!(
                                "tool message at {} answers '{}' but '{}' is next",
                                index, id, call.id
                            )));
                        }
                        None => {
                            return Err(AgentError::Protocol(format!(
                                "tool message at {} answers '{}' which was never requested",
                                index, id
                            )));
                        }
                    }
                }
                Role::System | Role::User => {}
            }
        }

        match pending.front() {
            Some(open) => Err(AgentError::Protocol(format!(
                "tool call '{}' is unanswered at end of log",
                open.id
            ))),
            None => Ok(()),
        }
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self::from_messages(messages)
    }
}
