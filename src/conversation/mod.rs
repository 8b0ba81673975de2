//! Conversation transcript exchanged with the chat relay
//!
//! Index 0 is always the primer. Generating a routine re-seeds the transcript
//! to the primer plus one synthesized user turn carrying the selected
//! products; follow-up questions and answers are appended after that.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// Number of leading turns never shown in the chat window
pub const HIDDEN_TURNS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new(primer: &str) -> Self {
        Self {
            messages: vec![Message {
                role: Role::System,
                content: primer.to_string(),
            }],
        }
    }

    /// Reset to `[primer, selection]`
    ///
    /// Returns `false` and leaves the transcript untouched when nothing is selected.
    pub fn seed(&mut self, selection: &[&Product]) -> bool {
        if selection.is_empty() {
            return false;
        }

        let products = serde_json::to_string_pretty(selection).unwrap_or_default();
        self.messages.truncate(1);
        self.messages.push(Message {
            role: Role::User,
            content: format!("Here are the selected products as JSON:\n{}", products),
        });
        true
    }

    /// Append a user turn; blank text is ignored
    pub fn append_user(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        self.messages.push(Message {
            role: Role::User,
            content: text.to_string(),
        });
        true
    }

    pub fn append_assistant(&mut self, text: &str) {
        self.messages.push(Message {
            role: Role::Assistant,
            content: text.to_string(),
        });
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Turns shown in the chat window
    pub fn visible(&self) -> &[Message] {
        self.messages.get(HIDDEN_TURNS..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}
