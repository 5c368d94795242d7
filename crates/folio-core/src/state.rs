//! UI-agnostic chat state types
//!
//! The message store is shared by every front end (TUI, one-shot CLI) and
//! doesn't depend on any UI framework.

use serde::{Deserialize, Serialize};

/// Shown in place of an empty reply when the user closes the panel mid-stream
pub const CANCELLED_NOTICE: &str = "(response cancelled)";

/// A chat message in the assistant conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    pub pending: bool,
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Role name on the Gemini wire
    pub fn as_wire(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "model",
        }
    }
}

/// Ordered chat turns. Append-only, except for the pending assistant turn at
/// the tail which may grow until it is finalized.
#[derive(Debug, Default, Clone)]
pub struct MessageStore {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a finished assistant greeting
    pub fn with_greeting(text: &str) -> Self {
        Self {
            messages: vec![ChatMessage {
                id: "welcome".to_string(),
                role: ChatRole::Assistant,
                text: text.to_string(),
                pending: false,
            }],
            next_id: 0,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(|m| m.pending)
    }

    pub fn push_user(&mut self, text: &str) -> String {
        self.push(ChatRole::User, text, false)
    }

    /// Append an empty assistant turn that will collect fragments.
    /// Returns `None` if another assistant turn is still pending.
    pub fn push_pending_assistant(&mut self) -> Option<String> {
        if self.has_pending() {
            return None;
        }
        Some(self.push(ChatRole::Assistant, "", true))
    }

    /// Concatenate a fragment onto the pending message. Finished messages are
    /// immutable, so this returns false for them.
    pub fn append_fragment(&mut self, id: &str, fragment: &str) -> bool {
        match self.pending_mut(id) {
            Some(msg) => {
                msg.text.push_str(fragment);
                true
            }
            None => false,
        }
    }

    /// Clear the pending flag, keeping whatever text has accumulated
    pub fn finish(&mut self, id: &str) -> bool {
        match self.pending_mut(id) {
            Some(msg) => {
                msg.pending = false;
                true
            }
            None => false,
        }
    }

    /// Replace any partial text with `text` and clear the pending flag
    pub fn fail(&mut self, id: &str, text: &str) -> bool {
        match self.pending_mut(id) {
            Some(msg) => {
                msg.text = text.to_string();
                msg.pending = false;
                true
            }
            None => false,
        }
    }

    /// Finalize after a cancel: partial text survives, an empty reply gets the notice
    pub fn cancel(&mut self, id: &str) -> bool {
        match self.pending_mut(id) {
            Some(msg) => {
                if msg.text.is_empty() {
                    msg.text = CANCELLED_NOTICE.to_string();
                }
                msg.pending = false;
                true
            }
            None => false,
        }
    }

    fn pending_mut(&mut self, id: &str) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().find(|m| m.id == id && m.pending)
    }

    fn push(&mut self, role: ChatRole, text: &str, pending: bool) -> String {
        self.next_id += 1;
        let id = format!("msg-{}", self.next_id);
        self.messages.push(ChatMessage {
            id: id.clone(),
            role,
            text: text.to_string(),
            pending,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let mut store = MessageStore::new();
        let a = store.push_user("one");
        let b = store.push_pending_assistant().unwrap();
        store.finish(&b);
        let c = store.push_user("two");
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_single_pending_assistant() {
        let mut store = MessageStore::new();
        store.push_user("hi");
        assert!(store.push_pending_assistant().is_some());
        assert!(store.push_pending_assistant().is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_finished_message_is_immutable() {
        let mut store = MessageStore::new();
        let id = store.push_pending_assistant().unwrap();
        assert!(store.append_fragment(&id, "done"));
        assert!(store.finish(&id));
        assert!(!store.append_fragment(&id, " more"));
        assert!(!store.fail(&id, "oops"));
        assert_eq!(store.get(&id).unwrap().text, "done");
    }

    #[test]
    fn test_fail_discards_partial_text() {
        let mut store = MessageStore::new();
        let id = store.push_pending_assistant().unwrap();
        store.append_fragment(&id, "partial");
        store.fail(&id, "sorry");
        let msg = store.get(&id).unwrap();
        assert_eq!(msg.text, "sorry");
        assert!(!msg.pending);
    }

    #[test]
    fn test_cancel_keeps_partial_or_uses_notice() {
        let mut store = MessageStore::new();
        let id = store.push_pending_assistant().unwrap();
        store.append_fragment(&id, "half an ans");
        store.cancel(&id);
        assert_eq!(store.get(&id).unwrap().text, "half an ans");

        let id = store.push_pending_assistant().unwrap();
        store.cancel(&id);
        assert_eq!(store.get(&id).unwrap().text, CANCELLED_NOTICE);
        assert!(!store.has_pending());
    }

    #[test]
    fn test_greeting_is_finished() {
        let store = MessageStore::with_greeting("Hello!");
        assert_eq!(store.len(), 1);
        assert_eq!(store.messages()[0].id, "welcome");
        assert!(!store.has_pending());
    }
}
