//! Chat session controller
//!
//! Single-flight: IDLE -> BUSY on submit, back to IDLE when the reply
//! finishes, fails or is cancelled. The front end pulls events with
//! [`ChatController::next_event`] from its own loop and feeds them back
//! through [`ChatController::apply`], so the store and the conversation
//! history are only ever touched from that loop. An exchange enters history
//! when its `Finished` event is applied, never on cancel.

use tracing::{debug, info, warn};

use crate::error::ChatError;
use crate::session::{Conversation, ReplyStream, StreamEvent};
use crate::state::{ChatMessage, MessageStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    /// A reply is still streaming
    Busy,
    /// Blank after trimming
    EmptyInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyStatus {
    /// No reply was in flight
    Idle,
    Streaming,
    Finished,
    Failed(ChatError),
    Cancelled,
}

struct ActiveReply {
    message_id: String,
    question: String,
    reply: String,
    stream: ReplyStream,
    fragments: usize,
}

pub struct ChatController {
    conversation: Conversation,
    store: MessageStore,
    active: Option<ActiveReply>,
}

impl ChatController {
    pub fn new(conversation: Conversation) -> Self {
        Self {
            conversation,
            store: MessageStore::new(),
            active: None,
        }
    }

    pub fn with_greeting(mut self, greeting: &str) -> Self {
        self.store = MessageStore::with_greeting(greeting);
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.store.messages()
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::EmptyInput;
        }
        if self.is_busy() || self.store.has_pending() {
            debug!("submit rejected while a reply is streaming");
            return SubmitOutcome::Busy;
        }

        self.store.push_user(text);
        let Some(message_id) = self.store.push_pending_assistant() else {
            return SubmitOutcome::Busy;
        };
        let stream = self.conversation.send(text);
        info!(id = %message_id, chars = text.len(), "question submitted");

        self.active = Some(ActiveReply {
            message_id,
            question: text.to_string(),
            reply: String::new(),
            stream,
            fragments: 0,
        });
        SubmitOutcome::Accepted
    }

    /// Wait for the next event of the in-flight reply. Returns `None` right
    /// away when idle. A channel that closes without a terminal event is
    /// reported as a transport failure.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        let active = self.active.as_mut()?;
        let event = active.stream.recv().await.unwrap_or_else(|| {
            StreamEvent::Failed(ChatError::Transport(
                "reply stream closed unexpectedly".to_string(),
            ))
        });
        Some(event)
    }

    pub fn apply(&mut self, event: StreamEvent) -> ReplyStatus {
        let Some(active) = self.active.as_mut() else {
            return ReplyStatus::Idle;
        };

        match event {
            StreamEvent::Fragment(text) => {
                self.store.append_fragment(&active.message_id, &text);
                active.reply.push_str(&text);
                active.fragments += 1;
                ReplyStatus::Streaming
            }
            StreamEvent::Finished => {
                if let Some(active) = self.active.take() {
                    self.store.finish(&active.message_id);
                    self.conversation.commit(&active.question, &active.reply);
                    info!(id = %active.message_id, fragments = active.fragments, "reply finished");
                }
                ReplyStatus::Finished
            }
            StreamEvent::Failed(err) => {
                if let Some(active) = self.active.take() {
                    self.store.fail(&active.message_id, err.user_message());
                    warn!(id = %active.message_id, error = %err, "reply failed");
                }
                ReplyStatus::Failed(err)
            }
        }
    }

    /// Wait for and apply one event
    pub async fn step(&mut self) -> ReplyStatus {
        match self.next_event().await {
            Some(event) => self.apply(event),
            None => ReplyStatus::Idle,
        }
    }

    /// Drive the in-flight reply until it leaves the streaming state
    pub async fn run_to_completion(&mut self) -> ReplyStatus {
        loop {
            let status = self.step().await;
            if status != ReplyStatus::Streaming {
                return status;
            }
        }
    }

    /// Abandon the in-flight reply, keeping any partial text
    pub fn cancel(&mut self) -> ReplyStatus {
        let Some(mut active) = self.active.take() else {
            return ReplyStatus::Idle;
        };
        active.stream.cancel();
        self.store.cancel(&active.message_id);
        info!(id = %active.message_id, fragments = active.fragments, "reply cancelled");
        ReplyStatus::Cancelled
    }
}
