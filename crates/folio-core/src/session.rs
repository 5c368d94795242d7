//! Streaming client: one conversation context per visit
//!
//! `Conversation::send` spawns a producer task per message. The task pushes
//! fragments into a bounded channel and always ends with exactly one terminal
//! event, unless the consumer goes away first.
//!
//! The producer never touches history. Whoever applies the `Finished` event
//! records the exchange with [`Conversation::commit`], so a reply that is
//! cancelled after the producer is done still stays out of the context.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::{Stream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::ai::{ChatRequest, GeminiClient, ModelProvider, Turn};
use crate::config::{Config, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::content::RESUME_CONTEXT;
use crate::error::ChatError;

pub const REPLY_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Fragment(String),
    Finished,
    Failed(ChatError),
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Fragment(_))
    }
}

/// System prompt, model settings and the history of completed exchanges
pub struct Conversation {
    provider: Option<Arc<dyn ModelProvider>>,
    system_instruction: String,
    model: String,
    temperature: f32,
    history: Mutex<Vec<Turn>>,
}

impl Conversation {
    /// A `None` provider means no credential; every send fails with `Configuration`
    pub fn new(provider: Option<Arc<dyn ModelProvider>>) -> Self {
        Self {
            provider,
            system_instruction: RESUME_CONTEXT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let provider = GeminiClient::from_config(config)
            .map(|client| Arc::new(client) as Arc<dyn ModelProvider>);
        if provider.is_none() {
            warn!("no API key found; assistant will report it is unavailable");
        }
        let conversation = Self::new(provider)
            .with_model(config.model())
            .with_temperature(config.temperature());
        info!(
            model = %conversation.model,
            configured = conversation.is_configured(),
            "conversation created"
        );
        conversation
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_system_instruction(mut self, instruction: &str) -> Self {
        self.system_instruction = instruction.to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.as_ref().map(|p| p.name()).unwrap_or("Offline")
    }

    /// Completed exchanges, oldest first
    pub fn history(&self) -> Vec<Turn> {
        self.history.lock().clone()
    }

    /// Record a finished exchange as context for later requests
    pub fn commit(&self, question: &str, reply: &str) {
        let mut turns = self.history.lock();
        turns.push(Turn::user(question));
        turns.push(Turn::model(reply));
        debug!(turns = turns.len(), "exchange committed to history");
    }

    /// Start a reply to `message`. Each call issues a fresh provider request.
    pub fn send(&self, message: &str) -> ReplyStream {
        let (tx, rx) = mpsc::channel(REPLY_CHANNEL_CAPACITY);

        let Some(provider) = self.provider.clone() else {
            // Fresh channel always has room for one event
            let _ = tx.try_send(StreamEvent::Failed(ChatError::Configuration));
            return ReplyStream { rx, task: None };
        };

        let request = ChatRequest {
            model: self.model.clone(),
            system_instruction: self.system_instruction.clone(),
            temperature: self.temperature,
            history: self.history(),
            message: message.to_string(),
        };

        let task = tokio::spawn(async move {
            let mut fragments = provider.stream_reply(request);
            let mut count = 0usize;

            while let Some(item) = fragments.next().await {
                match item {
                    Ok(text) if text.is_empty() => continue,
                    Ok(text) => {
                        count += 1;
                        if tx.send(StreamEvent::Fragment(text)).await.is_err() {
                            debug!("reply consumer dropped mid-stream");
                            return;
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, fragments = count, "reply stream failed");
                        let _ = tx.send(StreamEvent::Failed(err)).await;
                        return;
                    }
                }
            }

            debug!(fragments = count, "reply stream finished");
            let _ = tx.send(StreamEvent::Finished).await;
        });

        ReplyStream { rx, task: Some(task) }
    }
}

/// Consumer side of one reply. Not replayable; dropping it aborts the producer.
pub struct ReplyStream {
    rx: mpsc::Receiver<StreamEvent>,
    task: Option<JoinHandle<()>>,
}

impl ReplyStream {
    /// Next event, or `None` once the channel is closed
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        self.rx.recv().await
    }

    /// Stop the producer and close the channel
    pub fn cancel(&mut self) {
        self.rx.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Stream for ReplyStream {
    type Item = StreamEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<StreamEvent>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl Drop for ReplyStream {
    fn drop(&mut self) {
        self.cancel();
    }
}
