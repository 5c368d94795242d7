pub mod ai;
pub mod config;
pub mod content;
pub mod controller;
pub mod dance;
pub mod error;
pub mod gallery;
pub mod pixel;
pub mod session;
pub mod state;
pub mod trigger;

// Re-export main types for convenience
pub use ai::{ChatRequest, GeminiClient, ModelProvider, Turn};
pub use config::Config;
pub use controller::{ChatController, ReplyStatus, SubmitOutcome};
pub use dance::{DanceClient, DanceStage};
pub use error::ChatError;
pub use gallery::{Gallery, Photo};
pub use pixel::PixelArt;
pub use session::{Conversation, ReplyStream, StreamEvent};
pub use state::{ChatMessage, ChatRole, MessageStore};
pub use trigger::{TriggerReceiver, TriggerSender};
