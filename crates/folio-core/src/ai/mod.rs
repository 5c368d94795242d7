pub mod gemini;

pub use gemini::GeminiClient;

use futures_util::stream::BoxStream;

use crate::error::ChatError;
use crate::state::ChatRole;

/// Reply text as the provider produces it, ending early on the first error
pub type FragmentStream = BoxStream<'static, Result<String, ChatError>>;

/// One finished exchange half, replayed as history on later requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: ChatRole,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: ChatRole::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, text: text.into() }
    }
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub system_instruction: String,
    pub temperature: f32,
    pub history: Vec<Turn>,
    pub message: String,
}

/// A hosted model that can stream a reply
pub trait ModelProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn stream_reply(&self, request: ChatRequest) -> FragmentStream;
}
