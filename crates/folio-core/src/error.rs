use thiserror::Error;

pub const UNCONFIGURED_REPLY: &str =
    "I'm sorry, I'm not fully configured right now (Missing API Key).";
pub const TRANSPORT_REPLY: &str =
    "I'm having trouble connecting right now. Please try again later.";

/// Terminal failure of a reply stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// No API key in the environment or config file
    #[error("no API key configured")]
    Configuration,
    /// Network, timeout or stream read failure
    #[error("transport error: {0}")]
    Transport(String),
    /// Provider answered with a non-success status (quota, auth, bad request)
    #[error("provider error {status}: {message}")]
    Provider { status: u16, message: String },
}

impl ChatError {
    /// Fixed text shown to the visitor in place of the reply
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::Configuration => UNCONFIGURED_REPLY,
            ChatError::Transport(_) | ChatError::Provider { .. } => TRANSPORT_REPLY,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ChatError::Provider {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ChatError::Transport(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(ChatError::Configuration.user_message(), UNCONFIGURED_REPLY);
        assert_eq!(ChatError::Transport("reset".into()).user_message(), TRANSPORT_REPLY);
        let quota = ChatError::Provider { status: 429, message: "quota".into() };
        assert_eq!(quota.user_message(), TRANSPORT_REPLY);
        assert_eq!(quota.to_string(), "provider error 429: quota");
    }
}
