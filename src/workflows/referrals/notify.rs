use serde::{Deserialize, Serialize};

/// One outbound notice. The sender identity is fixed by the transport
/// (see `config::SenderIdentity`); the engine only decides recipient,
/// subject, and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Trait describing the best-effort mail hook behind the engine.
pub trait Notifier: Send + Sync {
    fn send(&self, email: OutboundEmail) -> Result<(), NotifyError>;
}

/// Mail dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}
