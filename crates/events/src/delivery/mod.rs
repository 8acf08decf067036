//! Outbound message delivery.
//!
//! Dispatchers render an [`OutboundMessage`] and hand it to a
//! [`MessageTransport`]. The default transport writes a structured log line;
//! [`email::EmailTransport`] sends over SMTP when configured.

pub mod email;
pub mod log;

use async_trait::async_trait;
use coursehub_core::types::Timestamp;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for message delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("Message build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// OutboundMessage
// ---------------------------------------------------------------------------

/// What a message is about, for logging and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Missing-log reminder to a facilitator.
    Reminder,
    /// Activity log lifecycle alert to managers.
    Alert,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reminder => "reminder",
            Self::Alert => "alert",
        }
    }
}

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub kind: MessageKind,
    /// Recipient email addresses. Never empty.
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub timestamp: Timestamp,
}

// ---------------------------------------------------------------------------
// MessageTransport
// ---------------------------------------------------------------------------

#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError>;
}
