//! Transport that records messages as structured log events.

use async_trait::async_trait;

use super::{DeliveryError, MessageTransport, OutboundMessage};

/// Emits one `info` event per message instead of sending it anywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl MessageTransport for LogTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        tracing::info!(
            kind = message.kind.as_str(),
            recipients = ?message.recipients,
            subject = %message.subject,
            timestamp = %message.timestamp,
            body = %message.body,
            "Notification delivered"
        );
        Ok(())
    }
}
