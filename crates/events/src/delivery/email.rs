//! Message delivery via SMTP.
//!
//! [`EmailTransport`] wraps the `lettre` async SMTP transport and sends each
//! [`OutboundMessage`] as one plain-text email addressed to all of its
//! recipients. If `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns
//! `None` and the worker falls back to the log transport.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{DeliveryError, MessageTransport, OutboundMessage};

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@coursehub.local";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables, or `None` when
    /// `SMTP_HOST` is unset.
    ///
    /// | Variable        | Required | Default                    |
    /// |-----------------|----------|----------------------------|
    /// | `SMTP_HOST`     | yes      | none                       |
    /// | `SMTP_PORT`     | no       | `587`                      |
    /// | `SMTP_FROM`     | no       | `noreply@coursehub.local`  |
    /// | `SMTP_USER`     | no       | none                       |
    /// | `SMTP_PASSWORD` | no       | none                       |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailTransport
// ---------------------------------------------------------------------------

pub struct EmailTransport {
    from_address: String,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailTransport {
    /// Build the SMTP mailer once and reuse it for every message.
    pub fn new(config: EmailConfig) -> Result<Self, DeliveryError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (config.smtp_user, config.smtp_password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            from_address: config.from_address,
            mailer: builder.build(),
        })
    }

    fn build_email(&self, message: &OutboundMessage) -> Result<Message, DeliveryError> {
        if message.recipients.is_empty() {
            return Err(DeliveryError::Build("message has no recipients".to_string()));
        }

        let mut builder = Message::builder()
            .from(self.from_address.parse()?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN);
        for recipient in &message.recipients {
            builder = builder.to(recipient.parse()?);
        }

        builder
            .body(message.body.clone())
            .map_err(|e| DeliveryError::Build(e.to_string()))
    }
}

#[async_trait]
impl MessageTransport for EmailTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let email = self.build_email(message)?;
        self.mailer.send(email).await?;

        tracing::info!(
            kind = message.kind.as_str(),
            recipients = message.recipients.len(),
            subject = %message.subject,
            "Notification email sent"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
