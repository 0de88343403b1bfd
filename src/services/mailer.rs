use crate::config::EmailSettings;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Send error: {0}")]
    SendFailed(String),
}

/// One outbound email: a single message addressed to every recipient.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
    pub from: String,
    pub to: Vec<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> Result<(), MailerError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &EmailSettings) -> Result<Self, MailerError> {
        let builder = if settings.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host).map_err(|e| {
                MailerError::Configuration(format!("Failed to create SMTP relay: {}", e))
            })?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        };

        let mut builder = builder.port(settings.port);
        if !settings.user.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.user.clone(),
                settings.password.expose_secret().clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), MailerError> {
        let message = build_lettre_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::SendFailed(format!("Failed to send email: {}", e)))?;

        tracing::info!(
            subject = %email.subject,
            recipients = email.to.len(),
            "Email sent successfully"
        );

        Ok(())
    }
}

fn build_lettre_message(email: &EmailMessage) -> Result<Message, MailerError> {
    let from: Mailbox = email
        .from
        .parse()
        .map_err(|e| MailerError::Configuration(format!("Invalid from address: {}", e)))?;

    let mut builder = Message::builder().from(from).subject(&email.subject);
    for recipient in &email.to {
        let mailbox: Mailbox = recipient
            .parse()
            .map_err(|e| MailerError::InvalidRecipient(format!("Invalid recipient: {}", e)))?;
        builder = builder.to(mailbox);
    }

    match &email.html_body {
        Some(html) => builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html.clone()),
                    ),
            )
            .map_err(|e| MailerError::SendFailed(format!("Failed to build message: {}", e))),
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.text_body.clone())
            .map_err(|e| MailerError::SendFailed(format!("Failed to build message: {}", e))),
    }
}

/// Console backend: logs the full message instead of delivering it.
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), MailerError> {
        tracing::info!(
            from = %email.from,
            to = ?email.to,
            subject = %email.subject,
            body = %email.text_body,
            "Email written to console"
        );
        Ok(())
    }
}

pub type Outbox = Arc<Mutex<Vec<EmailMessage>>>;

/// In-memory backend for tests: messages accumulate in a shared outbox.
#[derive(Default)]
pub struct MemoryMailer {
    outbox: Outbox,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outbox(&self) -> Outbox {
        self.outbox.clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), MailerError> {
        self.outbox
            .lock()
            .expect("outbox mutex poisoned")
            .push(email.clone());
        Ok(())
    }
}
