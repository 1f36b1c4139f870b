// src/services/email.rs

//! SMTP e-mail notifier.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::{EmailConfig, Item};
use crate::services::Notifier;

/// Sends one plain-text message per new listing through a STARTTLS relay.
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
    subject: String,
    body: String,
}

impl EmailNotifier {
    /// Create a notifier from config and the SMTP password.
    ///
    /// No connection is made until the first alert.
    pub fn new(config: &EmailConfig, password: String) -> Result<Self> {
        let credentials = Credentials::new(config.login().to_string(), password);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::config(format!("SMTP relay {}: {e}", config.smtp_host)))?
            .port(config.smtp_port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Ok(Self {
            transport,
            from: config.from_mailbox()?,
            to: config.to_mailbox()?,
            subject: config.subject.clone(),
            body: config.body.clone(),
        })
    }

    fn message(&self, item: &Item) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(item.format(&self.subject))
            .header(ContentType::TEXT_PLAIN)
            .body(item.format(&self.body))
            .map_err(|e| AppError::notify(item.identity_key(), e))
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, item: &Item) -> Result<()> {
        let message = self.message(item)?;

        log::info!("Sending alert for {} in {}", item.identity_key(), item.metro);
        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::notify(item.identity_key(), e))?;

        Ok(())
    }
}
