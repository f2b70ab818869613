//! Report delivery.
//!
//! [`SmtpNotifier`] sends the report as a plain-text mail over an
//! authenticated STARTTLS connection. [`LogNotifier`] only logs it and backs
//! `--dry-run`. Failures are returned to the monitor, which logs them; nothing
//! here retries.

use crate::config::MonitorConfig;
use crate::error::DeliveryError;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, instrument};

/// Trait for delivering a cycle report.
///
/// The monitor only needs this seam, so tests can swap in a recording fake and
/// `--dry-run` can swap in [`LogNotifier`].
pub trait Notify {
    /// Deliver `body` under `subject` to the configured recipient.
    ///
    /// # Arguments
    ///
    /// * `subject` - Mail subject line
    /// * `body` - Plain-text report
    ///
    /// # Returns
    ///
    /// `Ok(())` once the message was accepted, or the [`DeliveryError`] that
    /// stopped it.
    async fn notify(&self, subject: &str, body: &str) -> Result<(), DeliveryError>;
}

/// Sends reports as plain-text mail through an SMTP relay.
///
/// The connection uses STARTTLS and, when a password is configured, logs in
/// with the configured username. The transport is pooled and must be created
/// and dropped inside a Tokio runtime.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
}

impl SmtpNotifier {
    /// Validate addresses and prepare the transport. No connection is opened
    /// until the first [`Notify::notify`].
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the sender, recipient, relay host and port,
    ///   login and the per-request timeout
    ///
    /// # Errors
    ///
    /// [`DeliveryError::Address`] for an unparsable sender or recipient, and
    /// [`DeliveryError::Transport`] if the relay settings are rejected.
    pub fn new(config: &MonitorConfig) -> Result<Self, DeliveryError> {
        let sender: Mailbox = config.sender.parse()?;
        let recipient: Mailbox = config.recipient.parse()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.mail_host)?
            .port(config.mail_port)
            .timeout(Some(config.request_timeout));
        if let Some(password) = &config.credential {
            builder = builder.credentials(Credentials::new(
                config.mail_username.clone(),
                password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            sender,
            recipient,
        })
    }
}

impl Notify for SmtpNotifier {
    #[instrument(level = "info", skip_all, fields(to = %self.recipient, subject = %subject))]
    async fn notify(&self, subject: &str, body: &str) -> Result<(), DeliveryError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        let response = self.transport.send(message).await?;
        info!(code = %response.code(), "Report mailed");
        Ok(())
    }
}

/// Logs the report at `info` instead of sending it.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notify for LogNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), DeliveryError> {
        info!(%subject, "Dry run; report not sent");
        for line in body.lines() {
            info!("{line}");
        }
        Ok(())
    }
}
