//! Email service for sending documents to clients.
//!
//! Uses `lettre` for SMTP transport.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Plain-text summary of a document that is emailed to a client.
#[derive(Debug, Clone)]
pub struct DocumentEmail<'a> {
    /// Business sending the document.
    pub business_name: &'a str,
    /// Client display name.
    pub client_name: &'a str,
    /// Human-readable document kind, e.g. "Invoice".
    pub kind_label: &'a str,
    /// Document number.
    pub number: &'a str,
    /// Formatted total including currency.
    pub total: String,
    /// Formatted due date, when the document has one.
    pub due_date: Option<String>,
}

impl DocumentEmail<'_> {
    /// Subject line for the email.
    #[must_use]
    pub fn subject(&self) -> String {
        format!(
            "{} {} from {}",
            self.kind_label, self.number, self.business_name
        )
    }

    /// Plain-text body for the email.
    #[must_use]
    pub fn body(&self) -> String {
        let due_line = self
            .due_date
            .as_ref()
            .map(|d| format!("\nDue date: {d}"))
            .unwrap_or_default();

        format!(
            r"Hi {client},

{business} has sent you {kind} {number}.

Total: {total}{due_line}

Please contact {business} directly if you have any questions.",
            client = self.client_name,
            business = self.business_name,
            kind = self.kind_label.to_lowercase(),
            number = self.number,
            total = self.total,
        )
    }
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port);

        let builder = if self.config.smtp_username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            ))
        };

        Ok(builder.build())
    }

    /// Emails a document summary to a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be built or sent.
    pub async fn send_document(
        &self,
        to_email: &str,
        document: &DocumentEmail<'_>,
    ) -> Result<(), EmailError> {
        self.send_email(to_email, &document.subject(), &document.body())
            .await
    }

    /// Builds a plain-text message from the configured sender.
    fn build_message(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<Message, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }

    /// Sends a generic email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let email = self.build_message(to_email, subject, body)?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }
}
