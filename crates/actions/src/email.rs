use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use trigon_core::ActionSpec;

use crate::error::ActionError;
use crate::handler::{ActionHandler, Invocation};

/// A rendered, ready-to-send email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery seam for the email action.
///
/// The engine only defines this contract; the SMTP implementation below is
/// one transport, mock transports in tests are another.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver one message.
    async fn send(&self, message: &EmailMessage) -> Result<(), ActionError>;
}

/// Configuration for the SMTP transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub host: String,
    /// SMTP server port. Defaults to 587 (STARTTLS submission port).
    pub port: u16,
    /// Optional SMTP username for authentication.
    pub username: Option<String>,
    /// Optional SMTP password for authentication.
    pub password: Option<String>,
    /// The `From` address used in outgoing emails.
    pub from_address: String,
    /// Whether to use TLS for the SMTP connection. Defaults to `true`.
    pub tls: bool,
}

impl SmtpConfig {
    /// Create a config with the given host and sender address, port 587,
    /// TLS enabled and no authentication.
    pub fn new(host: impl Into<String>, from_address: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 587,
            username: None,
            password: None,
            from_address: from_address.into(),
            tls: true,
        }
    }

    /// Set SMTP authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// [`MailTransport`] backed by an async `lettre` SMTP transport.
pub struct SmtpMailTransport {
    config: SmtpConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for SmtpMailTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailTransport")
            .field("config", &self.config)
            .field("transport", &"<AsyncSmtpTransport>")
            .finish()
    }
}

impl SmtpMailTransport {
    /// Build the SMTP transport from the given configuration.
    ///
    /// Returns [`ActionError::InvalidConfig`] if the transport cannot be
    /// built (e.g. invalid host).
    pub fn new(config: SmtpConfig) -> Result<Self, ActionError> {
        let mut builder = if config.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| ActionError::InvalidConfig(format!("SMTP TLS relay error: {e}")))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };
        builder = builder.port(config.port);

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            config,
        })
    }
}

/// Build a `lettre::Message` from a rendered email and the sender config.
///
/// Free function so address handling can be tested without a transport.
fn build_lettre_message(from: &str, email: &EmailMessage) -> Result<Message, ActionError> {
    let from_mailbox: Mailbox = from
        .parse()
        .map_err(|e| ActionError::InvalidConfig(format!("invalid from address: {e}")))?;
    let to_mailbox: Mailbox = email
        .to
        .parse()
        .map_err(|e| ActionError::ExecutionFailed(format!("invalid recipient address: {e}")))?;

    Message::builder()
        .from(from_mailbox)
        .to(to_mailbox)
        .subject(&email.subject)
        .body(email.body.clone())
        .map_err(|e| ActionError::ExecutionFailed(format!("failed to build email: {e}")))
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: &EmailMessage) -> Result<(), ActionError> {
        let lettre_message = build_lettre_message(&self.config.from_address, message)?;
        self.transport
            .send(lettre_message)
            .await
            .map_err(|e| ActionError::Connection(format!("SMTP send failed: {e}")))?;
        Ok(())
    }
}

/// Handler for the `email` action type.
///
/// Renders the configured subject and template against the event payload
/// and hands the result to the [`MailTransport`].
pub struct EmailHandler {
    transport: Arc<dyn MailTransport>,
}

impl EmailHandler {
    /// Create a handler delivering through the given transport.
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }
}

/// Render a template string against the event payload.
fn render(source: &str, event: &serde_json::Value) -> Result<String, ActionError> {
    minijinja::Environment::new()
        .render_str(source, event)
        .map_err(|e| ActionError::InvalidConfig(format!("template error: {e}")))
}

#[async_trait]
impl ActionHandler for EmailHandler {
    fn kind(&self) -> &str {
        "email"
    }

    #[instrument(skip(self, invocation), fields(tenant = %invocation.tenant))]
    async fn execute(
        &self,
        invocation: &Invocation<'_>,
    ) -> Result<serde_json::Value, ActionError> {
        let ActionSpec::Email {
            to,
            subject,
            template,
        } = invocation.spec
        else {
            return Err(ActionError::InvalidConfig(format!(
                "email handler received {} config",
                invocation.spec.kind()
            )));
        };

        let subject = render(subject, invocation.event)?;
        let body = render(template, invocation.event)?;

        let message = EmailMessage {
            to: to.clone(),
            subject: subject.clone(),
            body,
        };
        self.transport.send(&message).await?;

        debug!(to = %to, "email dispatched");
        Ok(serde_json::json!({
            "sent": true,
            "to": to,
            "subject": subject,
        }))
    }
}
