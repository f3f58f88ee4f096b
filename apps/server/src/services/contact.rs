//! Contact form delivery
//!
//! A submitted form becomes a [`ContactMessage`] addressed to the configured
//! admin recipient and is handed to a [`Mailer`].

use crate::{config::MailConfig, metrics, Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

pub const SENT_TEXT: &str = "Message sent. Thank you for contacting us.";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "comments are required"))]
    pub comments: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mailbox {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl ContactMessage {
    pub fn compose(form: &ContactForm, config: &MailConfig) -> Self {
        let name = html_escape::encode_text(&form.name);
        let email = html_escape::encode_text(&form.email);
        let comments = html_escape::encode_text(&form.comments);

        let html = format!(
            "<table><tr><td>Name</td><td>{name}</td></tr>\
             <tr><td>Email</td><td>{email}</td></tr></table>\
             <pre>{comments}</pre>"
        );
        let text = format!(
            "Name: {}\nEmail: {}\n\n{}",
            form.name, form.email, form.comments
        );

        Self {
            from: Mailbox {
                email: form.email.clone(),
                name: config.sender_name.clone(),
            },
            to: Mailbox {
                email: config.recipient.clone(),
                name: config.recipient_name.clone(),
            },
            subject: format!("Contact: {}", form.name),
            html,
            text,
        }
    }
}

/// Outbound mail delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message; the error string is shown to the submitter.
    async fn send(&self, message: &ContactMessage) -> std::result::Result<(), String>;
}

/// Posts messages as JSON to an HTTP mail relay.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("birdland-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build mail client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_token,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &ContactMessage) -> std::result::Result<(), String> {
        let mut request = self.client.post(&self.endpoint).json(message);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let detail = body.trim();
        if detail.is_empty() {
            Err(format!("mail relay returned {status}"))
        } else {
            Err(format!("mail relay returned {status}: {detail}"))
        }
    }
}

/// Used when no relay endpoint is configured.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _message: &ContactMessage) -> std::result::Result<(), String> {
        Err("mail delivery is not configured".to_string())
    }
}

/// Build the mailer described by configuration.
pub fn mailer_from_config(config: &MailConfig) -> Result<Arc<dyn Mailer>> {
    match &config.endpoint {
        Some(endpoint) => Ok(Arc::new(HttpMailer::new(
            endpoint.clone(),
            config.api_token.clone(),
            Duration::from_secs(config.timeout_seconds),
        )?)),
        None => {
            tracing::warn!("mail.endpoint is not set, contact messages will be rejected");
            Ok(Arc::new(DisabledMailer))
        }
    }
}

pub struct ContactService {
    mailer: Arc<dyn Mailer>,
    config: MailConfig,
}

impl ContactService {
    pub fn new(mailer: Arc<dyn Mailer>, config: MailConfig) -> Self {
        Self { mailer, config }
    }

    /// Validate and deliver a form, returning the confirmation text.
    pub async fn submit(&self, form: &ContactForm) -> Result<&'static str> {
        if let Err(e) = form.validate() {
            metrics::CONTACT_MESSAGES_TOTAL
                .with_label_values(&["invalid"])
                .inc();
            return Err(Error::Validation(e.to_string()));
        }

        let message = ContactMessage::compose(form, &self.config);
        match self.mailer.send(&message).await {
            Ok(()) => {
                metrics::CONTACT_MESSAGES_TOTAL
                    .with_label_values(&["sent"])
                    .inc();
                tracing::info!(subject = %message.subject, "Contact message sent");
                Ok(SENT_TEXT)
            }
            Err(e) => {
                metrics::CONTACT_MESSAGES_TOTAL
                    .with_label_values(&["failed"])
                    .inc();
                tracing::warn!(error = %e, "Contact message delivery failed");
                Err(Error::Mail(e))
            }
        }
    }
}
