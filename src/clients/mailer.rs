use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

use crate::models::invite::Invitation;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email configuration is incomplete")]
    NotConfigured,
    #[error("invalid email address {address}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
}

#[async_trait]
pub trait InviteMailer: Send + Sync {
    async fn send(&self, invitation: &Invitation) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        if config.username.trim().is_empty() || config.password.is_empty() {
            return Err(MailError::NotConfigured);
        }
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .credentials(Credentials::new(config.username.clone(), config.password.clone()))
            .build();
        Ok(Self { transport })
    }
}

fn mailbox(name: Option<&str>, address: &str) -> Result<Mailbox, MailError> {
    let parsed: Address = address
        .trim()
        .parse()
        .map_err(|source| MailError::InvalidAddress {
            address: address.to_string(),
            source,
        })?;
    Ok(Mailbox::new(name.map(str::to_string), parsed))
}

pub fn build_message(invitation: &Invitation) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(mailbox(Some(&invitation.from_name), &invitation.from_address)?)
        .subject(invitation.subject.clone());
    for recipient in &invitation.recipients {
        builder = builder.to(mailbox(None, recipient)?);
    }
    let body = MultiPart::alternative_plain_html(
        invitation.text_body.clone(),
        invitation.html_body.clone(),
    );
    Ok(builder.multipart(body)?)
}

#[async_trait]
impl InviteMailer for SmtpMailer {
    async fn send(&self, invitation: &Invitation) -> Result<(), MailError> {
        let message = build_message(invitation)?;
        self.transport.send(message).await?;
        info!(recipients = invitation.recipients.len(), "invitation email sent");
        Ok(())
    }
}
