//! Mail transports and the [`Mailer`] that dispatches to them.

pub mod api;
pub mod smtp;

use serde::Serialize;

use crate::config::{MailConfig, TransportConfig};
use crate::error::MailError;
use eventra_core::mail::MailMessage;

/// What the transport reported back for an accepted message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MailReceipt {
    /// Provider-assigned message id, when the transport returns one.
    pub id: Option<String>,
}

/// Sends validated messages through the configured transport.
pub enum Mailer {
    Api(api::ApiDelivery),
    Smtp(smtp::SmtpDelivery),
}

impl Mailer {
    /// Build the transport described by `config`.
    pub fn from_config(config: MailConfig) -> Result<Self, MailError> {
        match config.transport {
            TransportConfig::Api { base_url, api_key } => Ok(Mailer::Api(
                api::ApiDelivery::new(base_url, api_key, config.from_address)?,
            )),
            TransportConfig::Smtp {
                host,
                port,
                user,
                password,
            } => Ok(Mailer::Smtp(smtp::SmtpDelivery::new(
                &host,
                port,
                user.zip(password),
                config.from_address,
            )?)),
        }
    }

    /// Validate and send one message.
    pub async fn send(&self, message: &MailMessage) -> Result<MailReceipt, MailError> {
        message.validate()?;
        let receipt = match self {
            Mailer::Api(delivery) => delivery.send(message).await?,
            Mailer::Smtp(delivery) => delivery.send(message).await?,
        };
        tracing::info!(
            recipients = message.recipients().len(),
            transport = self.transport_name(),
            id = receipt.id.as_deref().unwrap_or("-"),
            "Email sent",
        );
        Ok(receipt)
    }

    pub fn transport_name(&self) -> &'static str {
        match self {
            Mailer::Api(_) => "api",
            Mailer::Smtp(_) => "smtp",
        }
    }
}
