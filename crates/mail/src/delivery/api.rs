//! Delivery through the transactional-email provider's HTTP API.
//!
//! [`ApiDelivery`] posts `{from, to, subject, html}` to `{base_url}/emails`
//! with a bearer API key. A 2xx answer carries the provider message id; any
//! other status is turned into [`MailError::Provider`] with the provider's
//! error message when it sent one.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::delivery::MailReceipt;
use crate::error::MailError;
use eventra_core::mail::MailMessage;

/// HTTP request timeout for a single send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Sends messages through the provider HTTP API.
pub struct ApiDelivery {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from_address: String,
}

impl ApiDelivery {
    pub fn new(
        base_url: impl AsRef<str>,
        api_key: impl Into<String>,
        from_address: impl Into<String>,
    ) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/emails", base_url.as_ref().trim_end_matches('/')),
            api_key: api_key.into(),
            from_address: from_address.into(),
        })
    }

    /// Execute a single POST and interpret the response status.
    pub async fn send(&self, message: &MailMessage) -> Result<MailReceipt, MailError> {
        let body = SendEmailBody {
            from: &self.from_address,
            to: message.recipients(),
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderErrorBody>(&text)
                .ok()
                .and_then(|b| b.message.or(b.error))
                .unwrap_or(text);
            tracing::warn!(status = status.as_u16(), error = %message, "Mail provider rejected message");
            return Err(MailError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SendEmailResponse = response.json().await?;
        Ok(MailReceipt { id: parsed.id })
    }
}
