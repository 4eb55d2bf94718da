//! Mail relay configuration.

use crate::error::MailError;

/// Default base URL of the transactional-email provider API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.resend.com";

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Which transport the relay hands messages to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// Provider HTTP API authenticated with a bearer API key.
    Api { base_url: String, api_key: String },
    /// Plain SMTP relay with optional credentials.
    Smtp {
        host: String,
        port: u16,
        user: Option<String>,
        password: Option<String>,
    },
}

/// Full mail relay configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    /// RFC 5322 "From" address applied to every outgoing message.
    pub from_address: String,
    pub transport: TransportConfig,
}

impl MailConfig {
    /// Configuration for the provider API transport.
    pub fn api(api_key: impl Into<String>, from_address: impl Into<String>) -> Self {
        Self {
            from_address: from_address.into(),
            transport: TransportConfig::Api {
                base_url: DEFAULT_API_BASE_URL.to_string(),
                api_key: api_key.into(),
            },
        }
    }

    /// Override the provider API base URL. No-op for SMTP.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        if let TransportConfig::Api { base_url, .. } = &mut self.transport {
            *base_url = url.into();
        }
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` when no transport is configured, in which case the
    /// relay answers every send with an error. Partial configuration is an
    /// error so it surfaces at startup.
    ///
    /// | Variable            | Required            | Default                  |
    /// |---------------------|---------------------|--------------------------|
    /// | `MAIL_TRANSPORT`    | no                  | `api`                    |
    /// | `RESEND_API_KEY`    | yes (api)           | none                     |
    /// | `MAIL_API_BASE_URL` | no                  | `https://api.resend.com` |
    /// | `MAIL_FROM`         | yes                 | none                     |
    /// | `SMTP_HOST`         | yes (smtp)          | none                     |
    /// | `SMTP_PORT`         | no                  | `587`                    |
    /// | `SMTP_USER`         | no                  | none                     |
    /// | `SMTP_PASSWORD`     | no                  | none                     |
    pub fn from_env() -> Result<Option<Self>, MailError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, MailError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let transport = var("MAIL_TRANSPORT").unwrap_or_else(|| "api".to_string());

        let transport = match transport.as_str() {
            "api" => match var("RESEND_API_KEY") {
                Some(api_key) => TransportConfig::Api {
                    base_url: var("MAIL_API_BASE_URL")
                        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
                    api_key,
                },
                None => return Ok(None),
            },
            "smtp" => match var("SMTP_HOST") {
                Some(host) => TransportConfig::Smtp {
                    host,
                    port: match var("SMTP_PORT") {
                        Some(p) => p.parse().map_err(|_| {
                            MailError::Config(format!("SMTP_PORT must be a valid u16, got '{p}'"))
                        })?,
                        None => DEFAULT_SMTP_PORT,
                    },
                    user: var("SMTP_USER"),
                    password: var("SMTP_PASSWORD"),
                },
                None => return Ok(None),
            },
            other => {
                return Err(MailError::Config(format!(
                    "Unknown MAIL_TRANSPORT '{other}'. Must be one of: api, smtp"
                )))
            }
        };

        let from_address = var("MAIL_FROM")
            .ok_or_else(|| MailError::Config("MAIL_FROM must be set".to_string()))?;

        Ok(Some(Self {
            from_address,
            transport,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unconfigured_returns_none() {
        assert_eq!(MailConfig::from_lookup(lookup(&[])).unwrap(), None);
    }

    #[test]
    fn api_transport_is_the_default() {
        let config = MailConfig::from_lookup(lookup(&[
            ("RESEND_API_KEY", "re_123"),
            ("MAIL_FROM", "Eventra <noreply@eventra.io>"),
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(config, MailConfig::api("re_123", "Eventra <noreply@eventra.io>"));
    }

    #[test]
    fn api_key_without_from_is_an_error() {
        let result = MailConfig::from_lookup(lookup(&[("RESEND_API_KEY", "re_123")]));
        assert_matches!(result, Err(MailError::Config(_)));
    }

    #[test]
    fn smtp_transport_reads_port() {
        let config = MailConfig::from_lookup(lookup(&[
            ("MAIL_TRANSPORT", "smtp"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "2525"),
            ("MAIL_FROM", "noreply@eventra.io"),
        ]))
        .unwrap()
        .unwrap();

        assert_matches!(config.transport, TransportConfig::Smtp { port: 2525, .. });
    }

    #[test]
    fn bad_smtp_port_is_an_error() {
        let result = MailConfig::from_lookup(lookup(&[
            ("MAIL_TRANSPORT", "smtp"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "lots"),
            ("MAIL_FROM", "noreply@eventra.io"),
        ]));
        assert_matches!(result, Err(MailError::Config(_)));
    }

    #[test]
    fn unknown_transport_is_an_error() {
        let result = MailConfig::from_lookup(lookup(&[("MAIL_TRANSPORT", "pigeon")]));
        assert_matches!(result, Err(MailError::Config(_)));
    }
}
