/// Error type for mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// The outgoing message failed validation before any network call.
    #[error(transparent)]
    Invalid(#[from] eventra_core::error::CoreError),

    /// The HTTP request to the provider failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("Mail provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// A recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// Required configuration is missing or malformed.
    #[error("Mail configuration error: {0}")]
    Config(String),
}
