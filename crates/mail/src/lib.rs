//! Outbound mail for the Eventra mail relay.
//!
//! - [`MailConfig`]: transport selection and secrets, loaded from the
//!   environment.
//! - [`Mailer`]: sends a validated [`MailMessage`] through the configured
//!   transport.
//! - [`delivery`]: the transports themselves: the provider HTTP API and SMTP.

pub mod config;
pub mod delivery;
pub mod error;

pub use config::{MailConfig, TransportConfig};
pub use delivery::api::ApiDelivery;
pub use delivery::smtp::SmtpDelivery;
pub use delivery::{MailReceipt, Mailer};
pub use error::MailError;
pub use eventra_core::mail::MailMessage;
