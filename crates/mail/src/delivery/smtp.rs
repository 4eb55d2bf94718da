//! Delivery through an SMTP relay via `lettre`.

use std::fmt;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::delivery::MailReceipt;
use crate::error::MailError;
use eventra_core::mail::MailMessage;

/// Sends HTML messages through a STARTTLS SMTP relay.
pub struct SmtpDelivery {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl fmt::Debug for SmtpDelivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpDelivery")
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl SmtpDelivery {
    pub fn new(
        host: &str,
        port: u16,
        credentials: Option<(String, String)>,
        from_address: impl AsRef<str>,
    ) -> Result<Self, MailError> {
        let from: Mailbox = from_address.as_ref().parse()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.port(port);
        if let Some((user, pass)) = credentials {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    pub fn build_message(&self, message: &MailMessage) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML);
        for addr in message.recipients() {
            builder = builder.to(addr.parse()?);
        }
        builder
            .body(message.html.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }

    pub async fn send(&self, message: &MailMessage) -> Result<MailReceipt, MailError> {
        let email = self.build_message(message)?;
        let response = self.transport.send(email).await?;
        let id = response.message().next().map(str::to_string);
        Ok(MailReceipt { id })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use eventra_core::mail::Recipients;

    use super::*;

    fn delivery() -> SmtpDelivery {
        SmtpDelivery::new("smtp.example.com", 587, None, "Eventra <noreply@eventra.io>").unwrap()
    }

    #[test]
    fn invalid_from_address_is_rejected() {
        let result = SmtpDelivery::new("smtp.example.com", 587, None, "not an address");
        assert_matches!(result, Err(MailError::Address(_)));
    }

    #[test]
    fn debug_output_omits_the_transport() {
        let rendered = format!("{:?}", delivery());
        assert!(rendered.starts_with("SmtpDelivery"));
        assert!(rendered.contains("noreply@eventra.io"));
    }

    #[test]
    fn builds_message_for_every_recipient() {
        let message = MailMessage {
            to: Recipients::Many(vec!["a@example.com".into(), "b@example.com".into()]),
            subject: "Schedule update".into(),
            html: "<p>Room changed</p>".into(),
        };
        let email = delivery().build_message(&message).unwrap();
        let to = email.envelope().to();
        assert_eq!(to.len(), 2);
    }

    #[test]
    fn unparseable_recipient_is_an_address_error() {
        let message = MailMessage::new("nope", "s", "<p>h</p>");
        assert_matches!(delivery().build_message(&message), Err(MailError::Address(_)));
    }
}
