//! Outbound mail message accepted by the mail relay.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum number of recipients in a single message.
pub const MAX_RECIPIENTS: usize = 50;

/// Maximum subject length.
pub const MAX_SUBJECT_LEN: usize = 998;

/// One address or a list of addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Recipients::One(addr) => std::slice::from_ref(addr),
            Recipients::Many(addrs) => addrs,
        }
    }
}

/// `{ to, subject, html }` as posted to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub to: Recipients,
    pub subject: String,
    pub html: String,
}

impl MailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            to: Recipients::One(to.into()),
            subject: subject.into(),
            html: html.into(),
        }
    }

    pub fn recipients(&self) -> &[String] {
        self.to.as_slice()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let recipients = self.recipients();
        if recipients.is_empty() {
            return Err(CoreError::Validation("At least one recipient is required".to_string()));
        }
        if recipients.len() > MAX_RECIPIENTS {
            return Err(CoreError::Validation(format!(
                "Too many recipients: {} (max {MAX_RECIPIENTS})",
                recipients.len()
            )));
        }
        for addr in recipients {
            validate_address(addr)?;
        }
        if self.subject.trim().is_empty() {
            return Err(CoreError::Validation("Subject must not be empty".to_string()));
        }
        if self.subject.len() > MAX_SUBJECT_LEN {
            return Err(CoreError::Validation(format!(
                "Subject too long: {} bytes (max {MAX_SUBJECT_LEN})",
                self.subject.len()
            )));
        }
        if self.html.trim().is_empty() {
            return Err(CoreError::Validation("HTML body must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Shallow address check: one `@` with non-empty local and domain parts, a dot
/// in the domain, no whitespace. The provider does the real validation.
pub fn validate_address(addr: &str) -> Result<(), CoreError> {
    let invalid = || CoreError::Validation(format!("Invalid email address '{addr}'"));
    if addr.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = addr.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(invalid());
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_accepts_string_or_list() {
        let one: MailMessage = serde_json::from_value(serde_json::json!({
            "to": "a@example.com", "subject": "Hi", "html": "<p>x</p>"
        }))
        .unwrap();
        assert_eq!(one.recipients(), ["a@example.com".to_string()]);

        let many: MailMessage = serde_json::from_value(serde_json::json!({
            "to": ["a@example.com", "b@example.com"], "subject": "Hi", "html": "<p>x</p>"
        }))
        .unwrap();
        assert_eq!(many.recipients().len(), 2);
    }

    #[test]
    fn valid_message_passes() {
        assert!(MailMessage::new("guest@eventra.io", "Welcome", "<h1>Hi</h1>").validate().is_ok());
    }

    #[test]
    fn empty_subject_and_body_are_rejected() {
        assert!(MailMessage::new("guest@eventra.io", " ", "<h1>Hi</h1>").validate().is_err());
        assert!(MailMessage::new("guest@eventra.io", "Welcome", "").validate().is_err());
    }

    #[test]
    fn recipient_limits() {
        let msg = MailMessage {
            to: Recipients::Many(vec![]),
            subject: "s".into(),
            html: "h".into(),
        };
        assert!(msg.validate().is_err());

        let msg = MailMessage {
            to: Recipients::Many((0..=MAX_RECIPIENTS).map(|i| format!("u{i}@x.io")).collect()),
            subject: "s".into(),
            html: "h".into(),
        };
        assert!(msg.validate().is_err());
    }

    #[test]
    fn address_checks() {
        assert!(validate_address("a.b+tag@sub.example.org").is_ok());
        assert!(validate_address("no-at-sign").is_err());
        assert!(validate_address("@example.com").is_err());
        assert!(validate_address("a@localhost").is_err());
        assert!(validate_address("a b@example.com").is_err());
        assert!(validate_address("a@b@example.com").is_err());
    }
}
