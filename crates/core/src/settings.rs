//! The per-event attendee settings document.
//!
//! Settings are stored as one JSON object per event. Reads merge the stored
//! object onto a default document so keys introduced after the row was written
//! are backfilled; writes always persist the whole merged object.
//!
//! [`SettingsDocument`] is the untyped, merge-friendly representation used by
//! the stores. [`AttendeeSettings`] is the typed view of the default shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Upper bound on the serialized size of a settings document (64 KiB).
pub const MAX_DOCUMENT_BYTES: usize = 64 * 1024;

/* --------------------------------------------------------------------------
   SettingsDocument
   -------------------------------------------------------------------------- */

/// A JSON object of settings keys. Merges are shallow: a top-level key in the
/// right-hand side replaces the whole value on the left, nested objects
/// included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsDocument(Map<String, Value>);

impl SettingsDocument {
    /// Wrap a JSON value, rejecting anything that is not an object.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CoreError::Validation(format!(
                "Settings document must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// `{...self, ...partial}`: keys in `partial` win.
    pub fn merge(&self, partial: &SettingsDocument) -> SettingsDocument {
        let mut merged = self.0.clone();
        for (key, value) in &partial.0 {
            merged.insert(key.clone(), value.clone());
        }
        SettingsDocument(merged)
    }

    /// Merge-on-read: lay this (stored) document over `defaults`.
    pub fn merged_onto(&self, defaults: &SettingsDocument) -> SettingsDocument {
        defaults.merge(self)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Decode the document into a typed view.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }

    /// Reject documents too large to persist.
    pub fn validate_size(&self) -> Result<(), CoreError> {
        let size = serde_json::to_vec(&self.0)
            .map_err(|e| CoreError::Internal(format!("Failed to serialize settings: {e}")))?
            .len();
        if size > MAX_DOCUMENT_BYTES {
            return Err(CoreError::Validation(format!(
                "Settings document too large: {size} bytes (max {MAX_DOCUMENT_BYTES})"
            )));
        }
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/* --------------------------------------------------------------------------
   Typed settings
   -------------------------------------------------------------------------- */

/// Typed view of the attendee settings document. Wire keys are camelCase
/// because the document is shared with the browser dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeSettings {
    pub allow_profile_edit: bool,
    pub require_approval: bool,
    pub profile_edit_permissions: ProfileEditPermissions,
    pub email_triggers: EmailTriggers,
    pub in_app_notifications: InAppNotifications,
    pub additional_data: AdditionalData,
    pub gdpr_compliance: bool,
    pub gdpr: GdprSettings,
}

/// Which profile fields attendees may edit themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEditPermissions {
    pub name: bool,
    pub email: bool,
    pub phone: bool,
    pub company: bool,
    pub job_title: bool,
    pub photo: bool,
    pub bio: bool,
    pub social_links: bool,
}

/// Transactional emails sent to attendees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTriggers {
    pub registration_confirmation: bool,
    pub ticket_purchase: bool,
    pub event_reminder: bool,
    pub check_in_confirmation: bool,
    pub event_updates: bool,
    pub session_reminder: bool,
}

/// In-app notification types attendees receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InAppNotifications {
    pub session_reminders: bool,
    pub networking_requests: bool,
    pub announcements: bool,
    pub schedule_changes: bool,
    pub messages: bool,
}

/// Extra registration data collected from attendees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalData {
    pub dietary_requirements: bool,
    pub accessibility_needs: bool,
    pub emergency_contact: bool,
    pub tshirt_size: bool,
    pub custom_fields: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GdprSettings {
    pub require_consent: bool,
    pub allow_data_export: bool,
    pub allow_data_deletion: bool,
    pub data_retention_days: u32,
    pub privacy_policy_url: Option<String>,
}

impl Default for AttendeeSettings {
    fn default() -> Self {
        Self {
            allow_profile_edit: true,
            require_approval: false,
            profile_edit_permissions: ProfileEditPermissions {
                name: true,
                email: false,
                phone: true,
                company: true,
                job_title: true,
                photo: true,
                bio: true,
                social_links: true,
            },
            email_triggers: EmailTriggers {
                registration_confirmation: true,
                ticket_purchase: true,
                event_reminder: true,
                check_in_confirmation: false,
                event_updates: true,
                session_reminder: false,
            },
            in_app_notifications: InAppNotifications {
                session_reminders: true,
                networking_requests: true,
                announcements: true,
                schedule_changes: true,
                messages: true,
            },
            additional_data: AdditionalData {
                dietary_requirements: false,
                accessibility_needs: false,
                emergency_contact: false,
                tshirt_size: false,
                custom_fields: false,
            },
            gdpr_compliance: false,
            gdpr: GdprSettings {
                require_consent: true,
                allow_data_export: true,
                allow_data_deletion: true,
                data_retention_days: 365,
                privacy_policy_url: None,
            },
        }
    }
}

impl AttendeeSettings {
    /// The default settings as an untyped document, ready to inject into a
    /// settings store.
    pub fn default_document() -> SettingsDocument {
        let json = serde_json::to_value(AttendeeSettings::default()).unwrap_or_default();
        SettingsDocument::from_value(json).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> SettingsDocument {
        SettingsDocument::from_value(value).unwrap()
    }

    #[test]
    fn merge_on_read_backfills_missing_keys() {
        let defaults = doc(json!({"a": 0, "b": 0}));
        let stored = doc(json!({"a": 1}));
        assert_eq!(stored.merged_onto(&defaults), doc(json!({"a": 1, "b": 0})));
    }

    #[test]
    fn merge_on_read_keeps_unknown_stored_keys() {
        let defaults = doc(json!({"a": 0}));
        let stored = doc(json!({"legacyFlag": true}));
        assert_eq!(
            stored.merged_onto(&defaults),
            doc(json!({"a": 0, "legacyFlag": true}))
        );
    }

    #[test]
    fn merge_is_shallow() {
        let current = doc(json!({"gdpr": {"requireConsent": true, "allowDataExport": true}}));
        let partial = doc(json!({"gdpr": {"requireConsent": false}}));
        assert_eq!(
            current.merge(&partial),
            doc(json!({"gdpr": {"requireConsent": false}}))
        );
    }

    #[test]
    fn from_value_rejects_non_objects() {
        assert_matches!(SettingsDocument::from_value(json!([1, 2])), Err(CoreError::Validation(_)));
        assert_matches!(SettingsDocument::from_value(Value::Null), Err(CoreError::Validation(_)));
    }

    #[test]
    fn default_document_uses_camel_case_keys() {
        let defaults = AttendeeSettings::default_document();
        assert_eq!(defaults.get("gdprCompliance"), Some(&json!(false)));
        assert_eq!(defaults.get("allowProfileEdit"), Some(&json!(true)));
        assert!(defaults.get("emailTriggers").is_some_and(Value::is_object));
        assert_eq!(defaults.len(), 8);
    }

    #[test]
    fn default_document_decodes_back_to_default() {
        let typed: AttendeeSettings = AttendeeSettings::default_document().decode().unwrap();
        assert_eq!(typed, AttendeeSettings::default());
    }

    #[test]
    fn partial_document_merged_onto_defaults_decodes() {
        let defaults = AttendeeSettings::default_document();
        let partial = doc(json!({"gdprCompliance": true}));
        assert!(partial.decode::<AttendeeSettings>().is_err());

        let typed: AttendeeSettings = partial.merged_onto(&defaults).decode().unwrap();
        assert!(typed.gdpr_compliance);
        assert!(typed.allow_profile_edit);
    }

    #[test]
    fn oversized_documents_are_rejected() {
        let big = doc(json!({"blob": "x".repeat(MAX_DOCUMENT_BYTES)}));
        assert_matches!(big.validate_size(), Err(CoreError::Validation(_)));
        assert!(AttendeeSettings::default_document().validate_size().is_ok());
    }
}
