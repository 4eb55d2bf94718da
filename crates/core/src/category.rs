//! Attendee categories: the row type, create/update payloads and validation.
//!
//! A category is a user-defined label grouping the attendees of one event.
//! Identity (`id`) and timestamps are always assigned by the store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/* --------------------------------------------------------------------------
   Constants
   -------------------------------------------------------------------------- */

/// Maximum length for a category name (after trimming).
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length for a category description.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Maximum length for an icon identifier.
pub const MAX_ICON_LEN: usize = 50;

/// Colour used when a draft does not specify one.
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Icon used when a draft does not specify one.
pub const DEFAULT_ICON: &str = "users";

/* --------------------------------------------------------------------------
   AssignmentCriteria
   -------------------------------------------------------------------------- */

/// How attendees end up in a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentCriteria {
    /// Organisers assign attendees by hand.
    #[default]
    Manual,
    /// Attendees holding a given ticket type.
    Ticket,
    /// Attendees registered on or after a given date.
    Date,
    /// Attendees whose registration field matches a value.
    Field,
}

impl AssignmentCriteria {
    /// All variants, in display order.
    pub const ALL: [AssignmentCriteria; 4] = [
        AssignmentCriteria::Manual,
        AssignmentCriteria::Ticket,
        AssignmentCriteria::Date,
        AssignmentCriteria::Field,
    ];

    /// Canonical string stored in the `assignment_criteria` column.
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentCriteria::Manual => "manual",
            AssignmentCriteria::Ticket => "ticket",
            AssignmentCriteria::Date => "date",
            AssignmentCriteria::Field => "field",
        }
    }

    /// Whether this criteria needs an `assignment_value` to be meaningful.
    pub fn requires_value(self) -> bool {
        !matches!(self, AssignmentCriteria::Manual)
    }
}

impl fmt::Display for AssignmentCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentCriteria {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssignmentCriteria::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid assignment criteria '{s}'. Must be one of: manual, ticket, date, field"
                ))
            })
    }
}

impl TryFrom<String> for AssignmentCriteria {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/* --------------------------------------------------------------------------
   Category (row)
   -------------------------------------------------------------------------- */

/// A category row from the `attendee_categories` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: DbId,
    pub event_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: String,
    pub is_default: bool,
    pub is_active: bool,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub assignment_criteria: AssignmentCriteria,
    pub assignment_value: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/* --------------------------------------------------------------------------
   DTOs
   -------------------------------------------------------------------------- */

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_true() -> bool {
    true
}

/// Reads a present field as `Some`, so an explicit `null` becomes `Some(None)`
/// (clear) while a missing field stays `None` (keep).
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Payload for creating a category. The owning event comes from the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub assignment_criteria: AssignmentCriteria,
    #[serde(default)]
    pub assignment_value: Option<String>,
}

impl CategoryDraft {
    /// A draft with the given name and every other field at its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            color: default_color(),
            icon: default_icon(),
            is_default: false,
            is_active: true,
            assignment_criteria: AssignmentCriteria::Manual,
            assignment_value: None,
        }
    }

    /// Validate every field of the draft.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.name)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        validate_color(&self.color)?;
        validate_icon(&self.icon)?;
        validate_assignment(self.assignment_criteria, self.assignment_value.as_deref())
    }
}

/// Partial update for a category. `None` fields are left untouched, both on
/// the wire (they are not serialized) and when applied locally.
///
/// The nullable columns use `Option<Option<String>>`: `Some(None)` is sent as
/// `null` and clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_criteria: Option<AssignmentCriteria>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub assignment_value: Option<Option<String>>,
}

impl CategoryPatch {
    /// `true` when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &CategoryPatch::default()
    }

    /// Validate the fields present in the patch.
    ///
    /// The assignment pair is only checked when the patch sets a criteria.
    /// A criteria that needs a value may omit it (the stored value still
    /// applies) but may not clear it.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(Some(description)) = &self.description {
            validate_description(description)?;
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        if let Some(icon) = &self.icon {
            validate_icon(icon)?;
        }
        if let Some(criteria) = self.assignment_criteria {
            match &self.assignment_value {
                Some(value) => validate_assignment(criteria, value.as_deref())?,
                None if !criteria.requires_value() => validate_assignment(criteria, None)?,
                None => {}
            }
        }
        Ok(())
    }

    /// Shallow-merge the present fields into `category`.
    pub fn apply_to(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            category.description = description.clone();
        }
        if let Some(color) = &self.color {
            category.color = color.clone();
        }
        if let Some(icon) = &self.icon {
            category.icon = icon.clone();
        }
        if let Some(is_default) = self.is_default {
            category.is_default = is_default;
        }
        if let Some(is_active) = self.is_active {
            category.is_active = is_active;
        }
        if let Some(criteria) = self.assignment_criteria {
            category.assignment_criteria = criteria;
        }
        if let Some(value) = &self.assignment_value {
            category.assignment_value = value.clone();
        }
    }
}

/* --------------------------------------------------------------------------
   Validation functions
   -------------------------------------------------------------------------- */

/// Validate a category name: non-blank and within length limit once trimmed.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Category name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Category name too long: {} chars (max {MAX_NAME_LEN})",
            trimmed.chars().count()
        )));
    }
    Ok(())
}

/// Validate a category description length.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Category description too long: {} chars (max {MAX_DESCRIPTION_LEN})",
            description.chars().count()
        )));
    }
    Ok(())
}

/// Validate a hex colour in `#RGB` or `#RRGGBB` form.
pub fn validate_color(color: &str) -> Result<(), CoreError> {
    let valid = color
        .strip_prefix('#')
        .filter(|hex| hex.len() == 3 || hex.len() == 6)
        .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid color '{color}'. Expected #RGB or #RRGGBB"
        )))
    }
}

/// Validate an icon identifier: non-empty and within length limit.
pub fn validate_icon(icon: &str) -> Result<(), CoreError> {
    if icon.is_empty() || icon.len() > MAX_ICON_LEN {
        return Err(CoreError::Validation(format!(
            "Icon must be between 1 and {MAX_ICON_LEN} chars"
        )));
    }
    Ok(())
}

/// Validate that non-manual criteria carry a non-blank value.
pub fn validate_assignment(
    criteria: AssignmentCriteria,
    value: Option<&str>,
) -> Result<(), CoreError> {
    let has_value = value.is_some_and(|v| !v.trim().is_empty());
    if criteria.requires_value() && !has_value {
        return Err(CoreError::Validation(format!(
            "Assignment criteria '{criteria}' requires an assignment value"
        )));
    }
    Ok(())
}
