//! Contact domain model.
//!
//! # Responsibility
//! - Define the persisted contact record and its write/read projections.
//! - Validate caller input before it reaches storage.
//!
//! # Invariants
//! - `id` is assigned by storage on insert and never reused for another row.
//! - Update replaces all four non-id fields; there is no partial update.
//! - Coordinates are stored and returned verbatim (no rounding).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned primary key of a contact row.
pub type ContactId = i64;

/// Persisted contact with its storage id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    /// Degrees north. Nullable column; callers normally supply it.
    pub latitude: Option<f64>,
    /// Degrees east. Nullable column; callers normally supply it.
    pub longitude: Option<f64>,
}

impl Contact {
    /// Returns the non-id fields as a draft, e.g. to edit and write back.
    pub fn to_draft(&self) -> ContactDraft {
        ContactDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Drops the id, yielding the `load_all` projection.
    pub fn into_summary(self) -> ContactSummary {
        ContactSummary {
            name: self.name,
            email: self.email,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Input for create and full-replacement update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ContactDraft {
    /// Builds a draft with both coordinates present.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    /// Checks the draft before any SQL mutation.
    ///
    /// Any text and any finite coordinate is accepted as-is.
    ///
    /// # Errors
    /// - NaN or infinite coordinates. SQLite turns NaN into NULL, so such a
    ///   value could not be read back.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        ensure_finite("latitude", self.latitude)?;
        ensure_finite("longitude", self.longitude)
    }
}

fn ensure_finite(field: &'static str, value: Option<f64>) -> Result<(), ContactValidationError> {
    match value {
        Some(value) if !value.is_finite() => {
            Err(ContactValidationError::NonFiniteCoordinate(field))
        }
        _ => Ok(()),
    }
}

/// Row shape returned by `load_all`: every field except the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSummary {
    pub name: String,
    pub email: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Reasons a draft is rejected before persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactValidationError {
    NonFiniteCoordinate(&'static str),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteCoordinate(field) => write!(f, "{field} must be a finite number"),
        }
    }
}

impl Error for ContactValidationError {}

#[cfg(test)]
mod tests {
    use super::{Contact, ContactDraft, ContactValidationError};

    #[test]
    fn valid_draft_passes() {
        let draft = ContactDraft::new("Ana", "ana@x.com", -23.55, -46.63);
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn draft_without_coordinates_passes() {
        let draft = ContactDraft {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            latitude: None,
            longitude: None,
        };
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn blank_text_and_out_of_range_coordinates_are_accepted() {
        assert_eq!(ContactDraft::new("", "", 0.0, 0.0).validate(), Ok(()));
        assert_eq!(
            ContactDraft::new("Ana", "ana@x.com", 91.0, -200.0).validate(),
            Ok(())
        );
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let draft = ContactDraft::new("Ana", "ana@x.com", f64::NAN, 0.0);
        assert_eq!(
            draft.validate(),
            Err(ContactValidationError::NonFiniteCoordinate("latitude"))
        );

        let draft = ContactDraft::new("Ana", "ana@x.com", 0.0, f64::NEG_INFINITY);
        assert_eq!(
            draft.validate(),
            Err(ContactValidationError::NonFiniteCoordinate("longitude"))
        );
    }

    #[test]
    fn contact_projections_keep_field_values() {
        let contact = Contact {
            id: 7,
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            latitude: Some(-23.55),
            longitude: Some(-46.63),
        };

        let draft = contact.to_draft();
        assert_eq!(draft, ContactDraft::new("Ana", "ana@x.com", -23.55, -46.63));

        let summary = contact.into_summary();
        assert_eq!(summary.name, "Ana");
        assert_eq!(summary.latitude, Some(-23.55));
    }

    #[test]
    fn contact_serializes_with_flat_field_names() {
        let contact = Contact {
            id: 3,
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            latitude: Some(-23.55),
            longitude: None,
        };

        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "Ana");
        assert_eq!(json["latitude"], -23.55);
        assert!(json["longitude"].is_null());
    }
}
