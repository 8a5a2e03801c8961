//! Customer models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::SearchTerm;

/// A customer renting glassware for one event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    /// Unique across all customers
    pub email: String,
    pub phone: String,
    pub event_date: NaiveDate,
    pub event_location: String,
    pub event_type: String,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Merge the provided fields of a partial update
    pub fn apply(&mut self, patch: &CustomerPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = phone.clone();
        }
        if let Some(event_date) = patch.event_date {
            self.event_date = event_date;
        }
        if let Some(event_location) = &patch.event_location {
            self.event_location = event_location.clone();
        }
        if let Some(event_type) = &patch.event_type {
            self.event_type = event_type.clone();
        }
    }

    /// Search over name, email and event location
    pub fn matches_search(&self, term: &SearchTerm) -> bool {
        term.matches(&[&self.name, &self.email, &self.event_location])
    }
}

/// Input for adding a customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    #[validate(custom = "crate::validation::not_blank")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom = "crate::validation::not_blank")]
    pub phone: String,
    pub event_date: NaiveDate,
    #[validate(custom = "crate::validation::not_blank")]
    pub event_location: String,
    #[validate(custom = "crate::validation::not_blank")]
    pub event_type: String,
}

/// Partial update for a customer; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    #[validate(custom = "crate::validation::not_blank")]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(custom = "crate::validation::not_blank")]
    pub phone: Option<String>,
    pub event_date: Option<NaiveDate>,
    #[validate(custom = "crate::validation::not_blank")]
    pub event_location: Option<String>,
    #[validate(custom = "crate::validation::not_blank")]
    pub event_type: Option<String>,
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.event_date.is_none()
            && self.event_location.is_none()
            && self.event_type.is_none()
    }
}
