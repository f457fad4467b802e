//! Customer model

use serde::{Deserialize, Serialize};

use super::{impl_entity, Collection, RecordKey};

/// A customer of the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Identity; serialized as the legacy numeric id (`0` = new)
    #[serde(rename = "id")]
    pub key: RecordKey,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// Last local mutation (RFC 3339), written by the repository
    #[serde(rename = "timestamp")]
    pub stamp: String,
}

impl Customer {
    /// New, unsaved customer with empty contact details.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            key: RecordKey::New,
            name: name.into(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            stamp: String::new(),
        }
    }

    /// Set the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Set the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }
}

impl_entity!(Customer, Collection::Customers);
