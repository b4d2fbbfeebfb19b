//! Contact form types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A message left through the contact form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    /// Assigned by the store, never taken from the request
    pub created_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn from_new(id: i64, new: NewContactMessage, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            message: new.message,
            created_at,
        }
    }
}

/// Contact form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewContactMessage {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    #[validate(length(min = 10, message = "Message must be at least 10 characters"))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_fields_and_bad_email_rejected() {
        let new = NewContactMessage {
            name: "A".to_string(),
            email: "bad-email".to_string(),
            phone: "123".to_string(),
            message: "short".to_string(),
        };
        let errors = new.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("message"));
        assert!(!fields.contains_key("phone"));
    }

    #[test]
    fn test_client_created_at_is_ignored() {
        let new: NewContactMessage = serde_json::from_str(
            r#"{"name":"Asha","email":"asha@example.com","phone":"9876543210",
                "message":"Do you deliver to Noida?","createdAt":"1999-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(new.validate().is_ok());
    }
}
