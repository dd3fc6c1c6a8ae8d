use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_CONTACT_SUBJECT, MESSAGE_CONTACT_REQUIRED};
use crate::error::ApiError;
use crate::utils::non_empty;

/// Message left through the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl ContactRequest {
    pub fn into_contact(self) -> Result<Contact, ApiError> {
        match (non_empty(self.name), non_empty(self.email), non_empty(self.message)) {
            (Some(name), Some(email), Some(message)) => Ok(Contact {
                id: Uuid::new_v4().to_string(),
                name,
                email,
                subject: non_empty(self.subject)
                    .unwrap_or_else(|| DEFAULT_CONTACT_SUBJECT.to_string()),
                message,
                is_read: false,
                created_at: Utc::now(),
            }),
            _ => Err(ApiError::Validation(MESSAGE_CONTACT_REQUIRED.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_subject_defaults() {
        let contact = ContactRequest {
            name: Some("A".to_string()),
            email: Some("a@x.com".to_string()),
            message: Some("hi".to_string()),
            subject: None,
        }
        .into_contact()
        .unwrap();

        assert_eq!(contact.subject, "No Subject");
        assert!(!contact.is_read);
    }

    #[test]
    fn missing_message_is_rejected() {
        let result = ContactRequest {
            name: Some("A".to_string()),
            email: Some("a@x.com".to_string()),
            ..Default::default()
        }
        .into_contact();

        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
