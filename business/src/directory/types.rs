//! Wire types for the user directory API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label shown when the directory reports no status.
pub const DEFAULT_STATUS: &str = "Active";

/// A user as returned by `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_STATUS)
    }

    pub fn is_inactive(&self) -> bool {
        self.status.as_deref() == Some("Inactive")
    }

    /// Case-insensitive substring match on first name, last name and email.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.first_name.to_lowercase().contains(needle)
            || self.last_name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
    }
}

/// One page of `GET /users?page=N&per_page=M`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserPage {
    #[serde(rename = "data")]
    pub items: Vec<UserRecord>,
    #[serde(rename = "total")]
    pub total_count: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// Fields sent with `PUT /users/{id}`. Unset fields are left out of the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserUpdate {
    /// Draft pre-filled with the user's current values.
    pub fn from_record(user: &UserRecord) -> Self {
        Self {
            first_name: Some(user.first_name.clone()),
            last_name: Some(user.last_name.clone()),
            email: Some(user.email.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

/// Server echo of an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateReceipt {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UpdateReceipt {
    /// Best-effort view of `user` after `sent` was accepted.
    ///
    /// Each field comes from the echo when present, else from what was sent.
    pub fn apply_to(&self, user: &UserRecord, sent: &UserUpdate) -> UserRecord {
        let pick = |echoed: &Option<String>, requested: &Option<String>, current: &str| {
            echoed
                .as_deref()
                .or(requested.as_deref())
                .unwrap_or(current)
                .to_owned()
        };
        UserRecord {
            first_name: pick(&self.first_name, &sent.first_name, &user.first_name),
            last_name: pick(&self.last_name, &sent.last_name, &user.last_name),
            email: pick(&self.email, &sent.email, &user.email),
            ..user.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful `POST /login` body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Error body. reqres sends `error`, other directories send `message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}
