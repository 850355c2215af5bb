//! Account domain models and request/response DTOs.
//!
//! Response types are allow-lists: the password hash is not a field on any
//! of them, so no read path can serialize it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stored representation of a user account.
///
/// The password hash lives only in the repository layer; it is fetched
/// separately for credential verification and never travels with this type.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
}

/// New account database payload. The password arrives here already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Update payload for an existing account. Unset fields keep their value.
/// The id, username, superuser flag, and last_login are not reachable from
/// this path.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
}

/// Request to create a new account (superuser-only operation).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
}

fn default_true() -> bool {
    true
}

/// Request to update an existing account (superuser-only operation).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateAccountRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
}

/// Self-view representation: no role flags, no password.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PersonalAccountResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<Account> for PersonalAccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            last_login: account.last_login,
        }
    }
}

/// Admin-tier representation: exposes active/staff flags but neither the
/// password nor the superuser flag.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountPreviewResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<Account> for AccountPreviewResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            is_active: account.is_active,
            is_staff: account.is_staff,
            last_login: account.last_login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account {
            id: 2,
            username: "johndoe".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "johndoe@example.com".to_string(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            last_login: None,
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn personal_response_has_no_role_flags_or_password() {
        let json =
            serde_json::to_value(PersonalAccountResponse::from(sample_account())).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object["id"], 2);
        assert_eq!(object["username"], "johndoe");
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("is_active"));
        assert!(!object.contains_key("is_staff"));
        assert!(!object.contains_key("is_superuser"));
    }

    #[test]
    fn preview_response_omits_password_and_superuser_flag() {
        let json =
            serde_json::to_value(AccountPreviewResponse::from(sample_account())).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object["username"], "johndoe");
        assert_eq!(object["is_active"], true);
        assert_eq!(object["is_staff"], false);
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("is_superuser"));
    }

    #[test]
    fn create_request_defaults_flags() {
        let json = r#"{
            "username": "johndoe",
            "first_name": "John",
            "last_name": "Doe",
            "email": "johndoe@example.com",
            "password": "super_secret_password"
        }"#;

        let request: CreateAccountRequest = serde_json::from_str(json).unwrap();
        assert!(request.is_active);
        assert!(!request.is_staff);
    }

    #[test]
    fn update_request_accepts_partial_payloads() {
        let request: UpdateAccountRequest =
            serde_json::from_str(r#"{"first_name": "Jane"}"#).unwrap();
        assert_eq!(request.first_name.as_deref(), Some("Jane"));
        assert!(request.last_name.is_none());
        assert!(request.password.is_none());
    }
}
