//! Validation helpers for account-related requests.

use lazy_static::lazy_static;
use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use super::model::{CreateAccountRequest, UpdateAccountRequest};
use crate::auth::session::LoginRequest;

lazy_static! {
    // Email validation: basic RFC 5322 compliant pattern
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    )
    .expect("EMAIL_REGEX should be a valid regex pattern");

    // Username validation: letters, digits and @ . + - _ only
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[\w.@+-]{1,150}$")
        .expect("USERNAME_REGEX should be a valid regex pattern");
}

/// Minimum password length requirement
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length to bound hashing cost
const MAX_PASSWORD_LENGTH: usize = 128;

/// Passwords rejected outright regardless of length. A short excerpt of the
/// usual leaked-password lists; comparison is case-insensitive.
const COMMON_PASSWORDS: &[&str] = &[
    "password", "passw0rd", "password1", "12345678", "123456789", "qwerty123", "letmein1",
    "iloveyou", "admin123", "welcome1", "sunshine", "princess", "football", "baseball",
    "trustno1", "superman", "starwars", "whatever", "asdfghjkl",
];

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_email"))
    }
}

/// Validate username format
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username"))
    }
}

/// Validate a person-name field (first/last name): non-empty, bounded length
pub fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::new("blank"));
    }

    if trimmed.len() > 150 {
        return Err(ValidationError::new("max_length"));
    }

    Ok(())
}

/// Validate password strength.
///
/// Mirrors the minimum-complexity rules used on account creation: a short
/// password, an entirely numeric one, or one from the common-password list
/// is rejected. The caller maps any failure to the `invalid_password` code.
pub fn validate_password_strength(password: &str) -> Result<(), PasswordStrengthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(PasswordStrengthError::TooShort);
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(PasswordStrengthError::TooLong);
    }

    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(PasswordStrengthError::EntirelyNumeric);
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        return Err(PasswordStrengthError::TooCommon);
    }

    Ok(())
}

/// Why a password failed the strength check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PasswordStrengthError {
    #[error("This password is too short. It must contain at least 8 characters.")]
    TooShort,
    #[error("This password is too long.")]
    TooLong,
    #[error("This password is entirely numeric.")]
    EntirelyNumeric,
    #[error("This password is too common.")]
    TooCommon,
}

impl Validate for CreateAccountRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(err) = validate_username(&self.username) {
            errors.add("username", err);
        }

        if let Err(err) = validate_person_name(&self.first_name) {
            errors.add("first_name", err);
        }

        if let Err(err) = validate_person_name(&self.last_name) {
            errors.add("last_name", err);
        }

        if let Err(err) = validate_email(&self.email) {
            errors.add("email", err);
        }

        if self.password.is_empty() {
            errors.add("password", ValidationError::new("blank"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Validate for UpdateAccountRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(first_name) = &self.first_name {
            if let Err(err) = validate_person_name(first_name) {
                errors.add("first_name", err);
            }
        }

        if let Some(last_name) = &self.last_name {
            if let Err(err) = validate_person_name(last_name) {
                errors.add("last_name", err);
            }
        }

        if let Some(email) = &self.email {
            if let Err(err) = validate_email(email) {
                errors.add("email", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.username.trim().is_empty() {
            errors.add("username", ValidationError::new("blank"));
        }

        // Strength is checked only at creation time, not at login.
        if self.password.is_empty() {
            errors.add("password", ValidationError::new("blank"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_accepts_valid_emails() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("test.user+tag@example.co.uk").is_ok());
        assert!(validate_email("admin@subdomain.example.com").is_ok());
    }

    #[test]
    fn email_validation_rejects_invalid_emails() {
        assert!(validate_email("notanemail").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user name@example.com").is_err());
    }

    #[test]
    fn username_validation_accepts_valid_usernames() {
        assert!(validate_username("johndoe").is_ok());
        assert!(validate_username("john.doe+test@host").is_ok());
        assert!(validate_username("user_42").is_ok());
    }

    #[test]
    fn username_validation_rejects_invalid_usernames() {
        assert!(validate_username("").is_err());
        assert!(validate_username("john doe").is_err());
        assert!(validate_username("user!name").is_err());
        assert!(validate_username(&"a".repeat(151)).is_err());
    }

    #[test]
    fn person_name_validation() {
        assert!(validate_person_name("John").is_ok());
        assert!(validate_person_name("").is_err());
        assert!(validate_person_name("   ").is_err());
        assert!(validate_person_name(&"a".repeat(151)).is_err());
    }

    #[test]
    fn password_strength_accepts_reasonable_passwords() {
        assert!(validate_password_strength("super_secret_password").is_ok());
        assert!(validate_password_strength("correct horse battery staple").is_ok());
    }

    #[test]
    fn password_strength_rejects_short_passwords() {
        assert_eq!(
            validate_password_strength("short"),
            Err(PasswordStrengthError::TooShort)
        );
    }

    #[test]
    fn password_strength_rejects_numeric_passwords() {
        assert_eq!(
            validate_password_strength("1234567890"),
            Err(PasswordStrengthError::EntirelyNumeric)
        );
    }

    #[test]
    fn password_strength_rejects_common_passwords() {
        assert_eq!(validate_password_strength("password"), Err(PasswordStrengthError::TooCommon));
        assert_eq!(validate_password_strength("PASSWORD"), Err(PasswordStrengthError::TooCommon));
        assert_eq!(validate_password_strength("trustno1"), Err(PasswordStrengthError::TooCommon));
    }

    #[test]
    fn create_request_validation_flags_each_field() {
        let mut request = CreateAccountRequest {
            username: "johndoe".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "johndoe@example.com".to_string(),
            password: "super_secret_password".to_string(),
            is_active: true,
            is_staff: false,
        };

        assert!(request.validate().is_ok());

        request.username = "john doe".to_string();
        assert!(request.validate().is_err());

        request.username = "johndoe".to_string();
        request.email = "not-an-email".to_string();
        assert!(request.validate().is_err());

        request.email = "johndoe@example.com".to_string();
        request.first_name = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn update_request_validates_only_present_fields() {
        let request = UpdateAccountRequest::default();
        assert!(request.validate().is_ok());

        let request = UpdateAccountRequest {
            email: Some("broken".to_string()),
            ..UpdateAccountRequest::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn login_request_requires_both_fields() {
        let request =
            LoginRequest { username: "johndoe".to_string(), password: "secret".to_string() };
        assert!(request.validate().is_ok());

        let request = LoginRequest { username: String::new(), password: "secret".to_string() };
        assert!(request.validate().is_err());

        let request = LoginRequest { username: "johndoe".to_string(), password: String::new() };
        assert!(request.validate().is_err());
    }
}
