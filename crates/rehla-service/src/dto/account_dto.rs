//! Account-related DTOs.

use rehla_core::rules::{not_blank, password_length, phone_number};
use rehla_core::Role;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create a subscriber account.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(custom(function = "not_blank", message = "firstname shouldn't be empty"))]
    pub firstname: String,

    #[validate(custom(function = "not_blank", message = "lastname shouldn't be empty"))]
    pub lastname: String,

    #[validate(custom(
        function = "phone_number",
        message = "phone_number should be a valid iraqi number of 11 digits"
    ))]
    pub phone_number: String,

    #[validate(custom(
        function = "phone_number",
        message = "parent_phone_number should be a valid iraqi number of 11 digits"
    ))]
    pub parent_phone_number: String,

    #[serde(alias = "pwd")]
    #[validate(custom(function = "password_length", message = "password should be at least 8 chars"))]
    pub password: String,
}

/// Subscriber login form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "not_blank", message = "phone_number is required"))]
    pub phone_number: String,

    #[validate(custom(function = "not_blank", message = "password is required"))]
    pub password: String,
}

/// Staff login form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StaffLoginRequest {
    #[validate(custom(function = "not_blank", message = "username is required"))]
    pub username: String,

    #[validate(custom(function = "not_blank", message = "password is required"))]
    pub password: String,
}

/// Password change form of a logged-in subscriber.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    pub current_password: String,

    #[validate(custom(function = "password_length", message = "password should be at least 8 chars"))]
    pub new_password: String,

    #[validate(must_match(other = "new_password", message = "new password doesn't match confirm password"))]
    pub confirm_new_password: String,
}

/// Contact form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(custom(function = "not_blank", message = "full_name shouldn't be empty"))]
    pub full_name: String,

    #[validate(custom(
        function = "phone_number",
        message = "phone_number should be a valid iraqi number of 11 digits"
    ))]
    pub phone_number: String,

    #[validate(length(min = 1, max = 2000, message = "message must be 1-2000 characters"))]
    pub message: String,
}

/// Request to create a staff account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewStaffRequest {
    #[validate(length(min = 3, max = 32, message = "username must be 3-32 characters"))]
    pub username: String,

    #[validate(custom(function = "password_length", message = "password should be at least 8 chars"))]
    pub password: String,

    pub role: Role,

    #[serde(default)]
    pub course_ids: Vec<String>,
}

/// Request from the dashboard to create a subscriber. The password is set
/// by staff and handed to the subscriber.
pub type NewUserRequest = SignupRequest;

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user_id: String,
    pub session_token: rehla_core::SessionToken,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehla_core::ValidateExt;

    fn signup() -> SignupRequest {
        SignupRequest {
            firstname: "Sara".to_string(),
            lastname: "Hadi".to_string(),
            phone_number: "07701234567".to_string(),
            parent_phone_number: "07801234567".to_string(),
            password: "secret-pass".to_string(),
        }
    }

    #[test]
    fn test_valid_signup() {
        assert!(signup().validate_request().is_ok());
    }

    #[test]
    fn test_signup_rejects_bad_fields() {
        let request = SignupRequest {
            firstname: "  ".to_string(),
            phone_number: "12345".to_string(),
            password: "short".to_string(),
            ..signup()
        };
        let errors = request.validate().unwrap_err();
        let fields = rehla_core::field_errors(&errors);
        let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["firstname", "password", "phone_number"]);
    }

    #[test]
    fn test_signup_accepts_pwd_alias() {
        let request: SignupRequest = serde_json::from_str(
            r#"{"firstname":"Sara","lastname":"Hadi","phone_number":"07701234567",
                "parent_phone_number":"07801234567","pwd":"secret-pass"}"#,
        )
        .unwrap();
        assert_eq!(request.password, "secret-pass");
    }

    #[test]
    fn test_reset_requires_matching_confirmation() {
        let request = ResetPasswordRequest {
            current_password: "old-password".to_string(),
            new_password: "new-password".to_string(),
            confirm_new_password: "other-password".to_string(),
        };
        assert!(request.validate_request().is_err());
    }
}
