use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::Role;

/// Request to create an account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 30, message = "Username must be between 2 and 30 characters"))]
    pub username: String,
    #[validate(length(min = 6, max = 20, message = "Password must be between 6 and 20 characters"))]
    pub password: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
}

/// Login credentials
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Partial profile update; absent fields are left as they are
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 30, message = "Username must be between 2 and 30 characters"))]
    pub username: Option<String>,
    #[validate(length(min = 6, max = 20, message = "Password must be between 6 and 20 characters"))]
    pub password: Option<String>,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub preferences: Option<Vec<String>>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
}

/// Request to store a secret note
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSecretRequest {
    #[validate(length(min = 2, max = 150, message = "Message must be between 2 and 150 characters"))]
    pub message: String,
}

/// Query string for the user listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub matching: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(password: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: "ada".to_string(),
            password: password.to_string(),
            email: email.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: Role::Mentor,
            preferences: vec![],
            bio: None,
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("secret1", "ada@example.com").validate().is_ok());
        assert!(register("short", "ada@example.com").validate().is_err());
        assert!(register("waytoolongpassword1234", "ada@example.com").validate().is_err());
        assert!(register("secret1", "not-an-email").validate().is_err());
    }

    #[test]
    fn test_register_deserializes_camel_case() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"ada","password":"secret1","email":"ada@example.com",
                "firstName":"Ada","lastName":"Lovelace","role":"mentee"}"#,
        )
        .unwrap();
        assert_eq!(req.role, Role::Mentee);
        assert!(req.preferences.is_empty());
    }

    #[test]
    fn test_secret_length_bounds() {
        let ok = CreateSecretRequest { message: "hi".to_string() };
        let short = CreateSecretRequest { message: "h".to_string() };
        let long = CreateSecretRequest { message: "x".repeat(151) };
        assert!(ok.validate().is_ok());
        assert!(short.validate().is_err());
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_update_allows_empty_body() {
        let req: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_ok());
    }
}
