//! Wire types shared by every endpoint

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// `{ success, data, message? }` wrapper around every response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// The payload, or `Rejected` when the server reported failure.
    pub fn into_data(self, path: &str) -> Result<T, ApiError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (_, _) => Err(ApiError::Rejected {
                path: path.to_string(),
                message: self.message,
            }),
        }
    }

    /// Success check for endpoints whose payload is irrelevant (delete).
    pub fn into_unit(self, path: &str) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            Err(ApiError::Rejected {
                path: path.to_string(),
                message: self.message,
            })
        }
    }
}

/// Administrative role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Bound to one school
    #[default]
    Admin,
    /// Platform-wide; never bound to a school
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::SuperAdmin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }

    pub fn requires_school(self) -> bool {
        self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub school_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_data() {
        let env: Envelope<u32> = serde_json::from_str(r#"{"success":true,"data":7}"#).unwrap();
        assert_eq!(env.into_data("/x").unwrap(), 7);

        let env: Envelope<u32> =
            serde_json::from_str(r#"{"success":false,"message":"nope"}"#).unwrap();
        let err = env.into_data("/x").unwrap_err();
        assert_eq!(err.server_message(), Some("nope"));
    }

    #[test]
    fn test_envelope_unit() {
        let env: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":true,"data":null}"#).unwrap();
        assert!(env.into_unit("/x").is_ok());
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"SUPER_ADMIN\"");
        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert!(role.requires_school());
        assert!(!Role::SuperAdmin.requires_school());
    }

    #[test]
    fn test_user_camel_case() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","name":"Ann","email":"ann@s.org","role":"ADMIN","schoolId":"s1"}"#,
        )
        .unwrap();
        assert_eq!(user.school_id.as_deref(), Some("s1"));
    }
}
