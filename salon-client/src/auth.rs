//! Auth session types

use serde::{Deserialize, Serialize};

/// Role claim that grants access to the admin area
pub const ADMIN_ROLE: &str = "admin";

/// Account of the auth service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Server-controlled metadata; carries the `role` claim
    #[serde(default)]
    pub app_metadata: serde_json::Value,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    pub fn role(&self) -> Option<&str> {
        self.app_metadata.get("role").and_then(|role| role.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(ADMIN_ROLE)
    }
}

/// Signed-in session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

/// Email/password body of signup and password grant
#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_role() {
        let json = r#"{
            "access_token": "t",
            "user": {"id": "u1", "email": "a@b.c", "app_metadata": {"role": "admin"}}
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert!(session.user.is_admin());

        let user: AuthUser = serde_json::from_str(r#"{"id": "u2"}"#).unwrap();
        assert!(!user.is_admin());
        assert_eq!(user.role(), None);
    }
}
