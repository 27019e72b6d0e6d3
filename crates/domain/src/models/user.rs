//! Requester identity passed into the controller boundary.

use serde::{Deserialize, Serialize};

/// Role flag supplied by the client.
///
/// The backend trusts this flag as-is; there is no credential check behind
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Identity of the caller for a single operation.
///
/// Built per-request by the presentation layer; never ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub user_id: String,
    pub display_name: String,
    pub role: UserRole,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_is_admin() {
        let user = UserContext::new("alice@company.com", "Alice", UserRole::User);
        let admin = UserContext::new("admin@company.com", "Admin", UserRole::Admin);
        assert!(!user.is_admin());
        assert!(admin.is_admin());
    }
}
