use secrecy::Secret;
use serde::{Deserialize, Serialize};

/// Either a bare role name or an object carrying one (`{"name": "admin"}`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RoleEntry {
    Name(String),
    Named { name: String },
    Other(serde_json::Value),
}

impl RoleEntry {
    pub fn name(&self) -> Option<&str> {
        match self {
            RoleEntry::Name(name) | RoleEntry::Named { name } => Some(name),
            RoleEntry::Other(_) => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct User {
    #[serde(default, deserialize_with = "super::de_opt_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "super::de_string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "super::de_string_or_empty")]
    pub email: String,
    #[serde(default)]
    pub role: Option<RoleEntry>,
    #[serde(default)]
    pub roles: Vec<RoleEntry>,
}

impl User {
    /// Name for display, falling back to the local part of the email.
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.clone();
        }
        match self.email.split('@').next() {
            Some(local) if !local.is_empty() => local.to_string(),
            _ => "User".to_string(),
        }
    }

    pub fn initials(&self) -> String {
        let name = self.display_name();
        let initials: String = name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .collect();
        if initials.is_empty() {
            "U".to_string()
        } else {
            initials.to_uppercase()
        }
    }
}

/// An authenticated session: the bearer token and the profile it belongs to.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub token: Secret<String>,
    pub user: User,
}
