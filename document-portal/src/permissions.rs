//! Role-derived UI affordances.
//!
//! These checks only decide which actions the client offers. The backend
//! remains the authorization boundary and may still refuse.

use crate::error::PortalError;
use crate::models::User;

/// Singular `role` first, then the first entry of `roles`, else empty.
pub fn role_of(user: &User) -> String {
    if let Some(role) = user.role.as_ref().and_then(|r| r.name()).filter(|r| !r.is_empty()) {
        return role.to_string();
    }
    user.roles
        .first()
        .and_then(|r| r.name())
        .unwrap_or_default()
        .to_string()
}

fn is_privileged(role: &str) -> bool {
    let role = role.to_lowercase();
    role.contains("admin") || role.contains("manager")
}

pub fn can_upload(role: &str) -> bool {
    is_privileged(role)
}

pub fn can_edit(role: &str) -> bool {
    is_privileged(role)
}

pub fn can_delete(role: &str) -> bool {
    is_privileged(role)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    pub can_upload: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl Permissions {
    pub fn for_role(role: &str) -> Self {
        Self {
            can_upload: can_upload(role),
            can_edit: can_edit(role),
            can_delete: can_delete(role),
        }
    }

    pub fn for_user(user: &User) -> Self {
        Self::for_role(&role_of(user))
    }
}

/// Turn a failed affordance check into a `Forbidden` error.
pub fn ensure(allowed: bool, message: &'static str) -> Result<(), PortalError> {
    if allowed {
        Ok(())
    } else {
        Err(PortalError::Forbidden(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoleEntry;

    fn user_with(role: Option<RoleEntry>, roles: Vec<RoleEntry>) -> User {
        User {
            role,
            roles,
            ..Default::default()
        }
    }

    #[test]
    fn test_role_prefers_singular_field() {
        let user = user_with(
            Some(RoleEntry::Name("Employee".into())),
            vec![RoleEntry::Name("admin".into())],
        );
        assert_eq!(role_of(&user), "Employee");
    }

    #[test]
    fn test_role_from_roles_collection() {
        let user = user_with(None, vec![RoleEntry::Named { name: "Manager".into() }]);
        assert_eq!(role_of(&user), "Manager");

        let user = user_with(Some(RoleEntry::Name(String::new())), vec![RoleEntry::Name("staff".into())]);
        assert_eq!(role_of(&user), "staff");

        assert_eq!(role_of(&User::default()), "");
    }

    #[test]
    fn test_privilege_is_case_insensitive_substring() {
        for role in ["admin", "ADMIN", "Super Admin", "manager", "dept_manager", "Sysadmin"] {
            assert!(can_upload(role), "{role} should upload");
            assert!(can_edit(role), "{role} should edit");
            assert!(can_delete(role), "{role} should delete");
        }
        for role in ["", "employee", "staff", "adm", "manage"] {
            assert_eq!(Permissions::for_role(role), Permissions::default(), "{role}");
        }
    }

    #[test]
    fn test_ensure() {
        assert!(ensure(true, "nope").is_ok());
        assert!(matches!(ensure(false, "nope"), Err(PortalError::Forbidden("nope"))));
    }
}
