//! Well-known role name constants.
//!
//! These must match the seed data in
//! `20260301000001_create_users_table.sql`.

pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_MANAGER: &str = "Manager";
pub const ROLE_TEAM_MEMBER: &str = "Team Member";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_TEAM_MEMBER];

/// Whether `role` is one of the known role names.
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

/// Whether `role` carries management privileges (Admin or Manager).
///
/// Used for approval, upload, and project-deletion permission checks.
pub fn is_management(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_MANAGER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles_are_valid() {
        assert!(is_valid_role(ROLE_ADMIN));
        assert!(is_valid_role(ROLE_MANAGER));
        assert!(is_valid_role(ROLE_TEAM_MEMBER));
        assert!(!is_valid_role("Superuser"));
    }

    #[test]
    fn test_management_roles() {
        assert!(is_management(ROLE_ADMIN));
        assert!(is_management(ROLE_MANAGER));
        assert!(!is_management(ROLE_TEAM_MEMBER));
    }
}
