use std::fmt;

use serde::{Deserialize, Serialize};

/// Authorization role of a portal user.
///
/// Unknown role strings fall back to [`Role::Viewer`], the least privileged role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    OperationsAdmin,
    Agent,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::OperationsAdmin,
        Role::Agent,
        Role::Viewer,
    ];

    /// One of the three administrative variants.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin | Role::OperationsAdmin)
    }

    /// Human readable label, shown as the badge on user results.
    pub fn label(self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::Admin => "Administrator",
            Role::OperationsAdmin => "Operations Admin",
            Role::Agent => "Agent",
            Role::Viewer => "Viewer",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::OperationsAdmin => "operations_admin",
            Role::Agent => "agent",
            Role::Viewer => "viewer",
        }
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        match role.trim().to_ascii_lowercase().as_str() {
            "super_admin" | "superadmin" => Role::SuperAdmin,
            "admin" => Role::Admin,
            "operations_admin" => Role::OperationsAdmin,
            "agent" => Role::Agent,
            _ => Role::Viewer,
        }
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        Role::from(role.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles() {
        assert_eq!(Role::from("admin"), Role::Admin);
        assert_eq!(Role::from("SUPER_ADMIN"), Role::SuperAdmin);
        assert_eq!(Role::from(" operations_admin "), Role::OperationsAdmin);
        assert_eq!(Role::from("agent".to_string()), Role::Agent);
    }

    #[test]
    fn unknown_role_is_viewer() {
        assert_eq!(Role::from("root"), Role::Viewer);
        assert_eq!(Role::from(""), Role::Viewer);
    }

    #[test]
    fn only_three_admin_variants() {
        let admins: Vec<_> = Role::ALL.into_iter().filter(|r| r.is_admin()).collect();
        assert_eq!(
            admins,
            vec![Role::SuperAdmin, Role::Admin, Role::OperationsAdmin]
        );
    }

    #[test]
    fn display_round_trips_through_from() {
        for role in Role::ALL {
            assert_eq!(Role::from(role.to_string()), role);
        }
    }
}
