//! Role x module x action permission table.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::role::Role;

/// One of the portal's permission-gated areas, and one of the five search modules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Module {
    Users,
    Files,
    Companies,
    Contacts,
    PaymentMethods,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Upload,
    Download,
}

/// Boolean lookup table of what each role may do in each module.
///
/// Built once at startup and shared by reference. Anything not granted is denied.
///
/// # Examples
///
/// ```
/// use portal_search::{Action, Module, PermissionMatrix, Role};
///
/// let matrix = PermissionMatrix::new().grant(Role::Agent, Module::Files, &[Action::View]);
/// assert!(matrix.allows(Role::Agent, Module::Files, Action::View));
/// assert!(!matrix.allows(Role::Agent, Module::Files, Action::Delete));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PermissionMatrix {
    grants: HashSet<(Role, Module, Action)>,
}

impl PermissionMatrix {
    /// An empty table that denies everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, role: Role, module: Module, actions: &[Action]) -> Self {
        for action in actions {
            self.grants.insert((role, module, *action));
        }
        self
    }

    pub fn grant_all(mut self, role: Role, module: Module) -> Self {
        for action in Action::iter() {
            self.grants.insert((role, module, action));
        }
        self
    }

    pub fn allows(&self, role: Role, module: Module, action: Action) -> bool {
        self.grants.contains(&(role, module, action))
    }

    /// The portal's standard role table.
    pub fn portal_defaults() -> Self {
        use Action::*;

        let mut matrix = Self::new();
        for module in Module::iter() {
            matrix = matrix.grant_all(Role::SuperAdmin, module);
            if module != Module::Users {
                matrix = matrix.grant_all(Role::Admin, module);
            }
        }

        matrix
            .grant(Role::Admin, Module::Users, &[View, Create, Edit])
            .grant(Role::OperationsAdmin, Module::Users, &[View])
            .grant(Role::OperationsAdmin, Module::Files, &[View, Upload, Download])
            .grant(Role::OperationsAdmin, Module::Companies, &[View, Create, Edit])
            .grant(Role::OperationsAdmin, Module::Contacts, &[View, Create, Edit])
            .grant(Role::OperationsAdmin, Module::PaymentMethods, &[View, Create, Edit])
            .grant(Role::Agent, Module::Files, &[View, Download])
            .grant(Role::Agent, Module::Companies, &[View])
            .grant(Role::Agent, Module::Contacts, &[View])
            .grant(Role::Agent, Module::PaymentMethods, &[View])
            .grant(Role::Viewer, Module::Companies, &[View])
            .grant(Role::Viewer, Module::Contacts, &[View])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matrix_denies_everything() {
        let matrix = PermissionMatrix::new();
        for role in Role::ALL {
            for module in Module::iter() {
                for action in Action::iter() {
                    assert!(!matrix.allows(role, module, action));
                }
            }
        }
    }

    #[test]
    fn super_admin_can_do_everything() {
        let matrix = PermissionMatrix::portal_defaults();
        for module in Module::iter() {
            for action in Action::iter() {
                assert!(matrix.allows(Role::SuperAdmin, module, action));
            }
        }
    }

    #[test]
    fn admin_cannot_delete_users() {
        let matrix = PermissionMatrix::portal_defaults();
        assert!(matrix.allows(Role::Admin, Module::Users, Action::Edit));
        assert!(!matrix.allows(Role::Admin, Module::Users, Action::Delete));
        assert!(matrix.allows(Role::Admin, Module::Files, Action::Delete));
    }

    #[test]
    fn viewer_cannot_see_files() {
        let matrix = PermissionMatrix::portal_defaults();
        assert!(!matrix.allows(Role::Viewer, Module::Files, Action::View));
        assert!(matrix.allows(Role::Agent, Module::Files, Action::View));
    }

    #[test]
    fn module_names_parse() {
        assert_eq!("payment_methods".parse::<Module>().unwrap(), Module::PaymentMethods);
        assert_eq!("Download".parse::<Action>().unwrap(), Action::Download);
        assert_eq!(Module::PaymentMethods.to_string(), "payment_methods");
    }
}
