// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The single permission table every layer consults.
//!
//! Each role appears exactly once in [`ROLE_POLICIES`]. Nothing outside this
//! module compares role values to decide what a user may do.

use crate::types::{Role, User};

/// An action or view that is granted per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Open the live dashboard.
    ViewDashboard,
    /// Open the statistics view.
    ViewStatistics,
    /// Create new operatives.
    CreateOperative,
    /// Create, edit and delete users.
    ManageUsers,
    /// Maintain operative types and the colony catalog.
    ManageCatalog,
    /// Export operatives as CSV.
    ExportOperatives,
    /// Change one's own password.
    UpdateOwnPassword,
    /// See the full conclusion of operatives.
    ViewRestrictedConclusion,
    /// Edit or conclude operatives created by someone else.
    ModifyAnyOperative,
    /// Delete operatives.
    DeleteOperative,
    /// Pick a region other than the assigned one when creating.
    ChooseRegion,
}

/// Which operatives a role may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityScope {
    /// Every operative.
    Municipality,
    /// Operatives in the user's assigned region.
    Region,
    /// Operatives the user created.
    Own,
}

/// Row of the permission table.
#[derive(Debug, Clone, Copy)]
pub struct RolePolicy {
    /// The role this row describes.
    pub role: Role,
    /// What the role can see.
    pub scope: VisibilityScope,
    /// What the role can do.
    pub permissions: &'static [Permission],
}

impl RolePolicy {
    /// Returns true if this row grants `permission`.
    #[must_use]
    pub fn grants(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

const NO_PERMISSIONS: RolePolicy = RolePolicy {
    role: Role::Patrolman,
    scope: VisibilityScope::Own,
    permissions: &[],
};

/// The permission table.
pub const ROLE_POLICIES: [RolePolicy; 8] = [
    RolePolicy {
        role: Role::Admin,
        scope: VisibilityScope::Municipality,
        permissions: &[
            Permission::ViewDashboard,
            Permission::ViewStatistics,
            Permission::CreateOperative,
            Permission::ManageUsers,
            Permission::ManageCatalog,
            Permission::ExportOperatives,
            Permission::UpdateOwnPassword,
            Permission::ViewRestrictedConclusion,
            Permission::ModifyAnyOperative,
            Permission::DeleteOperative,
            Permission::ChooseRegion,
        ],
    },
    RolePolicy {
        role: Role::Director,
        scope: VisibilityScope::Municipality,
        permissions: &[
            Permission::ViewDashboard,
            Permission::ViewStatistics,
            Permission::UpdateOwnPassword,
            Permission::ViewRestrictedConclusion,
        ],
    },
    RolePolicy {
        role: Role::Regional,
        scope: VisibilityScope::Region,
        permissions: &[
            Permission::ViewDashboard,
            Permission::ViewStatistics,
            Permission::CreateOperative,
            Permission::UpdateOwnPassword,
            Permission::ModifyAnyOperative,
        ],
    },
    RolePolicy {
        role: Role::ShiftLeader,
        scope: VisibilityScope::Region,
        permissions: &[
            Permission::ViewDashboard,
            Permission::CreateOperative,
            Permission::ModifyAnyOperative,
        ],
    },
    RolePolicy {
        role: Role::QuadrantLeader,
        scope: VisibilityScope::Own,
        permissions: &[Permission::CreateOperative],
    },
    RolePolicy {
        role: Role::Patrolman,
        scope: VisibilityScope::Own,
        permissions: &[Permission::CreateOperative],
    },
    RolePolicy {
        role: Role::GroupingChief,
        scope: VisibilityScope::Region,
        permissions: &[
            Permission::ViewDashboard,
            Permission::ViewStatistics,
            Permission::CreateOperative,
            Permission::UpdateOwnPassword,
            Permission::ModifyAnyOperative,
            Permission::ChooseRegion,
        ],
    },
    RolePolicy {
        role: Role::Analyst,
        scope: VisibilityScope::Municipality,
        permissions: &[
            Permission::ViewDashboard,
            Permission::ViewStatistics,
            Permission::ManageCatalog,
            Permission::ExportOperatives,
            Permission::UpdateOwnPassword,
            Permission::ViewRestrictedConclusion,
        ],
    },
];

impl Role {
    /// Returns this role's row of the permission table.
    #[must_use]
    pub fn policy(&self) -> &'static RolePolicy {
        ROLE_POLICIES
            .iter()
            .find(|policy| policy.role == *self)
            .unwrap_or(&NO_PERMISSIONS)
    }

    /// Returns true if the role is granted `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.policy().grants(permission)
    }
}

impl User {
    /// Returns true if the user is granted `permission`.
    ///
    /// The agrupamiento flag additionally grants region choice.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        if permission == Permission::ChooseRegion && self.is_agrupamiento {
            return true;
        }
        self.role.has_permission(permission)
    }

    /// Returns the set of operatives this user may see.
    ///
    /// The agrupamiento flag lifts a region scope to the whole municipality.
    /// It does not widen the own-records scope.
    #[must_use]
    pub fn visibility_scope(&self) -> VisibilityScope {
        match self.role.policy().scope {
            VisibilityScope::Region if self.is_agrupamiento => VisibilityScope::Municipality,
            scope => scope,
        }
    }

    /// Returns true if the user may pick any region when creating an operative.
    #[must_use]
    pub fn can_choose_region(&self) -> bool {
        self.has_permission(Permission::ChooseRegion)
    }
}
