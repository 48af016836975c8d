// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what actions a user is permitted to perform without
//! leaking domain internals. They are advisory only and do not replace the
//! checks in [`crate::auth::AuthorizationService`]. Both read the same role
//! policy table, so they cannot disagree.

use crate::request_response::{Capability, OperativeCapabilities, SessionCapabilities};
use operativos_domain::{Operative, Permission, User, is_visible_to};

/// Computes the session-wide capabilities of `user` from its current role.
#[must_use]
pub fn compute_session_capabilities(user: &User) -> SessionCapabilities {
    let allowed = |permission: Permission| Capability::from_bool(user.has_permission(permission));

    SessionCapabilities {
        can_view_dashboard: allowed(Permission::ViewDashboard),
        can_view_statistics: allowed(Permission::ViewStatistics),
        can_create_operative: allowed(Permission::CreateOperative),
        can_manage_users: allowed(Permission::ManageUsers),
        can_manage_catalog: allowed(Permission::ManageCatalog),
        can_export: allowed(Permission::ExportOperatives),
        can_update_password: allowed(Permission::UpdateOwnPassword),
        can_view_restricted_conclusion: allowed(Permission::ViewRestrictedConclusion),
        can_choose_region: Capability::from_bool(user.can_choose_region()),
    }
}

/// Computes what `user` may do with one operative.
///
/// Editing and concluding need the operative to be visible, and the user to
/// be its creator or hold `ModifyAnyOperative`. Concluding additionally needs
/// the operative to be active.
#[must_use]
pub fn compute_operative_capabilities(user: &User, operative: &Operative) -> OperativeCapabilities {
    let visible: bool = is_visible_to(operative, user);
    let may_modify: bool = visible
        && (operative.created_by == user.id || user.has_permission(Permission::ModifyAnyOperative));

    OperativeCapabilities {
        can_edit: Capability::from_bool(may_modify),
        can_conclude: Capability::from_bool(may_modify && operative.is_active()),
        can_delete: Capability::from_bool(
            visible && user.has_permission(Permission::DeleteOperative),
        ),
    }
}
