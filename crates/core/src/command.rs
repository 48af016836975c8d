// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use operativos_domain::{
    CatalogEntry, ClosureReport, Institution, Location, OperativePatch, Role, Shift, Unit,
    UserPatch,
};
use serde::{Deserialize, Serialize};

/// The fields a user supplies when logging a new operative.
///
/// Identifier, start date and time, status and owner are assigned by the
/// transition, never by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperativeDraft {
    #[serde(rename = "type")]
    pub operative_type: String,
    #[serde(default)]
    pub specific_type: Option<String>,
    /// Requested region. Honored only for users who may choose a region.
    #[serde(default)]
    pub region: String,
    pub quadrant: String,
    pub shift: Shift,
    pub location: Location,
    pub units: Vec<Unit>,
    #[serde(default)]
    pub institutions: Vec<Institution>,
}

/// The fields an administrator supplies when creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub full_name: String,
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub assigned_region: Option<String>,
    #[serde(default)]
    pub is_agrupamiento: bool,
}

/// Direction in which to move an operative type in the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// A command represents user intent as data only.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Log a new operative.
    CreateOperative {
        /// The submitted fields.
        draft: OperativeDraft,
    },
    /// Change the descriptive fields of an operative.
    EditOperative {
        /// The operative identifier.
        operative_id: String,
        /// The fields to change.
        patch: OperativePatch,
    },
    /// Close an active operative.
    ConcludeOperative {
        /// The operative identifier.
        operative_id: String,
        /// The closure report.
        report: ClosureReport,
    },
    /// Remove an operative permanently.
    DeleteOperative {
        /// The operative identifier.
        operative_id: String,
    },
    /// Create a user.
    CreateUser {
        /// The submitted fields.
        draft: UserDraft,
    },
    /// Change a user.
    EditUser {
        /// The user identifier.
        user_id: String,
        /// The fields to change.
        patch: UserPatch,
    },
    /// Remove a user.
    DeleteUser {
        /// The user identifier.
        user_id: String,
    },
    /// Change the acting user's own password.
    UpdatePassword {
        /// The new password, already checked against the password policy.
        new_password: String,
    },
    /// Append an operative type to the catalog.
    AddOperativeType {
        /// The type name.
        name: String,
    },
    /// Remove an operative type from the catalog.
    RemoveOperativeType {
        /// The type name.
        name: String,
    },
    /// Move an operative type one position up or down.
    MoveOperativeType {
        /// The type name.
        name: String,
        /// Which way to move it.
        direction: MoveDirection,
    },
    /// Add a colony catalog entry.
    AddCatalogEntry {
        /// The entry.
        entry: CatalogEntry,
    },
    /// Remove a colony catalog entry.
    RemoveCatalogEntry {
        /// The entry.
        entry: CatalogEntry,
    },
}

impl Command {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateOperative { .. } => "CreateOperative",
            Self::EditOperative { .. } => "EditOperative",
            Self::ConcludeOperative { .. } => "ConcludeOperative",
            Self::DeleteOperative { .. } => "DeleteOperative",
            Self::CreateUser { .. } => "CreateUser",
            Self::EditUser { .. } => "EditUser",
            Self::DeleteUser { .. } => "DeleteUser",
            Self::UpdatePassword { .. } => "UpdatePassword",
            Self::AddOperativeType { .. } => "AddOperativeType",
            Self::RemoveOperativeType { .. } => "RemoveOperativeType",
            Self::MoveOperativeType { .. } => "MoveOperativeType",
            Self::AddCatalogEntry { .. } => "AddCatalogEntry",
            Self::RemoveCatalogEntry { .. } => "RemoveCatalogEntry",
        }
    }
}
