// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{CatalogEntry, ConclusionResult};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required text field is empty after trimming.
    MissingField {
        /// The field name.
        field: &'static str,
    },
    /// An operative was submitted without any deployed unit.
    MissingUnits,
    /// A deployed unit is incomplete.
    InvalidUnit {
        /// Zero-based position of the unit in the list.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },
    /// Role code is not recognized.
    InvalidRole(String),
    /// Status code is not recognized.
    InvalidStatus(String),
    /// Shift code is not recognized.
    InvalidShift(String),
    /// Conclusion result code is not recognized.
    InvalidConclusionResult(String),
    /// A stored operative has a status that disagrees with its conclusion.
    InconsistentConclusion {
        /// The operative identifier.
        operative_id: String,
    },
    /// Conclusion was requested for an operative that is not active.
    OperativeNotActive {
        /// The operative identifier.
        operative_id: String,
    },
    /// Neighborhood meetings may only close as deterrence.
    ResultNotAllowedForMeeting {
        /// The rejected result.
        result: ConclusionResult,
    },
    /// A neighborhood meeting was closed without reunion details.
    MissingReunionDetails,
    /// Reunion details are present but incomplete.
    IncompleteReunionDetails {
        /// The missing field.
        field: &'static str,
    },
    /// The chosen result requires a field that was not supplied.
    MissingConclusionField {
        /// The missing field.
        field: &'static str,
        /// The chosen result.
        result: ConclusionResult,
    },
    /// A field was supplied that does not belong to the chosen branch.
    UnexpectedConclusionField {
        /// The unexpected field.
        field: &'static str,
    },
    /// Operative does not exist.
    OperativeNotFound(String),
    /// An operative with this identifier already exists.
    DuplicateOperativeId(String),
    /// User does not exist.
    UserNotFound(String),
    /// A user with this identifier already exists.
    DuplicateUserId(String),
    /// Username is already taken.
    DuplicateUsername(String),
    /// A user attempted to delete their own account.
    SelfDeletion {
        /// The user identifier.
        user_id: String,
    },
    /// The seeded administrator account cannot be removed.
    ProtectedUser {
        /// The protected username.
        username: String,
    },
    /// A region-restricted user has no assigned region to create operatives in.
    RegionNotAssigned {
        /// The user identifier.
        user_id: String,
    },
    /// Operative type is already in the catalog.
    DuplicateOperativeType(String),
    /// Operative type is not in the catalog.
    OperativeTypeNotFound(String),
    /// Operative type cannot move further in the requested direction.
    OperativeTypeAtBoundary(String),
    /// Colony catalog entry already exists.
    DuplicateCatalogEntry(CatalogEntry),
    /// Colony catalog entry does not exist.
    CatalogEntryNotFound(CatalogEntry),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "Field '{field}' is required"),
            Self::MissingUnits => write!(f, "At least one unit is required"),
            Self::InvalidUnit { index, reason } => {
                write!(f, "Unit {} is invalid: {reason}", index + 1)
            }
            Self::InvalidRole(msg) => write!(f, "Invalid role: {msg}"),
            Self::InvalidStatus(msg) => write!(f, "Invalid status: {msg}"),
            Self::InvalidShift(msg) => write!(f, "Invalid shift: {msg}"),
            Self::InvalidConclusionResult(msg) => write!(f, "Invalid conclusion result: {msg}"),
            Self::InconsistentConclusion { operative_id } => write!(
                f,
                "Operative {operative_id} has a status that does not match its conclusion"
            ),
            Self::OperativeNotActive { operative_id } => {
                write!(f, "Operative {operative_id} is not active")
            }
            Self::ResultNotAllowedForMeeting { result } => write!(
                f,
                "Result '{result}' is not allowed for a neighborhood meeting"
            ),
            Self::MissingReunionDetails => {
                write!(f, "Neighborhood meetings require reunion details")
            }
            Self::IncompleteReunionDetails { field } => {
                write!(f, "Reunion detail '{field}' is required")
            }
            Self::MissingConclusionField { field, result } => {
                write!(f, "Field '{field}' is required for result '{result}'")
            }
            Self::UnexpectedConclusionField { field } => {
                write!(f, "Field '{field}' does not apply to this conclusion")
            }
            Self::OperativeNotFound(id) => write!(f, "Operative {id} not found"),
            Self::DuplicateOperativeId(id) => write!(f, "Operative {id} already exists"),
            Self::UserNotFound(id) => write!(f, "User {id} not found"),
            Self::DuplicateUserId(id) => write!(f, "User {id} already exists"),
            Self::DuplicateUsername(username) => {
                write!(f, "Username '{username}' is already taken")
            }
            Self::SelfDeletion { user_id } => {
                write!(f, "User {user_id} cannot delete their own account")
            }
            Self::ProtectedUser { username } => {
                write!(f, "User '{username}' is the main administrator and cannot be deleted")
            }
            Self::RegionNotAssigned { user_id } => {
                write!(f, "User {user_id} has no assigned region")
            }
            Self::DuplicateOperativeType(name) => {
                write!(f, "Operative type '{name}' already exists")
            }
            Self::OperativeTypeNotFound(name) => write!(f, "Operative type '{name}' not found"),
            Self::OperativeTypeAtBoundary(name) => {
                write!(f, "Operative type '{name}' cannot move further")
            }
            Self::DuplicateCatalogEntry(entry) => {
                write!(f, "Catalog entry {entry} already exists")
            }
            Self::CatalogEntryNotFound(entry) => write!(f, "Catalog entry {entry} not found"),
        }
    }
}

impl std::error::Error for DomainError {}
