// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::csv_export::ExportError;
use crate::password_policy::PasswordPolicyError;
use operativos::CoreError;
use operativos_domain::DomainError;
use operativos_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The permission required for this action.
        required_permission: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_permission,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_permission}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The permission required for this action.
        required_permission: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The record store rejected or failed a call. Nothing was applied.
    StoreFailure {
        /// A description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_permission,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_permission}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::StoreFailure { message } => write!(f, "Store failure: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_permission,
            } => Self::Unauthorized {
                action,
                required_permission,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

fn invalid_input(field: impl Into<String>, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.into(),
        message: err.to_string(),
    }
}

fn rule_violation(rule: &str, err: &DomainError) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: rule.to_string(),
        message: err.to_string(),
    }
}

fn not_found(resource_type: &str, err: &DomainError) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// Every validation error names the field or rule it concerns.
#[must_use]
pub fn translate_domain_error(err: &DomainError) -> ApiError {
    match err {
        DomainError::MissingField { field }
        | DomainError::MissingConclusionField { field, .. }
        | DomainError::UnexpectedConclusionField { field } => invalid_input(*field, err),
        DomainError::MissingUnits => invalid_input("units", err),
        DomainError::InvalidUnit { index, .. } => invalid_input(format!("units[{index}]"), err),
        DomainError::InvalidRole(_) => invalid_input("role", err),
        DomainError::InvalidStatus(_) => invalid_input("status", err),
        DomainError::InvalidShift(_) => invalid_input("shift", err),
        DomainError::InvalidConclusionResult(_) => invalid_input("result", err),
        DomainError::MissingReunionDetails => invalid_input("reunion_details", err),
        DomainError::IncompleteReunionDetails { field } => {
            invalid_input(format!("reunion_details.{field}"), err)
        }
        DomainError::InconsistentConclusion { .. } => ApiError::Internal {
            message: err.to_string(),
        },
        DomainError::OperativeNotActive { .. } => rule_violation("operative_must_be_active", err),
        DomainError::ResultNotAllowedForMeeting { .. } => {
            rule_violation("meeting_closes_as_deterrence", err)
        }
        DomainError::DuplicateOperativeId(_) => rule_violation("unique_operative_id", err),
        DomainError::DuplicateUserId(_) => rule_violation("unique_user_id", err),
        DomainError::DuplicateUsername(_) => rule_violation("unique_username", err),
        DomainError::SelfDeletion { .. } => rule_violation("no_self_deletion", err),
        DomainError::ProtectedUser { .. } => rule_violation("main_admin_protected", err),
        DomainError::RegionNotAssigned { .. } => rule_violation("assigned_region_required", err),
        DomainError::DuplicateOperativeType(_) => rule_violation("unique_operative_type", err),
        DomainError::OperativeTypeAtBoundary(_) => rule_violation("operative_type_order", err),
        DomainError::DuplicateCatalogEntry(_) => rule_violation("unique_catalog_entry", err),
        DomainError::OperativeNotFound(_) => not_found("Operative", err),
        DomainError::UserNotFound(_) => not_found("User", err),
        DomainError::OperativeTypeNotFound(_) => not_found("Operative type", err),
        DomainError::CatalogEntryNotFound(_) => not_found("Catalog entry", err),
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(&domain_err),
    }
}

/// Translates a failed store call into an API error.
#[must_use]
pub fn translate_persistence_error(err: &PersistenceError) -> ApiError {
    ApiError::StoreFailure {
        message: err.to_string(),
    }
}
