// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! Boundary layer between transports and the core engine.
//!
//! Handlers take the cached [`operativos::State`], the acting user and a
//! store. Authorization is checked here, never in the core. A write returns
//! a replacement state only after the store has accepted it.

mod auth;
mod capabilities;
mod csv_export;
mod error;
mod handlers;
mod password_policy;
mod request_response;
mod statistics;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthenticationService, AuthorizationService, CredentialVerifier, PlaintextCredentials,
};
pub use capabilities::{compute_operative_capabilities, compute_session_capabilities};
pub use csv_export::{DateRange, EXPORT_HEADERS, ExportError, UTF8_BOM, export_row};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    ApiResult, add_catalog_entry, add_operative_type, conclude_operative, create_operative,
    create_user, delete_operative, delete_user, edit_operative, edit_user, export_operatives,
    get_operative, get_statistics, list_audit_trail, list_catalog, list_operatives, list_users,
    login, logout, move_operative_type, remove_catalog_entry, remove_operative_type,
    update_password, whoami,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AuditEntry, AuditQuery, AuditTrailResponse, Capability, CatalogEntryRequest, CatalogQuery,
    CatalogResponse, ConclusionView, CreateUserRequest, EditUserRequest, ExportQuery,
    ListOperativesQuery, ListOperativesResponse, ListUsersResponse, ListView, LoginRequest,
    LoginResponse, MoveOperativeTypeRequest, MutationResponse, OperativeCapabilities,
    OperativeDetailResponse, OperativeSummary, OperativeTypeRequest, RESTRICTED_PLACEHOLDER,
    RegionStatusView, ReunionDetailsView, SessionCapabilities, StatisticsQuery,
    UpdatePasswordRequest, UserInfo, WhoAmIResponse,
};
pub use statistics::{
    LabelCount, OperativeStatistics, StatisticsFilter, TOP_COLONIES, TOP_TYPES, compute_statistics,
    type_label,
};
