// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Every write follows the same sequence: authorize against the current
//! state, compute the transition with the core engine, persist its single
//! store mutation, and only then hand the new state back to the caller. If
//! the store rejects the mutation the handler fails with
//! [`ApiError::StoreFailure`] and the caller keeps its previous state.

use chrono::NaiveDateTime;
use operativos::{Command, MoveDirection, OperativeDraft, State, TransitionResult, UserDraft, apply};
use operativos_audit::AuditEvent;
use operativos_domain::{
    CatalogEntry, ClosureReport, Operative, OperativePatch, OperativeView, Permission, REGIONS,
    Shift, User, UserPatch, colonies_for, is_visible_to, normalize_trimmed, operatives_for_view,
    region_status_summary, search_operatives, visible_operatives,
};
use operativos_persistence::{AuditEventData, Persistence, RecordStore, SessionStore};
use time::Duration;
use tracing::{error, info, warn};

use crate::auth::{AuthenticationService, AuthorizationService, CredentialVerifier};
use crate::capabilities::{compute_operative_capabilities, compute_session_capabilities};
use crate::csv_export::{DateRange, export_operatives as render_csv};
use crate::error::{ApiError, translate_core_error, translate_persistence_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AuditEntry, AuditQuery, AuditTrailResponse, CatalogEntryRequest, CatalogQuery, CatalogResponse,
    CreateUserRequest, EditUserRequest, ExportQuery, ListOperativesQuery, ListOperativesResponse,
    ListUsersResponse, LoginRequest, LoginResponse, MoveOperativeTypeRequest, MutationResponse,
    OperativeDetailResponse, OperativeSummary, OperativeTypeRequest, RegionStatusView,
    StatisticsQuery, UpdatePasswordRequest, UserInfo, WhoAmIResponse,
};
use crate::statistics::{OperativeStatistics, StatisticsFilter, compute_statistics};

/// Filter values meaning "no filter" in the statistics query.
const ALL_FILTER_VALUES: [&str; 3] = ["TODOS", "TODAS", "ALL"];

/// The result of a successful write.
///
/// `new_state` replaces the caller's cached state. It is only produced after
/// the store accepted the mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// The audit event generated by this operation.
    pub audit_event: AuditEvent,
    /// The new state after the operation.
    pub new_state: State,
}

/// Applies `command`, persists its mutation and records its audit event.
///
/// A failed audit write is logged and does not undo the mutation.
fn execute<S: RecordStore>(
    store: &mut S,
    state: &State,
    command: Command,
    actor: &User,
    now: NaiveDateTime,
) -> Result<TransitionResult, ApiError> {
    let action: &'static str = command.name();
    let transition: TransitionResult =
        apply(state, command, actor, now).map_err(translate_core_error)?;

    store.apply_mutation(&transition.mutation).map_err(|e| {
        error!(action, user_id = %actor.id, error = %e, "Store rejected mutation");
        translate_persistence_error(&e)
    })?;

    if let Err(e) = store.record_audit_event(&transition.audit_event) {
        warn!(
            action,
            subject = %transition.audit_event.subject,
            error = %e,
            "Failed to record audit event"
        );
    }

    info!(
        action,
        user_id = %actor.id,
        subject = %transition.audit_event.subject,
        "Applied command"
    );
    Ok(transition)
}

fn into_result(
    transition: TransitionResult,
    message: String,
    id: Option<String>,
) -> ApiResult<MutationResponse> {
    ApiResult {
        response: MutationResponse { id, message },
        audit_event: transition.audit_event,
        new_state: transition.new_state,
    }
}

fn operative_not_found(operative_id: &str) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Operative"),
        message: format!("Operative '{operative_id}' not found"),
    }
}

/// Looks up an operative the user may see. Invisible operatives are reported
/// as missing.
fn visible_operative<'a>(
    state: &'a State,
    user: &User,
    operative_id: &str,
) -> Result<&'a Operative, ApiError> {
    state
        .find_operative(operative_id)
        .filter(|operative| is_visible_to(operative, user))
        .ok_or_else(|| operative_not_found(operative_id))
}

/// Authenticates a user and opens a session.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` for wrong credentials or if the
/// session cannot be stored.
pub fn login<S: SessionStore, V: CredentialVerifier>(
    store: &mut S,
    verifier: &V,
    state: &State,
    request: &LoginRequest,
    lifetime: Duration,
) -> Result<LoginResponse, ApiError> {
    let (session_token, user, expires_at) = AuthenticationService::login(
        store,
        verifier,
        state,
        &request.username,
        &request.password,
        lifetime,
    )?;

    Ok(LoginResponse {
        session_token,
        expires_at,
        capabilities: compute_session_capabilities(&user),
        user: UserInfo::from(&user),
    })
}

/// Closes a session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout<S: SessionStore>(store: &mut S, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(store, session_token)?;
    Ok(())
}

/// Describes the signed-in user and their current capabilities.
#[must_use]
pub fn whoami(user: &User) -> WhoAmIResponse {
    WhoAmIResponse {
        user: UserInfo::from(user),
        capabilities: compute_session_capabilities(user),
    }
}

/// Lists the operatives `user` sees in the requested view.
///
/// The dashboard view needs `ViewDashboard` and carries the per-region
/// summary. The history view is open to every user and is still scoped by
/// visibility.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` if the dashboard is requested without
/// `ViewDashboard`.
pub fn list_operatives(
    state: &State,
    user: &User,
    query: &ListOperativesQuery,
    now: NaiveDateTime,
) -> Result<ListOperativesResponse, ApiError> {
    let view: OperativeView = query.view.into();
    if view == OperativeView::Dashboard {
        AuthorizationService::require(user, Permission::ViewDashboard, "view_dashboard")?;
    }

    let in_view: Vec<&Operative> = operatives_for_view(&state.operatives, user, view, now);
    let region_status: Vec<RegionStatusView> = if view == OperativeView::Dashboard {
        region_status_summary(&in_view)
            .into_iter()
            .map(RegionStatusView::from)
            .collect()
    } else {
        Vec::new()
    };

    let matching: Vec<&Operative> =
        search_operatives(in_view, query.search.as_deref().unwrap_or_default());

    Ok(ListOperativesResponse {
        view: query.view,
        operatives: matching
            .into_iter()
            .map(|operative| {
                OperativeSummary::new(operative, compute_operative_capabilities(user, operative))
            })
            .collect(),
        region_status,
    })
}

/// Returns the detail of one operative, redacting meeting details the user
/// may not see.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the operative does not exist or is
/// not visible to the user.
pub fn get_operative(
    state: &State,
    user: &User,
    operative_id: &str,
) -> Result<OperativeDetailResponse, ApiError> {
    let operative: &Operative = visible_operative(state, user, operative_id)?;
    Ok(OperativeDetailResponse::new(
        operative,
        user.has_permission(Permission::ViewRestrictedConclusion),
        compute_operative_capabilities(user, operative),
    ))
}

/// Logs a new operative.
///
/// # Errors
///
/// Returns an error if the user may not create operatives, the draft is
/// invalid, or the store rejects the insert.
pub fn create_operative<S: RecordStore>(
    store: &mut S,
    state: &State,
    user: &User,
    draft: OperativeDraft,
    now: NaiveDateTime,
) -> Result<ApiResult<MutationResponse>, ApiError> {
    AuthorizationService::require(user, Permission::CreateOperative, "create_operative")?;

    let transition: TransitionResult = execute(
        store,
        state,
        Command::CreateOperative { draft },
        user,
        now,
    )?;
    let operative_id: String = transition.audit_event.subject.clone();
    Ok(into_result(
        transition,
        format!("Created operative {operative_id}"),
        Some(operative_id),
    ))
}

/// Changes the descriptive fields of an operative.
///
/// # Errors
///
/// Returns an error if the operative is not visible, the user is neither its
/// creator nor holds `ModifyAnyOperative`, the patch moves it to another
/// region without `ChooseRegion`, the patch is invalid, or the store rejects
/// the update.
pub fn edit_operative<S: RecordStore>(
    store: &mut S,
    state: &State,
    user: &User,
    operative_id: &str,
    patch: OperativePatch,
    now: NaiveDateTime,
) -> Result<ApiResult<MutationResponse>, ApiError> {
    let operative: &Operative = visible_operative(state, user, operative_id)?;
    AuthorizationService::authorize_modify_operative(user, operative, "edit_operative")?;
    AuthorizationService::authorize_patch(user, operative, &patch)?;

    let transition: TransitionResult = execute(
        store,
        state,
        Command::EditOperative {
            operative_id: operative_id.to_string(),
            patch,
        },
        user,
        now,
    )?;
    Ok(into_result(
        transition,
        format!("Updated operative {operative_id}"),
        Some(operative_id.to_string()),
    ))
}

/// Concludes an active operative.
///
/// # Errors
///
/// Returns an error if the operative is not visible, the user may not modify
/// it, the report breaks a closure rule, or the store rejects the update.
pub fn conclude_operative<S: RecordStore>(
    store: &mut S,
    state: &State,
    user: &User,
    operative_id: &str,
    report: ClosureReport,
    now: NaiveDateTime,
) -> Result<ApiResult<MutationResponse>, ApiError> {
    let operative: &Operative = visible_operative(state, user, operative_id)?;
    AuthorizationService::authorize_modify_operative(user, operative, "conclude_operative")?;

    let transition: TransitionResult = execute(
        store,
        state,
        Command::ConcludeOperative {
            operative_id: operative_id.to_string(),
            report,
        },
        user,
        now,
    )?;
    Ok(into_result(
        transition,
        format!("Concluded operative {operative_id}"),
        Some(operative_id.to_string()),
    ))
}

/// Deletes an operative permanently.
///
/// # Errors
///
/// Returns an error if the user lacks `DeleteOperative`, the operative is not
/// visible, or the store rejects the delete.
pub fn delete_operative<S: RecordStore>(
    store: &mut S,
    state: &State,
    user: &User,
    operative_id: &str,
    now: NaiveDateTime,
) -> Result<ApiResult<MutationResponse>, ApiError> {
    AuthorizationService::require(user, Permission::DeleteOperative, "delete_operative")?;
    visible_operative(state, user, operative_id)?;

    let transition: TransitionResult = execute(
        store,
        state,
        Command::DeleteOperative {
            operative_id: operative_id.to_string(),
        },
        user,
        now,
    )?;
    Ok(into_result(
        transition,
        format!("Deleted operative {operative_id}"),
        Some(operative_id.to_string()),
    ))
}

/// Lists every user.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` without `ManageUsers`.
pub fn list_users(state: &State, user: &User) -> Result<ListUsersResponse, ApiError> {
    AuthorizationService::require(user, Permission::ManageUsers, "list_users")?;
    Ok(ListUsersResponse {
        users: state.users.iter().map(UserInfo::from).collect(),
    })
}

/// Creates a user.
///
/// # Errors
///
/// Returns an error without `ManageUsers`, for an unknown role, a taken
/// username, a missing field, or if the store rejects the insert.
pub fn create_user<S: RecordStore>(
    store: &mut S,
    state: &State,
    user: &User,
    request: CreateUserRequest,
    now: NaiveDateTime,
) -> Result<ApiResult<MutationResponse>, ApiError> {
    AuthorizationService::require(user, Permission::ManageUsers, "create_user")?;
    let draft: UserDraft = request.into_draft()?;

    let transition: TransitionResult =
        execute(store, state, Command::CreateUser { draft }, user, now)?;
    let user_id: String = transition.audit_event.subject.clone();
    Ok(into_result(
        transition,
        format!("Created user {user_id}"),
        Some(user_id),
    ))
}

/// Changes a user.
///
/// # Errors
///
/// Returns an error without `ManageUsers`, for an unknown user or role, a
/// taken username, or if the store rejects the update.
pub fn edit_user<S: RecordStore>(
    store: &mut S,
    state: &State,
    user: &User,
    user_id: &str,
    request: EditUserRequest,
    now: NaiveDateTime,
) -> Result<ApiResult<MutationResponse>, ApiError> {
    AuthorizationService::require(user, Permission::ManageUsers, "edit_user")?;
    let patch: UserPatch = request.into_patch()?;

    let transition: TransitionResult = execute(
        store,
        state,
        Command::EditUser {
            user_id: user_id.to_string(),
            patch,
        },
        user,
        now,
    )?;
    Ok(into_result(
        transition,
        format!("Updated user {user_id}"),
        Some(user_id.to_string()),
    ))
}

/// Deletes a user. Administrators cannot delete their own account.
///
/// # Errors
///
/// Returns an error without `ManageUsers`, for an unknown user, for
/// self-deletion, or if the store rejects the delete.
pub fn delete_user<S: RecordStore>(
    store: &mut S,
    state: &State,
    user: &User,
    user_id: &str,
    now: NaiveDateTime,
) -> Result<ApiResult<MutationResponse>, ApiError> {
    AuthorizationService::require(user, Permission::ManageUsers, "delete_user")?;

    let transition: TransitionResult = execute(
        store,
        state,
        Command::DeleteUser {
            user_id: user_id.to_string(),
        },
        user,
        now,
    )?;
    Ok(into_result(
        transition,
        format!("Deleted user {user_id}"),
        Some(user_id.to_string()),
    ))
}

/// Changes the acting user's own password.
///
/// # Errors
///
/// Returns an error without `UpdateOwnPassword`, if the password breaks the
/// policy, or if the store rejects the update.
pub fn update_password<S: RecordStore>(
    store: &mut S,
    state: &State,
    user: &User,
    request: &UpdatePasswordRequest,
    now: NaiveDateTime,
) -> Result<ApiResult<MutationResponse>, ApiError> {
    AuthorizationService::require(user, Permission::UpdateOwnPassword, "update_password")?;
    PasswordPolicy::default().validate(&request.new_password, &request.confirmation)?;

    let transition: TransitionResult = execute(
        store,
        state,
        Command::UpdatePassword {
            new_password: request.new_password.clone(),
        },
        user,
        now,
    )?;
    Ok(into_result(
        transition,
        String::from("Password updated"),
        Some(user.id.clone()),
    ))
}

/// Returns the catalogs, optionally narrowed to one region and quadrant.
#[must_use]
pub fn list_catalog(state: &State, query: &CatalogQuery) -> CatalogResponse {
    let region: Option<String> = query.region.as_deref().map(normalize_trimmed);
    let quadrant: Option<String> = query.quadrant.as_deref().map(normalize_trimmed);

    let entries: Vec<CatalogEntry> = state
        .colony_catalog
        .iter()
        .filter(|entry| region.as_ref().is_none_or(|region| &entry.region == region))
        .cloned()
        .collect();

    let colonies: Vec<String> = match (&region, &quadrant) {
        (Some(region), Some(quadrant)) => colonies_for(&state.colony_catalog, region, quadrant),
        _ => Vec::new(),
    };

    CatalogResponse {
        regions: REGIONS.iter().map(|region| (*region).to_string()).collect(),
        operative_types: state.operative_types.clone(),
        entries,
        colonies,
    }
}

fn catalog_command<S: RecordStore>(
    store: &mut S,
    state: &State,
    user: &User,
    command: Command,
    now: NaiveDateTime,
) -> Result<ApiResult<MutationResponse>, ApiError> {
    let action: &'static str = command.name();
    AuthorizationService::require(user, Permission::ManageCatalog, action)?;

    let transition: TransitionResult = execute(store, state, command, user, now)?;
    let subject: String = transition.audit_event.subject.clone();
    Ok(into_result(transition, format!("{action}: {subject}"), None))
}

/// Adds an operative type at the end of the display order.
///
/// # Errors
///
/// Returns an error without `ManageCatalog`, for a blank or duplicate name,
/// or if the store rejects the insert.
pub fn add_operative_type<S: RecordStore>(
    store: &mut S,
    state: &State,
    user: &User,
    request: OperativeTypeRequest,
    now: NaiveDateTime,
) -> Result<ApiResult<MutationResponse>, ApiError> {
    catalog_command(
        store,
        state,
        user,
        Command::AddOperativeType { name: request.name },
        now,
    )
}

/// Removes an operative type.
///
/// # Errors
///
/// Returns an error without `ManageCatalog`, for an unknown type, or if the
/// store rejects the delete.
pub fn remove_operative_type<S: RecordStore>(
    store: &mut S,
    state: &State,
    user: &User,
    request: OperativeTypeRequest,
    now: NaiveDateTime,
) -> Result<ApiResult<MutationResponse>, ApiError> {
    catalog_command(
        store,
        state,
        user,
        Command::RemoveOperativeType { name: request.name },
        now,
    )
}

/// Moves an operative type one position up or down.
///
/// # Errors
///
/// Returns an error without `ManageCatalog`, for an unknown type, for a move
/// past either end, or if the store rejects the reorder.
pub fn move_operative_type<S: RecordStore>(
    store: &mut S,
    state: &State,
    user: &User,
    request: MoveOperativeTypeRequest,
    now: NaiveDateTime,
) -> Result<ApiResult<MutationResponse>, ApiError> {
    let direction: MoveDirection = request.direction;
    catalog_command(
        store,
        state,
        user,
        Command::MoveOperativeType {
            name: request.name,
            direction,
        },
        now,
    )
}

/// Adds a colony catalog entry.
///
/// # Errors
///
/// Returns an error without `ManageCatalog`, for a blank part or duplicate
/// entry, or if the store rejects the insert.
pub fn add_catalog_entry<S: RecordStore>(
    store: &mut S,
    state: &State,
    user: &User,
    request: CatalogEntryRequest,
    now: NaiveDateTime,
) -> Result<ApiResult<MutationResponse>, ApiError> {
    catalog_command(
        store,
        state,
        user,
        Command::AddCatalogEntry {
            entry: CatalogEntry::from(request),
        },
        now,
    )
}

/// Removes a colony catalog entry by its exact triple.
///
/// # Errors
///
/// Returns an error without `ManageCatalog`, for an unknown entry, or if the
/// store rejects the delete.
pub fn remove_catalog_entry<S: RecordStore>(
    store: &mut S,
    state: &State,
    user: &User,
    request: CatalogEntryRequest,
    now: NaiveDateTime,
) -> Result<ApiResult<MutationResponse>, ApiError> {
    catalog_command(
        store,
        state,
        user,
        Command::RemoveCatalogEntry {
            entry: CatalogEntry::from(request),
        },
        now,
    )
}

/// Exports the operatives visible to `user` as CSV.
///
/// # Errors
///
/// Returns an error without `ExportOperatives`, for an inverted date range,
/// or if the CSV cannot be written.
pub fn export_operatives(
    state: &State,
    user: &User,
    query: ExportQuery,
) -> Result<String, ApiError> {
    AuthorizationService::require(user, Permission::ExportOperatives, "export_operatives")?;
    if let Some((start, end)) = query
        .start
        .zip(query.end)
        .filter(|(start, end)| start > end)
    {
        return Err(ApiError::InvalidInput {
            field: String::from("end"),
            message: format!("End date {end} is before start date {start}"),
        });
    }

    let visible: Vec<&Operative> = visible_operatives(&state.operatives, user);
    let csv: String = render_csv(
        &visible,
        DateRange {
            start: query.start,
            end: query.end,
        },
    )?;
    info!(user_id = %user.id, "Exported operatives");
    Ok(csv)
}

/// Computes the statistics over the operatives visible to `user`.
///
/// # Errors
///
/// Returns an error without `ViewStatistics`, for an unknown shift, or for a
/// month outside 1 through 12.
pub fn get_statistics(
    state: &State,
    user: &User,
    query: &StatisticsQuery,
) -> Result<OperativeStatistics, ApiError> {
    AuthorizationService::require(user, Permission::ViewStatistics, "view_statistics")?;
    let filter: StatisticsFilter = parse_statistics_filter(query)?;
    let visible: Vec<&Operative> = visible_operatives(&state.operatives, user);
    Ok(compute_statistics(&visible, &state.colony_catalog, &filter))
}

fn filter_value(value: Option<&str>) -> Option<String> {
    value
        .map(normalize_trimmed)
        .filter(|value| !value.is_empty() && !ALL_FILTER_VALUES.contains(&value.as_str()))
}

fn parse_statistics_filter(query: &StatisticsQuery) -> Result<StatisticsFilter, ApiError> {
    let shift: Option<Shift> = filter_value(query.shift.as_deref())
        .map(|shift| {
            shift.parse::<Shift>().map_err(|_| ApiError::InvalidInput {
                field: String::from("shift"),
                message: format!("Unknown shift '{shift}'"),
            })
        })
        .transpose()?;

    if let Some(month) = query.month.filter(|month| !(1..=12).contains(month)) {
        return Err(ApiError::InvalidInput {
            field: String::from("month"),
            message: format!("Month must be between 1 and 12, got {month}"),
        });
    }

    Ok(StatisticsFilter {
        region: filter_value(query.region.as_deref()),
        shift,
        month: query.month,
    })
}

/// Reads the audit trail, optionally narrowed to one subject.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` without `ManageUsers`, or
/// `ApiError::StoreFailure` if the trail cannot be read.
pub fn list_audit_trail(
    persistence: &mut Persistence,
    user: &User,
    query: &AuditQuery,
) -> Result<AuditTrailResponse, ApiError> {
    AuthorizationService::require(user, Permission::ManageUsers, "view_audit_trail")?;
    let subject: Option<&str> = query
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|subject| !subject.is_empty());

    let events: Vec<AuditEventData> = persistence
        .list_audit_events(subject)
        .map_err(|e| translate_persistence_error(&e))?;
    Ok(AuditTrailResponse {
        events: events.into_iter().map(AuditEntry::from).collect(),
    })
}
