// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Write requests that map one-to-one onto a core command reuse the core
//! types (`OperativeDraft`, `OperativePatch`, `ClosureReport`). The types here
//! cover everything that needs parsing, redaction or flattening at the
//! boundary.

use chrono::NaiveDate;
use operativos::{MoveDirection, UserDraft};
use operativos_domain::{
    CatalogEntry, ConclusionData, ConclusionResult, Institution, Location, Operative,
    OperativeStatus, OperativeView, RegionStatus, ReunionDetails, Role, Shift, Tallies, Unit, User,
    UserPatch,
};
use operativos_audit::AuditEvent;
use operativos_persistence::AuditEventData;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Placeholder shown in place of meeting details the viewer may not see.
pub const RESTRICTED_PLACEHOLDER: &str = "RESTRINGIDO";

/// Represents whether a specific action is permitted.
///
/// Serializes to JSON as true/false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value: bool = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(value))
    }
}

/// What the signed-in user may do, recomputed on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCapabilities {
    pub can_view_dashboard: Capability,
    pub can_view_statistics: Capability,
    pub can_create_operative: Capability,
    pub can_manage_users: Capability,
    pub can_manage_catalog: Capability,
    pub can_export: Capability,
    pub can_update_password: Capability,
    pub can_view_restricted_conclusion: Capability,
    pub can_choose_region: Capability,
}

/// What the signed-in user may do with one operative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperativeCapabilities {
    pub can_edit: Capability,
    pub can_conclude: Capability,
    pub can_delete: Capability,
}

/// Login credentials.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// A user as shown to clients. The password is never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_region: Option<String>,
    pub is_agrupamiento: bool,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            username: user.username.clone(),
            role: user.role,
            assigned_region: user.assigned_region.clone(),
            is_agrupamiento: user.is_agrupamiento,
        }
    }
}

/// Response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    pub session_token: String,
    /// ISO 8601 expiry of the session.
    pub expires_at: String,
    pub user: UserInfo,
    pub capabilities: SessionCapabilities,
}

/// Response describing the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhoAmIResponse {
    pub user: UserInfo,
    pub capabilities: SessionCapabilities,
}

/// The list view requested by a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListView {
    /// Operatives started in the current shift.
    #[default]
    Dashboard,
    /// Every visible operative.
    History,
}

impl From<ListView> for OperativeView {
    fn from(view: ListView) -> Self {
        match view {
            ListView::Dashboard => Self::Dashboard,
            ListView::History => Self::History,
        }
    }
}

/// Query parameters for listing operatives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListOperativesQuery {
    #[serde(default)]
    pub view: ListView,
    /// Free-text filter over id, region, type and colony.
    #[serde(default)]
    pub search: Option<String>,
}

/// One row of an operative list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperativeSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub operative_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_type: Option<String>,
    pub status: OperativeStatus,
    pub start_date: String,
    pub start_time: String,
    pub region: String,
    pub quadrant: String,
    pub shift: Shift,
    pub colony: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_by: String,
    pub capabilities: OperativeCapabilities,
}

impl OperativeSummary {
    /// Builds a list row for `operative`.
    #[must_use]
    pub fn new(operative: &Operative, capabilities: OperativeCapabilities) -> Self {
        Self {
            id: operative.id.clone(),
            operative_type: operative.operative_type.clone(),
            specific_type: operative.specific_type.clone(),
            status: operative.status(),
            start_date: operative.start_date.clone(),
            start_time: operative.start_time.clone(),
            region: operative.region.clone(),
            quadrant: operative.quadrant.clone(),
            shift: operative.shift,
            colony: operative.location.colony.clone(),
            latitude: operative.location.latitude,
            longitude: operative.location.longitude,
            created_by: operative.created_by.clone(),
            capabilities,
        }
    }
}

/// Dashboard summary for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionStatusView {
    pub region: String,
    pub active_count: usize,
    pub active_types: Vec<String>,
}

impl From<RegionStatus> for RegionStatusView {
    fn from(status: RegionStatus) -> Self {
        Self {
            region: status.region,
            active_count: status.active_count,
            active_types: status.active_types,
        }
    }
}

/// Response for listing operatives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListOperativesResponse {
    pub view: ListView,
    pub operatives: Vec<OperativeSummary>,
    /// Per-region summary. Empty outside the dashboard view.
    pub region_status: Vec<RegionStatusView>,
}

/// Meeting details as shown to one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReunionDetailsView {
    pub representative_name: String,
    pub phone: String,
    /// Absent when the details are restricted.
    pub participant_count: Option<u32>,
    pub petitions: String,
    /// True when the details were replaced by the placeholder.
    pub restricted: bool,
}

impl ReunionDetailsView {
    /// Shows the details, or the placeholder when `visible` is false.
    #[must_use]
    pub fn new(details: &ReunionDetails, visible: bool) -> Self {
        if visible {
            return Self {
                representative_name: details.representative_name.clone(),
                phone: details.phone.clone(),
                participant_count: Some(details.participant_count),
                petitions: details.petitions.clone(),
                restricted: false,
            };
        }
        Self {
            representative_name: RESTRICTED_PLACEHOLDER.to_string(),
            phone: RESTRICTED_PLACEHOLDER.to_string(),
            participant_count: None,
            petitions: RESTRICTED_PLACEHOLDER.to_string(),
            restricted: true,
        }
    }
}

/// A conclusion as shown to one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConclusionView {
    pub location: String,
    pub colonies_covered: Vec<String>,
    pub tallies: Tallies,
    pub result: ConclusionResult,
    /// Local closure time, `YYYY-MM-DD HH:MM`.
    pub concluded_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detainees_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detention_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscalia_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reunion_details: Option<ReunionDetailsView>,
}

impl ConclusionView {
    /// Builds the view, redacting meeting details unless `show_restricted`.
    #[must_use]
    pub fn new(conclusion: &ConclusionData, show_restricted: bool) -> Self {
        Self {
            location: conclusion.location.clone(),
            colonies_covered: conclusion.colonies_covered.clone(),
            tallies: conclusion.tallies,
            result: conclusion.result,
            concluded_at: conclusion.concluded_at.format("%Y-%m-%d %H:%M").to_string(),
            detainees_count: conclusion.detainees_count,
            detention_reason: conclusion.detention_reason.clone(),
            crime_type: conclusion.crime_type.clone(),
            fiscalia_target: conclusion.fiscalia_target.clone(),
            reunion_details: conclusion
                .reunion_details
                .as_ref()
                .map(|details| ReunionDetailsView::new(details, show_restricted)),
        }
    }
}

/// Full detail of one operative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperativeDetailResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub operative_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_type: Option<String>,
    pub status: OperativeStatus,
    pub start_date: String,
    pub start_time: String,
    pub region: String,
    pub quadrant: String,
    pub shift: Shift,
    pub location: Location,
    pub units: Vec<Unit>,
    pub institutions: Vec<Institution>,
    pub created_by: String,
    pub conclusion: Option<ConclusionView>,
    pub capabilities: OperativeCapabilities,
}

impl OperativeDetailResponse {
    /// Builds the detail view of `operative` for one viewer.
    #[must_use]
    pub fn new(
        operative: &Operative,
        show_restricted: bool,
        capabilities: OperativeCapabilities,
    ) -> Self {
        Self {
            id: operative.id.clone(),
            operative_type: operative.operative_type.clone(),
            specific_type: operative.specific_type.clone(),
            status: operative.status(),
            start_date: operative.start_date.clone(),
            start_time: operative.start_time.clone(),
            region: operative.region.clone(),
            quadrant: operative.quadrant.clone(),
            shift: operative.shift,
            location: operative.location.clone(),
            units: operative.units.clone(),
            institutions: operative.institutions.clone(),
            created_by: operative.created_by.clone(),
            conclusion: operative
                .conclusion()
                .map(|conclusion| ConclusionView::new(conclusion, show_restricted)),
            capabilities,
        }
    }
}

/// Request to create a user. The role is parsed at the boundary so legacy
/// aliases are accepted and an unknown role names the field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    pub full_name: String,
    pub username: String,
    pub password: String,
    pub role: String,
    #[serde(default)]
    pub assigned_region: Option<String>,
    #[serde(default)]
    pub is_agrupamiento: bool,
}

impl CreateUserRequest {
    /// Converts the request into a core draft.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if the role is not recognized.
    pub fn into_draft(self) -> Result<UserDraft, ApiError> {
        Ok(UserDraft {
            role: parse_role(&self.role)?,
            full_name: self.full_name,
            username: self.username,
            password: self.password,
            assigned_region: self.assigned_region,
            is_agrupamiento: self.is_agrupamiento,
        })
    }
}

/// Request to change a user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditUserRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub assigned_region: Option<Option<String>>,
    #[serde(default)]
    pub is_agrupamiento: Option<bool>,
}

impl EditUserRequest {
    /// Converts the request into a domain patch.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if the role is not recognized.
    pub fn into_patch(self) -> Result<UserPatch, ApiError> {
        let role: Option<Role> = self.role.as_deref().map(parse_role).transpose()?;
        Ok(UserPatch {
            full_name: self.full_name,
            username: self.username,
            password: self.password,
            role,
            assigned_region: self.assigned_region,
            is_agrupamiento: self.is_agrupamiento,
        })
    }
}

fn parse_role(value: &str) -> Result<Role, ApiError> {
    value.parse().map_err(|_| ApiError::InvalidInput {
        field: String::from("role"),
        message: format!("Unknown role '{value}'"),
    })
}

/// Response listing users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserInfo>,
}

/// Request to change the acting user's own password.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdatePasswordRequest {
    pub new_password: String,
    pub confirmation: String,
}

/// Request naming an operative type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OperativeTypeRequest {
    pub name: String,
}

/// Request to move an operative type one position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MoveOperativeTypeRequest {
    pub name: String,
    pub direction: MoveDirection,
}

/// Request naming a colony catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntryRequest {
    pub region: String,
    pub quadrant: String,
    pub colony: String,
}

impl From<CatalogEntryRequest> for CatalogEntry {
    fn from(request: CatalogEntryRequest) -> Self {
        Self::new(&request.region, &request.quadrant, &request.colony)
    }
}

/// Query parameters for reading the catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub quadrant: Option<String>,
}

/// The catalogs, optionally narrowed to one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogResponse {
    pub regions: Vec<String>,
    pub operative_types: Vec<String>,
    pub entries: Vec<CatalogEntry>,
    /// Colony choices for the queried region and quadrant. Empty unless both
    /// were given.
    pub colonies: Vec<String>,
}

/// Query parameters for the CSV export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// Query parameters for the statistics view. `TODOS` or an empty value means
/// no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatisticsQuery {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub shift: Option<String>,
    #[serde(default)]
    pub month: Option<u32>,
}

/// Generic response for a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationResponse {
    /// Identifier of the affected record, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub message: String,
}

/// Query parameters for reading the audit trail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuditQuery {
    /// Restricts the trail to one subject (operative id, user id, type name
    /// or catalog entry).
    #[serde(default)]
    pub subject: Option<String>,
}

/// One recorded audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub event_id: i64,
    pub created_at: String,
    #[serde(flatten)]
    pub event: AuditEvent,
}

impl From<AuditEventData> for AuditEntry {
    fn from(data: AuditEventData) -> Self {
        Self {
            event_id: data.event_id,
            created_at: data.created_at,
            event: data.event,
        }
    }
}

/// Response listing audit events, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditTrailResponse {
    pub events: Vec<AuditEntry>,
}
