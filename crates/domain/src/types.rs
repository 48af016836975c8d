// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::normalize::{normalize_text, normalize_trimmed};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The fixed set of roles a user may hold.
///
/// Roles are stored by their uppercase code. Legacy English aliases are
/// accepted on input so every caller resolves to the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// System administrator.
    #[serde(rename = "ADMIN")]
    Admin,
    /// Municipal director. Read-mostly, municipality-wide.
    #[serde(rename = "DIRECTOR")]
    Director,
    /// Regional commander, scoped to an assigned region.
    #[serde(rename = "REGIONAL")]
    Regional,
    /// Shift leader, scoped to an assigned region.
    #[serde(rename = "JEFE_DE_TURNO", alias = "SHIFT_LEADER")]
    ShiftLeader,
    /// Quadrant leader. Sees only the operatives they created.
    #[serde(rename = "JEFE_DE_CUADRANTE", alias = "QUADRANT_LEADER")]
    QuadrantLeader,
    /// Patrol officer. Sees only the operatives they created.
    #[serde(rename = "PATRULLERO", alias = "PATROLMAN")]
    Patrolman,
    /// Grouping chief, scoped to an assigned region.
    #[serde(rename = "JEFE_AGRUPAMIENTO")]
    GroupingChief,
    /// Analyst. Read-only access to every record plus catalog upkeep.
    #[serde(rename = "ANALISTA")]
    Analyst,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Self; 8] = [
        Self::Admin,
        Self::Director,
        Self::Regional,
        Self::ShiftLeader,
        Self::QuadrantLeader,
        Self::Patrolman,
        Self::GroupingChief,
        Self::Analyst,
    ];

    /// Returns the stored code for this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Director => "DIRECTOR",
            Self::Regional => "REGIONAL",
            Self::ShiftLeader => "JEFE_DE_TURNO",
            Self::QuadrantLeader => "JEFE_DE_CUADRANTE",
            Self::Patrolman => "PATRULLERO",
            Self::GroupingChief => "JEFE_AGRUPAMIENTO",
            Self::Analyst => "ANALISTA",
        }
    }

    /// Roles that never carry an assigned region.
    #[must_use]
    pub const fn is_regionless(&self) -> bool {
        matches!(self, Self::Admin | Self::Director | Self::Analyst)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_text(s.trim()).as_str() {
            "ADMIN" => Ok(Self::Admin),
            "DIRECTOR" => Ok(Self::Director),
            "REGIONAL" => Ok(Self::Regional),
            "JEFE_DE_TURNO" | "SHIFT_LEADER" => Ok(Self::ShiftLeader),
            "JEFE_DE_CUADRANTE" | "QUADRANT_LEADER" => Ok(Self::QuadrantLeader),
            "PATRULLERO" | "PATROLMAN" => Ok(Self::Patrolman),
            "JEFE_AGRUPAMIENTO" => Ok(Self::GroupingChief),
            "ANALISTA" => Ok(Self::Analyst),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A system user.
///
/// The password is stored and compared in plaintext. Credential checks go
/// through the api crate's `CredentialVerifier` so a hashing scheme can be
/// substituted without touching policy or lifecycle code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque identifier.
    pub id: String,
    /// Full name (normalized).
    pub full_name: String,
    /// Login name, compared case-sensitively.
    pub username: String,
    /// Plaintext credential.
    pub password: String,
    /// The user's role.
    pub role: Role,
    /// Region the user is scoped to, for region-scoped roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_region: Option<String>,
    /// Municipality-wide override of the region restriction.
    #[serde(default)]
    pub is_agrupamiento: bool,
}

/// Lifecycle status of an operative. `Active -> Concluded` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperativeStatus {
    /// Initial state, set at creation.
    #[serde(rename = "ACTIVO")]
    Active,
    /// Terminal state. A conclusion is attached.
    #[serde(rename = "CONCLUIDO")]
    Concluded,
}

impl OperativeStatus {
    /// Returns the stored code for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVO",
            Self::Concluded => "CONCLUIDO",
        }
    }
}

impl FromStr for OperativeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVO" => Ok(Self::Active),
            "CONCLUIDO" => Ok(Self::Concluded),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for OperativeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The duty shift an operative is logged under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    #[serde(rename = "PRIMERO", alias = "Primero")]
    First,
    #[serde(rename = "SEGUNDO", alias = "Segundo")]
    Second,
    #[serde(rename = "DIARIO", alias = "Diario")]
    Daily,
}

impl Shift {
    /// Returns the stored code for this shift.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "PRIMERO",
            Self::Second => "SEGUNDO",
            Self::Daily => "DIARIO",
        }
    }
}

impl FromStr for Shift {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_text(s.trim()).as_str() {
            "PRIMERO" => Ok(Self::First),
            "SEGUNDO" => Ok(Self::Second),
            "DIARIO" => Ok(Self::Daily),
            _ => Err(DomainError::InvalidShift(s.to_string())),
        }
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where an operative takes place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub colony: String,
    pub street: String,
    pub corner: String,
}

impl Location {
    /// Returns a copy with every text field normalized.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            latitude: self.latitude,
            longitude: self.longitude,
            colony: normalize_text(&self.colony),
            street: normalize_text(&self.street),
            corner: normalize_text(&self.corner),
        }
    }

    /// Renders the address as `street, corner, colony`.
    #[must_use]
    pub fn address_line(&self) -> String {
        format!("{}, {}, {}", self.street, self.corner, self.colony)
    }
}

/// A deployed unit (vehicle or crew) taking part in an operative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    #[serde(rename = "type")]
    pub unit_type: String,
    pub unit_number: String,
    pub in_charge: String,
    pub rank: String,
    pub personnel_count: u32,
}

impl Unit {
    /// Returns a copy with every text field (except the id) normalized.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            id: self.id.clone(),
            unit_type: normalize_text(&self.unit_type),
            unit_number: normalize_text(&self.unit_number),
            in_charge: normalize_text(&self.in_charge),
            rank: normalize_text(&self.rank),
            personnel_count: self.personnel_count,
        }
    }
}

/// A supporting institution taking part in an operative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: String,
    pub name: String,
    pub personnel_count: u32,
    pub unit_count: u32,
}

impl Institution {
    /// Returns a copy with the name normalized.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: normalize_text(&self.name),
            personnel_count: self.personnel_count,
            unit_count: self.unit_count,
        }
    }
}

/// Outcome recorded when an operative is concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConclusionResult {
    /// Deterrence only; nobody detained.
    #[serde(rename = "DISUACION")]
    Deterrence,
    /// Detainees handed to the civic judge.
    #[serde(rename = "DETENIDOS AL JUEZ CIVICO")]
    DetainedToCivicJudge,
    /// Detainees referred to the prosecutor's office.
    #[serde(rename = "PUESTA A LA FISCALIA")]
    ReferredToProsecutor,
}

impl ConclusionResult {
    /// Returns the stored code for this result.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deterrence => "DISUACION",
            Self::DetainedToCivicJudge => "DETENIDOS AL JUEZ CIVICO",
            Self::ReferredToProsecutor => "PUESTA A LA FISCALIA",
        }
    }
}

impl FromStr for ConclusionResult {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_text(s.trim()).as_str() {
            "DISUACION" => Ok(Self::Deterrence),
            "DETENIDOS AL JUEZ CIVICO" => Ok(Self::DetainedToCivicJudge),
            "PUESTA A LA FISCALIA" => Ok(Self::ReferredToProsecutor),
            _ => Err(DomainError::InvalidConclusionResult(s.to_string())),
        }
    }
}

impl std::fmt::Display for ConclusionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closure details specific to a neighborhood meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReunionDetails {
    pub representative_name: String,
    pub phone: String,
    pub participant_count: u32,
    pub petitions: String,
}

/// Checkpoint tallies recorded at closure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tallies {
    pub people_checked: u32,
    pub public_transport_checked: u32,
    pub private_vehicles_checked: u32,
    pub motorcycles_checked: u32,
}

impl Tallies {
    /// All four tallies at zero.
    pub const ZERO: Self = Self {
        people_checked: 0,
        public_transport_checked: 0,
        private_vehicles_checked: 0,
        motorcycles_checked: 0,
    };
}

/// The closure report attached to a concluded operative.
///
/// Build it with [`crate::build_conclusion`], which enforces the branch rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConclusionData {
    pub location: String,
    pub colonies_covered: Vec<String>,
    #[serde(flatten)]
    pub tallies: Tallies,
    pub result: ConclusionResult,
    pub concluded_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detainees_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detention_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscalia_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reunion_details: Option<ReunionDetails>,
}

/// The flat, unchecked shape of an operative as it is stored and transmitted.
///
/// Converting into an [`Operative`] checks that a conclusion is present if and
/// only if the status is `Concluded`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperativeRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub operative_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_type: Option<String>,
    pub start_date: String,
    pub start_time: String,
    pub status: OperativeStatus,
    pub region: String,
    pub quadrant: String,
    pub shift: Shift,
    pub location: Location,
    pub units: Vec<Unit>,
    #[serde(default)]
    pub institutions: Vec<Institution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<ConclusionData>,
    pub created_by: String,
}

/// A logged field operation.
///
/// `status` and `conclusion` are private: the only way to reach `Concluded`
/// is [`Operative::conclude`], which attaches the conclusion in the same step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "OperativeRecord")]
pub struct Operative {
    pub id: String,
    #[serde(rename = "type")]
    pub operative_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_type: Option<String>,
    pub start_date: String,
    pub start_time: String,
    status: OperativeStatus,
    pub region: String,
    pub quadrant: String,
    pub shift: Shift,
    pub location: Location,
    pub units: Vec<Unit>,
    pub institutions: Vec<Institution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conclusion: Option<ConclusionData>,
    pub created_by: String,
}

impl TryFrom<OperativeRecord> for Operative {
    type Error = DomainError;

    fn try_from(record: OperativeRecord) -> Result<Self, Self::Error> {
        let consistent: bool = match record.status {
            OperativeStatus::Active => record.conclusion.is_none(),
            OperativeStatus::Concluded => record.conclusion.is_some(),
        };
        if !consistent {
            return Err(DomainError::InconsistentConclusion {
                operative_id: record.id,
            });
        }

        Ok(Self {
            id: record.id,
            operative_type: record.operative_type,
            specific_type: record.specific_type,
            start_date: record.start_date,
            start_time: record.start_time,
            status: record.status,
            region: record.region,
            quadrant: record.quadrant,
            shift: record.shift,
            location: record.location,
            units: record.units,
            institutions: record.institutions,
            conclusion: record.conclusion,
            created_by: record.created_by,
        })
    }
}

impl From<Operative> for OperativeRecord {
    fn from(operative: Operative) -> Self {
        Self {
            id: operative.id,
            operative_type: operative.operative_type,
            specific_type: operative.specific_type,
            start_date: operative.start_date,
            start_time: operative.start_time,
            status: operative.status,
            region: operative.region,
            quadrant: operative.quadrant,
            shift: operative.shift,
            location: operative.location,
            units: operative.units,
            institutions: operative.institutions,
            conclusion: operative.conclusion,
            created_by: operative.created_by,
        }
    }
}

impl Operative {
    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> OperativeStatus {
        self.status
    }

    /// Returns the conclusion, present only once concluded.
    #[must_use]
    pub const fn conclusion(&self) -> Option<&ConclusionData> {
        self.conclusion.as_ref()
    }

    /// Returns true while the operative is still active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == OperativeStatus::Active
    }

    /// Returns a concluded copy of this operative carrying `conclusion`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OperativeNotActive` if the operative is already
    /// concluded. The existing conclusion is never replaced.
    pub fn conclude(&self, conclusion: ConclusionData) -> Result<Self, DomainError> {
        if !self.is_active() {
            return Err(DomainError::OperativeNotActive {
                operative_id: self.id.clone(),
            });
        }

        let mut concluded: Self = self.clone();
        concluded.status = OperativeStatus::Concluded;
        concluded.conclusion = Some(conclusion);
        Ok(concluded)
    }

    /// Merges `patch` into a copy of this operative.
    ///
    /// Status, conclusion, id and owner are not part of a patch and are
    /// carried over unchanged.
    #[must_use]
    pub fn patched(&self, patch: &OperativePatch) -> Self {
        let mut merged: Self = self.clone();
        if let Some(operative_type) = &patch.operative_type {
            merged.operative_type = normalize_text(operative_type);
        }
        if let Some(specific_type) = &patch.specific_type {
            merged.specific_type = specific_type.as_deref().map(normalize_text);
        }
        if let Some(region) = &patch.region {
            merged.region = normalize_text(region);
        }
        if let Some(quadrant) = &patch.quadrant {
            merged.quadrant = normalize_text(quadrant);
        }
        if let Some(shift) = patch.shift {
            merged.shift = shift;
        }
        if let Some(location) = &patch.location {
            merged.location = location.normalized();
        }
        if let Some(units) = &patch.units {
            merged.units = units.iter().map(Unit::normalized).collect();
        }
        if let Some(institutions) = &patch.institutions {
            merged.institutions = institutions.iter().map(Institution::normalized).collect();
        }
        merged
    }
}

/// A shallow, partial update to an operative's descriptive fields.
///
/// Unknown fields (including `status` and `conclusion`) are rejected when
/// deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OperativePatch {
    #[serde(default, rename = "type")]
    pub operative_type: Option<String>,
    #[serde(default)]
    pub specific_type: Option<Option<String>>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub quadrant: Option<String>,
    #[serde(default)]
    pub shift: Option<Shift>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub units: Option<Vec<Unit>>,
    #[serde(default)]
    pub institutions: Option<Vec<Institution>>,
}

impl OperativePatch {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.operative_type.is_none()
            && self.specific_type.is_none()
            && self.region.is_none()
            && self.quadrant.is_none()
            && self.shift.is_none()
            && self.location.is_none()
            && self.units.is_none()
            && self.institutions.is_none()
    }
}

/// A shallow, partial update to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub assigned_region: Option<Option<String>>,
    #[serde(default)]
    pub is_agrupamiento: Option<bool>,
}

impl User {
    /// Merges `patch` into a copy of this user.
    ///
    /// Regionless roles drop any assigned region.
    #[must_use]
    pub fn patched(&self, patch: &UserPatch) -> Self {
        let mut merged: Self = self.clone();
        if let Some(full_name) = &patch.full_name {
            merged.full_name = normalize_text(full_name);
        }
        if let Some(username) = &patch.username {
            merged.username.clone_from(username);
        }
        if let Some(password) = &patch.password {
            merged.password.clone_from(password);
        }
        if let Some(role) = patch.role {
            merged.role = role;
        }
        if let Some(assigned_region) = &patch.assigned_region {
            merged.assigned_region = assigned_region.clone();
        }
        if let Some(is_agrupamiento) = patch.is_agrupamiento {
            merged.is_agrupamiento = is_agrupamiento;
        }
        if merged.role.is_regionless() {
            merged.assigned_region = None;
        }
        merged
    }
}

/// One (region, quadrant, colony) entry of the colony catalog.
///
/// Entries have no identity beyond the triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub region: String,
    pub quadrant: String,
    pub colony: String,
}

impl CatalogEntry {
    /// Creates a catalog entry with every part trimmed and normalized.
    #[must_use]
    pub fn new(region: &str, quadrant: &str, colony: &str) -> Self {
        Self {
            region: normalize_trimmed(region),
            quadrant: normalize_trimmed(quadrant),
            colony: normalize_trimmed(colony),
        }
    }
}

impl std::fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} / {}", self.region, self.quadrant, self.colony)
    }
}
