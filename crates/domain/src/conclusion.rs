// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Closure rules for operatives.
//!
//! A closure report is validated against the operative it closes and turned
//! into a [`ConclusionData`]. The branch depends on two things:
//!
//! - whether the operative is a neighborhood meeting (by its type)
//! - which result was chosen
//!
//! ## Invariants
//!
//! - Neighborhood meetings close as deterrence, with zero tallies and full
//!   reunion details
//! - `detainees_count` is present only for detention results outside meetings
//! - `detention_reason` is present only for civic-judge detentions
//! - `crime_type` and `fiscalia_target` are present only for prosecutor referrals
//! - Fields supplied for the wrong branch are rejected, never dropped

use crate::error::DomainError;
use crate::normalize::{normalize_text, normalize_trimmed};
use crate::types::{ConclusionData, ConclusionResult, Operative, ReunionDetails, Tallies};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Type markers that identify a neighborhood meeting, matched against the
/// normalized operative type.
pub const NEIGHBORHOOD_MEETING_MARKERS: [&str; 2] = ["REUNION VECINAL", "NEIGHBORHOOD MEETING"];

/// What the closing user reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosureReport {
    /// Free-text location. Defaults to the operative's address when blank.
    #[serde(default)]
    pub location: Option<String>,
    /// Colonies covered. Defaults to the operative's colony when empty.
    #[serde(default)]
    pub colonies_covered: Vec<String>,
    /// Checkpoint tallies. Ignored for neighborhood meetings.
    #[serde(flatten)]
    pub tallies: Tallies,
    /// The outcome.
    pub result: ConclusionResult,
    #[serde(default)]
    pub detainees_count: Option<u32>,
    #[serde(default)]
    pub detention_reason: Option<String>,
    #[serde(default)]
    pub crime_type: Option<String>,
    #[serde(default)]
    pub fiscalia_target: Option<String>,
    #[serde(default)]
    pub reunion_details: Option<ReunionDetails>,
}

impl ClosureReport {
    /// A deterrence report with no optional fields.
    #[must_use]
    pub fn deterrence(tallies: Tallies) -> Self {
        Self {
            location: None,
            colonies_covered: Vec::new(),
            tallies,
            result: ConclusionResult::Deterrence,
            detainees_count: None,
            detention_reason: None,
            crime_type: None,
            fiscalia_target: None,
            reunion_details: None,
        }
    }
}

/// Returns true if `operative_type` names a neighborhood meeting.
#[must_use]
pub fn is_neighborhood_meeting(operative_type: &str) -> bool {
    let normalized: String = normalize_text(operative_type);
    NEIGHBORHOOD_MEETING_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
}

/// Validates `report` against `operative` and builds its conclusion.
///
/// # Arguments
///
/// * `operative` - The operative being closed
/// * `report` - What the closing user submitted
/// * `concluded_at` - Local time of closure
///
/// # Returns
///
/// The conclusion to attach with [`Operative::conclude`].
///
/// # Errors
///
/// Returns an error if:
/// - The operative is not active
/// - A meeting is closed with a result other than deterrence
/// - Reunion details are missing or incomplete for a meeting
/// - A field required by the chosen result is missing
/// - A field that does not apply to the branch is present
pub fn build_conclusion(
    operative: &Operative,
    report: &ClosureReport,
    concluded_at: NaiveDateTime,
) -> Result<ConclusionData, DomainError> {
    if !operative.is_active() {
        return Err(DomainError::OperativeNotActive {
            operative_id: operative.id.clone(),
        });
    }

    let detention_reason: Option<String> = present_text(report.detention_reason.as_deref());
    let crime_type: Option<String> = present_text(report.crime_type.as_deref());
    let fiscalia_target: Option<String> = present_text(report.fiscalia_target.as_deref());

    let meeting: bool = is_neighborhood_meeting(&operative.operative_type);
    let (tallies, reunion_details) = if meeting {
        if report.result != ConclusionResult::Deterrence {
            return Err(DomainError::ResultNotAllowedForMeeting {
                result: report.result,
            });
        }
        let details: &ReunionDetails = report
            .reunion_details
            .as_ref()
            .ok_or(DomainError::MissingReunionDetails)?;
        (Tallies::ZERO, Some(validate_reunion_details(details)?))
    } else {
        if report.reunion_details.is_some() {
            return Err(DomainError::UnexpectedConclusionField {
                field: "reunion_details",
            });
        }
        (report.tallies, None)
    };

    let detainees_count: Option<u32> = match report.result {
        ConclusionResult::Deterrence => {
            reject_if_present("detainees_count", report.detainees_count.is_some())?;
            None
        }
        result => Some(
            report
                .detainees_count
                .ok_or(DomainError::MissingConclusionField {
                    field: "detainees_count",
                    result,
                })?,
        ),
    };

    let detention_reason: Option<String> =
        if report.result == ConclusionResult::DetainedToCivicJudge {
            Some(require(detention_reason, "detention_reason", report.result)?)
        } else {
            reject_if_present("detention_reason", detention_reason.is_some())?;
            None
        };

    let (crime_type, fiscalia_target) = if report.result == ConclusionResult::ReferredToProsecutor
    {
        (
            Some(require(crime_type, "crime_type", report.result)?),
            Some(require(fiscalia_target, "fiscalia_target", report.result)?),
        )
    } else {
        reject_if_present("crime_type", crime_type.is_some())?;
        reject_if_present("fiscalia_target", fiscalia_target.is_some())?;
        (None, None)
    };

    let location: String = present_text(report.location.as_deref())
        .unwrap_or_else(|| operative.location.address_line());

    let mut colonies_covered: Vec<String> = report
        .colonies_covered
        .iter()
        .filter_map(|colony| present_text(Some(colony)))
        .collect();
    if colonies_covered.is_empty() {
        colonies_covered.push(normalize_text(&operative.location.colony));
    }

    Ok(ConclusionData {
        location: normalize_text(&location),
        colonies_covered,
        tallies,
        result: report.result,
        concluded_at,
        detainees_count,
        detention_reason,
        crime_type,
        fiscalia_target,
        reunion_details,
    })
}

/// Returns the normalized text if it is non-blank.
fn present_text(value: Option<&str>) -> Option<String> {
    value
        .map(normalize_trimmed)
        .filter(|text| !text.is_empty())
}

fn require(
    value: Option<String>,
    field: &'static str,
    result: ConclusionResult,
) -> Result<String, DomainError> {
    value.ok_or(DomainError::MissingConclusionField { field, result })
}

const fn reject_if_present(field: &'static str, present: bool) -> Result<(), DomainError> {
    if present {
        return Err(DomainError::UnexpectedConclusionField { field });
    }
    Ok(())
}

fn validate_reunion_details(details: &ReunionDetails) -> Result<ReunionDetails, DomainError> {
    let representative_name: String = present_text(Some(&details.representative_name)).ok_or(
        DomainError::IncompleteReunionDetails {
            field: "representative_name",
        },
    )?;
    let phone: String = present_text(Some(&details.phone))
        .ok_or(DomainError::IncompleteReunionDetails { field: "phone" })?;
    let petitions: String = present_text(Some(&details.petitions))
        .ok_or(DomainError::IncompleteReunionDetails { field: "petitions" })?;
    if details.participant_count == 0 {
        return Err(DomainError::IncompleteReunionDetails {
            field: "participant_count",
        });
    }

    Ok(ReunionDetails {
        representative_name,
        phone,
        participant_count: details.participant_count,
        petitions,
    })
}
