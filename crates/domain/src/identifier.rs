// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Human-readable operative identifiers of the form `OP{YYYYMMDD}{NNN}`.
//!
//! The sequence starts from how many operatives already carry the day's
//! prefix and advances past any identifier still taken in the snapshot, so
//! gaps left by deletions never block creation. Two creations racing
//! against the same snapshot can still compute the same identifier; the
//! store's primary key rejects the second insert and the caller sees a
//! store failure.

use crate::types::Operative;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Prefix shared by every operative identifier.
pub const OPERATIVE_ID_PREFIX: &str = "OP";

/// Returns the identifier prefix for operatives created on `date`.
#[must_use]
pub fn daily_prefix(date: NaiveDate) -> String {
    format!("{OPERATIVE_ID_PREFIX}{}", date.format("%Y%m%d"))
}

/// Formats an operative identifier.
///
/// # Arguments
///
/// * `date` - The creation date
/// * `sequence` - The 1-based sequence within that date, zero-padded to three digits
#[must_use]
pub fn generate_operative_id(date: NaiveDate, sequence: u32) -> String {
    format!("{}{sequence:03}", daily_prefix(date))
}

/// Returns the next free sequence number for `date` given the operatives
/// known so far.
///
/// The first candidate is the day's count plus one; taken identifiers are
/// skipped.
#[must_use]
pub fn next_daily_sequence(existing: &[Operative], date: NaiveDate) -> u32 {
    let prefix: String = daily_prefix(date);
    let taken: HashSet<&str> = existing
        .iter()
        .map(|operative| operative.id.as_str())
        .filter(|id| id.starts_with(&prefix))
        .collect();
    let first: u32 = u32::try_from(taken.len())
        .unwrap_or(u32::MAX)
        .saturating_add(1);
    (first..=u32::MAX)
        .find(|sequence| !taken.contains(generate_operative_id(date, *sequence).as_str()))
        .unwrap_or(u32::MAX)
}
