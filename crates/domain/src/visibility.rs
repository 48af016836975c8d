// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Which operatives a user sees, and in which view.
//!
//! All functions here are pure: they take the full collection and the
//! acting user and return borrowed subsets. Nothing is cached, so a change
//! to the user's role takes effect on the next call.

use crate::normalize::normalize_text;
use crate::policy::VisibilityScope;
use crate::shift_window::in_current_shift;
use crate::types::{Operative, OperativeStatus, User};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

/// The two operative list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperativeView {
    /// Operatives started in the current duty shift.
    Dashboard,
    /// Every visible operative regardless of date.
    History,
}

/// Returns true if `user` may see `operative`.
///
/// A region-scoped user with no assigned region sees nothing.
#[must_use]
pub fn is_visible_to(operative: &Operative, user: &User) -> bool {
    match user.visibility_scope() {
        VisibilityScope::Municipality => true,
        VisibilityScope::Region => user
            .assigned_region
            .as_deref()
            .is_some_and(|region| normalize_text(region) == normalize_text(&operative.region)),
        VisibilityScope::Own => operative.created_by == user.id,
    }
}

/// Returns the operatives in `all` that `user` may see, in their original order.
#[must_use]
pub fn visible_operatives<'a>(all: &'a [Operative], user: &User) -> Vec<&'a Operative> {
    all.iter()
        .filter(|operative| is_visible_to(operative, user))
        .collect()
}

/// Returns the operatives `user` sees in `view`.
///
/// The dashboard additionally keeps only operatives started inside the
/// shift containing `now`.
#[must_use]
pub fn operatives_for_view<'a>(
    all: &'a [Operative],
    user: &User,
    view: OperativeView,
    now: NaiveDateTime,
) -> Vec<&'a Operative> {
    let visible: Vec<&'a Operative> = visible_operatives(all, user);
    match view {
        OperativeView::History => visible,
        OperativeView::Dashboard => visible
            .into_iter()
            .filter(|operative| in_current_shift(&operative.start_date, &operative.start_time, now))
            .collect(),
    }
}

/// Returns true if the normalized `query` occurs in the operative's id,
/// region, type or colony. An empty query matches everything.
#[must_use]
pub fn matches_search(operative: &Operative, query: &str) -> bool {
    let needle: String = normalize_text(query.trim());
    if needle.is_empty() {
        return true;
    }

    [
        operative.id.as_str(),
        operative.region.as_str(),
        operative.operative_type.as_str(),
        operative.location.colony.as_str(),
    ]
    .iter()
    .any(|field| normalize_text(field).contains(&needle))
}

/// Filters `operatives` down to those matching `query`.
#[must_use]
pub fn search_operatives<'a>(operatives: Vec<&'a Operative>, query: &str) -> Vec<&'a Operative> {
    operatives
        .into_iter()
        .filter(|operative| matches_search(operative, query))
        .collect()
}

/// Dashboard summary for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionStatus {
    /// The region name.
    pub region: String,
    /// Number of active operatives in the region.
    pub active_count: usize,
    /// Distinct operative types running in the region, sorted.
    pub active_types: Vec<String>,
}

/// Summarizes active operatives per region, ordered by region name.
///
/// Concluded operatives are ignored. Regions with no active operative are
/// not listed.
#[must_use]
pub fn region_status_summary(operatives: &[&Operative]) -> Vec<RegionStatus> {
    let mut by_region: BTreeMap<String, (usize, BTreeSet<String>)> = BTreeMap::new();
    for operative in operatives
        .iter()
        .filter(|operative| operative.status() == OperativeStatus::Active)
    {
        let entry = by_region
            .entry(normalize_text(&operative.region))
            .or_default();
        entry.0 += 1;
        entry.1.insert(normalize_text(&operative.operative_type));
    }

    by_region
        .into_iter()
        .map(|(region, (active_count, types))| RegionStatus {
            region,
            active_count,
            active_types: types.into_iter().collect(),
        })
        .collect()
}
