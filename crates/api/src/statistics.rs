// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregates behind the statistics view.

use chrono::{Datelike, NaiveDate};
use operativos_domain::{CatalogEntry, Operative, REGIONS, Shift, is_main_region, normalize_trimmed};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How many type buckets are reported.
pub const TOP_TYPES: usize = 4;

/// How many colonies are reported.
pub const TOP_COLONIES: usize = 3;

const FALLBACK_TYPE_LABEL: &str = "OTROS";

/// Which operatives the statistics cover. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsFilter {
    pub region: Option<String>,
    pub shift: Option<Shift>,
    /// Month of the start date, 1 through 12.
    pub month: Option<u32>,
}

impl StatisticsFilter {
    /// Returns true if `operative` passes every filter.
    ///
    /// An operative whose start date does not parse never matches a
    /// specific month.
    #[must_use]
    pub fn matches(&self, operative: &Operative) -> bool {
        let region_ok: bool = self
            .region
            .as_deref()
            .is_none_or(|region| normalize_trimmed(region) == normalize_trimmed(&operative.region));
        let shift_ok: bool = self.shift.is_none_or(|shift| shift == operative.shift);
        let month_ok: bool = self.month.is_none_or(|month| {
            NaiveDate::parse_from_str(operative.start_date.trim(), "%Y-%m-%d")
                .is_ok_and(|date| date.month() == month)
        });
        region_ok && shift_ok && month_ok
    }
}

/// A label with its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// The aggregates over the filtered operatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperativeStatistics {
    /// Number of operatives after filtering.
    pub total: usize,
    /// Distinct regions with at least one operative.
    pub active_regions: usize,
    /// Number of known regions.
    pub known_regions: usize,
    /// Count per main region, zero-filled, in region order.
    pub by_region: Vec<LabelCount>,
    /// Count per type, keyed on the last word of the type.
    pub by_type: Vec<LabelCount>,
    /// Colonies with the most operatives.
    pub top_colonies: Vec<LabelCount>,
    /// Catalog colonies with no operative.
    pub uncovered_colonies: usize,
}

/// Computes the statistics for the operatives visible to the caller.
///
/// # Arguments
///
/// * `operatives` - The operatives the caller may see
/// * `catalog` - The colony catalog, for the coverage gap
/// * `filter` - Region, shift and month filters
#[must_use]
pub fn compute_statistics(
    operatives: &[&Operative],
    catalog: &[CatalogEntry],
    filter: &StatisticsFilter,
) -> OperativeStatistics {
    let filtered: Vec<&Operative> = operatives
        .iter()
        .copied()
        .filter(|operative| filter.matches(operative))
        .collect();

    let active_regions: usize = filtered
        .iter()
        .map(|operative| normalize_trimmed(&operative.region))
        .collect::<BTreeSet<String>>()
        .len();

    let mut region_counts: Vec<LabelCount> = REGIONS
        .iter()
        .filter(|region| is_main_region(region))
        .map(|region| LabelCount {
            label: (*region).to_string(),
            count: 0,
        })
        .collect();
    for operative in &filtered {
        let region: String = normalize_trimmed(&operative.region);
        if let Some(entry) = region_counts.iter_mut().find(|entry| entry.label == region) {
            entry.count += 1;
        }
    }

    let by_type: Vec<LabelCount> = ranked(
        filtered.iter().map(|operative| type_label(&operative.operative_type)),
        TOP_TYPES,
    );

    let top_colonies: Vec<LabelCount> = ranked(
        filtered
            .iter()
            .map(|operative| normalize_trimmed(&operative.location.colony)),
        TOP_COLONIES,
    );

    let covered: BTreeSet<String> = filtered
        .iter()
        .map(|operative| normalize_trimmed(&operative.location.colony))
        .collect();
    let uncovered_colonies: usize = catalog
        .iter()
        .map(|entry| normalize_trimmed(&entry.colony))
        .collect::<BTreeSet<String>>()
        .difference(&covered)
        .count();

    OperativeStatistics {
        total: filtered.len(),
        active_regions,
        known_regions: REGIONS.len(),
        by_region: region_counts,
        by_type,
        top_colonies,
        uncovered_colonies,
    }
}

/// Returns the bucket label for an operative type: its last word.
#[must_use]
pub fn type_label(operative_type: &str) -> String {
    normalize_trimmed(operative_type)
        .split_whitespace()
        .last()
        .map_or_else(|| FALLBACK_TYPE_LABEL.to_string(), str::to_string)
}

/// Counts labels and returns the `limit` largest, ties broken by label.
fn ranked(labels: impl Iterator<Item = String>, limit: usize) -> Vec<LabelCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut ranked: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    ranked.truncate(limit);
    ranked
}
