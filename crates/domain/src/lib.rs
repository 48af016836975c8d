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

mod catalog;
mod conclusion;
mod error;
mod identifier;
mod normalize;
mod policy;
mod shift_window;
mod types;
mod validation;
mod visibility;

#[cfg(test)]
mod tests;

pub use catalog::{
    DEFAULT_OPERATIVE_TYPES, MAIN_REGION_PREFIX, OTHER_OPERATIVE_TYPE, REGIONS, colonies_for,
    default_colony_catalog, default_operative_types, is_main_region,
};
pub use conclusion::{
    ClosureReport, NEIGHBORHOOD_MEETING_MARKERS, build_conclusion, is_neighborhood_meeting,
};
pub use identifier::{OPERATIVE_ID_PREFIX, daily_prefix, generate_operative_id, next_daily_sequence};
pub use normalize::{normalize_text, normalize_trimmed};
pub use policy::{Permission, ROLE_POLICIES, RolePolicy, VisibilityScope};
pub use shift_window::{
    SHIFT_BOUNDARY_HOUR, ShiftWindow, in_current_shift, local_now, parse_record_timestamp,
};

// Re-export public types
pub use error::DomainError;
pub use types::{
    CatalogEntry, ConclusionData, ConclusionResult, Institution, Location, Operative,
    OperativePatch, OperativeRecord, OperativeStatus, ReunionDetails, Role, Shift, Tallies, Unit,
    User, UserPatch,
};
pub use validation::{
    validate_catalog_entry, validate_operative_fields, validate_operative_type_name, validate_units,
    validate_user_fields, validate_username_unique,
};
pub use visibility::{
    OperativeView, RegionStatus, is_visible_to, matches_search, operatives_for_view,
    region_status_summary, search_operatives, visible_operatives,
};
