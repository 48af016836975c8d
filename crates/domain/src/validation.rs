// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::catalog::OTHER_OPERATIVE_TYPE;
use crate::error::DomainError;
use crate::normalize::normalize_text;
use crate::policy::VisibilityScope;
use crate::types::{CatalogEntry, Operative, Unit, User};

fn require_text(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingField { field });
    }
    Ok(())
}

/// Validates the descriptive fields of an operative.
///
/// # Errors
///
/// Returns an error if:
/// - Type, region, quadrant, colony or street is blank
/// - The type is the "other" type and no specific type is given
/// - No unit is listed, or a unit has no person in charge
pub fn validate_operative_fields(operative: &Operative) -> Result<(), DomainError> {
    require_text(&operative.operative_type, "type")?;
    if normalize_text(operative.operative_type.trim()) == OTHER_OPERATIVE_TYPE {
        let specific: &str = operative.specific_type.as_deref().unwrap_or_default();
        require_text(specific, "specific_type")?;
    }
    require_text(&operative.region, "region")?;
    require_text(&operative.quadrant, "quadrant")?;
    require_text(&operative.location.colony, "colony")?;
    require_text(&operative.location.street, "street")?;
    validate_units(&operative.units)
}

/// Validates the deployed units of an operative.
///
/// # Errors
///
/// Returns `DomainError::MissingUnits` if the list is empty, or
/// `DomainError::InvalidUnit` for the first incomplete unit.
pub fn validate_units(units: &[Unit]) -> Result<(), DomainError> {
    if units.is_empty() {
        return Err(DomainError::MissingUnits);
    }

    for (index, unit) in units.iter().enumerate() {
        if unit.in_charge.trim().is_empty() {
            return Err(DomainError::InvalidUnit {
                index,
                reason: String::from("person in charge is required"),
            });
        }
    }
    Ok(())
}

/// Validates user fields.
///
/// # Errors
///
/// Returns an error if:
/// - Full name, username or password is blank
/// - A region-scoped role without the agrupamiento flag has no assigned region
pub fn validate_user_fields(user: &User) -> Result<(), DomainError> {
    require_text(&user.full_name, "full_name")?;
    require_text(&user.username, "username")?;
    require_text(&user.password, "password")?;

    if user.visibility_scope() == VisibilityScope::Region {
        let region: &str = user.assigned_region.as_deref().unwrap_or_default();
        require_text(region, "assigned_region")?;
    }
    Ok(())
}

/// Validates that `username` is not taken by any user other than `exclude_id`.
///
/// # Errors
///
/// Returns `DomainError::DuplicateUsername` if another user has the same username.
pub fn validate_username_unique(
    users: &[User],
    username: &str,
    exclude_id: Option<&str>,
) -> Result<(), DomainError> {
    let taken: bool = users
        .iter()
        .filter(|user| Some(user.id.as_str()) != exclude_id)
        .any(|user| user.username == username);
    if taken {
        return Err(DomainError::DuplicateUsername(username.to_string()));
    }
    Ok(())
}

/// Validates a colony catalog entry.
///
/// # Errors
///
/// Returns an error if any part of the triple is blank.
pub fn validate_catalog_entry(entry: &CatalogEntry) -> Result<(), DomainError> {
    require_text(&entry.region, "region")?;
    require_text(&entry.quadrant, "quadrant")?;
    require_text(&entry.colony, "colony")
}

/// Validates an operative type name.
///
/// # Errors
///
/// Returns an error if the name is blank.
pub fn validate_operative_type_name(name: &str) -> Result<(), DomainError> {
    require_text(name, "operative_type")
}
