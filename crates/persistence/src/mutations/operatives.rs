// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use operativos_domain::Operative;
use tracing::{debug, info};

use super::require_affected;
use crate::diesel_schema::operatives;
use crate::error::PersistenceError;

/// The JSON-encoded columns of an operative.
struct EncodedOperative {
    location_json: String,
    units_json: String,
    institutions_json: String,
    conclusion_json: Option<String>,
}

impl EncodedOperative {
    fn encode(operative: &Operative) -> Result<Self, PersistenceError> {
        Ok(Self {
            location_json: serde_json::to_string(&operative.location)?,
            units_json: serde_json::to_string(&operative.units)?,
            institutions_json: serde_json::to_string(&operative.institutions)?,
            conclusion_json: operative
                .conclusion()
                .map(serde_json::to_string)
                .transpose()?,
        })
    }
}

/// Inserts a new operative.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the identifier is already taken,
/// or another error if the insert fails.
pub fn insert_operative(
    conn: &mut SqliteConnection,
    operative: &Operative,
) -> Result<(), PersistenceError> {
    debug!(operative_id = %operative.id, "Inserting operative");
    let encoded: EncodedOperative = EncodedOperative::encode(operative)?;

    diesel::insert_into(operatives::table)
        .values((
            operatives::id.eq(&operative.id),
            operatives::operative_type.eq(&operative.operative_type),
            operatives::specific_type.eq(operative.specific_type.as_deref()),
            operatives::start_date.eq(&operative.start_date),
            operatives::start_time.eq(&operative.start_time),
            operatives::status.eq(operative.status().as_str()),
            operatives::region.eq(&operative.region),
            operatives::quadrant.eq(&operative.quadrant),
            operatives::shift.eq(operative.shift.as_str()),
            operatives::location_json.eq(&encoded.location_json),
            operatives::units_json.eq(&encoded.units_json),
            operatives::institutions_json.eq(&encoded.institutions_json),
            operatives::conclusion_json.eq(encoded.conclusion_json.as_deref()),
            operatives::created_by.eq(&operative.created_by),
        ))
        .execute(conn)?;

    info!(operative_id = %operative.id, "Inserted operative");
    Ok(())
}

/// Replaces every mutable column of an existing operative.
///
/// `created_by` is never rewritten.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no operative has this identifier,
/// or another error if the update fails.
pub fn update_operative(
    conn: &mut SqliteConnection,
    operative: &Operative,
) -> Result<(), PersistenceError> {
    debug!(operative_id = %operative.id, "Updating operative");
    let encoded: EncodedOperative = EncodedOperative::encode(operative)?;

    let rows_affected: usize = diesel::update(operatives::table)
        .filter(operatives::id.eq(&operative.id))
        .set((
            operatives::operative_type.eq(&operative.operative_type),
            operatives::specific_type.eq(operative.specific_type.as_deref()),
            operatives::start_date.eq(&operative.start_date),
            operatives::start_time.eq(&operative.start_time),
            operatives::status.eq(operative.status().as_str()),
            operatives::region.eq(&operative.region),
            operatives::quadrant.eq(&operative.quadrant),
            operatives::shift.eq(operative.shift.as_str()),
            operatives::location_json.eq(&encoded.location_json),
            operatives::units_json.eq(&encoded.units_json),
            operatives::institutions_json.eq(&encoded.institutions_json),
            operatives::conclusion_json.eq(encoded.conclusion_json.as_deref()),
        ))
        .execute(conn)?;

    require_affected(rows_affected, &format!("operative {}", operative.id))?;
    info!(operative_id = %operative.id, status = %operative.status(), "Updated operative");
    Ok(())
}

/// Deletes an operative.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no operative has this identifier,
/// or another error if the delete fails.
pub fn delete_operative(
    conn: &mut SqliteConnection,
    operative_id: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(operatives::table)
        .filter(operatives::id.eq(operative_id))
        .execute(conn)?;

    require_affected(rows_affected, &format!("operative {operative_id}"))?;
    info!(operative_id, "Deleted operative");
    Ok(())
}
