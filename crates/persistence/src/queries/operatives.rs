// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use operativos_domain::{
    ConclusionData, DomainError, Institution, Location, Operative, OperativeRecord, OperativeStatus,
    Shift, Unit,
};
use tracing::debug;

use crate::diesel_schema::operatives;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = operatives)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct OperativeRow {
    id: String,
    operative_type: String,
    specific_type: Option<String>,
    start_date: String,
    start_time: String,
    status: String,
    region: String,
    quadrant: String,
    shift: String,
    location_json: String,
    units_json: String,
    institutions_json: String,
    conclusion_json: Option<String>,
    created_by: String,
}

impl OperativeRow {
    fn into_operative(self) -> Result<Operative, PersistenceError> {
        let id: String = self.id;
        let reconstruction = |err: DomainError| {
            PersistenceError::ReconstructionError(format!("operative {id}: {err}"))
        };

        let status: OperativeStatus = self.status.parse().map_err(reconstruction)?;
        let shift: Shift = self.shift.parse().map_err(reconstruction)?;
        let location: Location = serde_json::from_str(&self.location_json)?;
        let units: Vec<Unit> = serde_json::from_str(&self.units_json)?;
        let institutions: Vec<Institution> = serde_json::from_str(&self.institutions_json)?;
        let conclusion: Option<ConclusionData> = self
            .conclusion_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        let record: OperativeRecord = OperativeRecord {
            id: id.clone(),
            operative_type: self.operative_type,
            specific_type: self.specific_type,
            start_date: self.start_date,
            start_time: self.start_time,
            status,
            region: self.region,
            quadrant: self.quadrant,
            shift,
            location,
            units,
            institutions,
            conclusion,
            created_by: self.created_by,
        };
        Operative::try_from(record).map_err(reconstruction)
    }
}

/// Lists every operative, oldest identifier first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_operatives(conn: &mut SqliteConnection) -> Result<Vec<Operative>, PersistenceError> {
    debug!("Listing operatives");

    let rows: Vec<OperativeRow> = operatives::table
        .select(OperativeRow::as_select())
        .order(operatives::id.asc())
        .load(conn)?;

    rows.into_iter().map(OperativeRow::into_operative).collect()
}

/// Lists the operatives of one region.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_operatives_by_region(
    conn: &mut SqliteConnection,
    region: &str,
) -> Result<Vec<Operative>, PersistenceError> {
    debug!(region, "Listing operatives by region");

    let rows: Vec<OperativeRow> = operatives::table
        .filter(operatives::region.eq(region))
        .select(OperativeRow::as_select())
        .order(operatives::id.asc())
        .load(conn)?;

    rows.into_iter().map(OperativeRow::into_operative).collect()
}

/// Retrieves an operative by identifier.
///
/// # Returns
///
/// * `Ok(Some(Operative))` if found
/// * `Ok(None)` if not found
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn get_operative(
    conn: &mut SqliteConnection,
    operative_id: &str,
) -> Result<Option<Operative>, PersistenceError> {
    let row: Option<OperativeRow> = operatives::table
        .filter(operatives::id.eq(operative_id))
        .select(OperativeRow::as_select())
        .first(conn)
        .optional()?;

    row.map(OperativeRow::into_operative).transpose()
}
