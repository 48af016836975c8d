// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use operativos_domain::CatalogEntry;

use crate::diesel_schema::{colony_catalog, operative_types};
use crate::error::PersistenceError;

/// Lists operative type names in display order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_operative_types(conn: &mut SqliteConnection) -> Result<Vec<String>, PersistenceError> {
    let names: Vec<String> = operative_types::table
        .select(operative_types::name)
        .order((operative_types::position.asc(), operative_types::name.asc()))
        .load(conn)?;
    Ok(names)
}

/// Lists colony catalog entries ordered by region, quadrant and colony.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_catalog_entries(
    conn: &mut SqliteConnection,
) -> Result<Vec<CatalogEntry>, PersistenceError> {
    let rows: Vec<(String, String, String)> = colony_catalog::table
        .select((
            colony_catalog::region,
            colony_catalog::quadrant,
            colony_catalog::colony,
        ))
        .order((
            colony_catalog::region.asc(),
            colony_catalog::quadrant.asc(),
            colony_catalog::colony.asc(),
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(region, quadrant, colony)| CatalogEntry {
            region,
            quadrant,
            colony,
        })
        .collect())
}
