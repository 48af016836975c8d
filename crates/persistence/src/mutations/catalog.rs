// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use operativos_domain::CatalogEntry;
use tracing::info;

use super::require_affected;
use crate::diesel_schema::{colony_catalog, operative_types};
use crate::error::PersistenceError;

fn to_position(index: usize) -> Result<i32, PersistenceError> {
    i32::try_from(index)
        .map_err(|_| PersistenceError::Other(format!("type position {index} is out of range")))
}

/// Inserts an operative type at `position`, shifting later types down.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the name already exists,
/// or another error if the write fails.
pub fn insert_operative_type(
    conn: &mut SqliteConnection,
    name: &str,
    position: usize,
) -> Result<(), PersistenceError> {
    let position: i32 = to_position(position)?;

    conn.transaction::<(), PersistenceError, _>(|conn| {
        diesel::update(operative_types::table)
            .filter(operative_types::position.ge(position))
            .set(operative_types::position.eq(operative_types::position + 1))
            .execute(conn)?;

        diesel::insert_into(operative_types::table)
            .values((
                operative_types::name.eq(name),
                operative_types::position.eq(position),
            ))
            .execute(conn)?;
        Ok(())
    })?;

    info!(name, position, "Inserted operative type");
    Ok(())
}

/// Deletes an operative type.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the type does not exist,
/// or another error if the delete fails.
pub fn delete_operative_type(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(operative_types::table)
        .filter(operative_types::name.eq(name))
        .execute(conn)?;

    require_affected(rows_affected, &format!("operative type {name}"))?;
    info!(name, "Deleted operative type");
    Ok(())
}

/// Rewrites the display position of every listed type.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if a listed type does not exist,
/// or another error if the update fails.
pub fn reorder_operative_types(
    conn: &mut SqliteConnection,
    names: &[String],
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        for (index, name) in names.iter().enumerate() {
            let rows_affected: usize = diesel::update(operative_types::table)
                .filter(operative_types::name.eq(name))
                .set(operative_types::position.eq(to_position(index)?))
                .execute(conn)?;
            require_affected(rows_affected, &format!("operative type {name}"))?;
        }
        Ok(())
    })?;

    info!(count = names.len(), "Reordered operative types");
    Ok(())
}

/// Inserts a colony catalog entry.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the triple already exists,
/// or another error if the insert fails.
pub fn insert_catalog_entry(
    conn: &mut SqliteConnection,
    entry: &CatalogEntry,
) -> Result<(), PersistenceError> {
    diesel::insert_into(colony_catalog::table)
        .values((
            colony_catalog::region.eq(&entry.region),
            colony_catalog::quadrant.eq(&entry.quadrant),
            colony_catalog::colony.eq(&entry.colony),
        ))
        .execute(conn)?;

    info!(entry = %entry, "Inserted catalog entry");
    Ok(())
}

/// Deletes a colony catalog entry by its exact triple.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the triple does not exist,
/// or another error if the delete fails.
pub fn delete_catalog_entry(
    conn: &mut SqliteConnection,
    entry: &CatalogEntry,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(colony_catalog::table)
        .filter(colony_catalog::region.eq(&entry.region))
        .filter(colony_catalog::quadrant.eq(&entry.quadrant))
        .filter(colony_catalog::colony.eq(&entry.colony))
        .execute(conn)?;

    require_affected(rows_affected, &format!("catalog entry {entry}"))?;
    info!(entry = %entry, "Deleted catalog entry");
    Ok(())
}
