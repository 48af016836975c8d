// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use operativos_domain::User;
use tracing::{debug, info};

use super::require_affected;
use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;

/// Inserts a new user.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the identifier or username is
/// already taken, or another error if the insert fails.
pub fn insert_user(conn: &mut SqliteConnection, user: &User) -> Result<(), PersistenceError> {
    diesel::insert_into(users::table)
        .values((
            users::id.eq(&user.id),
            users::full_name.eq(&user.full_name),
            users::username.eq(&user.username),
            users::password.eq(&user.password),
            users::role.eq(user.role.as_str()),
            users::assigned_region.eq(user.assigned_region.as_deref()),
            users::is_agrupamiento.eq(i32::from(user.is_agrupamiento)),
        ))
        .execute(conn)?;

    info!(user_id = %user.id, role = %user.role, "Inserted user");
    Ok(())
}

/// Replaces every column of an existing user.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no user has this identifier,
/// or another error if the update fails.
pub fn update_user(conn: &mut SqliteConnection, user: &User) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(users::table)
        .filter(users::id.eq(&user.id))
        .set((
            users::full_name.eq(&user.full_name),
            users::username.eq(&user.username),
            users::password.eq(&user.password),
            users::role.eq(user.role.as_str()),
            users::assigned_region.eq(user.assigned_region.as_deref()),
            users::is_agrupamiento.eq(i32::from(user.is_agrupamiento)),
        ))
        .execute(conn)?;

    require_affected(rows_affected, &format!("user {}", user.id))?;
    info!(user_id = %user.id, "Updated user");
    Ok(())
}

/// Deletes a user. Their sessions are removed with them.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no user has this identifier,
/// or another error if the delete fails.
pub fn delete_user(conn: &mut SqliteConnection, user_id: &str) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(users::table)
        .filter(users::id.eq(user_id))
        .execute(conn)?;

    require_affected(rows_affected, &format!("user {user_id}"))?;
    info!(user_id, "Deleted user");
    Ok(())
}

/// Creates a new session for a user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The unique session token
/// * `user_id` - The user the session belongs to
/// * `expires_at` - The expiration timestamp (ISO 8601 format)
///
/// # Returns
///
/// The new session's row ID.
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    user_id: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!(user_id, expires_at, "Creating session");

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = get_last_insert_rowid(conn)?;
    debug!(session_id, user_id, "Session created");
    Ok(session_id)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(
            sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;
    Ok(())
}

/// Deletes a session by token.
///
/// Deleting an unknown token is not an error; logout is idempotent.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;
    Ok(())
}

/// Deletes every session that expired before `now`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `now` - The current time, ISO 8601, in the same format as `expires_at`
///
/// # Returns
///
/// The number of sessions removed.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: &str,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(now))
        .execute(conn)?;

    info!(rows_affected, "Deleted expired sessions");
    Ok(rows_affected)
}
