// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use operativos_domain::{Role, User};
use tracing::debug;

use crate::data_models::SessionData;
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct UserRow {
    id: String,
    full_name: String,
    username: String,
    password: String,
    role: String,
    assigned_region: Option<String>,
    is_agrupamiento: i32,
}

impl UserRow {
    fn into_user(self) -> Result<User, PersistenceError> {
        let role: Role = self.role.parse().map_err(|err| {
            PersistenceError::ReconstructionError(format!("user {}: {err}", self.id))
        })?;

        Ok(User {
            id: self.id,
            full_name: self.full_name,
            username: self.username,
            password: self.password,
            role,
            assigned_region: self.assigned_region,
            is_agrupamiento: self.is_agrupamiento != 0,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SessionRow {
    session_id: i64,
    session_token: String,
    user_id: String,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

impl From<SessionRow> for SessionData {
    fn from(row: SessionRow) -> Self {
        Self {
            session_id: row.session_id,
            session_token: row.session_token,
            user_id: row.user_id,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
        }
    }
}

/// Lists every user, ordered by identifier.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_users(conn: &mut SqliteConnection) -> Result<Vec<User>, PersistenceError> {
    debug!("Listing users");

    let rows: Vec<UserRow> = users::table
        .select(UserRow::as_select())
        .order(users::id.asc())
        .load(conn)?;

    rows.into_iter().map(UserRow::into_user).collect()
}

/// Retrieves a user by identifier.
///
/// # Returns
///
/// * `Ok(Some(User))` if found
/// * `Ok(None)` if not found
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn get_user(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Option<User>, PersistenceError> {
    let row: Option<UserRow> = users::table
        .filter(users::id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(UserRow::into_user).transpose()
}

/// Retrieves a user by username.
///
/// Usernames are compared exactly.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn get_user_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<User>, PersistenceError> {
    debug!(username, "Looking up user by username");

    let row: Option<UserRow> = users::table
        .filter(users::username.eq(username))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(UserRow::into_user).transpose()
}

/// Retrieves a session by token.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The session token
///
/// # Returns
///
/// * `Ok(Some(SessionData))` if found
/// * `Ok(None)` if not found
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Looking up session by token");

    let row: Option<SessionRow> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(SessionData::from))
}
