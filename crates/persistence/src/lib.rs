// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Record store adapter for the Operativos record system.
//!
//! This crate persists operatives, users, operative types, the colony
//! catalog, login sessions and the audit trail. It is built on Diesel over
//! `SQLite`.
//!
//! ## Storage layout
//!
//! Scalar operative fields are columns. Location, units, institutions and
//! the conclusion are JSON documents. The schema enforces that a conclusion
//! is stored if and only if the status is `CONCLUIDO`, and decoding a row
//! checks the same invariant again through the domain type.
//!
//! ## Concurrency
//!
//! The adapter holds a single connection. Every [`RecordStore`] call is
//! independent and there is no compare-and-swap between a read and the write
//! that follows it. Two creators on the same day can therefore compute the
//! same operative identifier; the primary key rejects the second insert and
//! the caller sees a store failure.
//!
//! ## Testing
//!
//! Tests use [`Persistence::new_in_memory`], which gives every call its own
//! shared-cache in-memory database.

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
#![allow(clippy::multiple_crate_versions)]

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

use diesel::SqliteConnection;
use operativos_audit::AuditEvent;
use operativos_domain::{CatalogEntry, Operative, User};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

pub use data_models::{AuditEventData, SessionData};
pub use error::PersistenceError;
pub use store::{RecordStore, SessionStore};

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// `SQLite`-backed record store.
pub struct Persistence {
    conn: SqliteConnection,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_operativos_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Retrieves a single operative.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub fn get_operative(
        &mut self,
        operative_id: &str,
    ) -> Result<Option<Operative>, PersistenceError> {
        queries::operatives::get_operative(&mut self.conn, operative_id)
    }

    /// Lists the operatives of one region.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn list_operatives_by_region(
        &mut self,
        region: &str,
    ) -> Result<Vec<Operative>, PersistenceError> {
        queries::operatives::list_operatives_by_region(&mut self.conn, region)
    }

    /// Retrieves a single user.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub fn get_user(&mut self, user_id: &str) -> Result<Option<User>, PersistenceError> {
        queries::users::get_user(&mut self.conn, user_id)
    }

    /// Retrieves a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub fn get_user_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<User>, PersistenceError> {
        queries::users::get_user_by_username(&mut self.conn, username)
    }

    /// Lists audit events, optionally restricted to one subject.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_audit_events(
        &mut self,
        subject: Option<&str>,
    ) -> Result<Vec<AuditEventData>, PersistenceError> {
        queries::audit::list_audit_events(&mut self.conn, subject)
    }
}

impl RecordStore for Persistence {
    fn list_operatives(&mut self) -> Result<Vec<Operative>, PersistenceError> {
        queries::operatives::list_operatives(&mut self.conn)
    }

    fn insert_operative(&mut self, operative: &Operative) -> Result<(), PersistenceError> {
        mutations::operatives::insert_operative(&mut self.conn, operative)
    }

    fn update_operative(&mut self, operative: &Operative) -> Result<(), PersistenceError> {
        mutations::operatives::update_operative(&mut self.conn, operative)
    }

    fn delete_operative(&mut self, operative_id: &str) -> Result<(), PersistenceError> {
        mutations::operatives::delete_operative(&mut self.conn, operative_id)
    }

    fn list_users(&mut self) -> Result<Vec<User>, PersistenceError> {
        queries::users::list_users(&mut self.conn)
    }

    fn insert_user(&mut self, user: &User) -> Result<(), PersistenceError> {
        mutations::users::insert_user(&mut self.conn, user)
    }

    fn update_user(&mut self, user: &User) -> Result<(), PersistenceError> {
        mutations::users::update_user(&mut self.conn, user)
    }

    fn delete_user(&mut self, user_id: &str) -> Result<(), PersistenceError> {
        mutations::users::delete_user(&mut self.conn, user_id)
    }

    fn list_operative_types(&mut self) -> Result<Vec<String>, PersistenceError> {
        queries::catalog::list_operative_types(&mut self.conn)
    }

    fn insert_operative_type(
        &mut self,
        name: &str,
        position: usize,
    ) -> Result<(), PersistenceError> {
        mutations::catalog::insert_operative_type(&mut self.conn, name, position)
    }

    fn delete_operative_type(&mut self, name: &str) -> Result<(), PersistenceError> {
        mutations::catalog::delete_operative_type(&mut self.conn, name)
    }

    fn reorder_operative_types(&mut self, names: &[String]) -> Result<(), PersistenceError> {
        mutations::catalog::reorder_operative_types(&mut self.conn, names)
    }

    fn list_catalog_entries(&mut self) -> Result<Vec<CatalogEntry>, PersistenceError> {
        queries::catalog::list_catalog_entries(&mut self.conn)
    }

    fn insert_catalog_entry(&mut self, entry: &CatalogEntry) -> Result<(), PersistenceError> {
        mutations::catalog::insert_catalog_entry(&mut self.conn, entry)
    }

    fn delete_catalog_entry(&mut self, entry: &CatalogEntry) -> Result<(), PersistenceError> {
        mutations::catalog::delete_catalog_entry(&mut self.conn, entry)
    }

    fn record_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        mutations::audit::insert_audit_event(&mut self.conn, event)
    }
}

impl SessionStore for Persistence {
    fn create_session(
        &mut self,
        session_token: &str,
        user_id: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::users::get_session_by_token(&mut self.conn, session_token)
    }

    fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::users::update_session_activity(&mut self.conn, session_id)
    }

    fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::users::delete_session(&mut self.conn, session_token)
    }

    fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::users::delete_expired_sessions(&mut self.conn, now)
    }
}
