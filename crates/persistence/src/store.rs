// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store traits consumed by the boundary layer.
//!
//! [`RecordStore`] covers the four record collections plus the audit trail.
//! Every method is one independent store call; no multi-record transaction is
//! implied. [`SessionStore`] covers login sessions.

use operativos::{BootstrapResult, State, StoreMutation, seed_missing};
use operativos_audit::AuditEvent;
use operativos_domain::{CatalogEntry, Operative, User};
use tracing::info;

use crate::data_models::SessionData;
use crate::error::PersistenceError;

/// A record store holding operatives, users, operative types and the colony catalog.
pub trait RecordStore {
    /// Lists every operative.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_operatives(&mut self) -> Result<Vec<Operative>, PersistenceError>;

    /// Inserts an operative.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the insert.
    fn insert_operative(&mut self, operative: &Operative) -> Result<(), PersistenceError>;

    /// Replaces an existing operative.
    ///
    /// # Errors
    ///
    /// Returns an error if the operative does not exist or the store rejects the update.
    fn update_operative(&mut self, operative: &Operative) -> Result<(), PersistenceError>;

    /// Deletes an operative.
    ///
    /// # Errors
    ///
    /// Returns an error if the operative does not exist or the store rejects the delete.
    fn delete_operative(&mut self, operative_id: &str) -> Result<(), PersistenceError>;

    /// Lists every user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_users(&mut self) -> Result<Vec<User>, PersistenceError>;

    /// Inserts a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the insert.
    fn insert_user(&mut self, user: &User) -> Result<(), PersistenceError>;

    /// Replaces an existing user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the store rejects the update.
    fn update_user(&mut self, user: &User) -> Result<(), PersistenceError>;

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the store rejects the delete.
    fn delete_user(&mut self, user_id: &str) -> Result<(), PersistenceError>;

    /// Lists operative type names in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_operative_types(&mut self) -> Result<Vec<String>, PersistenceError>;

    /// Inserts an operative type at a display position.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the insert.
    fn insert_operative_type(&mut self, name: &str, position: usize)
    -> Result<(), PersistenceError>;

    /// Deletes an operative type.
    ///
    /// # Errors
    ///
    /// Returns an error if the type does not exist or the store rejects the delete.
    fn delete_operative_type(&mut self, name: &str) -> Result<(), PersistenceError>;

    /// Persists a new display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the update.
    fn reorder_operative_types(&mut self, names: &[String]) -> Result<(), PersistenceError>;

    /// Lists colony catalog entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_catalog_entries(&mut self) -> Result<Vec<CatalogEntry>, PersistenceError>;

    /// Inserts a colony catalog entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the insert.
    fn insert_catalog_entry(&mut self, entry: &CatalogEntry) -> Result<(), PersistenceError>;

    /// Deletes a colony catalog entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist or the store rejects the delete.
    fn delete_catalog_entry(&mut self, entry: &CatalogEntry) -> Result<(), PersistenceError>;

    /// Appends an event to the audit trail.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the insert.
    fn record_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError>;

    /// Performs the store call described by `mutation`.
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying call returns.
    fn apply_mutation(&mut self, mutation: &StoreMutation) -> Result<(), PersistenceError> {
        match mutation {
            StoreMutation::InsertOperative(operative) => self.insert_operative(operative),
            StoreMutation::UpdateOperative(operative) => self.update_operative(operative),
            StoreMutation::DeleteOperative(operative_id) => self.delete_operative(operative_id),
            StoreMutation::InsertUser(user) => self.insert_user(user),
            StoreMutation::UpdateUser(user) => self.update_user(user),
            StoreMutation::DeleteUser(user_id) => self.delete_user(user_id),
            StoreMutation::InsertOperativeType { name, position } => {
                self.insert_operative_type(name, *position)
            }
            StoreMutation::DeleteOperativeType(name) => self.delete_operative_type(name),
            StoreMutation::ReorderOperativeTypes(names) => self.reorder_operative_types(names),
            StoreMutation::InsertCatalogEntry(entry) => self.insert_catalog_entry(entry),
            StoreMutation::DeleteCatalogEntry(entry) => self.delete_catalog_entry(entry),
        }
    }

    /// Reads every collection into a fresh [`State`].
    ///
    /// # Errors
    ///
    /// Returns an error if any collection cannot be read.
    fn load_state(&mut self) -> Result<State, PersistenceError> {
        Ok(State {
            operatives: self.list_operatives()?,
            users: self.list_users()?,
            operative_types: self.list_operative_types()?,
            colony_catalog: self.list_catalog_entries()?,
        })
    }

    /// Loads the state, seeding the default administrator and bundled
    /// catalogs into any empty collection first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or a seed write fails.
    fn ensure_seeded(&mut self) -> Result<State, PersistenceError> {
        let state: State = self.load_state()?;
        let seeded: BootstrapResult = seed_missing(&state);
        if seeded.mutations.is_empty() {
            return Ok(state);
        }

        info!(records = seeded.mutations.len(), "Seeding empty collections");
        for mutation in &seeded.mutations {
            self.apply_mutation(mutation)?;
        }
        Ok(seeded.new_state)
    }
}

/// Storage for login sessions.
pub trait SessionStore {
    /// Creates a session and returns its row ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be stored.
    fn create_session(
        &mut self,
        session_token: &str,
        user_id: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError>;

    /// Looks up a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError>;

    /// Marks a session as used now.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the update.
    fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError>;

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete.
    fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError>;

    /// Deletes sessions that expired before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete.
    fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError>;
}
