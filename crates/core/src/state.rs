// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use operativos_audit::{AuditEvent, StateSnapshot};
use operativos_domain::{CatalogEntry, Operative, User};

/// The in-memory view of every collection in the record store.
///
/// A transition never mutates a `State` in place. It returns a replacement,
/// which callers install only after the store confirms the matching
/// [`StoreMutation`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    /// All operatives, in insertion order.
    pub operatives: Vec<Operative>,
    /// All users.
    pub users: Vec<User>,
    /// Operative type names, in display order.
    pub operative_types: Vec<String>,
    /// Colony catalog entries.
    pub colony_catalog: Vec<CatalogEntry>,
}

impl State {
    /// Creates a new empty state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            operatives: Vec::new(),
            users: Vec::new(),
            operative_types: Vec::new(),
            colony_catalog: Vec::new(),
        }
    }

    /// Looks up an operative by identifier.
    #[must_use]
    pub fn find_operative(&self, operative_id: &str) -> Option<&Operative> {
        self.operatives
            .iter()
            .find(|operative| operative.id == operative_id)
    }

    /// Looks up a user by identifier.
    #[must_use]
    pub fn find_user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }

    /// Looks up a user by username.
    #[must_use]
    pub fn find_user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(format!(
            "operatives={},users={},operative_types={},catalog_entries={}",
            self.operatives.len(),
            self.users.len(),
            self.operative_types.len(),
            self.colony_catalog.len()
        ))
    }
}

/// The single store call that makes a transition durable.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreMutation {
    InsertOperative(Operative),
    UpdateOperative(Operative),
    DeleteOperative(String),
    InsertUser(User),
    UpdateUser(User),
    DeleteUser(String),
    InsertOperativeType {
        name: String,
        position: usize,
    },
    DeleteOperativeType(String),
    /// Rewrites the display order of every type.
    ReorderOperativeTypes(Vec<String>),
    InsertCatalogEntry(CatalogEntry),
    DeleteCatalogEntry(CatalogEntry),
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: State,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    /// The store call that persists this transition.
    pub mutation: StoreMutation,
}
