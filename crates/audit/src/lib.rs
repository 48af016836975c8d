// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use operativos_domain::User;
use serde::{Deserialize, Serialize};

/// Represents the user performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The acting user's identifier.
    pub user_id: String,
    /// The acting user's role code at the time of the action.
    pub role: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The acting user's identifier
    /// * `role` - The acting user's role code
    #[must_use]
    pub const fn new(user_id: String, role: String) -> Self {
        Self { user_id, role }
    }

    /// Creates an Actor for `user`.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            role: user.role.as_str().to_string(),
        }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`CreateOperative`", "`ConcludeOperative`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of the affected record at a point in time.
///
/// `data` holds a compact description of the record, or is empty when the
/// record did not exist on that side of the transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// The snapshot of a record that does not exist.
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            data: String::new(),
        }
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful mutation produces exactly one audit event capturing:
/// - Who performed the action (actor)
/// - What action was performed (action)
/// - Which record it touched (subject)
/// - The record before and after the transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The action that was performed.
    pub action: Action,
    /// Identifier of the affected record (operative id, user id, type name or catalog triple).
    pub subject: String,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `action` - The action that was performed
    /// * `subject` - Identifier of the affected record
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    #[must_use]
    pub const fn new(
        actor: Actor,
        action: Action,
        subject: String,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            actor,
            action,
            subject,
            before,
            after,
        }
    }
}
