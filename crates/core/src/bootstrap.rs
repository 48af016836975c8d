// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! First-run seeding of an empty record store.

use crate::state::{State, StoreMutation};
use operativos_domain::{Role, User, default_colony_catalog, default_operative_types};

/// Identifier of the seeded administrator.
pub const DEFAULT_ADMIN_ID: &str = "1";
/// Username of the seeded administrator.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// Initial password of the seeded administrator.
pub const DEFAULT_ADMIN_PASSWORD: &str = "adm123";
/// Full name of the seeded administrator.
pub const DEFAULT_ADMIN_FULL_NAME: &str = "ADMINISTRADOR PRINCIPAL";

/// Returns the administrator created when the user collection is empty.
#[must_use]
pub fn default_admin() -> User {
    User {
        id: DEFAULT_ADMIN_ID.to_string(),
        full_name: DEFAULT_ADMIN_FULL_NAME.to_string(),
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        password: DEFAULT_ADMIN_PASSWORD.to_string(),
        role: Role::Admin,
        assigned_region: None,
        is_agrupamiento: false,
    }
}

/// The result of seeding.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapResult {
    /// The state with any missing collection filled in.
    pub new_state: State,
    /// The store calls that persist the seeded records, in order.
    pub mutations: Vec<StoreMutation>,
}

/// Fills empty collections with their defaults.
///
/// - No users: exactly one administrator is created
/// - No operative types: the bundled type list is loaded
/// - No colony catalog: the bundled catalog is loaded
///
/// Collections that already hold records are left untouched, so seeding an
/// already-seeded state produces no mutations.
#[must_use]
pub fn seed_missing(state: &State) -> BootstrapResult {
    let mut new_state: State = state.clone();
    let mut mutations: Vec<StoreMutation> = Vec::new();

    if new_state.users.is_empty() {
        let admin: User = default_admin();
        new_state.users.push(admin.clone());
        mutations.push(StoreMutation::InsertUser(admin));
    }

    if new_state.operative_types.is_empty() {
        for (position, name) in default_operative_types().into_iter().enumerate() {
            new_state.operative_types.push(name.clone());
            mutations.push(StoreMutation::InsertOperativeType { name, position });
        }
    }

    if new_state.colony_catalog.is_empty() {
        for entry in default_colony_catalog() {
            new_state.colony_catalog.push(entry.clone());
            mutations.push(StoreMutation::InsertCatalogEntry(entry));
        }
    }

    BootstrapResult {
        new_state,
        mutations,
    }
}
