// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations, one module per stored collection.
//!
//! Each function performs one independent store call. An update or delete
//! that matches no row fails with `PersistenceError::NotFound`.

pub mod audit;
pub mod catalog;
pub mod operatives;
pub mod users;

use crate::error::PersistenceError;

/// Turns an affected-row count of zero into a not-found error.
fn require_affected(rows_affected: usize, what: &str) -> Result<(), PersistenceError> {
    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(what.to_string()));
    }
    Ok(())
}
