// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend utilities.
//!
//! Everything here is specific to `SQLite`: connection setup, pragmas and
//! embedded migrations. Collection queries and mutations are written with
//! the Diesel DSL and live in `queries/` and `mutations/`.

pub mod sqlite;
