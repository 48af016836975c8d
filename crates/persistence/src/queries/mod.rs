// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries, one module per stored collection.

pub mod audit;
pub mod catalog;
pub mod operatives;
pub mod users;
