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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod bootstrap;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::apply;
pub use bootstrap::{
    BootstrapResult, DEFAULT_ADMIN_FULL_NAME, DEFAULT_ADMIN_ID, DEFAULT_ADMIN_PASSWORD,
    DEFAULT_ADMIN_USERNAME, default_admin, seed_missing,
};
pub use command::{Command, MoveDirection, OperativeDraft, UserDraft};
pub use error::CoreError;
pub use state::{State, StoreMutation, TransitionResult};
