// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization services.
//!
//! Authorization is table driven: every check goes through the role policy
//! table in the domain crate, so call sites cannot drift apart. Credentials
//! are compared behind [`CredentialVerifier`]; stored passwords are plaintext
//! today and a hashing verifier can replace [`PlaintextCredentials`] without
//! touching the policy.

use operativos::State;
use operativos_domain::{Operative, OperativePatch, Permission, User, normalize_trimmed};
use operativos_persistence::{PersistenceError, SessionData, SessionStore};
use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// Compares a presented password with the stored credential.
pub trait CredentialVerifier {
    /// Returns true if `presented` matches `stored`.
    fn verify(&self, stored: &str, presented: &str) -> bool;
}

/// Exact comparison against a plaintext stored password.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextCredentials;

impl CredentialVerifier for PlaintextCredentials {
    fn verify(&self, stored: &str, presented: &str) -> bool {
        stored == presented
    }
}

/// Authorization service for enforcing the role permission table.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that `user` holds `permission`.
    ///
    /// # Arguments
    ///
    /// * `user` - The acting user, as currently stored
    /// * `permission` - The permission the action needs
    /// * `action` - Name of the attempted action, for the error message
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if the role does not grant the permission.
    pub fn require(user: &User, permission: Permission, action: &str) -> Result<(), AuthError> {
        if user.has_permission(permission) {
            return Ok(());
        }
        warn!(user_id = %user.id, role = %user.role, action, "Authorization denied");
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_permission: format!("{permission:?}"),
        })
    }

    /// Checks that `user` may edit or conclude `operative`.
    ///
    /// The creator may always modify their own operative. Anyone else needs
    /// `ModifyAnyOperative`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if neither condition holds.
    pub fn authorize_modify_operative(
        user: &User,
        operative: &Operative,
        action: &str,
    ) -> Result<(), AuthError> {
        if operative.created_by == user.id {
            return Ok(());
        }
        Self::require(user, Permission::ModifyAnyOperative, action)
    }

    /// Checks that a patch only moves an operative across regions when the
    /// user may choose regions.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if the patch changes the region and
    /// the user lacks `ChooseRegion`.
    pub fn authorize_patch(
        user: &User,
        operative: &Operative,
        patch: &OperativePatch,
    ) -> Result<(), AuthError> {
        let current_region: String = normalize_trimmed(&operative.region);
        let moves_region: bool = patch
            .region
            .as_deref()
            .is_some_and(|region| normalize_trimmed(region) != current_region);
        if moves_region && !user.can_choose_region() {
            return Self::require(user, Permission::ChooseRegion, "change_operative_region");
        }
        Ok(())
    }
}

/// Authentication service for managing login sessions.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session lifetime.
    pub const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Authenticates a user and creates a session.
    ///
    /// The user is looked up in the current state by exact username.
    ///
    /// # Arguments
    ///
    /// * `store` - The session store
    /// * `verifier` - How credentials are compared
    /// * `state` - The current state
    /// * `username` - The username
    /// * `password` - The presented password
    /// * `lifetime` - How long the session stays valid
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `user`, `expires_at`).
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong or the session cannot be stored.
    pub fn login<S: SessionStore, V: CredentialVerifier>(
        store: &mut S,
        verifier: &V,
        state: &State,
        username: &str,
        password: &str,
        lifetime: Duration,
    ) -> Result<(String, User, String), AuthError> {
        let user: &User = state
            .find_user_by_username(username.trim())
            .filter(|user| verifier.verify(&user.password, password))
            .ok_or_else(|| {
                info!("Rejected login attempt");
                AuthError::AuthenticationFailed {
                    reason: String::from("Invalid username or password"),
                }
            })?;

        let session_token: String = Self::generate_session_token();
        let expires_at: String = format_timestamp(OffsetDateTime::now_utc() + lifetime)?;

        store
            .create_session(&session_token, &user.id, &expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok((session_token, user.clone(), expires_at))
    }

    /// Validates a session token and returns the user behind it.
    ///
    /// The user is re-read from the current state on every call, so a role
    /// change takes effect on the next request.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or its user no
    /// longer exists.
    pub fn validate_session<S: SessionStore>(
        store: &mut S,
        state: &State,
        session_token: &str,
    ) -> Result<User, AuthError> {
        let session: SessionData = store
            .get_session_by_token(session_token)
            .map_err(|e| Self::map_persistence_error(&e))?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            OffsetDateTime::parse(&session.expires_at, &Iso8601::DEFAULT).map_err(|e| {
                AuthError::AuthenticationFailed {
                    reason: format!("Failed to parse session expiration: {e}"),
                }
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            debug!(session_id = session.session_id, "Session expired");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: User = state.find_user(&session.user_id).cloned().ok_or_else(|| {
            AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            }
        })?;

        store
            .update_session_activity(session.session_id)
            .map_err(|e| Self::map_persistence_error(&e))?;

        Ok(user)
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout<S: SessionStore>(store: &mut S, session_token: &str) -> Result<(), AuthError> {
        store
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })
    }

    /// Removes every session that has expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete.
    pub fn purge_expired_sessions<S: SessionStore>(store: &mut S) -> Result<usize, AuthError> {
        let now: String = format_timestamp(OffsetDateTime::now_utc())?;
        store
            .delete_expired_sessions(&now)
            .map_err(|e| Self::map_persistence_error(&e))
    }

    fn generate_session_token() -> String {
        let timestamp: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
        format!("session_{timestamp}_{}", rand::random::<u64>())
    }

    fn map_persistence_error(err: &PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}

fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, AuthError> {
    timestamp
        .format(&Iso8601::DEFAULT)
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to format timestamp: {e}"),
        })
}
