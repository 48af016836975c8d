// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use operativos_audit::AuditEvent;

/// A persisted login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: String,
    pub created_at: String,
    pub last_activity_at: String,
    /// Expiry timestamp, ISO 8601.
    pub expires_at: String,
}

/// A persisted audit event with its store-assigned identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEventData {
    pub event_id: i64,
    pub event: AuditEvent,
    pub created_at: String,
}
