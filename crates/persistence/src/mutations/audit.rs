// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use operativos_audit::AuditEvent;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Persists an audit event.
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(audit_events::table)
        .values((
            audit_events::actor_user_id.eq(&event.actor.user_id),
            audit_events::actor_role.eq(&event.actor.role),
            audit_events::action_name.eq(&event.action.name),
            audit_events::action_details.eq(event.action.details.as_deref()),
            audit_events::subject.eq(&event.subject),
            audit_events::before_snapshot.eq(&event.before.data),
            audit_events::after_snapshot.eq(&event.after.data),
        ))
        .execute(conn)?;

    let event_id: i64 = get_last_insert_rowid(conn)?;
    debug!(event_id, action = %event.action.name, subject = %event.subject, "Recorded audit event");
    Ok(event_id)
}
