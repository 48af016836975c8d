// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use operativos_audit::{Action, Actor, AuditEvent, StateSnapshot};

use crate::data_models::AuditEventData;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct AuditEventRow {
    event_id: i64,
    actor_user_id: String,
    actor_role: String,
    action_name: String,
    action_details: Option<String>,
    subject: String,
    before_snapshot: String,
    after_snapshot: String,
    created_at: String,
}

impl From<AuditEventRow> for AuditEventData {
    fn from(row: AuditEventRow) -> Self {
        Self {
            event_id: row.event_id,
            event: AuditEvent::new(
                Actor::new(row.actor_user_id, row.actor_role),
                Action::new(row.action_name, row.action_details),
                row.subject,
                StateSnapshot::new(row.before_snapshot),
                StateSnapshot::new(row.after_snapshot),
            ),
            created_at: row.created_at,
        }
    }
}

/// Lists audit events in the order they were recorded.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `subject` - When given, only events about this subject are returned
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_audit_events(
    conn: &mut SqliteConnection,
    subject: Option<&str>,
) -> Result<Vec<AuditEventData>, PersistenceError> {
    let mut query = audit_events::table
        .select(AuditEventRow::as_select())
        .order(audit_events::event_id.asc())
        .into_boxed();
    if let Some(subject) = subject {
        query = query.filter(audit_events::subject.eq(subject));
    }

    let rows: Vec<AuditEventRow> = query.load(conn)?;
    Ok(rows.into_iter().map(AuditEventData::from).collect())
}
