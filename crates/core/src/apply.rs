// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::bootstrap::DEFAULT_ADMIN_USERNAME;
use crate::command::{Command, MoveDirection, OperativeDraft, UserDraft};
use crate::error::CoreError;
use crate::state::{State, StoreMutation, TransitionResult};
use chrono::{NaiveDate, NaiveDateTime};
use operativos_audit::{Action, Actor, AuditEvent, StateSnapshot};
use operativos_domain::{
    CatalogEntry, ClosureReport, ConclusionData, DomainError, Institution, Operative,
    OperativePatch, OperativeRecord, OperativeStatus, Unit, User, UserPatch, build_conclusion,
    generate_operative_id, next_daily_sequence, normalize_trimmed, validate_catalog_entry,
    validate_operative_fields, validate_operative_type_name, validate_user_fields,
    validate_username_unique,
};

/// Applies a command to the current state, producing a new state, an audit
/// event and the store mutation that persists it.
///
/// Authorization is not checked here; callers authorize `actor` before
/// applying.
///
/// # Arguments
///
/// * `state` - The current state (immutable)
/// * `command` - The command to apply
/// * `actor` - The user performing this action
/// * `now` - Local wall-clock time in the municipal timezone
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state, audit event and mutation
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if the command violates a domain rule or targets a
/// record that does not exist.
pub fn apply(
    state: &State,
    command: Command,
    actor: &User,
    now: NaiveDateTime,
) -> Result<TransitionResult, CoreError> {
    let action_name: &'static str = command.name();
    let change: Change = match command {
        Command::CreateOperative { draft } => create_operative(state, &draft, actor, now)?,
        Command::EditOperative {
            operative_id,
            patch,
        } => edit_operative(state, &operative_id, &patch)?,
        Command::ConcludeOperative {
            operative_id,
            report,
        } => conclude_operative(state, &operative_id, &report, now)?,
        Command::DeleteOperative { operative_id } => delete_operative(state, &operative_id)?,
        Command::CreateUser { draft } => create_user(state, draft)?,
        Command::EditUser { user_id, patch } => edit_user(state, &user_id, &patch)?,
        Command::DeleteUser { user_id } => delete_user(state, &user_id, actor)?,
        Command::UpdatePassword { new_password } => update_password(state, actor, new_password)?,
        Command::AddOperativeType { name } => add_operative_type(state, &name)?,
        Command::RemoveOperativeType { name } => remove_operative_type(state, &name)?,
        Command::MoveOperativeType { name, direction } => {
            move_operative_type(state, &name, direction)?
        }
        Command::AddCatalogEntry { entry } => add_catalog_entry(state, &entry)?,
        Command::RemoveCatalogEntry { entry } => remove_catalog_entry(state, &entry)?,
    };

    let audit_event: AuditEvent = AuditEvent::new(
        Actor::from_user(actor),
        Action::new(action_name.to_string(), change.details),
        change.subject,
        change.before,
        change.after,
    );

    Ok(TransitionResult {
        new_state: change.new_state,
        audit_event,
        mutation: change.mutation,
    })
}

/// Everything a single command handler produces.
struct Change {
    new_state: State,
    mutation: StoreMutation,
    subject: String,
    details: Option<String>,
    before: StateSnapshot,
    after: StateSnapshot,
}

fn operative_snapshot(operative: &Operative) -> StateSnapshot {
    StateSnapshot::new(format!(
        "id={},type={},status={},region={},quadrant={},units={}",
        operative.id,
        operative.operative_type,
        operative.status(),
        operative.region,
        operative.quadrant,
        operative.units.len()
    ))
}

fn user_snapshot(user: &User) -> StateSnapshot {
    StateSnapshot::new(format!(
        "id={},username={},role={},region={},agrupamiento={}",
        user.id,
        user.username,
        user.role,
        user.assigned_region.as_deref().unwrap_or("-"),
        user.is_agrupamiento
    ))
}

fn type_list_snapshot(types: &[String]) -> StateSnapshot {
    StateSnapshot::new(types.join("|"))
}

fn operative_position(state: &State, operative_id: &str) -> Result<usize, DomainError> {
    state
        .operatives
        .iter()
        .position(|operative| operative.id == operative_id)
        .ok_or_else(|| DomainError::OperativeNotFound(operative_id.to_string()))
}

fn user_position(state: &State, user_id: &str) -> Result<usize, DomainError> {
    state
        .users
        .iter()
        .position(|user| user.id == user_id)
        .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))
}

// ============================================================================
// Operatives
// ============================================================================

fn create_operative(
    state: &State,
    draft: &OperativeDraft,
    actor: &User,
    now: NaiveDateTime,
) -> Result<Change, CoreError> {
    let region: String = if actor.can_choose_region() {
        normalize_trimmed(&draft.region)
    } else {
        let assigned: &str = actor
            .assigned_region
            .as_deref()
            .filter(|region| !region.trim().is_empty())
            .ok_or_else(|| DomainError::RegionNotAssigned {
                user_id: actor.id.clone(),
            })?;
        normalize_trimmed(assigned)
    };

    let date: NaiveDate = now.date();
    let id: String = generate_operative_id(date, next_daily_sequence(&state.operatives, date));
    if state.find_operative(&id).is_some() {
        return Err(DomainError::DuplicateOperativeId(id).into());
    }

    let units: Vec<Unit> = draft
        .units
        .iter()
        .enumerate()
        .map(|(index, unit)| {
            let mut unit: Unit = unit.normalized();
            if unit.id.trim().is_empty() {
                unit.id = format!("{id}-U{}", index + 1);
            }
            unit
        })
        .collect();
    let institutions: Vec<Institution> = draft
        .institutions
        .iter()
        .enumerate()
        .map(|(index, institution)| {
            let mut institution: Institution = institution.normalized();
            if institution.id.trim().is_empty() {
                institution.id = format!("{id}-I{}", index + 1);
            }
            institution
        })
        .collect();

    let operative: Operative = Operative::try_from(OperativeRecord {
        id: id.clone(),
        operative_type: normalize_trimmed(&draft.operative_type),
        specific_type: draft
            .specific_type
            .as_deref()
            .map(normalize_trimmed)
            .filter(|specific| !specific.is_empty()),
        start_date: now.format("%Y-%m-%d").to_string(),
        start_time: now.format("%H:%M").to_string(),
        status: OperativeStatus::Active,
        region,
        quadrant: normalize_trimmed(&draft.quadrant),
        shift: draft.shift,
        location: draft.location.normalized(),
        units,
        institutions,
        conclusion: None,
        created_by: actor.id.clone(),
    })?;
    validate_operative_fields(&operative)?;

    let mut new_state: State = state.clone();
    new_state.operatives.push(operative.clone());

    Ok(Change {
        new_state,
        subject: id,
        details: Some(format!(
            "Created {} in {}",
            operative.operative_type, operative.region
        )),
        before: StateSnapshot::absent(),
        after: operative_snapshot(&operative),
        mutation: StoreMutation::InsertOperative(operative),
    })
}

fn edit_operative(
    state: &State,
    operative_id: &str,
    patch: &OperativePatch,
) -> Result<Change, CoreError> {
    let position: usize = operative_position(state, operative_id)?;
    let current: &Operative = &state.operatives[position];
    let updated: Operative = current.patched(patch);
    validate_operative_fields(&updated)?;

    let before: StateSnapshot = operative_snapshot(current);
    let after: StateSnapshot = operative_snapshot(&updated);
    let mut new_state: State = state.clone();
    new_state.operatives[position] = updated.clone();

    Ok(Change {
        new_state,
        subject: operative_id.to_string(),
        details: None,
        before,
        after,
        mutation: StoreMutation::UpdateOperative(updated),
    })
}

fn conclude_operative(
    state: &State,
    operative_id: &str,
    report: &ClosureReport,
    now: NaiveDateTime,
) -> Result<Change, CoreError> {
    let position: usize = operative_position(state, operative_id)?;
    let current: &Operative = &state.operatives[position];
    let conclusion: ConclusionData = build_conclusion(current, report, now)?;
    let result_code: &str = conclusion.result.as_str();
    let details: String = format!("Concluded with result {result_code}");
    let concluded: Operative = current.conclude(conclusion)?;

    let before: StateSnapshot = operative_snapshot(current);
    let after: StateSnapshot = operative_snapshot(&concluded);
    let mut new_state: State = state.clone();
    new_state.operatives[position] = concluded.clone();

    Ok(Change {
        new_state,
        subject: operative_id.to_string(),
        details: Some(details),
        before,
        after,
        mutation: StoreMutation::UpdateOperative(concluded),
    })
}

fn delete_operative(state: &State, operative_id: &str) -> Result<Change, CoreError> {
    let position: usize = operative_position(state, operative_id)?;
    let before: StateSnapshot = operative_snapshot(&state.operatives[position]);
    let mut new_state: State = state.clone();
    new_state.operatives.remove(position);

    Ok(Change {
        new_state,
        subject: operative_id.to_string(),
        details: None,
        before,
        after: StateSnapshot::absent(),
        mutation: StoreMutation::DeleteOperative(operative_id.to_string()),
    })
}

// ============================================================================
// Users
// ============================================================================

/// Returns one more than the largest numeric user id.
fn next_user_id(users: &[User]) -> String {
    let highest: u64 = users
        .iter()
        .filter_map(|user| user.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    highest.saturating_add(1).to_string()
}

fn create_user(state: &State, draft: UserDraft) -> Result<Change, CoreError> {
    let username: String = draft.username.trim().to_string();
    let assigned_region: Option<String> = if draft.role.is_regionless() {
        None
    } else {
        draft
            .assigned_region
            .as_deref()
            .map(normalize_trimmed)
            .filter(|region| !region.is_empty())
    };
    let user: User = User {
        id: next_user_id(&state.users),
        full_name: normalize_trimmed(&draft.full_name),
        username,
        password: draft.password,
        role: draft.role,
        assigned_region,
        is_agrupamiento: draft.is_agrupamiento,
    };
    validate_user_fields(&user)?;
    validate_username_unique(&state.users, &user.username, None)?;

    let mut new_state: State = state.clone();
    new_state.users.push(user.clone());

    Ok(Change {
        new_state,
        subject: user.id.clone(),
        details: Some(format!("Created user '{}' as {}", user.username, user.role)),
        before: StateSnapshot::absent(),
        after: user_snapshot(&user),
        mutation: StoreMutation::InsertUser(user),
    })
}

fn edit_user(state: &State, user_id: &str, patch: &UserPatch) -> Result<Change, CoreError> {
    let position: usize = user_position(state, user_id)?;
    let current: &User = &state.users[position];
    let mut updated: User = current.patched(patch);
    updated.username = updated.username.trim().to_string();
    updated.assigned_region = updated
        .assigned_region
        .as_deref()
        .map(normalize_trimmed)
        .filter(|region| !region.is_empty());
    validate_user_fields(&updated)?;
    validate_username_unique(&state.users, &updated.username, Some(user_id))?;

    let before: StateSnapshot = user_snapshot(current);
    let after: StateSnapshot = user_snapshot(&updated);
    let mut new_state: State = state.clone();
    new_state.users[position] = updated.clone();

    Ok(Change {
        new_state,
        subject: user_id.to_string(),
        details: None,
        before,
        after,
        mutation: StoreMutation::UpdateUser(updated),
    })
}

fn delete_user(state: &State, user_id: &str, actor: &User) -> Result<Change, CoreError> {
    if actor.id == user_id {
        return Err(DomainError::SelfDeletion {
            user_id: user_id.to_string(),
        }
        .into());
    }
    let position: usize = user_position(state, user_id)?;
    if state.users[position].username == DEFAULT_ADMIN_USERNAME {
        return Err(DomainError::ProtectedUser {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
        }
        .into());
    }
    let before: StateSnapshot = user_snapshot(&state.users[position]);
    let mut new_state: State = state.clone();
    new_state.users.remove(position);

    Ok(Change {
        new_state,
        subject: user_id.to_string(),
        details: None,
        before,
        after: StateSnapshot::absent(),
        mutation: StoreMutation::DeleteUser(user_id.to_string()),
    })
}

fn update_password(state: &State, actor: &User, new_password: String) -> Result<Change, CoreError> {
    let position: usize = user_position(state, &actor.id)?;
    let mut updated: User = state.users[position].clone();
    updated.password = new_password;

    let mut new_state: State = state.clone();
    new_state.users[position] = updated.clone();

    // Snapshots never carry the password itself.
    Ok(Change {
        new_state,
        subject: actor.id.clone(),
        details: Some(String::from("Password changed")),
        before: user_snapshot(&state.users[position]),
        after: user_snapshot(&updated),
        mutation: StoreMutation::UpdateUser(updated),
    })
}

// ============================================================================
// Catalogs
// ============================================================================

fn type_position(state: &State, name: &str) -> Result<usize, DomainError> {
    state
        .operative_types
        .iter()
        .position(|existing| existing == name)
        .ok_or_else(|| DomainError::OperativeTypeNotFound(name.to_string()))
}

fn add_operative_type(state: &State, name: &str) -> Result<Change, CoreError> {
    let name: String = normalize_trimmed(name);
    validate_operative_type_name(&name)?;
    if state.operative_types.contains(&name) {
        return Err(DomainError::DuplicateOperativeType(name).into());
    }

    let mut new_state: State = state.clone();
    new_state.operative_types.push(name.clone());
    let position: usize = new_state.operative_types.len() - 1;

    Ok(Change {
        before: type_list_snapshot(&state.operative_types),
        after: type_list_snapshot(&new_state.operative_types),
        new_state,
        subject: name.clone(),
        details: None,
        mutation: StoreMutation::InsertOperativeType { name, position },
    })
}

fn remove_operative_type(state: &State, name: &str) -> Result<Change, CoreError> {
    let name: String = normalize_trimmed(name);
    let position: usize = type_position(state, &name)?;

    let mut new_state: State = state.clone();
    new_state.operative_types.remove(position);

    Ok(Change {
        before: type_list_snapshot(&state.operative_types),
        after: type_list_snapshot(&new_state.operative_types),
        new_state,
        subject: name.clone(),
        details: None,
        mutation: StoreMutation::DeleteOperativeType(name),
    })
}

fn move_operative_type(
    state: &State,
    name: &str,
    direction: MoveDirection,
) -> Result<Change, CoreError> {
    let name: String = normalize_trimmed(name);
    let position: usize = type_position(state, &name)?;
    let target: usize = match direction {
        MoveDirection::Up => position.checked_sub(1),
        MoveDirection::Down => position
            .checked_add(1)
            .filter(|next| *next < state.operative_types.len()),
    }
    .ok_or_else(|| DomainError::OperativeTypeAtBoundary(name.clone()))?;

    let mut new_state: State = state.clone();
    new_state.operative_types.swap(position, target);

    Ok(Change {
        before: type_list_snapshot(&state.operative_types),
        after: type_list_snapshot(&new_state.operative_types),
        mutation: StoreMutation::ReorderOperativeTypes(new_state.operative_types.clone()),
        new_state,
        subject: name,
        details: Some(format!("Moved {direction:?}").to_lowercase()),
    })
}

fn add_catalog_entry(state: &State, entry: &CatalogEntry) -> Result<Change, CoreError> {
    let entry: CatalogEntry = CatalogEntry::new(&entry.region, &entry.quadrant, &entry.colony);
    validate_catalog_entry(&entry)?;
    if state.colony_catalog.contains(&entry) {
        return Err(DomainError::DuplicateCatalogEntry(entry).into());
    }

    let mut new_state: State = state.clone();
    new_state.colony_catalog.push(entry.clone());

    Ok(Change {
        new_state,
        subject: entry.to_string(),
        details: None,
        before: StateSnapshot::absent(),
        after: StateSnapshot::new(entry.to_string()),
        mutation: StoreMutation::InsertCatalogEntry(entry),
    })
}

fn remove_catalog_entry(state: &State, entry: &CatalogEntry) -> Result<Change, CoreError> {
    let entry: CatalogEntry = CatalogEntry::new(&entry.region, &entry.quadrant, &entry.colony);
    let position: usize = state
        .colony_catalog
        .iter()
        .position(|existing| *existing == entry)
        .ok_or_else(|| DomainError::CatalogEntryNotFound(entry.clone()))?;

    let mut new_state: State = state.clone();
    new_state.colony_catalog.remove(position);

    Ok(Change {
        new_state,
        subject: entry.to_string(),
        details: None,
        before: StateSnapshot::new(entry.to_string()),
        after: StateSnapshot::absent(),
        mutation: StoreMutation::DeleteCatalogEntry(entry),
    })
}
