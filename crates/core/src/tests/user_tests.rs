// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{admin, create_test_state, create_test_user, now};
use crate::{Command, CoreError, State, StoreMutation, TransitionResult, UserDraft, apply};
use operativos_domain::{DomainError, Role, User, UserPatch};

fn draft(username: &str, role: Role, region: Option<&str>) -> UserDraft {
    UserDraft {
        full_name: String::from("Lucía Ramírez"),
        username: username.to_string(),
        password: String::from("clave"),
        role,
        assigned_region: region.map(str::to_string),
        is_agrupamiento: false,
    }
}

#[test]
fn test_create_user_assigns_next_numeric_id() {
    let state: State = create_test_state(Vec::new());
    let result: TransitionResult = apply(
        &state,
        Command::CreateUser {
            draft: draft("lramirez", Role::Regional, Some("region 2")),
        },
        &admin(),
        now(),
    )
    .unwrap();

    let user: &User = result.new_state.find_user("2").unwrap();
    assert_eq!(user.full_name, "LUCIA RAMIREZ");
    assert_eq!(user.assigned_region.as_deref(), Some("REGION 2"));
    assert!(matches!(result.mutation, StoreMutation::InsertUser(_)));
    assert!(!result.audit_event.after.data.contains("clave"));
}

#[test]
fn test_create_user_drops_region_for_regionless_roles() {
    let state: State = create_test_state(Vec::new());
    let result: TransitionResult = apply(
        &state,
        Command::CreateUser {
            draft: draft("analista", Role::Analyst, Some("REGION 1")),
        },
        &admin(),
        now(),
    )
    .unwrap();
    assert_eq!(result.new_state.find_user("2").unwrap().assigned_region, None);
}

#[test]
fn test_create_user_rejects_duplicate_username() {
    let state: State = create_test_state(Vec::new());
    let result = apply(
        &state,
        Command::CreateUser {
            draft: draft("admin", Role::Director, None),
        },
        &admin(),
        now(),
    );
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::DuplicateUsername(
            String::from("admin")
        )))
    );
}

#[test]
fn test_edit_user_keeps_own_username() {
    let regional: User = create_test_user("7", Role::Regional, Some("REGION 1"));
    let state: State = create_test_state(vec![regional]);
    let result: TransitionResult = apply(
        &state,
        Command::EditUser {
            user_id: String::from("7"),
            patch: UserPatch {
                username: Some(String::from("user7")),
                assigned_region: Some(Some(String::from("REGION 4"))),
                ..UserPatch::default()
            },
        },
        &admin(),
        now(),
    )
    .unwrap();
    let edited: &User = result.new_state.find_user("7").unwrap();
    assert_eq!(edited.assigned_region.as_deref(), Some("REGION 4"));
}

#[test]
fn test_admin_cannot_delete_self() {
    let state: State = create_test_state(Vec::new());
    let result = apply(
        &state,
        Command::DeleteUser {
            user_id: String::from("1"),
        },
        &admin(),
        now(),
    );
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::SelfDeletion {
            user_id: String::from("1")
        }))
    );
}

#[test]
fn test_main_admin_cannot_be_deleted_by_another_admin() {
    let second_admin: User = create_test_user("7", Role::Admin, None);
    let state: State = create_test_state(vec![second_admin.clone()]);
    let result = apply(
        &state,
        Command::DeleteUser {
            user_id: String::from("1"),
        },
        &second_admin,
        now(),
    );
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::ProtectedUser {
            username: String::from("admin")
        }))
    );
}

#[test]
fn test_delete_user() {
    let state: State = create_test_state(vec![create_test_user("9", Role::Patrolman, None)]);
    let result: TransitionResult = apply(
        &state,
        Command::DeleteUser {
            user_id: String::from("9"),
        },
        &admin(),
        now(),
    )
    .unwrap();
    assert!(result.new_state.find_user("9").is_none());
    assert_eq!(result.mutation, StoreMutation::DeleteUser(String::from("9")));
}

#[test]
fn test_update_password_changes_only_actor() {
    let director: User = create_test_user("3", Role::Director, None);
    let state: State = create_test_state(vec![director.clone()]);
    let result: TransitionResult = apply(
        &state,
        Command::UpdatePassword {
            new_password: String::from("nueva1"),
        },
        &director,
        now(),
    )
    .unwrap();
    assert_eq!(result.new_state.find_user("3").unwrap().password, "nueva1");
    assert_eq!(result.new_state.find_user("1").unwrap().password, "adm123");
    assert!(!result.audit_event.after.data.contains("nueva1"));
}
