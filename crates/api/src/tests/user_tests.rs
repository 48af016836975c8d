// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{TestContext, admin, create_test_user, now};
use crate::error::ApiError;
use crate::handlers::{create_user, delete_user, edit_user, list_users, update_password};
use crate::request_response::{
    CreateUserRequest, EditUserRequest, ListUsersResponse, MutationResponse, UpdatePasswordRequest,
};
use operativos_domain::{Role, User};
use operativos_persistence::RecordStore;

fn create_request(username: &str, role: &str, region: Option<&str>) -> CreateUserRequest {
    CreateUserRequest {
        full_name: String::from("José Martínez"),
        username: username.to_string(),
        password: String::from("clave"),
        role: role.to_string(),
        assigned_region: region.map(str::to_string),
        is_agrupamiento: false,
    }
}

#[test]
fn test_create_user_with_legacy_role_alias() {
    let mut ctx: TestContext = TestContext::seeded();
    let state = ctx.state.clone();

    let result = create_user(
        &mut ctx.persistence,
        &state,
        &admin(),
        create_request("jmartinez", "patrolman", Some("region 2")),
        now(),
    )
    .unwrap();
    let response: MutationResponse = ctx.accept(result);

    assert_eq!(response.id.as_deref(), Some("2"));
    let stored: User = ctx.persistence.get_user("2").unwrap().unwrap();
    assert_eq!(stored.role, Role::Patrolman);
    assert_eq!(stored.full_name, "JOSE MARTINEZ");
    assert_eq!(stored.assigned_region.as_deref(), Some("REGION 2"));
}

#[test]
fn test_regionless_roles_drop_assigned_region() {
    let mut ctx: TestContext = TestContext::seeded();
    let state = ctx.state.clone();

    let result = create_user(
        &mut ctx.persistence,
        &state,
        &admin(),
        create_request("analista", "ANALISTA", Some("REGION 1")),
        now(),
    )
    .unwrap();
    ctx.accept(result);

    let stored: User = ctx.persistence.get_user("2").unwrap().unwrap();
    assert_eq!(stored.assigned_region, None);
}

#[test]
fn test_unknown_role_names_the_field() {
    let mut ctx: TestContext = TestContext::seeded();
    let state = ctx.state.clone();

    let result = create_user(
        &mut ctx.persistence,
        &state,
        &admin(),
        create_request("someone", "SHERIFF", None),
        now(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "role"
    ));
}

#[test]
fn test_duplicate_username_is_rejected() {
    let mut ctx: TestContext = TestContext::seeded();
    let state = ctx.state.clone();

    let result = create_user(
        &mut ctx.persistence,
        &state,
        &admin(),
        create_request("admin", "DIRECTOR", None),
        now(),
    );

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "unique_username"
    ));
}

#[test]
fn test_region_scoped_user_requires_region() {
    let mut ctx: TestContext = TestContext::seeded();
    let state = ctx.state.clone();

    let result = create_user(
        &mut ctx.persistence,
        &state,
        &admin(),
        create_request("regional", "REGIONAL", None),
        now(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "assigned_region"
    ));
}

#[test]
fn test_edit_user_changes_role() {
    let mut ctx: TestContext = TestContext::seeded();
    ctx.add_user(create_test_user("2", Role::Patrolman, Some("REGION 1")));
    let state = ctx.state.clone();

    let result = edit_user(
        &mut ctx.persistence,
        &state,
        &admin(),
        "2",
        EditUserRequest {
            role: Some(String::from("JEFE_DE_TURNO")),
            ..EditUserRequest::default()
        },
        now(),
    )
    .unwrap();
    ctx.accept(result);

    let stored: User = ctx.persistence.get_user("2").unwrap().unwrap();
    assert_eq!(stored.role, Role::ShiftLeader);
    assert_eq!(stored.assigned_region.as_deref(), Some("REGION 1"));
}

#[test]
fn test_admin_cannot_delete_self() {
    let mut ctx: TestContext = TestContext::seeded();
    let state = ctx.state.clone();

    let result = delete_user(&mut ctx.persistence, &state, &admin(), "1", now());

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "no_self_deletion"
    ));
}

#[test]
fn test_main_admin_is_protected_from_other_admins() {
    let mut ctx: TestContext = TestContext::seeded();
    let second_admin: User = ctx.add_user(create_test_user("2", Role::Admin, None));
    let state = ctx.state.clone();

    let result = delete_user(&mut ctx.persistence, &state, &second_admin, "1", now());

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "main_admin_protected"
    ));
    assert!(ctx.persistence.get_user("1").unwrap().is_some());
}

#[test]
fn test_delete_user() {
    let mut ctx: TestContext = TestContext::seeded();
    ctx.add_user(create_test_user("2", Role::Patrolman, Some("REGION 1")));
    let state = ctx.state.clone();

    let result = delete_user(&mut ctx.persistence, &state, &admin(), "2", now()).unwrap();
    ctx.accept(result);

    assert!(ctx.persistence.get_user("2").unwrap().is_none());
    let listed: ListUsersResponse = list_users(&ctx.state, &admin()).unwrap();
    assert_eq!(listed.users.len(), 1);
}

#[test]
fn test_delete_unknown_user_is_not_found() {
    let mut ctx: TestContext = TestContext::seeded();
    let state = ctx.state.clone();

    let result = delete_user(&mut ctx.persistence, &state, &admin(), "42", now());

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_update_password_checks_policy() {
    let mut ctx: TestContext = TestContext::seeded();
    let state = ctx.state.clone();

    let mismatch = update_password(
        &mut ctx.persistence,
        &state,
        &admin(),
        &UpdatePasswordRequest {
            new_password: String::from("nueva1"),
            confirmation: String::from("nueva2"),
        },
        now(),
    );
    assert!(matches!(
        mismatch,
        Err(ApiError::PasswordPolicyViolation { .. })
    ));

    let short = update_password(
        &mut ctx.persistence,
        &state,
        &admin(),
        &UpdatePasswordRequest {
            new_password: String::from("abc"),
            confirmation: String::from("abc"),
        },
        now(),
    );
    assert!(matches!(short, Err(ApiError::PasswordPolicyViolation { .. })));
}

#[test]
fn test_update_password_applies_to_acting_user() {
    let mut ctx: TestContext = TestContext::seeded();
    let state = ctx.state.clone();

    let result = update_password(
        &mut ctx.persistence,
        &state,
        &admin(),
        &UpdatePasswordRequest {
            new_password: String::from("nueva-clave"),
            confirmation: String::from("nueva-clave"),
        },
        now(),
    )
    .unwrap();
    ctx.accept(result);

    let stored: Vec<User> = ctx.persistence.list_users().unwrap();
    assert_eq!(stored[0].password, "nueva-clave");
    assert_eq!(ctx.state.find_user("1").unwrap().password, "nueva-clave");
}

#[test]
fn test_listed_users_omit_passwords() {
    let ctx: TestContext = TestContext::seeded();

    let listed: ListUsersResponse = list_users(&ctx.state, &admin()).unwrap();
    let json: serde_json::Value = serde_json::to_value(&listed).unwrap();

    assert!(json["users"][0].get("password").is_none());
    assert_eq!(json["users"][0]["username"], "admin");
}
