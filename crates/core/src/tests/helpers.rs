// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, OperativeDraft, State, TransitionResult, apply, seed_missing};
use chrono::{NaiveDate, NaiveDateTime};
use operativos_domain::{Location, Role, Shift, Unit, User};

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn now() -> NaiveDateTime {
    at(2024, 3, 5, 10, 15)
}

pub fn create_test_user(id: &str, role: Role, region: Option<&str>) -> User {
    User {
        id: id.to_string(),
        full_name: format!("USUARIO {id}"),
        username: format!("user{id}"),
        password: String::from("secret"),
        role,
        assigned_region: region.map(str::to_string),
        is_agrupamiento: false,
    }
}

pub fn admin() -> User {
    crate::default_admin()
}

pub fn create_test_draft(operative_type: &str, region: &str) -> OperativeDraft {
    OperativeDraft {
        operative_type: operative_type.to_string(),
        specific_type: None,
        region: region.to_string(),
        quadrant: String::from("c-1"),
        shift: Shift::First,
        location: Location {
            latitude: 19.4,
            longitude: -99.1,
            colony: String::from("Centro"),
            street: String::from("Madero"),
            corner: String::from("Bolívar"),
        },
        units: vec![Unit {
            id: String::new(),
            unit_type: String::from("patrulla"),
            unit_number: String::from("p-101"),
            in_charge: String::from("Juan Pérez"),
            rank: String::from("oficial"),
            personnel_count: 2,
        }],
        institutions: Vec::new(),
    }
}

/// A seeded state plus the given extra users.
pub fn create_test_state(extra_users: Vec<User>) -> State {
    let mut state: State = seed_missing(&State::new()).new_state;
    state.users.extend(extra_users);
    state
}

/// Creates an operative as `actor` and returns the resulting state and id.
pub fn with_operative(state: &State, actor: &User, operative_type: &str) -> (State, String) {
    let result: TransitionResult = apply(
        state,
        Command::CreateOperative {
            draft: create_test_draft(operative_type, "REGION 1"),
        },
        actor,
        now(),
    )
    .unwrap();
    let id: String = result.audit_event.subject.clone();
    (result.new_state, id)
}
