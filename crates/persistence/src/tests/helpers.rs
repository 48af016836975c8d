// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use chrono::{NaiveDate, NaiveDateTime};
use operativos_domain::{
    ConclusionData, ConclusionResult, Institution, Location, Operative, OperativeRecord,
    OperativeStatus, Role, Shift, Tallies, Unit, User,
};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
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

pub fn create_test_operative(id: &str, region: &str, created_by: &str) -> Operative {
    let record: OperativeRecord = OperativeRecord {
        id: id.to_string(),
        operative_type: String::from("OPERATIVO CARRUSEL"),
        specific_type: None,
        start_date: String::from("2024-03-05"),
        start_time: String::from("10:15"),
        status: OperativeStatus::Active,
        region: region.to_string(),
        quadrant: String::from("C-1"),
        shift: Shift::Second,
        location: Location {
            latitude: 19.432_608,
            longitude: -99.133_209,
            colony: String::from("CENTRO"),
            street: String::from("MADERO"),
            corner: String::from("BOLIVAR"),
        },
        units: vec![Unit {
            id: format!("{id}-U1"),
            unit_type: String::from("PATRULLA"),
            unit_number: String::from("P-101"),
            in_charge: String::from("JUAN PEREZ"),
            rank: String::from("OFICIAL"),
            personnel_count: 2,
        }],
        institutions: vec![Institution {
            id: format!("{id}-I1"),
            name: String::from("PROTECCION CIVIL"),
            personnel_count: 3,
            unit_count: 1,
        }],
        conclusion: None,
        created_by: created_by.to_string(),
    };
    Operative::try_from(record).unwrap()
}

pub fn create_test_conclusion() -> ConclusionData {
    ConclusionData {
        location: String::from("MADERO, BOLIVAR, CENTRO"),
        colonies_covered: vec![String::from("CENTRO")],
        tallies: Tallies {
            people_checked: 12,
            public_transport_checked: 3,
            private_vehicles_checked: 5,
            motorcycles_checked: 1,
        },
        result: ConclusionResult::ReferredToProsecutor,
        concluded_at: at(2024, 3, 5, 14, 40),
        detainees_count: Some(2),
        detention_reason: None,
        crime_type: Some(String::from("THEFT")),
        fiscalia_target: Some(String::from("UNIT 3")),
        reunion_details: None,
    }
}
