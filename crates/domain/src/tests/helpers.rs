// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Institution, Location, Operative, OperativeRecord, OperativeStatus, Role, Shift, Unit, User,
};
use chrono::{NaiveDate, NaiveDateTime};

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

pub fn create_test_unit() -> Unit {
    Unit {
        id: String::from("u1"),
        unit_type: String::from("PATRULLA"),
        unit_number: String::from("P-101"),
        in_charge: String::from("JUAN PEREZ"),
        rank: String::from("OFICIAL"),
        personnel_count: 2,
    }
}

pub fn create_test_record(
    id: &str,
    operative_type: &str,
    region: &str,
    created_by: &str,
) -> OperativeRecord {
    OperativeRecord {
        id: id.to_string(),
        operative_type: operative_type.to_string(),
        specific_type: None,
        start_date: String::from("2024-01-10"),
        start_time: String::from("10:00"),
        status: OperativeStatus::Active,
        region: region.to_string(),
        quadrant: String::from("C-1"),
        shift: Shift::First,
        location: Location {
            latitude: 19.432_608,
            longitude: -99.133_209,
            colony: String::from("CENTRO"),
            street: String::from("MADERO"),
            corner: String::from("BOLIVAR"),
        },
        units: vec![create_test_unit()],
        institutions: vec![Institution {
            id: String::from("i1"),
            name: String::from("PROTECCION CIVIL"),
            personnel_count: 3,
            unit_count: 1,
        }],
        conclusion: None,
        created_by: created_by.to_string(),
    }
}

pub fn create_test_operative(id: &str, region: &str, created_by: &str) -> Operative {
    Operative::try_from(create_test_record(id, "OPERATIVO CARRUSEL", region, created_by)).unwrap()
}

pub fn create_meeting_operative(id: &str) -> Operative {
    Operative::try_from(create_test_record(id, "REUNION VECINAL", "REGION 1", "u-1")).unwrap()
}

pub fn operative_started_at(id: &str, date: &str, time: &str) -> Operative {
    let mut record: OperativeRecord =
        create_test_record(id, "OPERATIVO CARRUSEL", "REGION 1", "u-1");
    record.start_date = date.to_string();
    record.start_time = time.to_string();
    Operative::try_from(record).unwrap()
}
