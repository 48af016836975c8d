// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::handlers::{ApiResult, conclude_operative, create_operative};
use crate::request_response::MutationResponse;
use chrono::{NaiveDate, NaiveDateTime};
use operativos::{OperativeDraft, State, default_admin};
use operativos_audit::AuditEvent;
use operativos_domain::{
    CatalogEntry, ClosureReport, Location, Operative, Permission, ReunionDetails, Role, Shift,
    Tallies, Unit, User,
};
use operativos_persistence::{Persistence, PersistenceError, RecordStore};

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Inside the second shift of 2024-03-05.
pub fn now() -> NaiveDateTime {
    at(2024, 3, 5, 10, 15)
}

/// A seeded in-memory store and the state loaded from it.
pub struct TestContext {
    pub persistence: Persistence,
    pub state: State,
}

impl TestContext {
    pub fn seeded() -> Self {
        let mut persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory database");
        let state: State = persistence.ensure_seeded().expect("Failed to seed database");
        Self { persistence, state }
    }

    /// Stores `user` and adds it to the cached state.
    pub fn add_user(&mut self, user: User) -> User {
        self.persistence.insert_user(&user).unwrap();
        self.state.users.push(user.clone());
        user
    }

    /// Replaces the cached state with the result of a successful write.
    pub fn accept<T>(&mut self, result: ApiResult<T>) -> T {
        self.state = result.new_state;
        result.response
    }

    /// Creates an operative as `actor` and returns its id.
    pub fn create_operative_as(
        &mut self,
        actor: &User,
        operative_type: &str,
        region: &str,
    ) -> String {
        let state: State = self.state.clone();
        let result: ApiResult<MutationResponse> = create_operative(
            &mut self.persistence,
            &state,
            actor,
            create_test_draft(operative_type, region),
            now(),
        )
        .unwrap();
        self.accept(result).id.unwrap()
    }

    /// Concludes a neighborhood meeting as `actor`.
    pub fn conclude_meeting_as(&mut self, actor: &User, operative_id: &str) {
        let state: State = self.state.clone();
        let result: ApiResult<MutationResponse> = conclude_operative(
            &mut self.persistence,
            &state,
            actor,
            operative_id,
            meeting_report(),
            at(2024, 3, 5, 12, 30),
        )
        .unwrap();
        self.accept(result);
    }

    pub fn operative(&self, operative_id: &str) -> &Operative {
        self.state.find_operative(operative_id).unwrap()
    }
}

pub fn admin() -> User {
    default_admin()
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

pub fn create_test_draft(operative_type: &str, region: &str) -> OperativeDraft {
    OperativeDraft {
        operative_type: operative_type.to_string(),
        specific_type: None,
        region: region.to_string(),
        quadrant: String::from("C-1"),
        shift: Shift::Second,
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

pub fn deterrence_report() -> ClosureReport {
    ClosureReport::deterrence(Tallies {
        people_checked: 10,
        public_transport_checked: 4,
        private_vehicles_checked: 6,
        motorcycles_checked: 2,
    })
}

pub fn meeting_report() -> ClosureReport {
    let mut report: ClosureReport = ClosureReport::deterrence(Tallies::ZERO);
    report.reunion_details = Some(ReunionDetails {
        representative_name: String::from("María López"),
        phone: String::from("5512345678"),
        participant_count: 25,
        petitions: String::from("Más patrullaje\nAlumbrado público"),
    });
    report
}

/// A store that delegates to a real database but can be told to reject
/// writes or audit records.
pub struct FlakyStore {
    pub inner: Persistence,
    pub fail_writes: bool,
    pub fail_audit: bool,
}

impl FlakyStore {
    pub fn new(fail_writes: bool, fail_audit: bool) -> Self {
        Self {
            inner: Persistence::new_in_memory().expect("Failed to create in-memory database"),
            fail_writes,
            fail_audit,
        }
    }

    fn write(&self) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(PersistenceError::DatabaseError(String::from(
                "disk I/O error",
            )));
        }
        Ok(())
    }
}

impl RecordStore for FlakyStore {
    fn list_operatives(&mut self) -> Result<Vec<Operative>, PersistenceError> {
        self.inner.list_operatives()
    }

    fn insert_operative(&mut self, operative: &Operative) -> Result<(), PersistenceError> {
        self.write()?;
        self.inner.insert_operative(operative)
    }

    fn update_operative(&mut self, operative: &Operative) -> Result<(), PersistenceError> {
        self.write()?;
        self.inner.update_operative(operative)
    }

    fn delete_operative(&mut self, operative_id: &str) -> Result<(), PersistenceError> {
        self.write()?;
        self.inner.delete_operative(operative_id)
    }

    fn list_users(&mut self) -> Result<Vec<User>, PersistenceError> {
        self.inner.list_users()
    }

    fn insert_user(&mut self, user: &User) -> Result<(), PersistenceError> {
        self.write()?;
        self.inner.insert_user(user)
    }

    fn update_user(&mut self, user: &User) -> Result<(), PersistenceError> {
        self.write()?;
        self.inner.update_user(user)
    }

    fn delete_user(&mut self, user_id: &str) -> Result<(), PersistenceError> {
        self.write()?;
        self.inner.delete_user(user_id)
    }

    fn list_operative_types(&mut self) -> Result<Vec<String>, PersistenceError> {
        self.inner.list_operative_types()
    }

    fn insert_operative_type(
        &mut self,
        name: &str,
        position: usize,
    ) -> Result<(), PersistenceError> {
        self.write()?;
        self.inner.insert_operative_type(name, position)
    }

    fn delete_operative_type(&mut self, name: &str) -> Result<(), PersistenceError> {
        self.write()?;
        self.inner.delete_operative_type(name)
    }

    fn reorder_operative_types(&mut self, names: &[String]) -> Result<(), PersistenceError> {
        self.write()?;
        self.inner.reorder_operative_types(names)
    }

    fn list_catalog_entries(&mut self) -> Result<Vec<CatalogEntry>, PersistenceError> {
        self.inner.list_catalog_entries()
    }

    fn insert_catalog_entry(&mut self, entry: &CatalogEntry) -> Result<(), PersistenceError> {
        self.write()?;
        self.inner.insert_catalog_entry(entry)
    }

    fn delete_catalog_entry(&mut self, entry: &CatalogEntry) -> Result<(), PersistenceError> {
        self.write()?;
        self.inner.delete_catalog_entry(entry)
    }

    fn record_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        if self.fail_audit {
            return Err(PersistenceError::DatabaseError(String::from(
                "audit table locked",
            )));
        }
        self.inner.record_audit_event(event)
    }
}

/// Roles holding `permission`, for table-driven assertions.
pub fn roles_with(permission: Permission) -> Vec<Role> {
    Role::ALL
        .into_iter()
        .filter(|role| role.has_permission(permission))
        .collect()
}
