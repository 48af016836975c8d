// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::create_test_persistence;
use crate::{Persistence, PersistenceError, RecordStore};
use operativos_domain::CatalogEntry;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| (*name).to_string()).collect()
}

#[test]
fn test_insert_type_at_position_shifts_later_types() {
    let mut persistence: Persistence = create_test_persistence();
    persistence.insert_operative_type("A", 0).unwrap();
    persistence.insert_operative_type("B", 1).unwrap();

    persistence.insert_operative_type("C", 1).unwrap();

    assert_eq!(
        persistence.list_operative_types().unwrap(),
        names(&["A", "C", "B"])
    );
}

#[test]
fn test_reorder_types() {
    let mut persistence: Persistence = create_test_persistence();
    for (position, name) in ["A", "B", "C"].iter().enumerate() {
        persistence.insert_operative_type(name, position).unwrap();
    }

    persistence
        .reorder_operative_types(&names(&["C", "A", "B"]))
        .unwrap();

    assert_eq!(
        persistence.list_operative_types().unwrap(),
        names(&["C", "A", "B"])
    );
}

#[test]
fn test_reorder_with_unknown_type_changes_nothing() {
    let mut persistence: Persistence = create_test_persistence();
    persistence.insert_operative_type("A", 0).unwrap();
    persistence.insert_operative_type("B", 1).unwrap();

    let result: Result<(), PersistenceError> =
        persistence.reorder_operative_types(&names(&["B", "Z", "A"]));

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
    assert_eq!(persistence.list_operative_types().unwrap(), names(&["A", "B"]));
}

#[test]
fn test_delete_type() {
    let mut persistence: Persistence = create_test_persistence();
    persistence.insert_operative_type("A", 0).unwrap();

    persistence.delete_operative_type("A").unwrap();

    assert!(persistence.list_operative_types().unwrap().is_empty());
    assert!(persistence.delete_operative_type("A").is_err());
}

#[test]
fn test_catalog_entries_are_unique_per_triple() {
    let mut persistence: Persistence = create_test_persistence();
    let entry: CatalogEntry = CatalogEntry::new("REGION 1", "C-1", "CENTRO");

    persistence.insert_catalog_entry(&entry).unwrap();

    assert!(persistence.insert_catalog_entry(&entry).is_err());
    assert_eq!(persistence.list_catalog_entries().unwrap(), vec![entry]);
}

#[test]
fn test_delete_catalog_entry_by_exact_triple() {
    let mut persistence: Persistence = create_test_persistence();
    let centro: CatalogEntry = CatalogEntry::new("REGION 1", "C-1", "CENTRO");
    let merced: CatalogEntry = CatalogEntry::new("REGION 1", "C-1", "LA MERCED");
    persistence.insert_catalog_entry(&centro).unwrap();
    persistence.insert_catalog_entry(&merced).unwrap();

    persistence.delete_catalog_entry(&centro).unwrap();

    assert_eq!(persistence.list_catalog_entries().unwrap(), vec![merced]);
    assert!(matches!(
        persistence.delete_catalog_entry(&CatalogEntry::new("REGION 2", "C-1", "CENTRO")),
        Err(PersistenceError::NotFound(_))
    ));
}
