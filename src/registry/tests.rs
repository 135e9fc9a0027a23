#![allow(clippy::unwrap_used)]

use super::*;
use crate::store::memory::MemoryStore;

fn registry() -> GuestRegistry<MemoryStore> {
    let mut registry = GuestRegistry::new(MemoryStore::new());
    registry.init_header().unwrap();
    registry
}

fn guest(name: &str, companions: u32, attendance: Attendance) -> Guest {
    Guest::new(name.into(), "Friends".into(), companions, attendance)
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

// ── add / list ────────────────────────────────────────────────

#[test]
fn test_add_guest_appears_in_list() {
    let mut registry = registry();
    let before = registry.list_guests().unwrap().records.len();

    let ana = guest("Ana", 2, Attendance::Yes);
    assert!(registry.add_guest(&ana).unwrap());

    let listing = registry.list_guests().unwrap();
    assert_eq!(listing.records.len(), before + 1);
    assert_eq!(listing.records[0], ana);
}

#[test]
fn test_add_guest_empty_name_rejected() {
    let mut registry = registry();
    assert!(!registry.add_guest(&guest("", 0, Attendance::Pending)).unwrap());
    assert!(!registry.add_guest(&guest("   ", 0, Attendance::Pending)).unwrap());
    assert!(registry.list_guests().unwrap().records.is_empty());
}

#[test]
fn test_add_guest_duplicates_allowed() {
    let mut registry = registry();
    let ana = guest("Ana", 0, Attendance::Pending);
    registry.add_guest(&ana).unwrap();
    registry.add_guest(&ana).unwrap();
    assert_eq!(registry.list_guests().unwrap().records.len(), 2);
}

#[test]
fn test_list_empty_store() {
    let mut registry = GuestRegistry::new(MemoryStore::new());
    let listing = registry.list_guests().unwrap();
    assert!(listing.schema_ok());
    assert!(listing.records.is_empty());
}

#[test]
fn test_list_header_only() {
    let mut registry = registry();
    let listing = registry.list_guests().unwrap();
    assert!(listing.schema_ok());
    assert!(listing.records.is_empty());
}

#[test]
fn test_list_degrades_on_missing_header() {
    let store = MemoryStore::with_grid(vec![
        row(&["Nome", "Papel"]),
        row(&["Ana", "Madrinha"]),
    ]);
    let mut registry = GuestRegistry::new(store);

    let listing = registry.list_guests().unwrap();
    assert!(!listing.schema_ok());
    assert!(listing.records.is_empty());
    assert!(listing.missing_columns.contains(&"Categoria".to_string()));
}

#[test]
fn test_list_coerces_bad_companion_count_to_zero() {
    let store = MemoryStore::with_grid(vec![
        row(&["Nome", "Categoria", "Acompanhantes", "Presença"]),
        row(&["Ana", "Friends", "two", "Yes"]),
        row(&["Bruno", "Friends", "", "No"]),
    ]);
    let mut registry = GuestRegistry::new(store);

    let guests = registry.list_guests().unwrap().records;
    assert_eq!(guests[0].companions, 0);
    assert_eq!(guests[1].companions, 0);
}

#[test]
fn test_list_coerces_unknown_attendance_to_pending() {
    let store = MemoryStore::with_grid(vec![
        row(&["Nome", "Categoria", "Acompanhantes", "Presença"]),
        row(&["Ana", "Friends", "1", "maybe??"]),
    ]);
    let mut registry = GuestRegistry::new(store);

    let guests = registry.list_guests().unwrap().records;
    assert_eq!(guests[0].attendance, Attendance::Pending);
}

// ── replace_all ───────────────────────────────────────────────

#[test]
fn test_replace_all_roundtrip_idempotent() {
    let mut registry = registry();
    registry.add_guest(&guest("Ana", 2, Attendance::Yes)).unwrap();
    registry.add_guest(&guest("Bruno", 0, Attendance::Pending)).unwrap();
    registry.add_guest(&guest("Carla", 1, Attendance::No)).unwrap();

    let first = registry.list_guests().unwrap().records;
    registry.replace_all_guests(&first).unwrap();
    let second = registry.list_guests().unwrap().records;
    assert_eq!(first, second);
}

#[test]
fn test_replace_all_omission_is_deletion() {
    let mut registry = registry();
    registry.add_guest(&guest("Ana", 0, Attendance::Yes)).unwrap();
    registry.add_guest(&guest("Bruno", 0, Attendance::Yes)).unwrap();

    let mut edited = registry.list_guests().unwrap().records;
    edited.retain(|g| g.name != "Ana");
    registry.replace_all_guests(&edited).unwrap();

    let remaining = registry.list_guests().unwrap().records;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Bruno");
}

#[test]
fn test_replace_all_empty_keeps_header() {
    let mut registry = registry();
    registry.add_guest(&guest("Ana", 0, Attendance::Yes)).unwrap();
    registry.replace_all_guests(&[]).unwrap();

    let listing = registry.list_guests().unwrap();
    assert!(listing.schema_ok());
    assert!(listing.records.is_empty());

    // The sheet is usable again right away.
    registry.add_guest(&guest("Bruno", 0, Attendance::Pending)).unwrap();
    assert_eq!(registry.list_guests().unwrap().records.len(), 1);
}

// ── summarize ─────────────────────────────────────────────────

#[test]
fn test_summarize() {
    let guests = vec![
        guest("A", 2, Attendance::Yes),
        guest("B", 0, Attendance::Pending),
    ];
    let summary = summarize(&guests);
    assert_eq!(summary.invitations, 2);
    assert_eq!(summary.total_people, 4);
    assert_eq!(summary.confirmed_people, 3);
}

#[test]
fn test_summarize_empty() {
    let summary = summarize(&[]);
    assert_eq!(summary.invitations, 0);
    assert_eq!(summary.total_people, 0);
    assert_eq!(summary.confirmed_people, 0);
}

#[test]
fn test_summarize_declines_not_confirmed() {
    let guests = vec![guest("A", 5, Attendance::No)];
    let summary = summarize(&guests);
    assert_eq!(summary.total_people, 6);
    assert_eq!(summary.confirmed_people, 0);
}

// ── CSV export ────────────────────────────────────────────────

#[test]
fn test_guests_to_csv() {
    let guests = vec![
        guest("Ana", 2, Attendance::Yes),
        guest("Bruno", 0, Attendance::Pending),
    ];
    let blob = guests_to_csv(&guests).unwrap();
    let mut lines = blob.lines();
    assert_eq!(lines.next().unwrap(), "Nome,Categoria,Acompanhantes,Presença");
    assert_eq!(lines.next().unwrap(), "Ana,Friends,2,Yes");
    assert_eq!(lines.next().unwrap(), "Bruno,Friends,0,Pending");
    assert!(lines.next().is_none());
}

#[test]
fn test_guests_to_csv_quotes_separator() {
    let guests = vec![Guest::new(
        "Silva, Ana".into(),
        "Bride's family".into(),
        0,
        Attendance::Yes,
    )];
    let blob = guests_to_csv(&guests).unwrap();
    assert!(blob.contains("\"Silva, Ana\""));
}

#[test]
fn test_guests_to_csv_empty_is_header_only() {
    let blob = guests_to_csv(&[]).unwrap();
    assert_eq!(blob.trim_end(), "Nome,Categoria,Acompanhantes,Presença");
}
