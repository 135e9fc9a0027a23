#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;
use std::io::Write;

use super::*;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert!(config.spreadsheet_id.is_empty());
    assert!(!config.guest_categories.is_empty());
    assert!(!config.expense_categories.is_empty());
    assert_eq!(config.budget_ceiling, dec!(30000));
    assert_eq!(config.default_guest_category(), "Godfather");
    assert_eq!(config.default_expense_category(), "Ceremony");
}

#[test]
fn test_partial_json_falls_back_per_field() {
    let config: Config =
        serde_json::from_str(r#"{"spreadsheet_id": "abc123", "budget_ceiling": "12500.50"}"#)
            .unwrap();
    assert_eq!(config.spreadsheet_id, "abc123");
    assert_eq!(config.budget_ceiling, dec!(12500.50));
    // Untouched fields keep their defaults.
    assert_eq!(config.guest_categories, Config::default().guest_categories);
}

#[test]
fn test_custom_category_sets() {
    let config: Config = serde_json::from_str(
        r#"{"guest_categories": ["Padrinho", "Madrinha", "Convidado Geral"]}"#,
    )
    .unwrap();
    assert_eq!(config.guest_categories.len(), 3);
    assert_eq!(config.default_guest_category(), "Padrinho");
}

#[test]
fn test_load_missing_file_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_or_default(&dir.path().join("nope.json")).unwrap();
    assert_eq!(config.budget_ceiling, Config::default().budget_ceiling);
}

#[test]
fn test_load_broken_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"{not json").unwrap();
    assert!(Config::load_or_default(&path).is_err());
}

#[test]
fn test_load_roundtrip_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"spreadsheet_id": "sheet-1"}"#).unwrap();
    let config = Config::load_or_default(&path).unwrap();
    assert_eq!(config.spreadsheet_id, "sheet-1");
}
