use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Session configuration. The category sets drift between deployments, so
/// they are data here rather than enums in the models. The budget ceiling is
/// only a default; the CLI can override it per invocation and never persists
/// the override.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) spreadsheet_id: String,
    pub(crate) guest_categories: Vec<String>,
    pub(crate) expense_categories: Vec<String>,
    pub(crate) budget_ceiling: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            guest_categories: vec![
                "Godfather".into(),
                "Godmother".into(),
                "Bride's family".into(),
                "Groom's family".into(),
                "Friends".into(),
            ],
            expense_categories: vec![
                "Ceremony".into(),
                "Reception".into(),
                "Attire".into(),
                "Catering".into(),
                "Decoration".into(),
                "Stationery".into(),
                "Other".into(),
            ],
            budget_ceiling: Decimal::from(30_000),
        }
    }
}

impl Config {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Config file is not valid JSON: {}", path.display()))
    }

    /// A missing file means defaults; a present-but-broken file is an error.
    pub(crate) fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub(crate) fn default_guest_category(&self) -> &str {
        self.guest_categories.first().map(String::as_str).unwrap_or("Guest")
    }

    pub(crate) fn default_expense_category(&self) -> &str {
        self.expense_categories.first().map(String::as_str).unwrap_or("Other")
    }
}

#[cfg(test)]
mod tests;
