use anyhow::Result;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use crate::models::{Expense, PaymentStatus};
use crate::store::{cell, missing_columns, Listing, Record, TabularStore};

/// Column order of the Expenses worksheet.
pub(crate) const EXPENSE_COLUMNS: [&str; 5] =
    ["Item", "Categoria", "Valor Previsto", "Valor Pago", "Status"];

pub(crate) struct ExpenseLedger<S: TabularStore> {
    store: S,
}

impl<S: TabularStore> ExpenseLedger<S> {
    pub(crate) fn new(store: S) -> Self {
        Self { store }
    }

    /// Appends one expense row; an empty item name is silently rejected
    /// (Ok(false), nothing persisted).
    pub(crate) fn add_expense(&mut self, expense: &Expense) -> Result<bool> {
        if expense.item.trim().is_empty() {
            return Ok(false);
        }
        self.store.append_row(&expense_row(expense))?;
        Ok(true)
    }

    /// Reads the whole worksheet, degrading to a missing-schema listing when
    /// expected header names are absent. Amount cells that fail to parse
    /// coerce to zero rather than erroring.
    pub(crate) fn list_expenses(&mut self) -> Result<Listing<Expense>> {
        let records = self.store.read_all_rows()?;
        let Some(first) = records.first() else {
            return Ok(Listing::empty());
        };
        let missing = missing_columns(first, &EXPENSE_COLUMNS);
        if !missing.is_empty() {
            return Ok(Listing::degraded(missing));
        }
        Ok(Listing::complete(records.iter().map(expense_from_record).collect()))
    }

    /// Clear + rewrite header and all rows; omission is deletion. Same
    /// non-atomic window as the guest registry's bulk replace.
    pub(crate) fn replace_all_expenses(&mut self, expenses: &[Expense]) -> Result<()> {
        let mut rows = Vec::with_capacity(expenses.len() + 1);
        rows.push(header_row());
        rows.extend(expenses.iter().map(expense_row));
        self.store.clear()?;
        self.store.append_rows(&rows)
    }

    /// Provisions (or resets) the worksheet to just its header row.
    pub(crate) fn init_header(&mut self) -> Result<()> {
        self.replace_all_expenses(&[])
    }
}

fn header_row() -> Vec<String> {
    EXPENSE_COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn expense_row(expense: &Expense) -> Vec<String> {
    vec![
        expense.item.clone(),
        expense.category.clone(),
        expense.budgeted.to_string(),
        expense.paid.to_string(),
        expense.status.as_str().to_string(),
    ]
}

fn expense_from_record(record: &Record) -> Expense {
    Expense::new(
        cell(record, EXPENSE_COLUMNS[0]),
        cell(record, EXPENSE_COLUMNS[1]),
        coerce_decimal(&cell(record, EXPENSE_COLUMNS[2])),
        coerce_decimal(&cell(record, EXPENSE_COLUMNS[3])),
        PaymentStatus::parse(&cell(record, EXPENSE_COLUMNS[4])),
    )
}

/// Permissive-on-read policy: strip currency noise, and anything that still
/// fails to parse becomes zero, never an error.
fn coerce_decimal(raw: &str) -> Decimal {
    let cleaned = raw.replace("R$", "").replace(['$', ','], "");
    Decimal::from_str(cleaned.trim()).unwrap_or_default()
}

// ── Aggregates ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Totals {
    pub(crate) budgeted: Decimal,
    pub(crate) paid: Decimal,
    /// budgeted - paid; negative when overpaid, not clamped.
    pub(crate) remaining: Decimal,
}

pub(crate) fn compute_totals(expenses: &[Expense]) -> Totals {
    let budgeted: Decimal = expenses.iter().map(|e| e.budgeted).sum();
    let paid: Decimal = expenses.iter().map(|e| e.paid).sum();
    Totals {
        budgeted,
        paid,
        remaining: budgeted - paid,
    }
}

/// Percentage of the ceiling the budgeted total consumes. Unclamped: over
/// 100 signals overspend. A positive ceiling is caller-enforced; a zero or
/// negative one reports zero instead of dividing by it.
pub(crate) fn budget_usage(total_budgeted: Decimal, ceiling: Decimal) -> Decimal {
    if ceiling <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    total_budgeted / ceiling * Decimal::ONE_HUNDRED
}

/// Fill fraction for a progress indicator. Only the visual gauge clamps at
/// 100%; the reported percentage never does.
pub(crate) fn usage_gauge(percentage: Decimal) -> f64 {
    (percentage.to_f64().unwrap_or(0.0) / 100.0).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct CategoryTotals {
    pub(crate) budgeted: Decimal,
    pub(crate) paid: Decimal,
}

/// Sums per category. Iteration order is whatever the map produces; callers
/// that display this sort it themselves.
pub(crate) fn group_by_category(expenses: &[Expense]) -> HashMap<String, CategoryTotals> {
    let mut groups: HashMap<String, CategoryTotals> = HashMap::new();
    for expense in expenses {
        let entry = groups.entry(expense.category.clone()).or_default();
        entry.budgeted += expense.budgeted;
        entry.paid += expense.paid;
    }
    groups
}
