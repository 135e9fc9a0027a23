use anyhow::Result;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::config::Config;
use crate::ledger::{self, ExpenseLedger};
use crate::models::{Attendance, Expense, Guest, PaymentStatus};
use crate::registry::{self, GuestRegistry};
use crate::store::sheets::{Credential, SheetsClient};
use crate::store::TabularStore;

pub(crate) const GUESTS_SHEET: &str = "Guests";
pub(crate) const EXPENSES_SHEET: &str = "Expenses";

pub(crate) fn as_cli(args: &[String], config: &Config) -> Result<()> {
    match args[1].as_str() {
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("wedsheet {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        command => {
            // One connection per process; a failed probe ends the session
            // here, before any command runs.
            let client = connect(config)?;
            let mut guests = GuestRegistry::new(client.worksheet(GUESTS_SHEET));
            let mut expenses = ExpenseLedger::new(client.worksheet(EXPENSES_SHEET));

            match command {
                "init" => cli_init(&mut guests, &mut expenses),
                "guests" => cli_guests(&mut guests),
                "add-guest" => cli_add_guest(&args[2..], &mut guests, config),
                "remove-guest" => cli_remove_guest(&args[2..], &mut guests),
                "rsvp" => cli_rsvp(&args[2..], &mut guests),
                "export" => cli_export(&args[2..], &mut guests),
                "expenses" => cli_expenses(&mut expenses),
                "add-expense" => cli_add_expense(&args[2..], &mut expenses, config),
                "remove-expense" => cli_remove_expense(&args[2..], &mut expenses),
                "budget" => cli_budget(&args[2..], &mut expenses, config),
                other => {
                    print_usage();
                    anyhow::bail!("Unknown command: {other}");
                }
            }
        }
    }
}

pub(crate) fn print_usage() {
    println!("Wedsheet — spreadsheet-backed wedding guest list and budget tracker");
    println!();
    println!("Usage: wedsheet <command>");
    println!();
    println!("Commands:");
    println!("  init                          Provision (or reset) the worksheet headers");
    println!("  guests                        List guests with a headcount summary");
    println!("  add-guest <name>              Add a guest");
    println!("    --category <name>           Guest category (default: first configured)");
    println!("    --companions <n>            Companion count (default: 0)");
    println!("    --status <s>                One of: {} (default: Pending)", options(Attendance::all()));
    println!("  rsvp <index> <status>         Update one guest's attendance");
    println!("  remove-guest <index>          Remove a guest by list index");
    println!("  export [path]                 Export the guest list to CSV");
    println!("  expenses                      List expenses with totals per category");
    println!("  add-expense <item>            Add an expense");
    println!("    --budgeted <amount>         Amount budgeted (default: 0)");
    println!("    --paid <amount>             Amount paid (default: 0)");
    println!("    --category <name>           Expense category (default: first configured)");
    println!("    --status <s>                One of: {}", options(PaymentStatus::all()));
    println!("  remove-expense <index>        Remove an expense by list index");
    println!("  budget [--ceiling <amount>]   Show budget usage against the ceiling");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn connect(config: &Config) -> Result<SheetsClient> {
    if config.spreadsheet_id.is_empty() {
        anyhow::bail!(
            "No spreadsheet_id configured. Set it in {}",
            crate::config_path()?.display()
        );
    }
    let credential = load_credential()?;
    SheetsClient::connect(&credential, &config.spreadsheet_id)
}

/// The credential blob comes from the environment when injected, otherwise
/// from a file under the config directory.
fn load_credential() -> Result<Credential> {
    if let Ok(blob) = std::env::var("WEDSHEET_CREDENTIAL") {
        return Credential::from_json(&blob);
    }
    let path = crate::config_dir()?.join("credentials.json");
    if !path.exists() {
        anyhow::bail!(
            "No credential found. Put a credential file at {} or set WEDSHEET_CREDENTIAL",
            path.display()
        );
    }
    Credential::from_file(&path)
}

// ── Shared helpers ────────────────────────────────────────────

fn options<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn positional(args: &[String], index: usize) -> Option<&str> {
    args.iter()
        .filter(|a| !a.starts_with('-'))
        .nth(index)
        .map(String::as_str)
}

/// 1-based list index from the command line.
fn parse_index(raw: &str, len: usize) -> Result<usize> {
    let index: usize = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("Not a list index: {raw}"))?;
    if index == 0 || index > len {
        anyhow::bail!("Index {index} is out of range (list has {len} entries)");
    }
    Ok(index - 1)
}

fn parse_amount(raw: &str, what: &str) -> Result<Decimal> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|_| anyhow::anyhow!("{what} is not a number: {raw}"))?;
    if amount < Decimal::ZERO {
        anyhow::bail!("{what} cannot be negative: {raw}");
    }
    Ok(amount)
}

fn require_category(requested: Option<&str>, allowed: &[String], fallback: &str) -> Result<String> {
    let Some(name) = requested else {
        return Ok(fallback.to_string());
    };
    allowed
        .iter()
        .find(|c| c.to_lowercase() == name.to_lowercase())
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!("Unknown category '{name}'. Configured: {}", allowed.join(", "))
        })
}

fn warn_missing_schema(sheet: &str, missing: &[String]) {
    println!(
        "Warning: the {sheet} sheet's header row is missing: {}. Restore it to see this view.",
        missing.join(", ")
    );
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

// ── Commands: provisioning ────────────────────────────────────

fn cli_init<S: TabularStore, T: TabularStore>(
    guests: &mut GuestRegistry<S>,
    expenses: &mut ExpenseLedger<T>,
) -> Result<()> {
    guests.init_header()?;
    expenses.init_header()?;
    println!("Worksheets '{GUESTS_SHEET}' and '{EXPENSES_SHEET}' reset to their header rows");
    Ok(())
}

// ── Commands: guests ──────────────────────────────────────────

fn cli_guests<S: TabularStore>(registry: &mut GuestRegistry<S>) -> Result<()> {
    let listing = registry.list_guests()?;
    if !listing.schema_ok() {
        warn_missing_schema(GUESTS_SHEET, &listing.missing_columns);
        return Ok(());
    }
    if listing.records.is_empty() {
        println!("The guest list is empty. Add the first guest with add-guest.");
        return Ok(());
    }

    println!("{:<4} {:<28} {:<18} {:<4} Status", "#", "Name", "Category", "+N");
    println!("{}", "─".repeat(64));
    for (i, guest) in listing.records.iter().enumerate() {
        println!(
            "{:<4} {:<28} {:<18} {:<4} {}",
            i + 1,
            guest.name,
            guest.category,
            guest.companions,
            guest.attendance,
        );
    }

    let summary = registry::summarize(&listing.records);
    println!();
    println!(
        "Invitations: {}   People: {}   Confirmed people: {}",
        summary.invitations, summary.total_people, summary.confirmed_people
    );
    Ok(())
}

fn cli_add_guest<S: TabularStore>(
    args: &[String],
    registry: &mut GuestRegistry<S>,
    config: &Config,
) -> Result<()> {
    let name = positional(args, 0).unwrap_or("").to_string();
    let category = require_category(
        flag_value(args, "--category"),
        &config.guest_categories,
        config.default_guest_category(),
    )?;
    let companions: u32 = match flag_value(args, "--companions") {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("Companion count is not a number: {raw}"))?,
        None => 0,
    };
    let attendance = flag_value(args, "--status")
        .map(Attendance::parse)
        .unwrap_or(Attendance::Pending);

    let guest = Guest::new(name, category, companions, attendance);
    if registry.add_guest(&guest)? {
        println!("{} added to the guest list", guest.name);
    } else {
        // Deliberate policy: an empty name is rejected quietly, not an error.
        println!("Nothing saved: the guest name cannot be empty.");
    }
    Ok(())
}

fn cli_remove_guest<S: TabularStore>(args: &[String], registry: &mut GuestRegistry<S>) -> Result<()> {
    let raw = positional(args, 0)
        .ok_or_else(|| anyhow::anyhow!("Usage: wedsheet remove-guest <index>"))?;

    let listing = registry.list_guests()?;
    if !listing.schema_ok() {
        warn_missing_schema(GUESTS_SHEET, &listing.missing_columns);
        return Ok(());
    }
    let index = parse_index(raw, listing.records.len())?;

    let mut edited = listing.records;
    let removed = edited.remove(index);
    registry.replace_all_guests(&edited)?;
    println!("Removed: {}", removed.name);
    Ok(())
}

fn cli_rsvp<S: TabularStore>(args: &[String], registry: &mut GuestRegistry<S>) -> Result<()> {
    let (Some(raw), Some(status)) = (positional(args, 0), positional(args, 1)) else {
        anyhow::bail!("Usage: wedsheet rsvp <index> <{}>", options(Attendance::all()));
    };

    let listing = registry.list_guests()?;
    if !listing.schema_ok() {
        warn_missing_schema(GUESTS_SHEET, &listing.missing_columns);
        return Ok(());
    }
    let index = parse_index(raw, listing.records.len())?;

    let mut edited = listing.records;
    edited[index].attendance = Attendance::parse(status);
    let name = edited[index].name.clone();
    let attendance = edited[index].attendance;
    registry.replace_all_guests(&edited)?;
    println!("{name}: {attendance}");
    Ok(())
}

fn cli_export<S: TabularStore>(args: &[String], registry: &mut GuestRegistry<S>) -> Result<()> {
    let listing = registry.list_guests()?;
    if !listing.schema_ok() {
        warn_missing_schema(GUESTS_SHEET, &listing.missing_columns);
        return Ok(());
    }

    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            let date = chrono::Local::now().format("%Y-%m-%d");
            format!("{home}/wedsheet-guests-{date}.csv")
        });

    let blob = registry::guests_to_csv(&listing.records)?;
    std::fs::write(&output_path, blob)
        .map_err(|e| anyhow::anyhow!("Failed to write {output_path}: {e}"))?;
    println!("Exported {} guests to {output_path}", listing.records.len());
    Ok(())
}

// ── Commands: expenses ────────────────────────────────────────

fn cli_expenses<S: TabularStore>(ledger: &mut ExpenseLedger<S>) -> Result<()> {
    let listing = ledger.list_expenses()?;
    if !listing.schema_ok() {
        warn_missing_schema(EXPENSES_SHEET, &listing.missing_columns);
        return Ok(());
    }
    if listing.records.is_empty() {
        println!("No expenses yet. Add the first one with add-expense.");
        return Ok(());
    }

    println!(
        "{:<4} {:<24} {:<14} {:>12} {:>12} {:>12} Status",
        "#", "Item", "Category", "Budgeted", "Paid", "Due"
    );
    println!("{}", "─".repeat(92));
    for (i, expense) in listing.records.iter().enumerate() {
        println!(
            "{:<4} {:<24} {:<14} {:>12.2} {:>12.2} {:>12.2} {}",
            i + 1,
            expense.item,
            expense.category,
            expense.budgeted,
            expense.paid,
            expense.outstanding(),
            expense.status,
        );
    }

    let totals = ledger::compute_totals(&listing.records);
    let open = listing.records.iter().filter(|e| !e.is_settled()).count();
    println!();
    println!(
        "Budgeted: {:.2}   Paid: {:.2}   Remaining: {:.2}   Open items: {open}",
        totals.budgeted, totals.paid, totals.remaining
    );

    let mut groups: Vec<_> = ledger::group_by_category(&listing.records).into_iter().collect();
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    println!();
    println!("By category:");
    for (category, sums) in &groups {
        println!(
            "  {category:<24} budgeted {:>12.2}   paid {:>12.2}",
            sums.budgeted, sums.paid
        );
    }
    Ok(())
}

fn cli_add_expense<S: TabularStore>(
    args: &[String],
    ledger: &mut ExpenseLedger<S>,
    config: &Config,
) -> Result<()> {
    let item = positional(args, 0).unwrap_or("").to_string();
    let category = require_category(
        flag_value(args, "--category"),
        &config.expense_categories,
        config.default_expense_category(),
    )?;
    let budgeted = match flag_value(args, "--budgeted") {
        Some(raw) => parse_amount(raw, "Budgeted amount")?,
        None => Decimal::ZERO,
    };
    let paid = match flag_value(args, "--paid") {
        Some(raw) => parse_amount(raw, "Paid amount")?,
        None => Decimal::ZERO,
    };
    let status = flag_value(args, "--status")
        .map(PaymentStatus::parse)
        .unwrap_or(PaymentStatus::Pending);

    let expense = Expense::new(item, category, budgeted, paid, status);
    if ledger.add_expense(&expense)? {
        println!("{} added to the expense ledger", expense.item);
    } else {
        println!("Nothing saved: the expense item cannot be empty.");
    }
    Ok(())
}

fn cli_remove_expense<S: TabularStore>(args: &[String], ledger: &mut ExpenseLedger<S>) -> Result<()> {
    let raw = positional(args, 0)
        .ok_or_else(|| anyhow::anyhow!("Usage: wedsheet remove-expense <index>"))?;

    let listing = ledger.list_expenses()?;
    if !listing.schema_ok() {
        warn_missing_schema(EXPENSES_SHEET, &listing.missing_columns);
        return Ok(());
    }
    let index = parse_index(raw, listing.records.len())?;

    let mut edited = listing.records;
    let removed = edited.remove(index);
    ledger.replace_all_expenses(&edited)?;
    println!("Removed: {}", removed.item);
    Ok(())
}

fn cli_budget<S: TabularStore>(
    args: &[String],
    ledger: &mut ExpenseLedger<S>,
    config: &Config,
) -> Result<()> {
    // The session ceiling: flag wins over the configured default, and it
    // must be positive.
    let ceiling = match flag_value(args, "--ceiling") {
        Some(raw) => parse_amount(raw, "Ceiling")?,
        None => config.budget_ceiling,
    };
    if ceiling <= Decimal::ZERO {
        anyhow::bail!("The budget ceiling must be greater than zero");
    }

    let listing = ledger.list_expenses()?;
    if !listing.schema_ok() {
        warn_missing_schema(EXPENSES_SHEET, &listing.missing_columns);
        return Ok(());
    }

    let totals = ledger::compute_totals(&listing.records);
    let usage = ledger::budget_usage(totals.budgeted, ceiling);

    // The bar clamps at 100%; the printed percentage never does.
    let width = 30usize;
    let filled = (ledger::usage_gauge(usage) * width as f64).round() as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(width - filled);

    println!("Ceiling:   {ceiling:.2}");
    println!("Budgeted:  {:.2}", totals.budgeted);
    println!("Paid:      {:.2}", totals.paid);
    println!("Remaining: {:.2}", totals.remaining);
    println!();
    println!("[{bar}] {usage:.2}% of ceiling");
    if usage > Decimal::ONE_HUNDRED {
        println!("Over budget: the planned spend exceeds the ceiling.");
    }
    Ok(())
}
