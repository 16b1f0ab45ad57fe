use std::{fs, path::PathBuf};

use cdjournal_core::{
    display_amount, signed_amount, BalanceCheck, GlAccountService, ReconciliationStatus,
    UpsertMode,
};
use cdjournal_domain::{
    parse_amount, Displayable, Document, GlAccount, GlAccountType, GlDistribution, JournalEntry,
    Period, StatementKind, MAX_DISTRIBUTIONS,
};
use chrono::NaiveDate;

use super::{output, CliContext, COMMANDS};
use crate::errors::{CliError, JournalError};

/// `field=value` keys accepted by `entry-add` and `entry-edit`.
const ENTRY_FIELDS: &str = "date, payee, check-number, check, deposit-date, other, ar, bs, \
pl-note, bs-note, gl1..gl7 (GL account number)";

type CommandResult = Result<(), CliError>;

pub fn dispatch(context: &mut CliContext, command: &str, args: &[String]) -> CommandResult {
    match command {
        "accounts" => list_accounts(context, args),
        "search" => search_accounts(context, args),
        "validate" => validate_account(args),
        "add-account" => add_account(context, args),
        "remove-account" => remove_account(context, args),
        "edit-account" => edit_account(context, args),
        "set" => set_line_item(context, args),
        "tag" => tag_line_item(context, args),
        "entry-add" => add_entry(context, args),
        "entry-edit" => edit_entry(context, args),
        "entry-remove" => remove_entry(context, args),
        "forward" => set_balance_brought_forward(context, args),
        "deposit" => set_statement_deposit(context, args),
        "statements" => show_statements(context, args),
        "register" => show_register(context, args),
        "summary" => show_summary(context, args),
        "export" => export_journal(context, args),
        "import" => import_journal(context, args),
        "backup" => create_backup(context, args),
        "backups" => list_backups(context),
        "help" => {
            print_help();
            Ok(())
        }
        other => Err(CliError::Input(format!("unknown command `{other}`"))),
    }
}

pub fn print_help() {
    output::section("cdjournal");
    for spec in COMMANDS {
        println!("  {:<46} {}", spec.usage, spec.summary);
    }
    println!("\n  Register fields: {ENTRY_FIELDS}");
}

fn usage(command: &str) -> CliError {
    let text = COMMANDS
        .iter()
        .find(|spec| spec.name == command)
        .map(|spec| spec.usage)
        .unwrap_or(command);
    CliError::Input(format!("usage: {text}"))
}

fn parse_period(raw: &str) -> Result<Period, CliError> {
    raw.parse::<Period>()
        .map_err(|err| CliError::Input(err.to_string()))
}

fn parse_account_type(raw: &str) -> Result<GlAccountType, CliError> {
    raw.parse::<GlAccountType>()
        .map_err(|err| CliError::Input(err.to_string()))
}

fn parse_statement_kind(raw: &str) -> Result<StatementKind, CliError> {
    raw.parse::<StatementKind>().map_err(CliError::Input)
}

/// 1-based register line to 0-based index.
fn parse_line(raw: &str) -> Result<usize, CliError> {
    match raw.parse::<usize>() {
        Ok(line) if line > 0 => Ok(line - 1),
        _ => Err(CliError::Input(format!("`{raw}` is not a register line number"))),
    }
}

fn parse_date(raw: &str) -> Result<Option<NaiveDate>, CliError> {
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| CliError::Input(format!("`{raw}` is not a YYYY-MM-DD date")))
}

/// Applies `field=value` pairs to `entry`. Distribution columns take a GL number whose
/// name is copied from the chart of accounts; an empty value clears the field.
fn apply_entry_fields(
    document: &Document,
    entry: &mut JournalEntry,
    fields: &[String],
) -> Result<(), CliError> {
    for field in fields {
        let (key, value) = field
            .split_once('=')
            .ok_or_else(|| CliError::Input(format!("expected field=value, got `{field}`")))?;
        match key {
            "date" => entry.date = parse_date(value)?,
            "deposit-date" => entry.deposit_date = parse_date(value)?,
            "payee" => entry.payee = value.to_string(),
            "check-number" => entry.check_number = value.to_string(),
            "check" => entry.check_amount = parse_amount(value),
            "other" => entry.other_pl_receipts = parse_amount(value),
            "ar" => entry.ar_deposit_amount = parse_amount(value),
            "bs" => entry.balance_sheet_deposit = parse_amount(value),
            "pl-note" => entry.pl_deposit_explanation = value.to_string(),
            "bs-note" => entry.bs_deposit_explanation = value.to_string(),
            _ => {
                let column = key
                    .strip_prefix("gl")
                    .and_then(|digits| digits.parse::<usize>().ok())
                    .filter(|column| (1..=MAX_DISTRIBUTIONS).contains(column))
                    .ok_or_else(|| {
                        CliError::Input(format!("unknown field `{key}`; fields: {ENTRY_FIELDS}"))
                    })?;
                let distribution = if value.is_empty() {
                    GlDistribution::default()
                } else {
                    let account = GlAccountService::get(document, value)
                        .ok_or_else(|| JournalError::AccountNotFound(value.to_string()))?;
                    GlDistribution::new(account.number.as_str(), account.name.as_str())
                };
                entry.set_distribution(column - 1, distribution);
            }
        }
    }
    Ok(())
}

/// Moves to the requested month, or stays on the remembered one.
fn select_period(context: &mut CliContext, arg: Option<&String>) -> Result<Period, CliError> {
    if let Some(raw) = arg {
        let period = parse_period(raw)?;
        context.remember_period(period)?;
    }
    Ok(context.session.period())
}

fn print_accounts<'a>(accounts: impl IntoIterator<Item = &'a GlAccount>) {
    let mut shown = 0usize;
    for account in accounts {
        println!("  {:<40} {}", account.display_label(), account.account_type);
        shown += 1;
    }
    if shown == 0 {
        output::info("No accounts found.");
    }
}

fn list_accounts(context: &mut CliContext, args: &[String]) -> CommandResult {
    let document = context.session.document();
    match args.first() {
        Some(raw) => {
            let account_type = parse_account_type(raw)?;
            output::section(format!("{account_type} accounts"));
            print_accounts(GlAccountService::by_type(document, account_type));
        }
        None => {
            output::section("Chart of accounts");
            print_accounts(GlAccountService::list(document));
        }
    }
    Ok(())
}

fn search_accounts(context: &mut CliContext, args: &[String]) -> CommandResult {
    if args.is_empty() {
        return Err(usage("search"));
    }
    let term = args.join(" ");
    output::section(format!("Accounts matching `{term}`"));
    print_accounts(GlAccountService::search(context.session.document(), &term));
    Ok(())
}

fn validate_account(args: &[String]) -> CommandResult {
    let [number, raw_type] = args else {
        return Err(usage("validate"));
    };
    let account_type = parse_account_type(raw_type)?;
    GlAccountService::validate(number, account_type)?;
    output::success(format!("{number} is a valid {account_type} account number"));
    Ok(())
}

fn add_account(context: &mut CliContext, args: &[String]) -> CommandResult {
    let [number, raw_type, name @ ..] = args else {
        return Err(usage("add-account"));
    };
    if name.is_empty() {
        return Err(usage("add-account"));
    }
    let account_type = parse_account_type(raw_type)?;
    let account = GlAccount::new(number.as_str(), name.join(" "), account_type);
    let label = account.display_label();
    context.session.upsert_account(account, UpsertMode::Create)?;
    output::success(format!("Added {label}"));
    Ok(())
}

fn remove_account(context: &mut CliContext, args: &[String]) -> CommandResult {
    let [number] = args else {
        return Err(usage("remove-account"));
    };
    let removed = context.session.remove_account(number)?;
    output::success(format!("Removed {}", removed.display_label()));
    for warning in context.session.warnings() {
        output::warning(warning);
    }
    Ok(())
}

fn edit_account(context: &mut CliContext, args: &[String]) -> CommandResult {
    let [number, raw_type, name @ ..] = args else {
        return Err(usage("edit-account"));
    };
    if name.is_empty() {
        return Err(usage("edit-account"));
    }
    let account_type = parse_account_type(raw_type)?;
    let description = GlAccountService::get(context.session.document(), number)
        .map(|current| current.description.clone())
        .unwrap_or_default();
    let account = GlAccount::new(number.as_str(), name.join(" "), account_type)
        .with_description(description);
    let label = account.display_label();
    context.session.upsert_account(account, UpsertMode::Edit)?;
    output::success(format!("Updated {label}"));
    Ok(())
}

// Mutating commands switch month first and remember it only once the change is accepted.

fn set_line_item(context: &mut CliContext, args: &[String]) -> CommandResult {
    let (period, kind, slot, raw_amount, gl_account) = match args {
        [period, kind, slot, amount] => (period, kind, slot, amount, None),
        [period, kind, slot, amount, gl] => (period, kind, slot, amount, Some(gl.clone())),
        _ => return Err(usage("set")),
    };
    let period = parse_period(period)?;
    let kind = parse_statement_kind(kind)?;
    context.session.go_to(period);
    context
        .session
        .set_line_item_text(kind, slot, raw_amount, gl_account)?;
    context.remember_period(period)?;
    let amount = parse_amount(raw_amount);
    if amount == 0.0 {
        output::success(format!("Cleared {kind} `{slot}` for {period}"));
    } else {
        output::success(format!(
            "Set {kind} `{slot}` to {} for {period}",
            signed_amount(amount)
        ));
    }
    Ok(())
}

fn tag_line_item(context: &mut CliContext, args: &[String]) -> CommandResult {
    let (period, kind, slot, gl_account) = match args {
        [period, kind, slot] => (period, kind, slot, None),
        [period, kind, slot, gl] => (period, kind, slot, Some(gl.clone())),
        _ => return Err(usage("tag")),
    };
    let period = parse_period(period)?;
    let kind = parse_statement_kind(kind)?;
    context.session.go_to(period);
    context.session.tag_line_item(kind, slot, gl_account.clone())?;
    context.remember_period(period)?;
    match gl_account
        .as_deref()
        .and_then(|number| GlAccountService::label(context.session.document(), number))
    {
        Some(label) => output::success(format!("Tagged {kind} `{slot}` with {label}")),
        None => output::success(format!("Cleared the GL tag on {kind} `{slot}`")),
    }
    Ok(())
}

fn add_entry(context: &mut CliContext, args: &[String]) -> CommandResult {
    let [period, fields @ ..] = args else {
        return Err(usage("entry-add"));
    };
    if fields.is_empty() {
        return Err(usage("entry-add"));
    }
    let period = parse_period(period)?;
    let mut entry = JournalEntry::new();
    apply_entry_fields(context.session.document(), &mut entry, fields)?;
    context.session.go_to(period);
    let line = context.session.add_entry(entry);
    context.remember_period(period)?;
    output::success(format!("Added register line {line} for {period}"));
    Ok(())
}

fn edit_entry(context: &mut CliContext, args: &[String]) -> CommandResult {
    let [period, line, fields @ ..] = args else {
        return Err(usage("entry-edit"));
    };
    if fields.is_empty() {
        return Err(usage("entry-edit"));
    }
    let period = parse_period(period)?;
    let index = parse_line(line)?;
    let mut edited = context
        .session
        .document()
        .journal(period)
        .and_then(|record| record.entries.get(index))
        .cloned()
        .ok_or(JournalError::EntryNotFound(index))?;
    apply_entry_fields(context.session.document(), &mut edited, fields)?;
    context.session.go_to(period);
    context.session.update_entry(index, move |entry| *entry = edited)?;
    context.remember_period(period)?;
    output::success(format!("Updated register line {} for {period}", index + 1));
    Ok(())
}

fn remove_entry(context: &mut CliContext, args: &[String]) -> CommandResult {
    let [period, line] = args else {
        return Err(usage("entry-remove"));
    };
    let period = parse_period(period)?;
    let index = parse_line(line)?;
    context.session.go_to(period);
    let removed = context.session.remove_entry(index)?;
    context.remember_period(period)?;
    let payee = if removed.payee.is_empty() {
        String::new()
    } else {
        format!(" ({})", removed.payee)
    };
    output::success(format!("Removed register line {}{payee} for {period}", index + 1));
    Ok(())
}

fn set_balance_brought_forward(context: &mut CliContext, args: &[String]) -> CommandResult {
    let [period, amount] = args else {
        return Err(usage("forward"));
    };
    let period = parse_period(period)?;
    let amount = parse_amount(amount);
    context.session.go_to(period);
    context.session.set_balance_brought_forward(amount);
    context.remember_period(period)?;
    output::success(format!(
        "Balance brought forward for {period} is {}",
        signed_amount(amount)
    ));
    Ok(())
}

fn set_statement_deposit(context: &mut CliContext, args: &[String]) -> CommandResult {
    let [period, amount] = args else {
        return Err(usage("deposit"));
    };
    let period = parse_period(period)?;
    let amount = parse_amount(amount);
    context.session.go_to(period);
    context.session.set_statement_deposit(amount);
    context.remember_period(period)?;
    output::success(format!(
        "Statement deposit for {period} is {}",
        signed_amount(amount)
    ));
    Ok(())
}

fn show_statements(context: &mut CliContext, args: &[String]) -> CommandResult {
    let period = select_period(context, args.first())?;
    let totals = context.session.statements();

    let bs = &totals.balance_sheet;
    output::section(format!("Balance sheet, {}", period.display_name()));
    output::row("Current assets", display_amount(bs.current_assets));
    output::row("Fixed assets", signed_amount(bs.fixed_assets));
    output::row("Total assets", display_amount(bs.total_assets));
    output::row("Current liabilities", display_amount(bs.current_liabilities));
    output::row("Long-term liabilities", display_amount(bs.long_term_liabilities));
    output::row("Total equity", display_amount(bs.total_equity));
    output::row(
        "Total liabilities & equity",
        display_amount(bs.total_liabilities_and_equity),
    );
    match bs.balance_check {
        BalanceCheck::Balanced => output::success("Balance sheet balances"),
        BalanceCheck::Unbalanced { difference } => output::warning(format!(
            "Balance sheet is out of balance by {}",
            signed_amount(difference)
        )),
    }

    let pl = &totals.profit_loss;
    output::section(format!("Profit & loss, {}", period.display_name()));
    output::row("Total revenue", display_amount(pl.total_revenue));
    output::row("Cost of goods sold", display_amount(pl.total_cogs));
    output::row("Gross profit", signed_amount(pl.gross_profit));
    output::row("Operating expenses", display_amount(pl.total_operating_expenses));
    output::row("Operating income", signed_amount(pl.operating_income));
    output::row("Net other income", signed_amount(pl.net_other_income));
    let label = if pl.is_loss() { "Net loss" } else { "Net income" };
    output::row(label, display_amount(pl.net_income));
    Ok(())
}

fn show_register(context: &mut CliContext, args: &[String]) -> CommandResult {
    let period = select_period(context, args.first())?;
    let record = context.session.month_record();
    let report = context.session.register();

    output::section(format!("Check register, {}", period.display_name()));
    output::row(
        "Balance brought forward",
        signed_amount(record.journal.balance_brought_forward),
    );
    if report.rows.is_empty() {
        output::info("No register entries for this month.");
    }
    for (row, entry) in report.rows.iter().zip(&record.journal.entries) {
        let marker = if row.proof_matches { " " } else { "!" };
        println!(
            "  {marker}{:>3}  {:<24} {:>12} {:>12} {:>14}",
            row.line_number,
            entry.payee,
            display_amount(entry.check_amount),
            display_amount(row.horizontal_proof),
            signed_amount(row.running_balance),
        );
    }

    output::section("Totals");
    output::row("Checks", display_amount(report.total_check_amount));
    output::row("Other P&L receipts", display_amount(report.total_other_receipts));
    output::row("A/R deposits", display_amount(report.total_ar_deposit));
    output::row("Balance sheet deposits", display_amount(report.total_bs_deposit));
    output::row("Distributions", display_amount(report.total_distribution));
    output::row("Final book balance", signed_amount(report.final_book_balance));
    output::row("Statement deposit", signed_amount(record.journal.citizen_statement_deposit));
    output::row("Difference", signed_amount(report.dif));
    match report.status {
        ReconciliationStatus::Reconciled => output::success("Register reconciled"),
        ReconciliationStatus::Unreconciled => output::warning(format!(
            "Register is not reconciled; balance check {}",
            signed_amount(report.balance_check)
        )),
    }
    Ok(())
}

fn show_summary(context: &mut CliContext, args: &[String]) -> CommandResult {
    if let Some(raw) = args.first() {
        let year = raw
            .parse::<i32>()
            .map_err(|_| CliError::Input(format!("`{raw}` is not a year")))?;
        let period = context
            .session
            .period()
            .with_year(year)
            .map_err(|err| CliError::Input(err.to_string()))?;
        context.remember_period(period)?;
    }
    let summary = context.session.year_summary();

    output::section(format!("Year to date, {}", summary.year));
    output::row("Revenue", display_amount(summary.ytd_revenue));
    output::row("Expenses", display_amount(summary.ytd_expenses));
    output::row("Net income", signed_amount(summary.ytd_net_income));
    output::row("Months with data", summary.months_with_data);
    output::row(
        "Average monthly revenue",
        display_amount(summary.average_monthly_revenue),
    );

    output::section("Monthly trend");
    for month in &summary.months {
        println!(
            "  {:<4} {:>14} {:>14} {:>14} {:>14}",
            month.label,
            display_amount(month.revenue),
            display_amount(month.expenses),
            signed_amount(month.net_income),
            signed_amount(month.cumulative_net_income),
        );
    }
    Ok(())
}

fn export_journal(context: &mut CliContext, args: &[String]) -> CommandResult {
    let path = match args.first() {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(context.session.export_file_name()),
    };
    let text = context.session.export_json()?;
    fs::write(&path, text)?;
    output::success(format!("Exported journal to {}", path.display()));
    Ok(())
}

fn import_journal(context: &mut CliContext, args: &[String]) -> CommandResult {
    let [path] = args else {
        return Err(usage("import"));
    };
    let text = fs::read_to_string(path)?;
    context.session.import_json(&text)?;
    output::success(format!("Imported journal from {path}"));
    for warning in context.session.warnings() {
        output::warning(warning);
    }
    Ok(())
}

fn create_backup(context: &mut CliContext, args: &[String]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let info = context.session.backup(note.as_deref())?;
    output::success(format!("Backup created: {}", info.id));
    Ok(())
}

fn list_backups(context: &mut CliContext) -> CommandResult {
    let backups = context.session.list_backups()?;
    output::section("Backups");
    if backups.is_empty() {
        output::info("No backups yet.");
    }
    for (index, backup) in backups.iter().enumerate() {
        println!("  {:>2}. {:<48} {}", index + 1, backup.id, backup.created_at);
    }
    Ok(())
}
