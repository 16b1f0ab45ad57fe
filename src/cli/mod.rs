//! Non-interactive report CLI over a [`JournalSession`].

pub mod handlers;
pub mod output;

use std::{env, sync::Arc};

use cdjournal_config::{Config, ConfigManager};
use cdjournal_domain::Period;
use cdjournal_storage_json::{JsonDocumentStorage, StoragePaths};
use strsim::levenshtein;
use tracing::debug;

use crate::{
    errors::CliError,
    session::{JournalSession, SessionOptions},
};

/// One entry of the command table used for dispatch, help and suggestions.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "accounts",
        usage: "accounts [type]",
        summary: "List GL accounts, optionally for one type",
    },
    CommandSpec {
        name: "search",
        usage: "search <term>",
        summary: "Find GL accounts by number or name",
    },
    CommandSpec {
        name: "validate",
        usage: "validate <number> <type>",
        summary: "Check an account number against its type's range",
    },
    CommandSpec {
        name: "add-account",
        usage: "add-account <number> <type> <name...>",
        summary: "Add a GL account",
    },
    CommandSpec {
        name: "remove-account",
        usage: "remove-account <number>",
        summary: "Delete a GL account (references are kept)",
    },
    CommandSpec {
        name: "edit-account",
        usage: "edit-account <number> <type> <name...>",
        summary: "Rename or retype an existing GL account",
    },
    CommandSpec {
        name: "set",
        usage: "set <YYYY-MM> <bs|pl> <slot> <amount> [gl]",
        summary: "Enter a statement line item; zero clears it",
    },
    CommandSpec {
        name: "tag",
        usage: "tag <YYYY-MM> <bs|pl> <slot> [gl]",
        summary: "Tag a line item with a GL account; no account clears the tag",
    },
    CommandSpec {
        name: "entry-add",
        usage: "entry-add <YYYY-MM> <field=value...>",
        summary: "Append a register entry (fields listed below)",
    },
    CommandSpec {
        name: "entry-edit",
        usage: "entry-edit <YYYY-MM> <line> <field=value...>",
        summary: "Change fields of a register entry",
    },
    CommandSpec {
        name: "entry-remove",
        usage: "entry-remove <YYYY-MM> <line>",
        summary: "Delete a register entry; later lines are renumbered",
    },
    CommandSpec {
        name: "forward",
        usage: "forward <YYYY-MM> <amount>",
        summary: "Set the register's balance brought forward",
    },
    CommandSpec {
        name: "deposit",
        usage: "deposit <YYYY-MM> <amount>",
        summary: "Set the deposit total from the bank statement",
    },
    CommandSpec {
        name: "statements",
        usage: "statements [YYYY-MM]",
        summary: "Balance sheet and profit & loss totals for a month",
    },
    CommandSpec {
        name: "register",
        usage: "register [YYYY-MM]",
        summary: "Check register with running balance and reconciliation",
    },
    CommandSpec {
        name: "summary",
        usage: "summary [YYYY]",
        summary: "Year-to-date revenue, expenses and monthly trend",
    },
    CommandSpec {
        name: "export",
        usage: "export [file]",
        summary: "Write the whole journal as a versioned JSON export",
    },
    CommandSpec {
        name: "import",
        usage: "import <file>",
        summary: "Replace the journal with an export file",
    },
    CommandSpec {
        name: "backup",
        usage: "backup [note...]",
        summary: "Create a named backup of the journal",
    },
    CommandSpec {
        name: "backups",
        usage: "backups",
        summary: "List backups, newest first",
    },
    CommandSpec {
        name: "help",
        usage: "help",
        summary: "Show this help",
    },
];

/// Everything a command needs: the open session plus persisted preferences.
pub struct CliContext {
    pub session: JournalSession,
    pub config: Config,
    pub config_manager: ConfigManager,
}

impl CliContext {
    /// Reads config from the application home and opens the stored journal.
    pub fn load() -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(Config::home_dir())?;
        let config = config_manager.load()?;
        output::set_color_enabled(config.ui_color_enabled && env::var_os("NO_COLOR").is_none());

        let paths = StoragePaths {
            data_root: config.resolve_data_dir(),
            backup_root: config.resolve_backup_dir(),
        };
        let storage = JsonDocumentStorage::with_retention(paths, config.backup_retention)?;
        let start = config
            .last_period
            .as_deref()
            .and_then(|key| key.parse::<Period>().ok());
        let options = SessionOptions {
            autosave: config.autosave,
            seed_default_accounts: config.seed_default_accounts,
            start,
        };
        let session = JournalSession::open(Arc::new(storage), options)?;
        debug!(period = %session.period(), "cli context ready");
        Ok(Self {
            session,
            config,
            config_manager,
        })
    }

    /// Remembers `period` as the month to reopen next time.
    pub fn remember_period(&mut self, period: Period) -> Result<(), CliError> {
        self.session.go_to(period);
        let key = Some(period.key());
        if self.config.last_period != key {
            self.config.last_period = key;
            self.config_manager.save(&self.config)?;
        }
        Ok(())
    }
}

pub fn run_cli() -> Result<(), CliError> {
    let args: Vec<String> = env::args().skip(1).collect();
    run_with_args(&args)
}

pub fn run_with_args(args: &[String]) -> Result<(), CliError> {
    let Some((command, rest)) = args.split_first() else {
        handlers::print_help();
        return Ok(());
    };
    let command = command.to_lowercase();
    if matches!(command.as_str(), "help" | "--help" | "-h") {
        handlers::print_help();
        return Ok(());
    }
    if !COMMANDS.iter().any(|spec| spec.name == command) {
        return Err(CliError::Input(unknown_command_message(&command)));
    }

    let mut context = CliContext::load()?;
    handlers::dispatch(&mut context, &command, rest)?;
    if let Some(failure) = context.session.take_storage_error() {
        return Err(CliError::Command(format!("changes were not saved: {failure}")));
    }
    Ok(())
}

/// Closest known command within three edits, if any.
pub fn suggest_command(input: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .map(|spec| (levenshtein(spec.name, input), spec.name))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 3)
        .map(|(_, name)| name)
}

fn unknown_command_message(input: &str) -> String {
    match suggest_command(input) {
        Some(best) => format!("unknown command `{input}`. Did you mean `{best}`?"),
        None => format!("unknown command `{input}`. Run `help` to see available commands."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_tolerate_typos() {
        assert_eq!(suggest_command("acounts"), Some("accounts"));
        assert_eq!(suggest_command("regster"), Some("register"));
        assert_eq!(suggest_command("zzzzzzzzzz"), None);
    }

    #[test]
    fn unknown_command_is_rejected_before_loading() {
        let err = run_with_args(&["statments".to_string()]).expect_err("unknown command");
        assert!(err.to_string().contains("statements"));
    }
}
