//! Filter store inspection entry point.
//!
//! # Responsibility
//! - Provide a minimal executable over `filterstore_core` for local checks.
//! - Keep output line-oriented: one JSON object per filter.

use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use filterstore_core::db::{open_db, open_db_in_memory};
use filterstore_core::{
    core_version, default_log_level, init_logging, Filter, FilterId, FilterService,
    SqliteFilterRepository,
};
use log::info;
use rusqlite::Connection;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "filterstore_cli")]
#[command(about = "Inspect and edit saved task filters", long_about = None)]
struct Cli {
    /// Database file; an in-memory database is used when omitted
    #[arg(long, env = "FILTERSTORE_DB", value_parser = NonEmptyStringValueParser::new())]
    db: Option<String>,

    /// Absolute directory for rolling log files; no file logging when omitted
    #[arg(long, env = "FILTERSTORE_LOG_DIR", value_parser = NonEmptyStringValueParser::new())]
    log_dir: Option<String>,

    /// Log level (trace|debug|info|warn|error); defaults by build mode
    #[arg(long, env = "FILTERSTORE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Lists every filter when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Insert a filter and print its id
    Add {
        title: String,
        /// Stored WHERE-clause fragment
        sql: Option<String>,
    },
    /// Print the filter whose title matches, ignoring case
    Find { title: String },
    /// Delete a filter by id
    Rm { id: FilterId },
}

fn open_connection(db: Option<&str>) -> Result<Connection, String> {
    let conn = match db {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    conn.map_err(|err| err.to_string())
}

fn print_filter(filter: &Filter) -> Result<(), String> {
    let line = serde_json::to_string(filter).map_err(|err| err.to_string())?;
    println!("{line}");
    Ok(())
}

fn run(cli: Cli) -> Result<(), String> {
    let conn = open_connection(cli.db.as_deref())?;
    let repo = SqliteFilterRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let service = FilterService::new(repo);

    match cli.command {
        None => {
            println!("filterstore_core version={}", core_version());
            for filter in service.list().map_err(|err| err.to_string())? {
                print_filter(&filter)?;
            }
        }
        Some(Commands::Add { title, sql }) => {
            let mut filter = Filter::new(title);
            filter.sql = sql;
            let id = service.save(&mut filter).map_err(|err| err.to_string())?;
            info!("event=cli_add module=cli status=ok filter_id={id}");
            println!("{id}");
        }
        Some(Commands::Find { title }) => {
            match service.find_by_title(&title).map_err(|err| err.to_string())? {
                Some(filter) => print_filter(&filter)?,
                None => println!("not found"),
            }
        }
        Some(Commands::Rm { id }) => {
            service.delete(id).map_err(|err| err.to_string())?;
            info!("event=cli_rm module=cli status=ok filter_id={id}");
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::error::ErrorKind;
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_lists_filters() {
        let cli = Cli::try_parse_from(["filterstore_cli"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn add_accepts_optional_sql() {
        let cli = Cli::try_parse_from(["filterstore_cli", "add", "Work"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Add {
                title: "Work".to_string(),
                sql: None
            })
        );

        let cli =
            Cli::try_parse_from(["filterstore_cli", "add", "Work", "WHERE completed = 0"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Add {
                title: "Work".to_string(),
                sql: Some("WHERE completed = 0".to_string())
            })
        );
    }

    #[test]
    fn add_without_title_names_the_missing_argument() {
        let err = Cli::try_parse_from(["filterstore_cli", "add"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(err.to_string().contains("<TITLE>"));
    }

    #[test]
    fn rm_requires_numeric_id() {
        let cli = Cli::try_parse_from(["filterstore_cli", "rm", "12"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Rm { id: 12 }));

        let err = Cli::try_parse_from(["filterstore_cli", "rm", "twelve"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn empty_database_path_is_rejected() {
        let err = Cli::try_parse_from(["filterstore_cli", "--db", ""]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn database_and_logging_options_are_parsed() {
        let cli = Cli::try_parse_from([
            "filterstore_cli",
            "--db",
            "/tmp/filters.db",
            "--log-dir",
            "/tmp/logs",
            "--log-level",
            "debug",
            "find",
            "home",
        ])
        .unwrap();
        assert_eq!(cli.db.as_deref(), Some("/tmp/filters.db"));
        assert_eq!(cli.log_dir.as_deref(), Some("/tmp/logs"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(
            cli.command,
            Some(Commands::Find {
                title: "home".to_string()
            })
        );
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        let err = Cli::try_parse_from(["filterstore_cli", "drop", "x"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }
}
