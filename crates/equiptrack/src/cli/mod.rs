//! Command-line interface for equiptrack.
//!
//! This module provides the CLI structure, the table renderer and the
//! interactive shell for the `equiptrack` binary.

mod commands;
pub mod render;
pub mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, FilterArgs, ListCommand, OutputFormat, SeedArgs, ShellCommand, ShowCommand,
    StatsCommand,
};

/// equiptrack - Track who holds which equipment
///
/// Loads a seed document of equipment assignments, lists and filters them,
/// and lets you edit them in an interactive session. Changes are never
/// written back to the seed.
#[derive(Debug, Parser)]
#[command(name = "equiptrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List assignments, optionally filtered
    List(ListCommand),

    /// Show every field of one assignment
    Show(ShowCommand),

    /// Show total and filtered counts
    Stats(StatsCommand),

    /// Interactive session: create, edit, delete and filter
    Shell(ShellCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "equiptrack");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_with_filters() {
        let args = vec![
            "equiptrack", "list", "--seed", "seed.json", "-s", "lenovo", "--sede", "Cota",
            "--cargo", "analista", "-a", "-f", "json",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::List(list) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(list.seed.seed.as_deref(), Some("seed.json"));
        assert_eq!(list.filter.search.as_deref(), Some("lenovo"));
        assert_eq!(list.filter.sede.as_deref(), Some("Cota"));
        assert_eq!(list.filter.cargo.as_deref(), Some("analista"));
        assert!(list.all_fields);
        assert_eq!(list.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["equiptrack", "list"]).unwrap();
        let Command::List(list) = cli.command else {
            panic!("expected list command");
        };
        assert!(list.seed.seed.is_none());
        assert!(list.filter.criteria().is_empty());
        assert_eq!(list.format, OutputFormat::Table);
    }

    #[test]
    fn test_parse_show() {
        let cli = Cli::try_parse_from(["equiptrack", "show", "7", "--json"]).unwrap();
        let Command::Show(show) = cli.command else {
            panic!("expected show command");
        };
        assert_eq!(show.id, 7);
        assert!(show.json);
    }

    #[test]
    fn test_parse_show_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["equiptrack", "show", "abc"]).is_err());
    }

    #[test]
    fn test_parse_shell() {
        let cli = Cli::try_parse_from(["equiptrack", "shell", "--no-confirm"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Shell(ShellCommand { no_confirm: true, .. })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["equiptrack", "-c", "/custom/config.toml", "stats"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["equiptrack", "-vv", "stats"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);

        let cli = Cli::try_parse_from(["equiptrack", "-q", "stats"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);

        let cli = Cli::try_parse_from(["equiptrack", "stats"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["equiptrack", "config", "validate", "-f", "x.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }
}
