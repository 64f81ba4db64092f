//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::filter::FilterCriteria;

/// Where to load the seed document from.
#[derive(Debug, Clone, Default, Args)]
pub struct SeedArgs {
    /// Seed document (file path or http(s) URL); overrides the config
    #[arg(long, value_name = "PATH|URL")]
    pub seed: Option<String>,
}

/// Filters applied to the table.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Free-text search across every field
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only records at this site (exact match)
    #[arg(long)]
    pub sede: Option<String>,

    /// Only records whose role contains this text
    #[arg(long)]
    pub cargo: Option<String>,
}

impl FilterArgs {
    /// Build filter criteria from the flags.
    #[must_use]
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            text_query: self.search.clone().unwrap_or_default(),
            site_filter: self.sede.clone().unwrap_or_default(),
            role_filter: self.cargo.clone().unwrap_or_default(),
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    #[command(flatten)]
    pub seed: SeedArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Show every column instead of the summary
    #[arg(short, long)]
    pub all_fields: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the assignment
    pub id: u64,

    #[command(flatten)]
    pub seed: SeedArgs,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    #[command(flatten)]
    pub seed: SeedArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Shell command arguments.
#[derive(Debug, Args)]
pub struct ShellCommand {
    #[command(flatten)]
    pub seed: SeedArgs,

    /// Delete without asking for confirmation
    #[arg(long)]
    pub no_confirm: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated values, no header
    Plain,
    /// Aligned table with header
    #[default]
    Table,
    /// JSON output
    Json,
}
