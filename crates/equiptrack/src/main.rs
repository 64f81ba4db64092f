//! `equiptrack` - CLI for the equipment assignment inventory
//!
//! This binary loads a seed document, then lists, shows, counts or
//! interactively edits the assignments it holds.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use equiptrack::cli::render;
use equiptrack::cli::shell::Shell;
use equiptrack::cli::{
    Cli, Command, ConfigCommand, ListCommand, SeedArgs, ShellCommand, ShowCommand, StatsCommand,
};
use equiptrack::loader::source_for;
use equiptrack::{init_logging, Config, Error, Inventory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::List(cmd) => handle_list(&config, &cmd).await,
        Command::Show(cmd) => handle_show(&config, &cmd).await,
        Command::Stats(cmd) => handle_stats(&config, &cmd).await,
        Command::Shell(cmd) => handle_shell(&config, &cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Fetch the seed and load it, failing the command if the load fails.
async fn load_inventory(config: &Config, seed: &SeedArgs) -> anyhow::Result<Inventory> {
    let location = config.seed_source(seed.seed.as_deref());
    let source = source_for(location, config.seed_timeout())?;
    info!(source = %source.describe(), "Loading seed");

    let mut inventory = Inventory::new();
    inventory.load_from(source.as_ref()).await;
    if let Some(message) = inventory.load_error() {
        bail!("could not load {}: {message}", source.describe());
    }
    Ok(inventory)
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let mut inventory = load_inventory(config, &cmd.seed).await?;
    inventory.on_filter_change(cmd.filter.criteria());

    let show_details = cmd.all_fields || config.display.show_details;
    let records = inventory.filtered_records();
    let mut out = io::stdout().lock();

    if cmd.format == equiptrack::cli::OutputFormat::Table {
        if let Some(message) = inventory.stats().empty_message() {
            writeln!(out, "{message}")?;
            return Ok(());
        }
    }
    render::write_records(&mut out, &records, cmd.format, show_details)?;
    Ok(())
}

async fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let inventory = load_inventory(config, &cmd.seed).await?;
    let Some(record) = inventory.records().iter().find(|r| r.id == cmd.id) else {
        return Err(Error::not_found(cmd.id).into());
    };

    let mut out = io::stdout().lock();
    if cmd.json {
        writeln!(out, "{}", serde_json::to_string_pretty(record)?)?;
    } else {
        render::write_record(&mut out, record)?;
    }
    Ok(())
}

async fn handle_stats(config: &Config, cmd: &StatsCommand) -> anyhow::Result<()> {
    let mut inventory = load_inventory(config, &cmd.seed).await?;
    inventory.on_filter_change(cmd.filter.criteria());
    let stats = inventory.stats();

    let mut out = io::stdout().lock();
    if cmd.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
    } else {
        render::write_stats(&mut out, stats)?;
    }
    Ok(())
}

async fn handle_shell(config: &Config, cmd: &ShellCommand) -> anyhow::Result<()> {
    let inventory = load_inventory(config, &cmd.seed).await?;
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    Shell::new(inventory, stdin, stdout)
        .with_sites(config.filter.sites.clone())
        .with_details(config.display.show_details)
        .with_confirm_deletes(config.display.confirm_deletes && !cmd.no_confirm)
        .run()
        .context("interactive session failed")
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Seed]");
                println!("  Source:             {}", config.seed.source);
                println!("  Timeout (secs):     {}", config.seed.timeout_secs);
                println!();
                println!("[Filter]");
                println!("  Sites:              {}", config.filter.sites.join(", "));
                println!();
                println!("[Display]");
                println!("  Show details:       {}", config.display.show_details);
                println!("  Confirm deletes:    {}", config.display.confirm_deletes);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
