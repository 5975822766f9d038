// src/bin/chatroute.rs

use anyhow::Result;
use chatroute::{
    cli::{Cli, handlers},
    core::paths,
    system::{inventory::InventoryClient, settings},
};
use clap::Parser;
use colored::*;
use std::io::{self, BufRead, Write};

/// Sets up logging, parses arguments and hands over to `run_cli`.
/// Every error ends up here and is printed once.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {:#}", chatroute::t!("bin.error").red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    // --- Configuration ---
    let config_file = match cli.config {
        Some(path) => path,
        None => paths::get_default_config_path()?,
    };
    let mut settings = settings::load_settings(&config_file)?;
    if let Some(prefix) = cli.prefix {
        settings.prefix = prefix;
        settings::validate(&settings)?;
    }
    if cli.node.is_some() {
        settings.node = cli.node;
    }
    let resolved = paths::resolve_paths(&config_file, &settings)?;
    log::debug!("Using {:?}", resolved);

    // --- Engine ---
    let engine = handlers::build_engine(
        InventoryClient::new(resolved.inventory_file),
        settings.node.clone(),
    )?;

    // --- One-shot mode ---
    if !cli.command.is_empty() {
        println!("{}", engine.respond(&cli.command.join(" ")));
        return Ok(());
    }

    // --- Line mode: only prefixed lines are commands ---
    println!(
        "{}",
        format!(chatroute::t!("bin.ready"), prefix = settings.prefix).dimmed()
    );
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let Some(message) = line.trim_start().strip_prefix(settings.prefix.as_str()) else {
            log::trace!("Ignoring unprefixed line: {:?}", line);
            continue;
        };
        writeln!(stdout, "{}", engine.respond(message))?;
        stdout.flush()?;
    }
    Ok(())
}
