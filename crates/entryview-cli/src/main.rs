mod cli;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use output::print_error;

fn main() {
    if let Err(e) = run() {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    observability::init_tracing_with_level(&cli.log_level);
    let format = cli.format.unwrap_or_default();

    match &cli.command {
        Commands::Compile(args) => commands::compile::compile(args, format)?,
        Commands::Fields(args) => commands::fields::fields(args, format)?,
        Commands::Check(args) => commands::check::check(args, format)?,
    }

    Ok(())
}
