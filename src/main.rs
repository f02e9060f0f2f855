mod cli;
mod commands;
mod config;
mod progress;
mod resource;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use commands::Session;
use std::io;

/// Global context for the application
pub struct Context {
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context { quiet: cli.quiet };

    match cli.command {
        Command::List { kind, filter } => {
            let session = Session::from_cli(&cli.connection)?;
            commands::list::run(&ctx, &session, kind, &filter)
        }
        Command::Get { kind, ids } => {
            let session = Session::from_cli(&cli.connection)?;
            commands::get::run(&ctx, &session, kind, &ids)
        }
        Command::Delete { kind, ids } => {
            let session = Session::from_cli(&cli.connection)?;
            commands::delete::run(&ctx, &session, kind, &ids)
        }
        Command::Kinds => commands::kinds::run(cli.connection.product.into()),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "sra", &mut io::stdout());
            Ok(())
        }
    }
}
