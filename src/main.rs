// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, set up logging, run one action.
// - Any failure prints a diagnostic on stderr and exits with status 1.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use ow::{cli::Cli, config::Config, ui, OwError};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let default_filter = if cli.debug { "ow=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_level(false)
        .without_time()
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{}{:#}", ui::ERROR, e);
        if e.downcast_ref::<OwError>().is_some_and(OwError::is_local) {
            eprintln!("{}", Cli::command().render_usage());
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    ui::ensure_password(&mut config)?;

    if let Some(out) = ui::execute(cli.action, &cli.path, &config, !cli.debug)? {
        println!("{}", out);
    }
    Ok(())
}
