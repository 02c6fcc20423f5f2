//! Tanklog - daily work log for fuel tanker drivers
//!
//! Records each day's shift, jobs, drops and the cargo carried in every
//! trailer compartment.

mod cli;
mod commands;
mod output;

use std::env;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TANKLOG_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "tanklog=debug,info"
        } else {
            "tanklog=info,warn"
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
