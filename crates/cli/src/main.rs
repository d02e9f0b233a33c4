//! dsuctl - CemuhookUDP server probe and monitor
//!
//! Talks to cemuhook-compatible (DSU) motion servers: checks that a server
//! answers and streams the motion/touch state a client would publish.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{ProbeArgs, WatchArgs};

#[derive(Parser)]
#[command(name = "dsuctl")]
#[command(about = "CemuhookUDP client - probe motion servers and watch live motion data")]
#[command(version)]
#[command(long_about = "
dsuctl speaks the CemuhookUDP (DSU) protocol used by motion servers for
emulators. `probe` sends one round of requests and reports what came back;
`watch` runs the full client and prints every new sample it publishes.

Use --json for machine-readable output suitable for scripting.
Exit codes: 0 success, 2 no response from server, 3 invalid configuration,
1 any other failure.
")]
struct Cli {
    /// Output in JSON format for machine parsing
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send version, port info and pad data requests once
    Probe(ProbeArgs),

    /// Run a client and print published motion/touch state
    Watch(WatchArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "dsuctl={log_level},cemuhook_udp_client={log_level},cemuhook_udp_protocol={log_level}"
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match execute_command(&cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            std::process::exit(error::exit_code(&e));
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Probe(args) => commands::probe::execute(args, cli.json).await,
        Commands::Watch(args) => commands::watch::execute(args, cli.json).await,
    }
}
