//! bigs - CLI for the bigs blog API.
//!
//! A thin wrapper over `bigs-http` for trying the API by hand. The session
//! is kept in a JSON file under the data directory, so a login persists
//! across invocations and protected commands refresh tokens as needed.

mod cli;
mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::Cli;
use context::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let ctx = AppContext::open(cli.api_url.as_deref(), cli.data_dir.clone())?;
    let result = commands::handle(cli.command, &ctx).await;

    if let Err(err) = &result
        && err
            .downcast_ref::<bigs_core::Error>()
            .is_some_and(bigs_core::Error::is_auth_expired)
    {
        output::error("Session expired. Run 'bigs auth login' to sign in again.");
    }

    result
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
