//! Binary crate for the `skyreport` tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving the consolidated report over HTTP
//! - Interactive configuration

use clap::Parser;

mod cli;
mod logging;
mod server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cmd = cli::Cli::parse();
    cmd.run().await
}
