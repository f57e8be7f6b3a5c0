//! bqva - visualize BigQuery view dependencies and manage authorized views

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;
mod logging;

use cli::Cli;
use commands::{authorize, export, revoke, tree};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.global.verbose, cli.global.debug)?;

    match &cli.command {
        cli::Commands::Tree(args) => tree::execute(args, &cli.global).await,
        cli::Commands::Authorize(args) => authorize::execute(args, &cli.global).await,
        cli::Commands::Revoke(args) => revoke::execute(args, &cli.global).await,
        cli::Commands::Export(args) => export::execute(args, &cli.global).await,
    }
}
