//! tablegate CLI entry point.

use clap::Parser;

use tablegate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = tablegate::cli::run(cli).await {
        tablegate::cli::handle_error(err, json);
    }
}
