use anyhow::Result;
use clap::Parser;
use expr_json::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.setup_logging();
    cli.run()
}
