use anyhow::Result;
use clap::Parser;
use intcode_cli::Cli;
use intcode_core_executor::setup_logger;

fn main() -> Result<()> {
    setup_logger();
    Cli::parse().run()
}
