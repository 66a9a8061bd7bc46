pub mod commands;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use intcode_core_executor::Program;

use crate::commands::{amplify::AmplifyCmd, disasm::DisasmCmd, run::RunCmd};

#[derive(Parser)]
#[command(name = "intcode", author, version, about = "Run Intcode programs.", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    Run(RunCmd),
    Amplify(AmplifyCmd),
    Disasm(DisasmCmd),
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Command::Run(cmd) => cmd.run(),
            Command::Amplify(cmd) => cmd.run(),
            Command::Disasm(cmd) => cmd.run(),
        }
    }
}

/// Load the program stored in the first line of `path`.
pub fn load_program(path: &Path) -> Result<Program> {
    Program::from_file(path).with_context(|| format!("while loading `{}`", path.display()))
}
