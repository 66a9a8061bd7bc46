use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use intcode_core_executor::disassemble;

use crate::load_program;

#[derive(Parser, Debug)]
#[command(name = "disasm", about = "Print a disassembly of a program.")]
pub struct DisasmCmd {
    /// Path to the program.
    pub program: PathBuf,
}

impl DisasmCmd {
    #[allow(clippy::print_stdout)]
    pub fn run(&self) -> Result<()> {
        let program = load_program(&self.program)?;
        for line in disassemble(&program) {
            println!("{line}");
        }
        Ok(())
    }
}
