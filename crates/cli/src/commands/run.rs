use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use intcode_core_executor::{
    ascii::{format_outputs, AsciiOutput},
    run_to_completion, IntcodeContext,
};

use crate::load_program;

#[derive(Parser, Debug)]
#[command(name = "run", about = "Run a program to completion with a fixed list of inputs.")]
pub struct RunCmd {
    /// Path to the program.
    pub program: PathBuf,

    /// A value for the program to read. Repeat for more values.
    #[arg(short, long = "input", allow_hyphen_values = true)]
    pub inputs: Vec<i64>,

    /// Overwrite a cell before running, as `ADDRESS=VALUE`.
    #[arg(short, long = "patch", value_parser = parse_patch)]
    pub patches: Vec<(usize, i64)>,

    /// Decode the output as ASCII text.
    #[arg(long)]
    pub ascii: bool,

    /// Give up after this many instructions.
    #[arg(long, env = "INTCODE_MAX_CYCLES")]
    pub max_cycles: Option<u64>,

    /// Print instruction statistics.
    #[arg(long)]
    pub report: bool,
}

impl RunCmd {
    #[allow(clippy::print_stdout)]
    pub fn run(&self) -> Result<()> {
        let program = self
            .patches
            .iter()
            .try_fold(load_program(&self.program)?, |program, (address, value)| {
                program.with_patch(*address, *value)
            })?;
        let context = IntcodeContext { max_cycles: self.max_cycles, ..Default::default() };

        let (summary, output) = run_to_completion(&program, self.inputs.iter().copied(), &context)
            .with_context(|| format!("while running `{}`", self.program.display()))?;

        if self.ascii {
            let decoded = AsciiOutput::decode(output);
            print!("{}", decoded.text);
            if let Some(value) = decoded.value {
                println!("{value}");
            }
        } else {
            println!("{}", format_outputs(&output));
        }
        println!("cell 0: {}", summary.first_cell);
        if self.report {
            println!("{}", summary.report);
        }
        Ok(())
    }
}

/// Parse an `ADDRESS=VALUE` pair.
fn parse_patch(patch: &str) -> Result<(usize, i64)> {
    let (address, value) =
        patch.split_once('=').with_context(|| format!("expected ADDRESS=VALUE, got `{patch}`"))?;
    let address = address.trim().parse().context("invalid address")?;
    let value = value.trim().parse().context("invalid value")?;
    Ok((address, value))
}
