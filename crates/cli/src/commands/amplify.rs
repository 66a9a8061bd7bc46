use std::{ops::Range, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser};
use intcode_core_executor::{amplify, ascii::format_outputs, max_amplification};

use crate::load_program;

#[derive(Parser, Debug)]
#[command(name = "amplify", about = "Run a program as a series of amplifiers.")]
pub struct AmplifyCmd {
    /// Path to the program.
    pub program: PathBuf,

    #[clap(flatten)]
    pub selection: PhaseSelection,

    /// Wire the amplifiers in a line instead of a feedback loop.
    #[arg(long)]
    pub chain: bool,
}

#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct PhaseSelection {
    /// The phase setting of each amplifier, in order.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub phases: Option<Vec<i64>>,

    /// Try every ordering of the phases in this range, e.g. `5..10`.
    #[arg(long, value_parser = parse_range)]
    pub search: Option<Range<i64>>,
}

impl AmplifyCmd {
    #[allow(clippy::print_stdout)]
    pub fn run(&self) -> Result<()> {
        let program = load_program(&self.program)?;
        let feedback = !self.chain;

        if let Some(phases) = &self.selection.phases {
            let signal = amplify(&program, phases, feedback).context("while amplifying")?;
            println!("{signal}");
        } else if let Some(range) = &self.selection.search {
            let (signal, phases) = max_amplification(&program, range.clone(), feedback)
                .context("while searching phase settings")?;
            println!("{}", describe_best(signal, &phases));
        } else {
            bail!("either --phases or --search is required");
        }
        Ok(())
    }
}

/// Render the strongest signal with the phase ordering that produced it.
fn describe_best(signal: i64, phases: &[i64]) -> String {
    format!("{signal} (phases {})", format_outputs(phases))
}

/// Parse a half-open `START..END` range.
fn parse_range(range: &str) -> Result<Range<i64>> {
    let (start, end) =
        range.split_once("..").with_context(|| format!("expected START..END, got `{range}`"))?;
    let start: i64 = start.trim().parse().context("invalid start")?;
    let end: i64 = end.trim().parse().context("invalid end")?;
    if start >= end {
        bail!("empty range `{range}`");
    }
    Ok(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("5..10").unwrap(), 5..10);
        assert_eq!(parse_range("-2..1").unwrap(), -2..1);
        assert!(parse_range("5").is_err());
        assert!(parse_range("3..3").is_err());
    }

    #[test]
    fn test_describe_best() {
        assert_eq!(describe_best(139_629_729, &[9, 8, 7, 6, 5]), "139629729 (phases 9,8,7,6,5)");
        assert_eq!(describe_best(-3, &[-1, 0]), "-3 (phases -1,0)");
    }
}
