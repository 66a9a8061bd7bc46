//! An implementation of an executor for Intcode programs.
//!
//! A [`Program`] is loaded once from its comma-separated source and every run interprets its own
//! clone of the image. Runs talk to drivers through a [`Port`]: either crossbeam channels when the
//! run lives on its own thread (see [`spawn`] and [`Pipeline`]), or in-memory buffers for
//! synchronous execution.

#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![warn(missing_docs)]

pub mod ascii;
mod context;
mod disassembler;
mod executor;
mod instruction;
mod io;
mod memory;
mod opcode;
mod pipeline;
mod program;
#[cfg(any(test, feature = "programs"))]
pub mod programs;
mod report;
mod runner;
mod state;
mod utils;

pub use context::*;
pub use disassembler::*;
pub use executor::*;
pub use instruction::*;
pub use io::*;
pub use memory::*;
pub use opcode::*;
pub use pipeline::*;
pub use program::*;
pub use report::*;
pub use runner::*;
pub use state::*;
pub use utils::*;
