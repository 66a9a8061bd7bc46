pub mod amplify;
pub mod disasm;
pub mod run;
