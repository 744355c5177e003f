//! External process execution

#[cfg(test)]
pub mod fake;
pub mod subprocess;

pub use subprocess::{CommandLine, Runner, SystemRunner};
