//! Host toolchain detection
//!
//! Only compiler versions are probed. A missing compiler or unreadable version output
//! yields an unknown version, never an error.

pub mod linux;

use std::fmt;

use crate::exec::{CommandLine, Runner};

/// A dotted version number, e.g. `4.8.4`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompilerVersion(Vec<u32>);

impl CompilerVersion {
    pub fn new(components: Vec<u32>) -> Self {
        Self(components)
    }

    /// First component
    pub fn major(&self) -> Option<u32> {
        self.0.first().copied()
    }
}

impl fmt::Display for CompilerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

/// Parse the first line of `<compiler> --version` output.
///
/// Every whitespace separated word is read as a version (`-` counts as `.`), keeping the
/// leading numeric components. Words with at least `min_components` qualify; the first
/// qualifying word wins unless `prefer_last` is set.
pub fn parse_version_output(
    output: &str,
    min_components: usize,
    prefer_last: bool,
) -> Option<CompilerVersion> {
    let first_line = output.trim().lines().next()?;

    let mut selected = None;
    for word in first_line.split_whitespace() {
        let word = word.replace('-', ".");
        let components: Vec<u32> = word
            .split('.')
            .map_while(|c| c.parse::<u32>().ok())
            .collect();

        if components.len() >= min_components {
            selected = Some(CompilerVersion::new(components));
            if !prefer_last {
                break;
            }
        }
    }
    selected
}

/// Run `<compiler> --version` and parse it. Any failure is an unknown version.
pub fn probe_version(
    runner: &mut dyn Runner,
    compiler: &str,
    min_components: usize,
    prefer_last: bool,
) -> Option<CompilerVersion> {
    let command = CommandLine::new(compiler).arg("--version");
    let output = runner.capture(&command).ok()?;
    if !output.success {
        return None;
    }
    parse_version_output(&output.stdout, min_components, prefer_last)
}
