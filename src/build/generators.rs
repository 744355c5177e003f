//! CMake generator discovery and build system aliases
//!
//! `cmake --help` ends with the list of generators it supports, one indented
//! `<name> = <description>` entry per generator. [`GeneratorInfo`] parses that list and
//! maps short build system names (`make`, `vs2019`, ...) to generator names.

use std::collections::BTreeMap;

use crate::error::{hints, BuildError};
use crate::exec::{CommandLine, Runner};

const VS_PREFIX: &str = "Visual Studio ";

/// Build system aliases that are always available
const STATIC_ALIASES: &[(&str, &str)] = &[
    ("make", "Unix Makefiles"),
    ("nmake", "NMake Makefiles"),
    ("msysmake", "MSYS Makefiles"),
    ("mingwmake", "MinGW Makefiles"),
];

/// Aliases registered only when CMake reports the generator
const OPTIONAL_ALIASES: &[(&str, &str)] = &[
    ("codeblocks", "CodeBlocks - Unix Makefiles"),
    ("codelite", "CodeLite - Unix Makefiles"),
];

/// Generators known to the installed CMake, plus the alias map
#[derive(Debug, Clone, Default)]
pub struct GeneratorInfo {
    /// Raw lines of the generator list, for help output
    help_lines: Vec<String>,
    /// alias -> generator name
    aliases: BTreeMap<String, String>,
}

impl GeneratorInfo {
    /// Run `cmake --help` and parse its generator list
    pub fn probe(runner: &mut dyn Runner, cmake: &str) -> Result<Self, BuildError> {
        let command = CommandLine::new(cmake).arg("--help").label("cmake");
        let output = runner.capture(&command).map_err(|e| match e {
            BuildError::ToolInvocation { tool, message, .. } => BuildError::ToolInvocation {
                tool,
                message,
                hint: Some(hints::cmake().to_string()),
            },
            other => other,
        })?;

        if !output.success {
            return Err(BuildError::ToolInvocation {
                tool: "cmake".to_string(),
                message: format!("`{} --help` returned an error", cmake),
                hint: Some(hints::cmake().to_string()),
            });
        }

        Self::from_help(&output.stdout)
    }

    /// Parse the output of `cmake --help`
    pub fn from_help(help: &str) -> Result<Self, BuildError> {
        // The generator list is the trailing block of indented lines
        let mut help_lines: Vec<String> = help
            .trim()
            .lines()
            .rev()
            .take_while(|line| is_list_line(line))
            .map(|line| line.to_string())
            .collect();
        help_lines.reverse();

        let names: Vec<String> = help_lines
            .iter()
            .filter_map(|line| parse_entry(line))
            .collect();

        if names.is_empty() {
            return Err(BuildError::ToolInvocation {
                tool: "cmake".to_string(),
                message: "could not find the generator list in the output of `cmake --help`"
                    .to_string(),
                hint: None,
            });
        }

        let mut aliases = BTreeMap::new();
        for name in &names {
            if let Some((internal, year)) = parse_visual_studio(name) {
                aliases.insert(
                    format!("vs{}", year),
                    format!("{}{} {}", VS_PREFIX, internal, year),
                );
            }
        }
        for (alias, generator) in STATIC_ALIASES {
            aliases.insert(alias.to_string(), generator.to_string());
        }
        for (alias, generator) in OPTIONAL_ALIASES {
            if names.iter().any(|n| n == generator) {
                aliases.insert(alias.to_string(), generator.to_string());
            }
        }

        Ok(Self {
            help_lines,
            aliases,
        })
    }

    /// Generator names in the order CMake lists them
    #[cfg(test)]
    fn generator_names(&self) -> Vec<String> {
        self.help_lines
            .iter()
            .filter_map(|line| parse_entry(line))
            .collect()
    }

    /// The generator list as printed by CMake
    pub fn help_lines(&self) -> &[String] {
        &self.help_lines
    }

    /// Map an alias to its generator name. Anything else is taken as a literal generator name.
    pub fn resolve<'a>(&'a self, build_system: &'a str) -> &'a str {
        self.aliases
            .get(build_system)
            .map(String::as_str)
            .unwrap_or(build_system)
    }

    /// Whether the build system fixes the configuration at configure time.
    ///
    /// This is a name heuristic: makefile and ninja based generators are single-config.
    pub fn is_single_config(&self, build_system: &str) -> bool {
        let generator = self.resolve(build_system).to_lowercase();
        generator.contains("makefile") || generator.contains("ninja")
    }

    /// Help text listing all aliases
    pub fn alias_help(&self) -> String {
        let mut help = String::from("Aliases for build system names:\n");
        for (alias, generator) in &self.aliases {
            help.push_str(&format!("\n{} = {}", alias, generator));
        }
        help
    }
}

/// Lines of the generator block: indented, or flagged with CMake's `* ` default marker
fn is_list_line(line: &str) -> bool {
    !line.is_empty() && (line.starts_with(' ') || line.starts_with("* "))
}

/// Extract the generator name from an entry line. Continuation lines are indented
/// deeper than two columns and are not entries.
fn parse_entry(line: &str) -> Option<String> {
    let entry = if let Some(rest) = line.strip_prefix("* ") {
        rest
    } else {
        let rest = line.strip_prefix("  ")?;
        if rest.starts_with(' ') {
            return None;
        }
        rest
    };

    let (name, _description) = entry.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// `Visual Studio <internal> <year> ...` -> (internal, year)
fn parse_visual_studio(name: &str) -> Option<(u32, u32)> {
    let mut words = name.strip_prefix(VS_PREFIX)?.split_whitespace();
    let internal = words.next()?.parse().ok()?;
    let year = words.next()?.parse().ok()?;
    Some((internal, year))
}
