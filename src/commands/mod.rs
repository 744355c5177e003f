//! Command implementations
//!
//! Each command module provides a clap-derived struct and an execute method taking the
//! [`ProjectContext`] of the current invocation.

pub mod build;
pub mod builddeps;
pub mod clean;
pub mod distclean;
pub mod prepare;
pub mod run;

use std::path::Path;

use clap::Args;

use crate::build::inventory::{prepared_pairs, select_pairs, Pair};
use crate::build::{Arch, GeneratorInfo, Layout, PlatformId};
use crate::config::ProjectConfig;
use crate::error::BuildError;
use crate::exec::{CommandLine, Runner, SystemRunner};
use crate::utils::terminal::{print_command, print_error, print_verbose};

/// Platform / architecture selection shared by all commands
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Target platform (winuwp, winstore, win32, dotnet, linux, mac, ios, android, web).
    /// Defaults to all prepared platforms.
    #[arg(long, short = 'p')]
    pub platform: Option<PlatformId>,

    /// Target architecture; `std` is the platform's default.
    /// Defaults to all prepared architectures.
    #[arg(long, short = 'a')]
    pub arch: Option<String>,
}

impl TargetArgs {
    pub fn arch(&self) -> Option<Arch> {
        self.arch.as_deref().map(Arch::new)
    }
}

/// Everything a command needs about the project it operates on
pub struct ProjectContext<R: Runner = SystemRunner> {
    pub layout: Layout,
    pub settings: ProjectConfig,
    /// CMake executable
    pub cmake: String,
    pub verbose: bool,
    pub runner: R,
}

impl<R: Runner> ProjectContext<R> {
    /// Load the project configuration of `root`
    pub fn new(root: &Path, cmake: String, verbose: bool, runner: R) -> Result<Self, BuildError> {
        let settings = ProjectConfig::load(root)?;
        let layout = Layout::new(root, &settings.paths);
        print_verbose(verbose, &format!("Project root: {}", root.display()));

        Ok(Self {
            layout,
            settings,
            cmake,
            verbose,
            runner,
        })
    }

    /// Ask CMake for its generators
    pub fn probe_generators(&mut self) -> Result<GeneratorInfo, BuildError> {
        let info = GeneratorInfo::probe(&mut self.runner, &self.cmake)?;
        print_verbose(
            self.verbose,
            &format!(
                "CMake generators:\n{}\n{}",
                info.help_lines().join("\n"),
                info.alias_help()
            ),
        );
        Ok(info)
    }

    /// Echo and run a command
    pub fn run(&mut self, command: &CommandLine, cwd: &Path) -> Result<(), BuildError> {
        print_command(&command.to_string());
        print_verbose(self.verbose, &format!("Working directory: {}", cwd.display()));
        self.runner.run(command, cwd)
    }

    /// The pairs selected by the target arguments
    pub fn selected_pairs(&self, target: &TargetArgs) -> Result<Vec<Pair>, BuildError> {
        let prepared = prepared_pairs(&self.layout.build_root)?;
        Ok(select_pairs(
            target.platform,
            target.arch().as_ref(),
            &prepared,
        ))
    }
}

/// Process every pair in order.
///
/// A pair whose build state is unusable is reported and skipped; the first such error is
/// returned once all other pairs are done. Any other error aborts immediately.
pub fn for_each_pair<F>(pairs: Vec<Pair>, mut f: F) -> Result<(), BuildError>
where
    F: FnMut(PlatformId, &Arch) -> Result<(), BuildError>,
{
    let mut state_error = None;
    for (platform, arch) in pairs {
        match f(platform, &arch) {
            Ok(()) => {}
            Err(e @ BuildError::State { .. }) => {
                print_error(&format!("{}. Skipping {} ({}).", e, platform, arch));
                state_error.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }
    match state_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_selected_pairs_from_inventory() {
        let (_temp, ctx) = project();
        prepared(&ctx, PlatformId::Linux, "std", "make", true);
        prepared(&ctx, PlatformId::Android, "x86_64", "Ninja", true);

        let all = ctx.selected_pairs(&TargetArgs::default()).unwrap();
        assert_eq!(
            all,
            vec![
                (PlatformId::Android, Arch::from("x86_64")),
                (PlatformId::Linux, Arch::std()),
            ]
        );

        let target = TargetArgs {
            platform: Some(PlatformId::Linux),
            arch: None,
        };
        assert_eq!(
            ctx.selected_pairs(&target).unwrap(),
            vec![(PlatformId::Linux, Arch::std())]
        );
    }

    #[test]
    fn test_for_each_pair_skips_state_errors() {
        let pairs = vec![
            (PlatformId::Android, Arch::std()),
            (PlatformId::Linux, Arch::std()),
        ];
        let mut seen = Vec::new();
        let result = for_each_pair(pairs, |platform, _| {
            seen.push(platform);
            if platform == PlatformId::Android {
                return Err(BuildError::State {
                    dir: "build/android".into(),
                    message: "corrupt".to_string(),
                });
            }
            Ok(())
        });
        assert!(matches!(result, Err(BuildError::State { .. })));
        assert_eq!(seen, vec![PlatformId::Android, PlatformId::Linux]);
    }

    #[test]
    fn test_for_each_pair_fails_fast() {
        let pairs = vec![
            (PlatformId::Android, Arch::std()),
            (PlatformId::Linux, Arch::std()),
        ];
        let mut count = 0;
        let result = for_each_pair(pairs, |_, _| {
            count += 1;
            Err(BuildError::tool_failed("cmake", 2))
        });
        assert_eq!(result.unwrap_err().exit_code(), 11);
        assert_eq!(count, 1);
    }
}
