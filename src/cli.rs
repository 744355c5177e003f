//! CLI argument parsing using clap derive macros

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::build::PlatformId;
use crate::commands::{
    build::BuildCommand, builddeps::BuilddepsCommand, clean::CleanCommand,
    distclean::DistcleanCommand, prepare::PrepareCommand, run::RunCommand, ProjectContext,
};
use crate::error::{hints, BuildError};
use crate::exec::SystemRunner;
use crate::utils::terminal::{disable_colors, print_verbose};

/// bdnbuild - prepare, build and run a multi-platform project with CMake
///
/// Build files for each platform and architecture live in their own directory below
/// build/, e.g. build/linux or build/android_arm64-v8a.
#[derive(Parser, Debug)]
#[command(name = "bdnbuild")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_long_help = platforms_help())]
pub struct Cli {
    /// Project root directory
    #[arg(short = 'C', long = "dir", global = true, env = "BDNBUILD_DIR", default_value = ".")]
    pub dir: PathBuf,

    /// CMake executable to use [default: cmake from PATH]
    #[arg(long, global = true, env = "BDNBUILD_CMAKE")]
    pub cmake: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the build files (run CMake) for a platform
    Prepare(PrepareCommand),

    /// Build the prepared projects
    Build(BuildCommand),

    /// Clean the build output of the prepared projects
    Clean(CleanCommand),

    /// Delete build directories entirely
    Distclean(DistcleanCommand),

    /// Build third-party dependencies
    Builddeps(BuilddepsCommand),

    /// Run a built module
    Run(RunCommand),
}

fn platforms_help() -> String {
    format!(
        "Platforms:\n{}\n\nArchitectures:\n{}\n\n{}",
        PlatformId::help(),
        hints::architectures(),
        BUILD_SYSTEMS_HELP
    )
}

const BUILD_SYSTEMS_HELP: &str = "\
Build systems:
  Any CMake generator name, or an alias: make, nmake, msysmake, mingwmake,
  codeblocks, codelite, vs<year>. `bdnbuild -v prepare` lists the generators
  and aliases of the installed CMake.";

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // Set up terminal colors
        if self.no_color {
            disable_colors();
        }

        let root = project_root(&self.dir)?;
        let cmake = self.cmake.unwrap_or_else(find_cmake);
        print_verbose(self.verbose, &format!("Using CMake: {}", cmake));

        let mut ctx = ProjectContext::new(&root, cmake, self.verbose, SystemRunner::new())?;

        // Execute the subcommand
        match self.command {
            Commands::Prepare(cmd) => cmd.execute(&mut ctx),
            Commands::Build(cmd) => cmd.execute(&mut ctx),
            Commands::Clean(cmd) => cmd.execute(&mut ctx),
            Commands::Distclean(cmd) => cmd.execute(&mut ctx),
            Commands::Builddeps(cmd) => cmd.execute(&mut ctx),
            Commands::Run(cmd) => cmd.execute(&mut ctx),
        }
    }
}

/// Absolute project root. CMake runs in the build directories, so relative paths would break.
fn project_root(dir: &Path) -> Result<PathBuf, BuildError> {
    let root = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| BuildError::io("Failed to get the current directory", e))?
            .join(dir)
    };

    if !root.is_dir() {
        return Err(BuildError::argument(format!(
            "Project directory not found: {}",
            dir.display()
        )));
    }
    Ok(root)
}

/// CMake from PATH, or plain `cmake` and let the probe report the problem
fn find_cmake() -> String {
    which::which("cmake")
        .map(|path| path.display().to_string())
        .unwrap_or_else(|_| "cmake".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::ConfigName;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_prepare() {
        let cli = Cli::try_parse_from([
            "bdnbuild",
            "prepare",
            "--platform",
            "android",
            "--arch",
            "arm64-v8a",
            "--build-system",
            "ninja",
        ])
        .unwrap();
        match cli.command {
            Commands::Prepare(cmd) => {
                assert_eq!(cmd.target.platform, Some(PlatformId::Android));
                assert_eq!(cmd.target.arch.as_deref(), Some("arm64-v8a"));
                assert_eq!(cmd.build_system.as_deref(), Some("ninja"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_run_params() {
        let cli = Cli::try_parse_from([
            "bdnbuild", "-v", "run", "--platform", "linux", "--config", "Debug", "--module",
            "testapp", "--", "--flag", "value",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Run(cmd) => {
                assert_eq!(cmd.config, Some(ConfigName::Debug));
                assert_eq!(cmd.module.as_deref(), Some("testapp"));
                assert_eq!(cmd.params, vec!["--flag", "value"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["bdnbuild", "build", "--config", "Fast"]).is_err());
        assert!(Cli::try_parse_from(["bdnbuild", "build", "--platform", "windows"]).is_err());
        assert!(Cli::try_parse_from(["bdnbuild", "install"]).is_err());
    }

    #[test]
    fn test_long_help_lists_architectures_and_build_systems() {
        let help = platforms_help();
        assert!(help.contains("winuwp"));
        assert!(help.contains("ios: std, sim32, sim64"));
        assert!(help.contains("Build systems:"));
        assert!(help.contains("vs<year>"));
    }

    #[test]
    fn test_project_root_must_exist() {
        let err = project_root(Path::new("/definitely/not/a/project")).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
