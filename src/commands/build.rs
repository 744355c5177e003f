//! Build command implementation
//!
//! Also implements `clean`, which is the same `cmake --build` call on the `clean` target.

use anyhow::Result;
use clap::Args;

use super::{for_each_pair, ProjectContext, TargetArgs};
use crate::build::cmake::CMakeBuild;
use crate::build::state::BuildDirState;
use crate::build::{Arch, ConfigName, PlatformId};
use crate::error::BuildError;
use crate::exec::Runner;
use crate::utils::terminal::print_info;

/// Build the prepared projects
#[derive(Args, Debug, Default)]
pub struct BuildCommand {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Configuration to build. Defaults to all configurations.
    #[arg(long, short = 'c', value_enum)]
    pub config: Option<ConfigName>,
}

impl BuildCommand {
    /// Execute the build command
    pub fn execute<R: Runner>(self, ctx: &mut ProjectContext<R>) -> Result<()> {
        build_or_clean(ctx, &self.target, self.config, false)
    }
}

/// Run `cmake --build` for every selected pair, optionally on the `clean` target
pub(crate) fn build_or_clean<R: Runner>(
    ctx: &mut ProjectContext<R>,
    target: &TargetArgs,
    config: Option<ConfigName>,
    clean: bool,
) -> Result<()> {
    ctx.probe_generators()?;
    let pairs = ctx.selected_pairs(target)?;

    for_each_pair(pairs, |platform, arch| {
        build_pair(ctx, platform, arch, config, clean)
    })?;
    Ok(())
}

fn build_pair<R: Runner>(
    ctx: &mut ProjectContext<R>,
    platform: PlatformId,
    arch: &Arch,
    config: Option<ConfigName>,
    clean: bool,
) -> Result<(), BuildError> {
    let platform_dir = ctx.layout.platform_build_dir(platform, arch);
    if !platform_dir.is_dir() {
        return Err(BuildError::incorrect_call(format!(
            "Platform {} for arch '{}' has not been prepared yet. Call prepare first.",
            platform, arch
        )));
    }

    let state = BuildDirState::load(&platform_dir)?;
    let single_config = state.single_config_build_system;

    let configs: Vec<Option<ConfigName>> = match config {
        None if single_config => ConfigName::ALL.iter().copied().map(Some).collect(),
        other => vec![other],
    };

    for config in configs {
        let dir = match config {
            Some(config) if single_config => platform_dir.join(config.as_str()),
            _ => platform_dir.clone(),
        };

        match config {
            Some(config) => print_info(&format!("Calling cmake --build for config {}", config)),
            None => print_info("Calling cmake --build for all configs"),
        }

        let command = CMakeBuild::new(ctx.cmake.as_str(), &dir)
            .clean(clean)
            .config(config)
            .to_command();
        ctx.run(&command, &dir)?;
    }
    Ok(())
}
