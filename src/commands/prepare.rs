//! Prepare command implementation
//!
//! Runs CMake's configure step for each selected (platform, arch) pair and records the
//! build system in the pair's build directory.

use anyhow::Result;
use clap::Args;

use super::{for_each_pair, ProjectContext, TargetArgs};
use crate::build::plan::{Plan, PlanRequest};
use crate::build::state::BuildDirState;
use crate::build::toolchains::linux::LinuxCompilers;
use crate::build::toolchains::CompilerVersion;
use crate::build::{dotnet, emsdk, Arch, ConfigName, GeneratorInfo, PlatformId};
use crate::error::BuildError;
use crate::exec::Runner;
use crate::utils::paths::{ensure_dir, remove_dir_with_retry};
use crate::utils::terminal::{print_info, print_warning};

const REMOVE_ATTEMPTS: u32 = 10;

/// Generate the build files for one or more platforms
#[derive(Args, Debug, Default)]
pub struct PrepareCommand {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Build system: a CMake generator name or an alias (make, ninja, vs2019, ...).
    /// Required the first time a platform is prepared.
    #[arg(long, short = 'b')]
    pub build_system: Option<String>,
}

impl PrepareCommand {
    /// Execute the prepare command
    pub fn execute<R: Runner>(self, ctx: &mut ProjectContext<R>) -> Result<()> {
        let generators = ctx.probe_generators()?;

        let mut pairs = ctx.selected_pairs(&self.target)?;
        if pairs.is_empty() {
            match self.target.platform {
                Some(platform) => pairs.push((platform, self.target.arch().unwrap_or_default())),
                None => {
                    return Err(BuildError::incorrect_call(
                        "--platform PLATFORM must be specified when prepare is first called.",
                    )
                    .into())
                }
            }
        }

        for_each_pair(pairs, |platform, arch| {
            self.prepare_pair(ctx, &generators, platform, arch)
        })?;
        Ok(())
    }

    fn prepare_pair<R: Runner>(
        &self,
        ctx: &mut ProjectContext<R>,
        generators: &GeneratorInfo,
        platform: PlatformId,
        arch: &Arch,
    ) -> Result<(), BuildError> {
        let build_dir = ctx.layout.platform_build_dir(platform, arch);
        let state = BuildDirState::load(&build_dir)?;
        let mut old_build_system = state.build_system;

        if let (Some(requested), Some(old)) = (&self.build_system, &old_build_system) {
            if requested != old {
                print_warning(
                    "Build system does not match the one used when the projects for this platform \
                     were first prepared. Cleaning existing build files.",
                );
                remove_dir_with_retry(&build_dir, REMOVE_ATTEMPTS)?;
                old_build_system = None;
            }
        }

        let build_system = match (&self.build_system, &old_build_system) {
            (Some(requested), _) => requested.clone(),
            (None, Some(old)) => old.clone(),
            (None, None) => {
                return Err(BuildError::incorrect_call_with_hint(
                    "--build-system BUILDSYSTEM must be specified when prepare is first called for a platform.",
                    generators.alias_help(),
                ))
            }
        };

        let single_config = generators.is_single_config(&build_system);
        let generator = generators.resolve(&build_system);
        let configs: Vec<Option<ConfigName>> = if single_config {
            ConfigName::ALL.iter().copied().map(Some).collect()
        } else {
            vec![None]
        };

        let compilers = if platform == PlatformId::Linux {
            detect_compilers(ctx)
        } else {
            LinuxCompilers::default()
        };

        // Every plan is checked before the SDK is touched
        let plans = configs
            .into_iter()
            .map(|config| {
                let request = PlanRequest {
                    platform,
                    arch,
                    generator,
                    config,
                    compilers: &compilers,
                };
                Plan::build(&request, &ctx.layout)
            })
            .collect::<Result<Vec<_>, _>>()?;

        if platform == PlatformId::Web {
            let sdk_version = ctx.settings.web.emsdk_version.clone();
            emsdk::bootstrap(&mut ctx.runner, &ctx.layout, &sdk_version)?;
        }

        let verb = if old_build_system.is_some() {
            "Refreshing"
        } else {
            "Preparing"
        };

        for plan in &plans {
            let mut message = format!("{} platform {} for arch '{}'", verb, platform, arch);
            if let Some(config) = plan.config {
                message.push_str(&format!(" and config {}", config));
            }
            message.push_str(&format!(" (build system: '{}')...", build_system));
            print_info(&message);

            ensure_dir(&plan.work_dir)?;
            let command = plan.configure_command(&ctx.cmake);
            ctx.run(&command, &plan.work_dir)?;

            if platform == PlatformId::Dotnet {
                dotnet::patch_dir(&plan.work_dir)?;
            }
        }

        BuildDirState {
            build_system: Some(build_system),
            single_config_build_system: single_config,
        }
        .store(&build_dir)
    }
}

fn detect_compilers<R: Runner>(ctx: &mut ProjectContext<R>) -> LinuxCompilers {
    let compilers = LinuxCompilers::detect(&mut ctx.runner);
    print_info(&format!("Detected GCC version {}", version_text(&compilers.gcc)));
    print_info(&format!("Detected Clang version {}", version_text(&compilers.clang)));
    if compilers.prefer_clang() {
        print_info("Forcing use of clang instead of GCC because of bugs in this GCC version.");
    }
    compilers
}

fn version_text(version: &Option<CompilerVersion>) -> String {
    match version {
        Some(v) => v.to_string(),
        None => "unknown".to_string(),
    }
}
