//! Distclean command implementation

use anyhow::Result;
use clap::Args;

use super::{ProjectContext, TargetArgs};
use crate::exec::Runner;
use crate::utils::paths::remove_dir_with_retry;
use crate::utils::terminal::print_info;

const REMOVE_ATTEMPTS: u32 = 10;

/// Delete build directories, including their build state
#[derive(Args, Debug, Default)]
pub struct DistcleanCommand {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl DistcleanCommand {
    /// Execute the distclean command
    pub fn execute<R: Runner>(self, ctx: &mut ProjectContext<R>) -> Result<()> {
        ctx.probe_generators()?;

        for (platform, arch) in ctx.selected_pairs(&self.target)? {
            let dir = ctx.layout.platform_build_dir(platform, &arch);
            if dir.is_dir() {
                print_info(&format!("Removing {}", dir.display()));
                remove_dir_with_retry(&dir, REMOVE_ATTEMPTS)?;
            }
        }
        Ok(())
    }
}
