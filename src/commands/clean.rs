//! Clean command implementation

use anyhow::Result;
use clap::Args;

use super::build::build_or_clean;
use super::{ProjectContext, TargetArgs};
use crate::build::ConfigName;
use crate::exec::Runner;

/// Remove build output through the build system's `clean` target
#[derive(Args, Debug, Default)]
pub struct CleanCommand {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Configuration to clean. Defaults to all configurations.
    #[arg(long, short = 'c', value_enum)]
    pub config: Option<ConfigName>,
}

impl CleanCommand {
    /// Execute the clean command
    pub fn execute<R: Runner>(self, ctx: &mut ProjectContext<R>) -> Result<()> {
        build_or_clean(ctx, &self.target, self.config, true)
    }
}
