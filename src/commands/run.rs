//! Run command implementation
//!
//! Starts a built module of a prepared platform on the local host.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{ProjectContext, TargetArgs};
use crate::build::{emsdk, Arch, ConfigName, Layout, PlatformId};
use crate::error::BuildError;
use crate::exec::{CommandLine, Runner};
use crate::utils::terminal::{print_info, print_warning};

/// Run a built module (executable or app)
#[derive(Args, Debug, Default)]
pub struct RunCommand {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Configuration whose output is run
    #[arg(long, short = 'c', value_enum)]
    pub config: Option<ConfigName>,

    /// Name of the module to run
    #[arg(long, short = 'm')]
    pub module: Option<String>,

    /// Parameters passed to the module
    #[arg(last = true)]
    pub params: Vec<String>,
}

impl RunCommand {
    /// Execute the run command
    pub fn execute<R: Runner>(self, ctx: &mut ProjectContext<R>) -> Result<()> {
        let module = self
            .module
            .as_deref()
            .ok_or_else(|| BuildError::argument("Please specify a module name with --module MODULE"))?;
        let platform = self.target.platform.ok_or_else(|| {
            BuildError::argument("Please specify the platform name with --platform PLATFORM")
        })?;
        let config = self.config.ok_or_else(|| {
            BuildError::argument("Please specify the configuration name with --config CONFIG")
        })?;

        ctx.probe_generators()?;

        let pairs = ctx.selected_pairs(&self.target)?;
        if pairs.is_empty() {
            print_warning(&format!("Platform {} has not been prepared yet.", platform));
        }

        let browser = ctx.settings.web.browser.clone();
        for (platform, arch) in pairs {
            let (command, cwd) = module_command(
                &ctx.layout,
                platform,
                &arch,
                config,
                module,
                &self.params,
                &browser,
            );
            print_info(&format!("Calling executable of module {}:", module));
            ctx.run(&command, &cwd)?;
        }
        Ok(())
    }
}

/// The command that starts `module`, and the directory to start it in
fn module_command(
    layout: &Layout,
    platform: PlatformId,
    arch: &Arch,
    config: ConfigName,
    module: &str,
    params: &[String],
    browser: &str,
) -> (CommandLine, PathBuf) {
    let platform_dir = layout.platform_build_dir(platform, arch);
    let output_dir = if platform == PlatformId::Ios {
        platform_dir.join(format!("{}-iphonesimulator", config))
    } else {
        platform_dir.join(config.as_str())
    };

    let module_path = output_dir.join(module);
    let app = output_dir.join(format!("{}.app", module));

    let command = match platform {
        PlatformId::Win32 => {
            CommandLine::new(output_dir.join(format!("{}.exe", module)).display().to_string())
        }
        PlatformId::Mac if app.exists() => CommandLine::new("open")
            .arg("-W")
            .arg(app.display().to_string()),
        PlatformId::Ios if app.exists() => CommandLine::new("open")
            .args(["-a", "Simulator", "-W", "--args", "-SimulateApplication"])
            .arg(app.join(module).display().to_string()),
        PlatformId::Web => CommandLine::new("emrun")
            .args(["--browser", browser])
            .arg(output_dir.join(format!("{}.html", module)).display().to_string())
            .shell_prefix(emsdk::activation_prefix(&layout.emsdk_dir())),
        _ => CommandLine::new(module_path.display().to_string()),
    };

    (command.args(params.iter().cloned()).label("run"), output_dir)
}
