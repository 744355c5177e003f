//! Builddeps command implementation
//!
//! Builds the third-party libraries that are not built through CMake (curl).

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use super::ProjectContext;
use crate::build::Layout;
use crate::error::BuildError;
use crate::exec::{CommandLine, Runner};
use crate::utils::paths::{copy_dir_all, discard_partial, ensure_dir};
use crate::utils::terminal::print_info;

const REMOVE_ATTEMPTS: u32 = 10;

/// Build third-party dependencies
#[derive(Args, Debug, Default)]
pub struct BuilddepsCommand {}

impl BuilddepsCommand {
    /// Execute the builddeps command
    pub fn execute<R: Runner>(self, ctx: &mut ProjectContext<R>) -> Result<()> {
        let build_dir = ctx.layout.curl_build_dir();
        copy_sources(&ctx.layout, &build_dir)?;

        for (command, cwd) in curl_commands(&build_dir, cfg!(windows)) {
            ctx.run(&command, &cwd)?;
        }
        Ok(())
    }
}

/// Copy the curl sources into the build area once. A failed copy leaves nothing behind.
fn copy_sources(layout: &Layout, build_dir: &Path) -> Result<(), BuildError> {
    if build_dir.is_dir() {
        return Ok(());
    }

    print_info(&format!("Copying curl sources to {}", build_dir.display()));
    let copied = ensure_dir(&layout.third_party_build_dir)
        .and_then(|_| copy_dir_all(&layout.curl_source_dir(), build_dir));

    copied.map_err(|e| discard_partial(build_dir, REMOVE_ATTEMPTS, e))
}

/// The commands that build curl, with their working directories
fn curl_commands(build_dir: &Path, windows_host: bool) -> Vec<(CommandLine, PathBuf)> {
    if windows_host {
        vec![(
            CommandLine::new("nmake").args(["/f", "Makefile.vc", "mode=dll"]),
            build_dir.join("winbuild"),
        )]
    } else {
        let configure = build_dir.join("configure").display().to_string();
        vec![
            (CommandLine::new(configure), build_dir.to_path_buf()),
            (CommandLine::new("make"), build_dir.to_path_buf()),
        ]
    }
}
