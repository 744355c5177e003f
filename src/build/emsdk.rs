//! Emscripten SDK bootstrap for the web platform
//!
//! The SDK sources live in the third-party directory and are copied into the third-party
//! build directory on first use, where `emsdk` installs and activates the configured SDK.

use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::build::Layout;
use crate::error::BuildError;
use crate::exec::{CommandLine, Runner};
use crate::utils::paths::{copy_dir_all, discard_partial, ensure_dir};
use crate::utils::terminal::{print_info, print_success};

/// Shebang of the SDK's scripts
const PYTHON2_SHEBANG: &[u8] = b"#!/usr/bin/env python2\n";
/// Replacement; same length so the file can be patched in place
const PYTHON_SHEBANG: &[u8] = b"#!/usr/bin/env python \n";

/// Attempts to remove a half installed SDK
const REMOVE_ATTEMPTS: u32 = 30;

/// Path of the `emsdk` driver script
pub fn emsdk_executable(emsdk_dir: &Path) -> PathBuf {
    emsdk_dir.join("emsdk")
}

/// Shell snippet that puts the SDK on `PATH` for the command that follows
pub fn activation_prefix(emsdk_dir: &Path) -> String {
    if cfg!(windows) {
        format!(
            "\"{}\" activate latest &&",
            emsdk_executable(emsdk_dir).display()
        )
    } else {
        format!(". {} &&", emsdk_dir.join("emsdk_env.sh").display())
    }
}

/// Install the SDK unless it is already there. Returns whether anything was installed.
///
/// A failed installation leaves no SDK directory behind.
pub fn ensure_installed(
    runner: &mut dyn Runner,
    layout: &Layout,
    sdk_version: &str,
) -> Result<bool, BuildError> {
    let emsdk_dir = layout.emsdk_dir();
    if emsdk_dir.is_dir() {
        return Ok(false);
    }

    print_info("Setting up Emscripten SDK. This can take a while...");

    if let Err(e) = install(runner, layout, &emsdk_dir, sdk_version) {
        return Err(discard_partial(&emsdk_dir, REMOVE_ATTEMPTS, e));
    }

    print_success("Emscripten was successfully set up.");
    Ok(true)
}

fn install(
    runner: &mut dyn Runner,
    layout: &Layout,
    emsdk_dir: &Path,
    sdk_version: &str,
) -> Result<(), BuildError> {
    ensure_dir(&layout.third_party_build_dir)?;
    copy_dir_all(&layout.emsdk_source_dir(), emsdk_dir)?;

    let exe = emsdk_executable(emsdk_dir).display().to_string();
    for args in [
        vec!["update"],
        vec!["install", sdk_version],
        vec!["activate", sdk_version],
    ] {
        let command = CommandLine::new(exe.as_str()).args(args).label("emsdk");
        runner.run(&command, emsdk_dir)?;
    }
    Ok(())
}

/// Whether a `python2` executable is on `PATH`
pub fn python2_available() -> bool {
    which::which("python2").is_ok()
}

/// Point the SDK's python2 scripts at `python`. Directories named `include` are skipped.
///
/// Returns the rewritten files.
pub fn rewrite_python2_shebangs(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut updated = Vec::new();

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && e.depth() > 0 && e.file_name() == "include"));

    for entry in walker {
        let entry = entry.map_err(|e| BuildError::io(format!("Failed to scan {}", dir.display()), e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_script = match path.extension() {
            None => true,
            Some(ext) => ext == "py",
        };
        if is_script && rewrite_shebang(path)? {
            updated.push(path.to_path_buf());
        }
    }
    Ok(updated)
}

fn rewrite_shebang(path: &Path) -> Result<bool, BuildError> {
    let io_err = |e| BuildError::io(format!("Failed to update {}", path.display()), e);

    let mut file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(io_err)?;

    let mut head = Vec::with_capacity(PYTHON2_SHEBANG.len());
    (&mut file)
        .take(PYTHON2_SHEBANG.len() as u64)
        .read_to_end(&mut head)
        .map_err(io_err)?;
    if head != PYTHON2_SHEBANG {
        return Ok(false);
    }

    file.seek(SeekFrom::Start(0)).map_err(io_err)?;
    file.write_all(PYTHON_SHEBANG).map_err(io_err)?;
    Ok(true)
}

/// Install the SDK if needed and make its scripts runnable on this host
pub fn bootstrap(
    runner: &mut dyn Runner,
    layout: &Layout,
    sdk_version: &str,
) -> Result<(), BuildError> {
    ensure_installed(runner, layout, sdk_version)?;

    if !python2_available() {
        print_info("Python2 executable is named just 'python'. Changing references...");
        for path in rewrite_python2_shebangs(&layout.emsdk_dir())? {
            print_info(&format!("Updated {}", path.display()));
        }
    }
    Ok(())
}
