//! Prepared build directories and pair selection
//!
//! The build root holds one directory per prepared (platform, arch) pair, named
//! `<platform>` or `<platform>_<arch>`. The directory listing is the inventory.

use std::fs;
use std::path::Path;

use crate::build::{Arch, PlatformId};
use crate::error::BuildError;

/// A (platform, arch) pair
pub type Pair = (PlatformId, Arch);

/// Split a build directory name. Returns `None` for directories that do not belong to a
/// known platform.
pub fn split_build_dir_name(name: &str) -> Option<Pair> {
    let (platform, arch) = match name.split_once('_') {
        Some((platform, arch)) => (platform, arch),
        None => (name, ""),
    };
    let platform = platform.parse::<PlatformId>().ok()?;
    Some((platform, Arch::new(arch)))
}

/// All prepared pairs, sorted by directory name. A missing build root means none.
pub fn prepared_pairs(build_root: &Path) -> Result<Vec<Pair>, BuildError> {
    if !build_root.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(build_root)
        .map_err(|e| BuildError::io(format!("Failed to list {}", build_root.display()), e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| BuildError::io(format!("Failed to list {}", build_root.display()), e))?;
        if entry.path().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();

    Ok(names
        .iter()
        .filter_map(|name| split_build_dir_name(name))
        .collect())
}

/// The pairs a command operates on
pub fn select_pairs(
    platform: Option<PlatformId>,
    arch: Option<&Arch>,
    prepared: &[Pair],
) -> Vec<Pair> {
    match (platform, arch) {
        (Some(platform), Some(arch)) => vec![(platform, arch.clone())],
        (Some(platform), None) => prepared
            .iter()
            .filter(|(p, _)| *p == platform)
            .cloned()
            .collect(),
        (None, Some(arch)) => {
            let mut platforms: Vec<PlatformId> = Vec::new();
            for (p, _) in prepared {
                if !platforms.contains(p) {
                    platforms.push(*p);
                }
            }
            platforms.into_iter().map(|p| (p, arch.clone())).collect()
        }
        (None, None) => prepared.to_vec(),
    }
}
