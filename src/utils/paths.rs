//! Path utilities for bdnbuild

use std::path::Path;
use std::thread;
use std::time::Duration;

use walkdir::WalkDir;

use crate::error::BuildError;
use crate::utils::terminal::print_warning;

/// Ensure a directory exists
pub fn ensure_dir(path: &Path) -> Result<(), BuildError> {
    if !path.is_dir() {
        std::fs::create_dir_all(path)
            .map_err(|e| BuildError::io(format!("Failed to create {}", path.display()), e))?;
    }
    Ok(())
}

/// Remove a directory tree, retrying while something (an IDE, a virus scanner)
/// still holds files open inside it
pub fn remove_dir_with_retry(path: &Path, attempts: u32) -> Result<(), BuildError> {
    let mut attempt = 1;
    loop {
        if !path.exists() {
            return Ok(());
        }
        match std::fs::remove_dir_all(path) {
            Ok(()) => return Ok(()),
            Err(e) if attempt >= attempts => {
                return Err(BuildError::io(
                    format!("Failed to remove {}", path.display()),
                    e,
                ));
            }
            Err(_) => {
                attempt += 1;
                thread::sleep(Duration::from_secs(1));
            }
        }
    }
}

/// Remove what a failed step left behind in `path` and return the step's error.
/// A failed removal is only reported.
pub fn discard_partial(path: &Path, attempts: u32, error: BuildError) -> BuildError {
    if let Err(cleanup) = remove_dir_with_retry(path, attempts) {
        print_warning(&format!("{}. Remove it manually.", cleanup));
    }
    error
}

/// Recursively copy `src` into `dst`. `dst` must not exist yet.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<(), BuildError> {
    if !src.is_dir() {
        return Err(BuildError::io(
            format!("Cannot copy {}", src.display()),
            std::io::Error::new(std::io::ErrorKind::NotFound, "source directory not found"),
        ));
    }

    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).display().to_string();
            BuildError::io(format!("Failed to read {}", path), e.into())
        })?;
        // WalkDir only yields paths below `src`
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(|e| {
                BuildError::io(format!("Failed to copy {}", entry.path().display()), e)
            })?;
        }
    }
    Ok(())
}
