//! Project file fixups for the dotnet platform
//!
//! Projects compiled with `/clr:pure` need an explicit empty calling convention and
//! CLR support entry, which CMake does not generate.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::utils::terminal::print_info;

const CALLING_CONVENTION: &str = "<CallingConvention />";
const CL_COMPILE_END: &str = "</ClCompile>";
const CLR_SUPPORT: &str = "<CLRSupport>";
const USE_OF_MFC: &str = "<UseOfMfc>";

/// Patch the text of a `.vcxproj` file. Returns `None` if it needs no changes.
pub fn patch_project(text: &str) -> Option<String> {
    let mut data = text.to_string();
    let mut modified = false;

    if !data.contains(CALLING_CONVENTION) && data.contains(CL_COMPILE_END) {
        data = data.replace(
            CL_COMPILE_END,
            &format!("  {}\n    {}", CALLING_CONVENTION, CL_COMPILE_END),
        );
        modified = true;
    }

    if !data.contains(CLR_SUPPORT) && data.contains(USE_OF_MFC) {
        data = data.replace(
            USE_OF_MFC,
            &format!("{}Pure</CLRSupport>\n    {}", CLR_SUPPORT, USE_OF_MFC),
        );
        modified = true;
    }

    modified.then_some(data)
}

/// Patch every `.vcxproj` file directly inside `dir`. Returns the modified files.
pub fn patch_dir(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| BuildError::io(format!("Failed to list {}", dir.display()), e))?;

    let mut projects: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "vcxproj"))
        .collect();
    projects.sort();

    let mut modified = Vec::new();
    for path in projects {
        let text = fs::read_to_string(&path)
            .map_err(|e| BuildError::io(format!("Failed to read {}", path.display()), e))?;

        if let Some(patched) = patch_project(&text) {
            print_info(&format!("Modifying {} for /clr:pure...", path.display()));
            fs::write(&path, patched)
                .map_err(|e| BuildError::io(format!("Failed to write {}", path.display()), e))?;
            modified.push(path);
        }
    }
    Ok(modified)
}
