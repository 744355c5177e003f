//! Build planning and project layout
//!
//! ## Architecture
//!
//! ```text
//! inventory + state → plan (generators, toolchains, emsdk) → cmake → exec::Runner
//! ```
//!
//! ## Modules
//!
//! - `platform` - Platform, architecture and configuration names
//! - `state` - Per build directory state file
//! - `generators` - CMake generator list and build system aliases
//! - `toolchains` - Host compiler detection
//! - `plan` - Per platform configure plans
//! - `cmake` - CMake configure / build command lines
//! - `inventory` - Prepared build directories and pair selection
//! - `emsdk` - Emscripten SDK bootstrap for the web platform
//! - `dotnet` - Project file fixups for the dotnet platform

pub mod cmake;
pub mod dotnet;
pub mod emsdk;
pub mod generators;
pub mod inventory;
pub mod plan;
pub mod platform;
pub mod state;
pub mod toolchains;

use std::path::{Path, PathBuf};

use crate::config::project::PathsConfig;

pub use generators::GeneratorInfo;
pub use platform::{Arch, ConfigName, PlatformId};

/// Directory layout of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Project root
    pub root: PathBuf,
    /// Directory with the top-level CMakeLists.txt and toolchain files
    pub cmake_dir: PathBuf,
    /// Parent of all platform build directories
    pub build_root: PathBuf,
    /// Third-party sources
    pub third_party_dir: PathBuf,
    /// Third-party build area
    pub third_party_build_dir: PathBuf,
}

impl Layout {
    /// Layout of the project at `root`. Relative configured paths are taken relative to it.
    pub fn new(root: &Path, paths: &PathsConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            cmake_dir: root.join(&paths.cmake_dir),
            build_root: root.join(&paths.build_dir),
            third_party_dir: root.join(&paths.third_party_dir),
            third_party_build_dir: root.join(&paths.third_party_build_dir),
        }
    }

    /// Build directory name of a pair: `<platform>` for std, else `<platform>_<arch>`
    pub fn build_dir_name(platform: PlatformId, arch: &Arch) -> String {
        if arch.is_std() {
            platform.name().to_string()
        } else {
            format!("{}_{}", platform.name(), arch)
        }
    }

    /// Build directory of a (platform, arch) pair
    pub fn platform_build_dir(&self, platform: PlatformId, arch: &Arch) -> PathBuf {
        self.build_root.join(Self::build_dir_name(platform, arch))
    }

    /// Directory CMake runs in: the platform directory, or one subdirectory per
    /// configuration for single-config build systems
    pub fn config_dir(
        &self,
        platform: PlatformId,
        arch: &Arch,
        config: Option<ConfigName>,
    ) -> PathBuf {
        let dir = self.platform_build_dir(platform, arch);
        match config {
            Some(config) => dir.join(config.as_str()),
            None => dir,
        }
    }

    /// CMake toolchain file with the given name
    pub fn toolchain_file(&self, name: &str) -> PathBuf {
        self.cmake_dir.join(name)
    }

    /// Emscripten SDK sources
    pub fn emsdk_source_dir(&self) -> PathBuf {
        self.third_party_dir.join("emsdk")
    }

    /// Installed Emscripten SDK
    pub fn emsdk_dir(&self) -> PathBuf {
        self.third_party_build_dir.join("emsdk")
    }

    /// curl sources
    pub fn curl_source_dir(&self) -> PathBuf {
        self.third_party_dir.join("curl")
    }

    /// curl build directory
    pub fn curl_build_dir(&self) -> PathBuf {
        self.third_party_build_dir.join("curl")
    }
}
