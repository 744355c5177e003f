//! bdnbuild.toml configuration parsing
//!
//! The file is optional. Every key has a default matching the standard project layout:
//!
//! ```toml
//! [paths]
//! cmake-dir = "cmake"
//! build-dir = "build"
//! third-party-dir = "3rdparty"
//! third-party-build-dir = "3rdparty_build"
//!
//! [web]
//! emsdk-version = "sdk-incoming-64bit"
//! browser = "safari"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::BuildError;

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "bdnbuild.toml";

/// Root configuration from bdnbuild.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directory layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// Web (emscripten) settings
    #[serde(default)]
    pub web: WebConfig,
}

/// The `[paths]` section, relative to the project root
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory holding the top-level CMakeLists.txt and the toolchain files
    #[serde(default = "default_cmake_dir")]
    pub cmake_dir: PathBuf,
    /// Root of all platform build directories
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,
    /// Third-party sources (emsdk, curl)
    #[serde(default = "default_third_party_dir")]
    pub third_party_dir: PathBuf,
    /// Where third-party sources are copied to and built
    #[serde(default = "default_third_party_build_dir")]
    pub third_party_build_dir: PathBuf,
}

fn default_cmake_dir() -> PathBuf {
    PathBuf::from("cmake")
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_third_party_dir() -> PathBuf {
    PathBuf::from("3rdparty")
}

fn default_third_party_build_dir() -> PathBuf {
    PathBuf::from("3rdparty_build")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cmake_dir: default_cmake_dir(),
            build_dir: default_build_dir(),
            third_party_dir: default_third_party_dir(),
            third_party_build_dir: default_third_party_build_dir(),
        }
    }
}

/// The `[web]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct WebConfig {
    /// SDK name passed to `emsdk install` / `emsdk activate`
    #[serde(default = "default_emsdk_version")]
    pub emsdk_version: String,
    /// Browser used by `emrun` for the run command
    #[serde(default = "default_browser")]
    pub browser: String,
}

fn default_emsdk_version() -> String {
    "sdk-incoming-64bit".to_string()
}

fn default_browser() -> String {
    "safari".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            emsdk_version: default_emsdk_version(),
            browser: default_browser(),
        }
    }
}

impl ProjectConfig {
    /// Load bdnbuild.toml from the project root, or the defaults if there is none
    pub fn load(project_root: &Path) -> Result<Self, BuildError> {
        let path = project_root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| BuildError::io(format!("Failed to read {}", path.display()), e))?;
        Self::parse(&content).map_err(|message| BuildError::Config { path, message })
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}
