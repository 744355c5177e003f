//! CMake command lines
//!
//! Builders for the two CMake invocations: configure (`cmake -G ...`) and
//! `cmake --build`. Neither runs anything; they produce a [`CommandLine`].

use std::path::{Path, PathBuf};

use crate::build::ConfigName;
use crate::exec::CommandLine;

/// CMake configure step
#[derive(Debug, Clone, Default)]
pub struct CMakeConfig {
    /// CMake executable
    cmake: String,
    /// Source directory (where CMakeLists.txt is located)
    source_dir: PathBuf,
    /// Generator (e.g., "Ninja", "Unix Makefiles")
    generator: String,
    /// CMake variables (-D options), in order
    variables: Vec<(String, String)>,
    /// Toolchain file
    toolchain_file: Option<PathBuf>,
    /// Build type, single-config generators only
    build_type: Option<ConfigName>,
}

impl CMakeConfig {
    /// Create a new CMake configuration
    pub fn new(cmake: impl Into<String>, source_dir: &Path, generator: impl Into<String>) -> Self {
        Self {
            cmake: cmake.into(),
            source_dir: source_dir.to_path_buf(),
            generator: generator.into(),
            ..Default::default()
        }
    }

    /// Set multiple CMake variables
    pub fn variables(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.variables.extend(vars);
        self
    }

    /// Set the toolchain file
    pub fn toolchain_file(mut self, path: Option<PathBuf>) -> Self {
        self.toolchain_file = path;
        self
    }

    /// Set the build type
    pub fn build_type(mut self, build_type: Option<ConfigName>) -> Self {
        self.build_type = build_type;
        self
    }

    /// `cmake -G <generator> <source> [-D...] [-DCMAKE_TOOLCHAIN_FILE=..] [-DCMAKE_BUILD_TYPE=..]`
    pub fn to_command(&self) -> CommandLine {
        let mut cmd = CommandLine::new(&self.cmake)
            .arg("-G")
            .arg(&self.generator)
            .arg(self.source_dir.display().to_string())
            .label("cmake");

        for (name, value) in &self.variables {
            cmd = cmd.arg(format!("-D{}={}", name, value));
        }

        if let Some(toolchain) = &self.toolchain_file {
            cmd = cmd.arg(format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain.display()));
        }

        if let Some(build_type) = self.build_type {
            cmd = cmd.arg(format!("-DCMAKE_BUILD_TYPE={}", build_type));
        }

        cmd
    }
}

/// `cmake --build` step
#[derive(Debug, Clone)]
pub struct CMakeBuild {
    cmake: String,
    build_dir: PathBuf,
    clean: bool,
    config: Option<ConfigName>,
}

impl CMakeBuild {
    pub fn new(cmake: impl Into<String>, build_dir: &Path) -> Self {
        Self {
            cmake: cmake.into(),
            build_dir: build_dir.to_path_buf(),
            clean: false,
            config: None,
        }
    }

    /// Build the `clean` target instead of the default one
    pub fn clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Configuration to build, for multi-config generators
    pub fn config(mut self, config: Option<ConfigName>) -> Self {
        self.config = config;
        self
    }

    pub fn to_command(&self) -> CommandLine {
        let mut cmd = CommandLine::new(&self.cmake)
            .arg("--build")
            .arg(self.build_dir.display().to_string())
            .label("cmake --build");

        if self.clean {
            cmd = cmd.args(["--target", "clean"]);
        }
        if let Some(config) = self.config {
            cmd = cmd.args(["--config", config.as_str()]);
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_flag_order() {
        let cmd = CMakeConfig::new("cmake", Path::new("/p/cmake"), "Unix Makefiles")
            .variables([("IOS_PLATFORM".to_string(), "OS".to_string())])
            .toolchain_file(Some(PathBuf::from("/p/cmake/iOS.cmake")))
            .build_type(Some(ConfigName::Release))
            .to_command();

        assert_eq!(
            cmd.get_args(),
            &[
                "-G",
                "Unix Makefiles",
                "/p/cmake",
                "-DIOS_PLATFORM=OS",
                "-DCMAKE_TOOLCHAIN_FILE=/p/cmake/iOS.cmake",
                "-DCMAKE_BUILD_TYPE=Release",
            ]
        );
        assert_eq!(cmd.tool_name(), "cmake");
    }

    #[test]
    fn test_configure_minimal() {
        let cmd = CMakeConfig::new("/opt/cmake", Path::new("/p/cmake"), "Xcode").to_command();
        assert_eq!(cmd.program(), "/opt/cmake");
        assert_eq!(cmd.get_args(), &["-G", "Xcode", "/p/cmake"]);
    }

    #[test]
    fn test_build_command() {
        let cmd = CMakeBuild::new("cmake", Path::new("/p/build/linux/Debug")).to_command();
        assert_eq!(cmd.get_args(), &["--build", "/p/build/linux/Debug"]);
        assert_eq!(cmd.tool_name(), "cmake --build");

        let cmd = CMakeBuild::new("cmake", Path::new("/p/build/win32"))
            .clean(true)
            .config(Some(ConfigName::Debug))
            .to_command();
        assert_eq!(
            cmd.get_args(),
            &["--build", "/p/build/win32", "--target", "clean", "--config", "Debug"]
        );
    }
}
