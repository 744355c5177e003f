//! Error types and helpers for user-friendly error messages
//!
//! Every expected failure maps to one fixed process exit code. Anything that is not a
//! [`BuildError`] is treated as unexpected by `main` and reported with its full chain.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for bad or missing command line arguments
pub const EXIT_ARGUMENT_ERROR: i32 = 1;
/// Exit code when a required CMake toolchain file is missing
pub const EXIT_MISSING_TOOLCHAIN_FILE: i32 = 5;
/// Exit code when CMake itself cannot be invoked
pub const EXIT_CMAKE_PROBLEM: i32 = 10;
/// Exit code when an invoked tool returned a non-zero exit code
pub const EXIT_TOOL_FAILED: i32 = 11;
/// Exit code for a valid call that lacks required state
pub const EXIT_INCORRECT_CALL: i32 = 12;
/// Exit code for everything else
pub const EXIT_UNEXPECTED: i32 = 50;

/// Expected, user-facing errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// Bad or missing command line input
    #[error("{message}")]
    Argument { message: String },

    /// Platform name outside the fixed platform set
    #[error("Invalid platform name: '{0}'")]
    InvalidPlatform(String),

    /// Architecture not supported by the platform / build system combination
    #[error("Invalid architecture '{arch}' for platform {platform}")]
    InvalidArchitecture {
        platform: String,
        arch: String,
        hint: Option<String>,
    },

    /// The tool could not be started at all
    #[error("There was a problem calling {tool}: {message}")]
    ToolInvocation {
        tool: String,
        message: String,
        hint: Option<String>,
    },

    /// The tool ran and returned a non-zero exit code
    #[error("{tool} failed with exit code {code}")]
    ToolFailed { tool: String, code: i32 },

    /// Syntactically valid call that is missing required state
    #[error("{message}")]
    IncorrectCall {
        message: String,
        hint: Option<String>,
    },

    /// A toolchain file the platform needs is not there
    #[error("Required CMake toolchain file not found: {}", .0.display())]
    MissingToolchainFile(PathBuf),

    /// A build directory state file could not be read or written
    #[error("Build state in {} is unusable: {message}", .dir.display())]
    State { dir: PathBuf, message: String },

    /// Filesystem failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The project configuration file is invalid
    #[error("Configuration error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl BuildError {
    /// Create an argument error
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    /// Create an invalid architecture error with a hint
    pub fn invalid_arch_with_hint(
        platform: impl ToString,
        arch: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::InvalidArchitecture {
            platform: platform.to_string(),
            arch: arch.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an incorrect call error
    pub fn incorrect_call(message: impl Into<String>) -> Self {
        Self::IncorrectCall {
            message: message.into(),
            hint: None,
        }
    }

    /// Create an incorrect call error with a hint
    pub fn incorrect_call_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::IncorrectCall {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create a tool failure error
    pub fn tool_failed(tool: impl Into<String>, code: i32) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            code,
        }
    }

    /// Wrap an io error with a short description of what was being done
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// The process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::Argument { .. }
            | BuildError::InvalidPlatform(_)
            | BuildError::InvalidArchitecture { .. } => EXIT_ARGUMENT_ERROR,
            BuildError::MissingToolchainFile(_) => EXIT_MISSING_TOOLCHAIN_FILE,
            BuildError::ToolInvocation { .. } => EXIT_CMAKE_PROBLEM,
            BuildError::ToolFailed { .. } => EXIT_TOOL_FAILED,
            BuildError::IncorrectCall { .. } => EXIT_INCORRECT_CALL,
            BuildError::State { .. } | BuildError::Io { .. } | BuildError::Config { .. } => {
                EXIT_UNEXPECTED
            }
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        match self {
            BuildError::InvalidArchitecture { hint, .. }
            | BuildError::ToolInvocation { hint, .. }
            | BuildError::IncorrectCall { hint, .. } => {
                if let Some(h) = hint {
                    eprintln!("\n{} {}", style("HINT:").yellow().bold(), h);
                }
            }
            BuildError::Argument { .. } | BuildError::InvalidPlatform(_) => {
                eprintln!(
                    "\n{} Call with --help to get help information.",
                    style("HINT:").yellow().bold()
                );
            }
            _ => {}
        }

        eprintln!();
    }
}

/// Common error hints
pub mod hints {
    /// Get hint for missing CMake
    pub fn cmake() -> &'static str {
        "CMake is required and must be installed to run this.\n\
         Install CMake from https://cmake.org/ or use your package manager:\n\
         • macOS: brew install cmake\n\
         • Ubuntu: sudo apt install cmake\n\
         • Windows: winget install Kitware.CMake\n\
         \n\
         Or point --cmake / BDNBUILD_CMAKE at the cmake executable."
    }

    /// Get hint for architectures by platform
    pub fn architectures() -> &'static str {
        "Supported values depend on the build system and platform:\n\
         • win32/winstore/winuwp with Visual Studio: std (x86), x64, arm\n\
         • ios: std, sim32, sim64\n\
         • android: std or any NDK ABI name (e.g. armeabi-v7a, arm64-v8a, x86_64)\n\
         • linux: any\n\
         • all other platforms: std only"
    }
}
