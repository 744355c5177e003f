//! Platform, architecture and configuration names

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::BuildError;

/// Target platform, from a fixed closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlatformId {
    /// Universal Windows app (Windows 10 and later)
    WinUwp,
    /// Windows Store app (Windows 8.1 and later)
    WinStore,
    /// Classic Windows desktop program
    Win32,
    /// .NET program
    Dotnet,
    Linux,
    Mac,
    Ios,
    Android,
    /// Javascript web app or library built with emscripten
    Web,
}

impl PlatformId {
    /// All platforms, in help order
    pub const ALL: [PlatformId; 9] = [
        PlatformId::WinUwp,
        PlatformId::WinStore,
        PlatformId::Win32,
        PlatformId::Dotnet,
        PlatformId::Linux,
        PlatformId::Mac,
        PlatformId::Ios,
        PlatformId::Android,
        PlatformId::Web,
    ];

    /// The name used on the command line and in build directory names
    pub fn name(self) -> &'static str {
        match self {
            PlatformId::WinUwp => "winuwp",
            PlatformId::WinStore => "winstore",
            PlatformId::Win32 => "win32",
            PlatformId::Dotnet => "dotnet",
            PlatformId::Linux => "linux",
            PlatformId::Mac => "mac",
            PlatformId::Ios => "ios",
            PlatformId::Android => "android",
            PlatformId::Web => "web",
        }
    }

    /// One-line description for help output
    pub fn description(self) -> &'static str {
        match self {
            PlatformId::WinUwp => "Universal Windows app (Windows 10 and later)",
            PlatformId::WinStore => "Windows Store app (Windows 8.1 and later)",
            PlatformId::Win32 => {
                "Classic Windows desktop program (despite the 32 in the name, this also includes 64 bit Windows desktop programs)"
            }
            PlatformId::Dotnet => ".NET program",
            PlatformId::Linux => "Linux",
            PlatformId::Mac => "Apple Mac OS (formerly OSX)",
            PlatformId::Ios => "iPhone, iPad",
            PlatformId::Android => "Android devices",
            PlatformId::Web => {
                "Javascript-based web app or library for a web browser or Node.js (pure Javascript, no plugins)"
            }
        }
    }

    /// Help text listing every platform
    pub fn help() -> String {
        PlatformId::ALL
            .iter()
            .map(|p| format!("  {}: {}", p.name(), p.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlatformId {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlatformId::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| BuildError::InvalidPlatform(s.to_string()))
    }
}

/// Architecture tag. Its meaning depends on the platform; `std` is the
/// platform's default architecture set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Arch(String);

impl Arch {
    /// The default architecture name
    pub const STD: &'static str = "std";

    /// Create an architecture tag. An empty name is `std`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Self::std()
        } else {
            Self(name)
        }
    }

    pub fn std() -> Self {
        Self(Self::STD.to_string())
    }

    pub fn is_std(&self) -> bool {
        self.0 == Self::STD
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Arch {
    fn default() -> Self {
        Self::std()
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Arch {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Build configuration. Only chosen at configure time for single-config build systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ConfigName {
    /// Debug build
    #[value(name = "Debug")]
    Debug,
    /// Release build
    #[value(name = "Release")]
    Release,
}

impl ConfigName {
    /// Both configurations, in the order they are processed
    pub const ALL: [ConfigName; 2] = [ConfigName::Debug, ConfigName::Release];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigName::Debug => "Debug",
            ConfigName::Release => "Release",
        }
    }
}

impl fmt::Display for ConfigName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
