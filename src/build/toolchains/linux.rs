//! Linux compiler detection (GCC, Clang)
//!
//! GCC 4's standard library has too many bugs for the project, so when it is the system
//! compiler and Clang is available as well, Clang is forced.

use super::{probe_version, CompilerVersion};
use crate::exec::Runner;

/// Clang C compiler used when forcing Clang
pub const CLANG_CC: &str = "/usr/bin/clang";
/// Clang C++ compiler used when forcing Clang
pub const CLANG_CXX: &str = "/usr/bin/clang++";

/// Compiler versions found on the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinuxCompilers {
    pub gcc: Option<CompilerVersion>,
    pub clang: Option<CompilerVersion>,
}

impl LinuxCompilers {
    /// Probe `gcc --version` and `clang --version`
    pub fn detect(runner: &mut dyn Runner) -> Self {
        Self {
            gcc: probe_version(runner, "gcc", 3, true),
            clang: probe_version(runner, "clang", 2, false),
        }
    }

    /// Whether Clang must be forced over the system GCC
    pub fn prefer_clang(&self) -> bool {
        matches!(&self.gcc, Some(gcc) if gcc.major() == Some(4)) && self.clang.is_some()
    }

    /// Environment forcing Clang, if needed
    pub fn compiler_env(&self) -> Vec<(String, String)> {
        if self.prefer_clang() {
            vec![
                ("CC".to_string(), CLANG_CC.to_string()),
                ("CXX".to_string(), CLANG_CXX.to_string()),
            ]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::fake::FakeRunner;

    fn version(components: &[u32]) -> Option<CompilerVersion> {
        Some(CompilerVersion::new(components.to_vec()))
    }

    #[test]
    fn test_prefer_clang_over_gcc4() {
        let compilers = LinuxCompilers {
            gcc: version(&[4, 8, 4]),
            clang: version(&[3, 8]),
        };
        assert!(compilers.prefer_clang());
        assert_eq!(
            compilers.compiler_env(),
            vec![
                ("CC".to_string(), CLANG_CC.to_string()),
                ("CXX".to_string(), CLANG_CXX.to_string()),
            ]
        );
    }

    #[test]
    fn test_keep_newer_gcc() {
        let compilers = LinuxCompilers {
            gcc: version(&[9, 3, 0]),
            clang: version(&[10, 0]),
        };
        assert!(!compilers.prefer_clang());
        assert!(compilers.compiler_env().is_empty());
    }

    #[test]
    fn test_gcc4_without_clang() {
        let compilers = LinuxCompilers {
            gcc: version(&[4, 9, 2]),
            clang: None,
        };
        assert!(!compilers.prefer_clang());
    }

    #[test]
    fn test_detect_with_missing_compilers() {
        let mut runner = FakeRunner::new().with_output("gcc", "gcc (GCC) 4.9.2 20150212\n");
        let compilers = LinuxCompilers::detect(&mut runner);
        assert_eq!(compilers.gcc, version(&[4, 9, 2]));
        // clang is not installed: unknown, not an error
        assert_eq!(compilers.clang, None);
        assert_eq!(runner.captures.len(), 2);
    }
}
